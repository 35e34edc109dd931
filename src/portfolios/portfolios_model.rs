use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::portfolios_errors::{PortfolioError, Result};
use crate::constants::{FOLDER_COLOR, FOLDER_ICON};

/// Domain model representing a portfolio folder.
///
/// Folders group a user's properties for organization and reporting;
/// each user has one default "All Properties" folder that cannot be
/// deleted. Folders may nest through `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub parent_id: Option<String>,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new portfolio folder
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<String>,
}

impl NewPortfolio {
    /// Validates the new portfolio data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PortfolioError::InvalidData(
                "Folder name cannot be empty".to_string(),
            ));
        }
        if self.user_id.trim().is_empty() {
            return Err(PortfolioError::InvalidData(
                "User ID cannot be empty".to_string(),
            ));
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

/// Input model for updating an existing portfolio folder. `None` fields
/// are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<String>,
}

impl PortfolioUpdate {
    /// Validates the portfolio update data
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(PortfolioError::InvalidData(
                "Folder ID is required for updates".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(PortfolioError::InvalidData(
                    "Folder name cannot be empty".to_string(),
                ));
            }
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

fn validate_color(color: &str) -> Result<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(PortfolioError::InvalidData(format!(
            "Folder color must be a hex color like #10B981, got '{}'",
            color
        )));
    }
    Ok(())
}

/// Database model for portfolio folders
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub parent_id: Option<String>,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Folder-level financial summary, recomputed from current property
/// records on every request. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub property_count: usize,
    pub total_value: f64,
    pub total_monthly_cash_flow: f64,
    pub total_annual_cash_flow: f64,
    /// Value-weighted average across properties with a cap rate on record
    pub average_cap_rate: f64,
    pub average_monthly_rent: f64,
    pub average_monthly_expenses: f64,
    pub total_equity: f64,
    pub residential_count: usize,
    pub commercial_count: usize,
    pub mixed_use_count: usize,
    pub other_count: usize,
    pub top_cities: Vec<CityBreakdown>,
    pub positive_cash_flow_count: usize,
    pub negative_cash_flow_count: usize,
    pub break_even_count: usize,
}

/// One city's slice of the portfolio, by aggregate property value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CityBreakdown {
    pub city: String,
    pub property_count: usize,
    pub total_value: f64,
    pub percentage: f64,
}

/// Portfolio folder together with its computed metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioWithMetrics {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    pub metrics: PortfolioMetrics,
    /// Slash-separated path from the root folder, e.g. "Rentals/Atlanta"
    pub folder_path: String,
}

// Conversion implementations
impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            description: db.description,
            color: db.color,
            icon: db.icon,
            parent_id: db.parent_id,
            is_default: db.is_default,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewPortfolio> for PortfolioDB {
    fn from(domain: NewPortfolio) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            user_id: domain.user_id,
            name: domain.name,
            description: domain.description,
            color: domain.color.unwrap_or_else(|| FOLDER_COLOR.to_string()),
            icon: domain.icon.unwrap_or_else(|| FOLDER_ICON.to_string()),
            parent_id: domain.parent_id,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }
}

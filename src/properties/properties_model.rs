use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::properties_errors::{PropertyError, Result};
use crate::metrics::FinancialInputs;

/// Property type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Residential,
    Commercial,
    MixedUse,
    Land,
    Industrial,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        use crate::properties::properties_constants::*;
        match self {
            PropertyType::Residential => PROPERTY_TYPE_RESIDENTIAL,
            PropertyType::Commercial => PROPERTY_TYPE_COMMERCIAL,
            PropertyType::MixedUse => PROPERTY_TYPE_MIXED_USE,
            PropertyType::Land => PROPERTY_TYPE_LAND,
            PropertyType::Industrial => PROPERTY_TYPE_INDUSTRIAL,
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use crate::properties::properties_constants::*;
        match s {
            s if s == PROPERTY_TYPE_RESIDENTIAL => Ok(PropertyType::Residential),
            s if s == PROPERTY_TYPE_COMMERCIAL => Ok(PropertyType::Commercial),
            s if s == PROPERTY_TYPE_MIXED_USE => Ok(PropertyType::MixedUse),
            s if s == PROPERTY_TYPE_LAND => Ok(PropertyType::Land),
            s if s == PROPERTY_TYPE_INDUSTRIAL => Ok(PropertyType::Industrial),
            _ => Err(format!("Unknown property type: {}", s)),
        }
    }
}

/// Property status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Owned,
    UnderContract,
    Sold,
    Rented,
    Vacant,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        use crate::properties::properties_constants::*;
        match self {
            PropertyStatus::Owned => PROPERTY_STATUS_OWNED,
            PropertyStatus::UnderContract => PROPERTY_STATUS_UNDER_CONTRACT,
            PropertyStatus::Sold => PROPERTY_STATUS_SOLD,
            PropertyStatus::Rented => PROPERTY_STATUS_RENTED,
            PropertyStatus::Vacant => PROPERTY_STATUS_VACANT,
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use crate::properties::properties_constants::*;
        match s {
            s if s == PROPERTY_STATUS_OWNED => Ok(PropertyStatus::Owned),
            s if s == PROPERTY_STATUS_UNDER_CONTRACT => Ok(PropertyStatus::UnderContract),
            s if s == PROPERTY_STATUS_SOLD => Ok(PropertyStatus::Sold),
            s if s == PROPERTY_STATUS_RENTED => Ok(PropertyStatus::Rented),
            s if s == PROPERTY_STATUS_VACANT => Ok(PropertyStatus::Vacant),
            _ => Err(format!("Unknown property status: {}", s)),
        }
    }
}

/// Domain model representing a property in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub user_id: String,
    pub portfolio_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: String,
    pub property_type: String,
    pub status: String,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub current_value: f64,
    pub down_payment: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub financials: Option<PropertyFinancials>,
}

impl Property {
    /// Current equity: value less the remaining loan balance, floored at
    /// zero. Falls back to the full value when no loan data is recorded.
    pub fn equity(&self) -> f64 {
        match self
            .financials
            .as_ref()
            .and_then(|f| f.remaining_loan_balance)
        {
            Some(balance) => (self.current_value - balance).max(0.0),
            None => self.current_value,
        }
    }

    /// Assembles calculator inputs from the stored (monthly) financial
    /// record plus the property-level value and down payment.
    pub fn financial_inputs(&self) -> FinancialInputs {
        let fin = self.financials.as_ref();
        FinancialInputs {
            monthly_rent: fin.map(|f| f.monthly_rent),
            property_taxes: fin.map(|f| f.property_taxes),
            insurance: fin.map(|f| f.insurance),
            hoa_fees: fin.map(|f| f.hoa_fees),
            maintenance_costs: fin.map(|f| f.maintenance_costs),
            other_expenses: fin.map(|f| f.other_expenses),
            mortgage_payment: fin.map(|f| f.mortgage_payment),
            current_value: Some(self.current_value),
            down_payment: Some(self.down_payment),
            vacancy_rate: fin.map(|f| f.vacancy_rate),
        }
    }
}

/// Per-property financial record. All expense figures are stored as
/// monthly amounts; `cap_rate`, `cash_flow` and `cash_on_cash_return` are
/// the persisted derived metrics, refreshed on every create/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFinancials {
    pub monthly_rent: f64,
    pub property_taxes: f64,
    pub insurance: f64,
    pub hoa_fees: f64,
    pub maintenance_costs: f64,
    pub other_expenses: f64,
    pub mortgage_payment: f64,
    pub vacancy_rate: f64,
    pub remaining_loan_balance: Option<f64>,
    pub cap_rate: Option<f64>,
    pub cash_flow: Option<f64>,
    pub cash_on_cash_return: Option<f64>,
    pub last_calculated: Option<NaiveDateTime>,
}

/// Input model for creating a new property.
///
/// `property_taxes` and `insurance` are ANNUAL amounts, as entered by
/// users; the service converts them to monthly before storing. Every
/// other expense figure is monthly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub portfolio_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub property_type: String,
    pub status: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub current_value: Option<f64>,
    pub down_payment: Option<f64>,
    pub monthly_rent: Option<f64>,
    pub property_taxes: Option<f64>,
    pub insurance: Option<f64>,
    pub hoa_fees: Option<f64>,
    pub maintenance_costs: Option<f64>,
    pub other_expenses: Option<f64>,
    pub mortgage_payment: Option<f64>,
    pub vacancy_rate: Option<f64>,
    pub remaining_loan_balance: Option<f64>,
}

impl NewProperty {
    /// Validates the new property data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PropertyError::InvalidData(
                "Property name cannot be empty".to_string(),
            ));
        }
        if self.user_id.trim().is_empty() {
            return Err(PropertyError::InvalidData(
                "User ID cannot be empty".to_string(),
            ));
        }
        PropertyType::from_str(&self.property_type).map_err(PropertyError::InvalidData)?;
        if let Some(status) = &self.status {
            PropertyStatus::from_str(status).map_err(PropertyError::InvalidData)?;
        }
        validate_financial_ranges(
            self.vacancy_rate,
            &[
                ("monthlyRent", self.monthly_rent),
                ("propertyTaxes", self.property_taxes),
                ("insurance", self.insurance),
                ("hoaFees", self.hoa_fees),
                ("maintenanceCosts", self.maintenance_costs),
                ("otherExpenses", self.other_expenses),
                ("mortgagePayment", self.mortgage_payment),
                ("currentValue", self.current_value),
                ("downPayment", self.down_payment),
                ("remainingLoanBalance", self.remaining_loan_balance),
            ],
        )
    }
}

/// Input model for updating an existing property. `None` fields are left
/// unchanged; tax/insurance units follow [`NewProperty`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUpdate {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub current_value: Option<f64>,
    pub down_payment: Option<f64>,
    pub monthly_rent: Option<f64>,
    pub property_taxes: Option<f64>,
    pub insurance: Option<f64>,
    pub hoa_fees: Option<f64>,
    pub maintenance_costs: Option<f64>,
    pub other_expenses: Option<f64>,
    pub mortgage_payment: Option<f64>,
    pub vacancy_rate: Option<f64>,
    pub remaining_loan_balance: Option<f64>,
}

impl PropertyUpdate {
    /// Validates the property update data
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(PropertyError::InvalidData(
                "Property ID is required for updates".to_string(),
            ));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(PropertyError::InvalidData(
                    "Property name cannot be empty".to_string(),
                ));
            }
        }
        if let Some(property_type) = &self.property_type {
            PropertyType::from_str(property_type).map_err(PropertyError::InvalidData)?;
        }
        if let Some(status) = &self.status {
            PropertyStatus::from_str(status).map_err(PropertyError::InvalidData)?;
        }
        validate_financial_ranges(
            self.vacancy_rate,
            &[
                ("monthlyRent", self.monthly_rent),
                ("propertyTaxes", self.property_taxes),
                ("insurance", self.insurance),
                ("hoaFees", self.hoa_fees),
                ("maintenanceCosts", self.maintenance_costs),
                ("otherExpenses", self.other_expenses),
                ("mortgagePayment", self.mortgage_payment),
                ("currentValue", self.current_value),
                ("downPayment", self.down_payment),
                ("remainingLoanBalance", self.remaining_loan_balance),
            ],
        )
    }
}

fn validate_financial_ranges(
    vacancy_rate: Option<f64>,
    monetary: &[(&str, Option<f64>)],
) -> Result<()> {
    if let Some(rate) = vacancy_rate {
        if !(0.0..=1.0).contains(&rate) {
            return Err(PropertyError::InvalidData(format!(
                "Vacancy rate must be between 0 and 1, got {}",
                rate
            )));
        }
    }
    for (field, value) in monetary {
        if let Some(v) = value {
            if *v < 0.0 {
                return Err(PropertyError::InvalidData(format!(
                    "Field '{}' cannot be negative, got {}",
                    field, v
                )));
            }
        }
    }
    Ok(())
}

/// Database model for properties
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
#[diesel(table_name = crate::schema::properties)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PropertyDB {
    pub id: String,
    pub user_id: String,
    pub portfolio_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: String,
    pub property_type: String,
    pub status: String,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub current_value: f64,
    pub down_payment: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for the one-to-one financial record
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    Associations,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(PropertyDB, foreign_key = property_id))]
#[diesel(table_name = crate::schema::property_financials)]
#[diesel(primary_key(property_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PropertyFinancialsDB {
    pub property_id: String,
    pub monthly_rent: f64,
    pub property_taxes: f64,
    pub insurance: f64,
    pub hoa_fees: f64,
    pub maintenance_costs: f64,
    pub other_expenses: f64,
    pub mortgage_payment: f64,
    pub vacancy_rate: f64,
    pub remaining_loan_balance: Option<f64>,
    pub cap_rate: Option<f64>,
    pub cash_flow: Option<f64>,
    pub cash_on_cash_return: Option<f64>,
    pub last_calculated: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<PropertyFinancialsDB> for PropertyFinancials {
    fn from(db: PropertyFinancialsDB) -> Self {
        Self {
            monthly_rent: db.monthly_rent,
            property_taxes: db.property_taxes,
            insurance: db.insurance,
            hoa_fees: db.hoa_fees,
            maintenance_costs: db.maintenance_costs,
            other_expenses: db.other_expenses,
            mortgage_payment: db.mortgage_payment,
            vacancy_rate: db.vacancy_rate,
            remaining_loan_balance: db.remaining_loan_balance,
            cap_rate: db.cap_rate,
            cash_flow: db.cash_flow,
            cash_on_cash_return: db.cash_on_cash_return,
            last_calculated: db.last_calculated,
        }
    }
}

impl From<(PropertyDB, Option<PropertyFinancialsDB>)> for Property {
    fn from((db, financials): (PropertyDB, Option<PropertyFinancialsDB>)) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            portfolio_id: db.portfolio_id,
            name: db.name,
            address: db.address,
            city: db.city,
            state: db.state,
            zip_code: db.zip_code,
            country: db.country,
            property_type: db.property_type,
            status: db.status,
            purchase_date: db.purchase_date,
            purchase_price: db.purchase_price,
            current_value: db.current_value,
            down_payment: db.down_payment,
            created_at: db.created_at,
            updated_at: db.updated_at,
            financials: financials.map(PropertyFinancials::from),
        }
    }
}

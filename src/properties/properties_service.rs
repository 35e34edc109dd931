use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::properties_model::{
    NewProperty, Property, PropertyDB, PropertyFinancialsDB, PropertyUpdate,
};
use super::properties_repository::PropertyRepository;
use crate::constants::DEFAULT_VACANCY_RATE;
use crate::metrics::{self, FinancialInputs, PropertyMetrics};
use crate::properties::properties_constants::PROPERTY_STATUS_OWNED;
use crate::properties::{PropertyError, Result};

/// Service for managing properties and their financial records.
///
/// Derived metrics (cap rate, cash flow, cash-on-cash return) are
/// recomputed and persisted on every create and update.
pub struct PropertyService {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl PropertyService {
    /// Creates a new PropertyService instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a new property with its financial record and freshly
    /// computed metrics
    pub async fn create_property(&self, new_property: NewProperty) -> Result<Property> {
        new_property.validate()?;
        debug!(
            "Creating property '{}' for user {}",
            new_property.name, new_property.user_id
        );

        let now = chrono::Utc::now().naive_utc();
        let property_db = PropertyDB {
            id: new_property
                .id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            user_id: new_property.user_id.clone(),
            portfolio_id: new_property.portfolio_id.clone(),
            name: new_property.name.clone(),
            address: new_property.address.clone(),
            city: new_property.city.clone(),
            state: new_property.state.clone(),
            zip_code: new_property.zip_code.clone(),
            country: new_property
                .country
                .clone()
                .unwrap_or_else(|| "USA".to_string()),
            property_type: new_property.property_type.clone(),
            status: new_property
                .status
                .clone()
                .unwrap_or_else(|| PROPERTY_STATUS_OWNED.to_string()),
            purchase_date: new_property.purchase_date,
            purchase_price: new_property.purchase_price,
            current_value: new_property.current_value.unwrap_or(0.0),
            down_payment: new_property.down_payment.unwrap_or(0.0),
            created_at: now,
            updated_at: now,
        };

        let financials_db = build_financials(
            &property_db,
            PropertyFinancialsDB {
                property_id: property_db.id.clone(),
                // Taxes and insurance arrive as annual figures
                monthly_rent: new_property.monthly_rent.unwrap_or(0.0),
                property_taxes: new_property.property_taxes.unwrap_or(0.0) / 12.0,
                insurance: new_property.insurance.unwrap_or(0.0) / 12.0,
                hoa_fees: new_property.hoa_fees.unwrap_or(0.0),
                maintenance_costs: new_property.maintenance_costs.unwrap_or(0.0),
                other_expenses: new_property.other_expenses.unwrap_or(0.0),
                mortgage_payment: new_property.mortgage_payment.unwrap_or(0.0),
                vacancy_rate: new_property.vacancy_rate.unwrap_or(DEFAULT_VACANCY_RATE),
                remaining_loan_balance: new_property.remaining_loan_balance,
                cap_rate: None,
                cash_flow: None,
                cash_on_cash_return: None,
                last_calculated: None,
                created_at: now,
                updated_at: now,
            },
        );

        let repo = PropertyRepository::new(self.pool.clone());
        repo.create(&property_db, &financials_db)?;

        Ok(Property::from((property_db, Some(financials_db))))
    }

    /// Updates a property, merging changed fields over the stored record
    /// and recalculating the persisted metrics
    pub fn update_property(&self, owner_id: &str, update: PropertyUpdate) -> Result<Property> {
        update.validate()?;
        let property_id = update.id.clone().unwrap_or_default();

        let repo = PropertyRepository::new(self.pool.clone());
        let (existing, existing_fin) = repo.get_by_id(&property_id, owner_id)?.ok_or_else(|| {
            PropertyError::NotFound(format!("Property with id {} not found", property_id))
        })?;

        let now = chrono::Utc::now().naive_utc();
        let property_db = PropertyDB {
            id: existing.id.clone(),
            user_id: existing.user_id.clone(),
            portfolio_id: existing.portfolio_id.clone(),
            name: update.name.unwrap_or(existing.name),
            address: update.address.or(existing.address),
            city: update.city.or(existing.city),
            state: update.state.or(existing.state),
            zip_code: update.zip_code.or(existing.zip_code),
            country: update.country.unwrap_or(existing.country),
            property_type: update.property_type.unwrap_or(existing.property_type),
            status: update.status.unwrap_or(existing.status),
            purchase_date: update.purchase_date.or(existing.purchase_date),
            purchase_price: update.purchase_price.or(existing.purchase_price),
            current_value: update.current_value.unwrap_or(existing.current_value),
            down_payment: update.down_payment.unwrap_or(existing.down_payment),
            created_at: existing.created_at,
            updated_at: now,
        };

        let base_fin = existing_fin.unwrap_or_else(|| PropertyFinancialsDB {
            property_id: property_db.id.clone(),
            monthly_rent: 0.0,
            property_taxes: 0.0,
            insurance: 0.0,
            hoa_fees: 0.0,
            maintenance_costs: 0.0,
            other_expenses: 0.0,
            mortgage_payment: 0.0,
            vacancy_rate: DEFAULT_VACANCY_RATE,
            remaining_loan_balance: None,
            cap_rate: None,
            cash_flow: None,
            cash_on_cash_return: None,
            last_calculated: None,
            created_at: now,
            updated_at: now,
        });

        let financials_db = build_financials(
            &property_db,
            PropertyFinancialsDB {
                monthly_rent: update.monthly_rent.unwrap_or(base_fin.monthly_rent),
                property_taxes: update
                    .property_taxes
                    .map(|annual| annual / 12.0)
                    .unwrap_or(base_fin.property_taxes),
                insurance: update
                    .insurance
                    .map(|annual| annual / 12.0)
                    .unwrap_or(base_fin.insurance),
                hoa_fees: update.hoa_fees.unwrap_or(base_fin.hoa_fees),
                maintenance_costs: update
                    .maintenance_costs
                    .unwrap_or(base_fin.maintenance_costs),
                other_expenses: update.other_expenses.unwrap_or(base_fin.other_expenses),
                mortgage_payment: update
                    .mortgage_payment
                    .unwrap_or(base_fin.mortgage_payment),
                vacancy_rate: update.vacancy_rate.unwrap_or(base_fin.vacancy_rate),
                remaining_loan_balance: update
                    .remaining_loan_balance
                    .or(base_fin.remaining_loan_balance),
                updated_at: now,
                ..base_fin
            },
        );

        repo.update(&property_db, &financials_db)?;

        Ok(Property::from((property_db, Some(financials_db))))
    }

    /// Retrieves a property by its ID
    pub fn get_property(&self, property_id: &str, owner_id: &str) -> Result<Property> {
        let repo = PropertyRepository::new(self.pool.clone());
        repo.get_by_id(property_id, owner_id)?
            .map(Property::from)
            .ok_or_else(|| {
                PropertyError::NotFound(format!("Property with id {} not found", property_id))
            })
    }

    /// Lists all properties belonging to a user
    pub fn list_properties(&self, owner_id: &str) -> Result<Vec<Property>> {
        let repo = PropertyRepository::new(self.pool.clone());
        repo.list(owner_id)
    }

    /// Deletes a property and its financial record
    pub fn delete_property(&self, property_id: &str, owner_id: &str) -> Result<()> {
        let repo = PropertyRepository::new(self.pool.clone());
        let affected = repo.delete(property_id, owner_id)?;
        if affected == 0 {
            return Err(PropertyError::NotFound(format!(
                "Property with id {} not found",
                property_id
            )));
        }
        Ok(())
    }

    /// Computes the full derived-metric set for a property on demand,
    /// from current stored values
    pub fn get_property_metrics(
        &self,
        property_id: &str,
        owner_id: &str,
    ) -> Result<PropertyMetrics> {
        let property = self.get_property(property_id, owner_id)?;
        Ok(metrics::calculate_all(&property.financial_inputs()))
    }
}

/// Runs the calculator over a financial row and stamps the persisted
/// derived fields
fn build_financials(
    property_db: &PropertyDB,
    fin: PropertyFinancialsDB,
) -> PropertyFinancialsDB {
    let inputs = FinancialInputs {
        monthly_rent: Some(fin.monthly_rent),
        property_taxes: Some(fin.property_taxes),
        insurance: Some(fin.insurance),
        hoa_fees: Some(fin.hoa_fees),
        maintenance_costs: Some(fin.maintenance_costs),
        other_expenses: Some(fin.other_expenses),
        mortgage_payment: Some(fin.mortgage_payment),
        current_value: Some(property_db.current_value),
        down_payment: Some(property_db.down_payment),
        vacancy_rate: Some(fin.vacancy_rate),
    };
    let computed = metrics::calculate_all(&inputs);

    PropertyFinancialsDB {
        cap_rate: Some(computed.cap_rate),
        cash_flow: Some(computed.monthly_cash_flow),
        cash_on_cash_return: Some(computed.cash_on_cash_return),
        last_calculated: Some(chrono::Utc::now().naive_utc()),
        ..fin
    }
}

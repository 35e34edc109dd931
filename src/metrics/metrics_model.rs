use serde::{Deserialize, Serialize};

/// Raw monthly financial figures for a single property.
///
/// Every field is optional; `calculate_all` substitutes 0 for missing
/// monetary amounts and [`crate::constants::DEFAULT_VACANCY_RATE`] for a
/// missing vacancy rate. All expense figures are monthly amounts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialInputs {
    pub monthly_rent: Option<f64>,
    pub property_taxes: Option<f64>,
    pub insurance: Option<f64>,
    pub hoa_fees: Option<f64>,
    pub maintenance_costs: Option<f64>,
    pub other_expenses: Option<f64>,
    pub mortgage_payment: Option<f64>,
    pub current_value: Option<f64>,
    pub down_payment: Option<f64>,
    pub vacancy_rate: Option<f64>,
}

/// Derived metrics for a single property. Never persisted as a whole;
/// callers store `cap_rate`, `monthly_cash_flow` and `cash_on_cash_return`
/// back onto the property's financial record.
///
/// Operating expenses exclude the mortgage; total expenses and cash flow
/// include it. NOI is annual and mortgage-free, so cap rate stays a
/// valuation measure rather than a financing one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMetrics {
    pub monthly_operating_expenses: f64,
    pub total_monthly_expenses: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub noi: f64,
    pub cap_rate: f64,
    pub cash_on_cash_return: f64,
}

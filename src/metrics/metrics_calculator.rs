use crate::constants::DEFAULT_VACANCY_RATE;

use super::metrics_model::{FinancialInputs, PropertyMetrics};

/// Total monthly operating expenses. Excludes the mortgage payment.
pub fn operating_expenses(
    property_taxes: f64,
    insurance: f64,
    hoa_fees: f64,
    maintenance_costs: f64,
    other_expenses: f64,
) -> f64 {
    property_taxes + insurance + hoa_fees + maintenance_costs + other_expenses
}

/// Total monthly expenses. Includes the mortgage payment.
pub fn total_expenses(operating_expenses: f64, mortgage_payment: f64) -> f64 {
    operating_expenses + mortgage_payment
}

/// Annual Net Operating Income.
///
/// `rent * 12 * (1 - vacancy) - operating * 12`. Mortgage debt service is
/// not part of NOI. Vacancy rate is expected in [0, 1]; range validation
/// belongs to the input models, not here.
pub fn noi(monthly_rent: f64, vacancy_rate: f64, monthly_operating_expenses: f64) -> f64 {
    let effective_annual_rent = monthly_rent * 12.0 * (1.0 - vacancy_rate);
    effective_annual_rent - monthly_operating_expenses * 12.0
}

/// Capitalization rate as a percentage of current property value.
///
/// A zero value yields 0.0 rather than an error: the metric is
/// informational and a valueless record is a legitimate state.
pub fn cap_rate(noi: f64, property_value: f64) -> f64 {
    if property_value == 0.0 {
        return 0.0;
    }
    (noi / property_value) * 100.0
}

/// Monthly cash flow. May be negative; a money-losing rental is a
/// meaningful result, not an error.
pub fn cash_flow(monthly_rent: f64, total_monthly_expenses: f64) -> f64 {
    monthly_rent - total_monthly_expenses
}

/// Cash-on-cash return as a percentage of the cash actually invested.
///
/// A zero investment (all-cash purchase recorded without a down payment,
/// inherited property) yields 0.0.
pub fn cash_on_cash_return(annual_cash_flow: f64, initial_investment: f64) -> f64 {
    if initial_investment == 0.0 {
        return 0.0;
    }
    (annual_cash_flow / initial_investment) * 100.0
}

/// Computes the full set of derived metrics for one property.
///
/// Pure and deterministic: identical inputs produce identical outputs.
pub fn calculate_all(inputs: &FinancialInputs) -> PropertyMetrics {
    let monthly_rent = inputs.monthly_rent.unwrap_or(0.0);
    let property_taxes = inputs.property_taxes.unwrap_or(0.0);
    let insurance = inputs.insurance.unwrap_or(0.0);
    let hoa_fees = inputs.hoa_fees.unwrap_or(0.0);
    let maintenance_costs = inputs.maintenance_costs.unwrap_or(0.0);
    let other = inputs.other_expenses.unwrap_or(0.0);
    let mortgage_payment = inputs.mortgage_payment.unwrap_or(0.0);
    let current_value = inputs.current_value.unwrap_or(0.0);
    let down_payment = inputs.down_payment.unwrap_or(0.0);
    let vacancy_rate = inputs.vacancy_rate.unwrap_or(DEFAULT_VACANCY_RATE);

    let monthly_operating_expenses = operating_expenses(
        property_taxes,
        insurance,
        hoa_fees,
        maintenance_costs,
        other,
    );
    let total_monthly_expenses = total_expenses(monthly_operating_expenses, mortgage_payment);
    let annual_noi = noi(monthly_rent, vacancy_rate, monthly_operating_expenses);
    let monthly_cash_flow = cash_flow(monthly_rent, total_monthly_expenses);
    let annual_cash_flow = monthly_cash_flow * 12.0;

    PropertyMetrics {
        monthly_operating_expenses,
        total_monthly_expenses,
        monthly_cash_flow,
        annual_cash_flow,
        noi: annual_noi,
        cap_rate: cap_rate(annual_noi, current_value),
        cash_on_cash_return: cash_on_cash_return(annual_cash_flow, down_payment),
    }
}

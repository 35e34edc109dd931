// Module declarations
pub(crate) mod metrics_calculator;
pub(crate) mod metrics_model;

// Re-export the public interface
pub use metrics_calculator::{
    calculate_all, cap_rate, cash_flow, cash_on_cash_return, noi, operating_expenses,
    total_expenses,
};
pub use metrics_model::{FinancialInputs, PropertyMetrics};

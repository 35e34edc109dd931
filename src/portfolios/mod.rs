// Module declarations
pub(crate) mod portfolios_aggregator;
pub(crate) mod portfolios_errors;
pub(crate) mod portfolios_model;
pub(crate) mod portfolios_repository;
pub(crate) mod portfolios_service;
pub(crate) mod portfolios_traits;

// Re-export the public interface
pub use portfolios_aggregator::aggregate;
pub use portfolios_model::{
    CityBreakdown, NewPortfolio, Portfolio, PortfolioDB, PortfolioMetrics, PortfolioUpdate,
    PortfolioWithMetrics,
};
pub use portfolios_repository::PortfolioRepository;
pub use portfolios_service::PortfolioService;
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};

// Re-export error types for convenience
pub use portfolios_errors::{PortfolioError, Result};

pub mod db;

pub mod metrics;
pub mod portfolios;
pub mod properties;

pub mod constants;
pub mod errors;
pub mod schema;

pub use metrics::*;
pub use portfolios::{
    CityBreakdown, NewPortfolio, Portfolio, PortfolioMetrics, PortfolioRepository,
    PortfolioService, PortfolioUpdate, PortfolioWithMetrics,
};
pub use properties::{NewProperty, Property, PropertyService, PropertyUpdate};

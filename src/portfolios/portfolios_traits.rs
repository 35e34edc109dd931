use async_trait::async_trait;

use super::portfolios_model::{
    NewPortfolio, Portfolio, PortfolioDB, PortfolioMetrics, PortfolioUpdate, PortfolioWithMetrics,
};
use crate::portfolios::Result;
use crate::properties::Property;

/// Trait defining the contract for portfolio folder repository operations.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    async fn create(&self, portfolio_db: PortfolioDB) -> Result<Portfolio>;
    fn list(&self, user_id: &str, include_default: bool) -> Result<Vec<Portfolio>>;
    fn find_by_id(&self, portfolio_id: &str, user_id: &str) -> Result<Option<Portfolio>>;
    fn find_default(&self, user_id: &str) -> Result<Option<Portfolio>>;
    async fn update(&self, portfolio_db: PortfolioDB) -> Result<Portfolio>;
    /// Reassigns the folder's properties to `target` (None leaves them
    /// unassigned) and deletes the folder row, atomically.
    async fn delete_with_reassignment(
        &self,
        portfolio_id: &str,
        user_id: &str,
        target: Option<&str>,
    ) -> Result<usize>;
    fn properties_in(&self, portfolio_id: &str, user_id: &str) -> Result<Vec<Property>>;
    /// Moves one property into a folder (or out of all folders); returns
    /// the number of affected rows
    async fn assign_property(
        &self,
        property_id: &str,
        portfolio_id: Option<&str>,
        user_id: &str,
    ) -> Result<usize>;
    /// Assigns every folder-less property of the user to the given
    /// folder; returns the number of adopted properties
    async fn adopt_unassigned(&self, portfolio_id: &str, user_id: &str) -> Result<usize>;
}

/// Trait defining the contract for portfolio folder service operations.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;
    fn list_portfolios(&self, user_id: &str, include_default: bool) -> Result<Vec<Portfolio>>;
    fn get_portfolio(&self, portfolio_id: &str, user_id: &str) -> Result<Portfolio>;
    async fn update_portfolio(&self, update: PortfolioUpdate, user_id: &str) -> Result<Portfolio>;
    async fn delete_portfolio(
        &self,
        portfolio_id: &str,
        user_id: &str,
        move_properties_to: Option<&str>,
    ) -> Result<()>;
    async fn move_property_to_portfolio(
        &self,
        property_id: &str,
        portfolio_id: &str,
        user_id: &str,
    ) -> Result<()>;
    fn get_portfolio_metrics(&self, portfolio_id: &str, user_id: &str)
        -> Result<PortfolioMetrics>;
    fn get_portfolio_with_metrics(
        &self,
        portfolio_id: &str,
        user_id: &str,
    ) -> Result<PortfolioWithMetrics>;
    fn list_portfolios_with_metrics(
        &self,
        user_id: &str,
        include_default: bool,
    ) -> Result<Vec<PortfolioWithMetrics>>;
    fn get_default_portfolio(&self, user_id: &str) -> Result<Option<Portfolio>>;
    async fn initialize_default_portfolio(&self, user_id: &str) -> Result<Portfolio>;
}

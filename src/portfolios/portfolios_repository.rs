use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::portfolios_model::{Portfolio, PortfolioDB};
use super::portfolios_traits::PortfolioRepositoryTrait;
use crate::db::get_connection;
use crate::portfolios::{PortfolioError, Result};
use crate::properties::{Property, PropertyDB, PropertyFinancialsDB};
use crate::schema::{portfolios, properties, property_financials};

/// Repository for managing portfolio folder data in the database
pub struct PortfolioRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl PortfolioRepository {
    /// Creates a new PortfolioRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    async fn create(&self, portfolio_db: PortfolioDB) -> Result<Portfolio> {
        let mut conn = self.conn()?;

        diesel::insert_into(portfolios::table)
            .values(&portfolio_db)
            .execute(&mut conn)?;

        Ok(portfolio_db.into())
    }

    fn list(&self, user_id: &str, include_default: bool) -> Result<Vec<Portfolio>> {
        let mut conn = self.conn()?;

        let mut query = portfolios::table
            .filter(portfolios::user_id.eq(user_id))
            .into_boxed();

        if !include_default {
            query = query.filter(portfolios::is_default.eq(false));
        }

        let rows = query
            .order(portfolios::name.asc())
            .load::<PortfolioDB>(&mut conn)?;

        Ok(rows.into_iter().map(Portfolio::from).collect())
    }

    fn find_by_id(&self, portfolio_id: &str, user_id: &str) -> Result<Option<Portfolio>> {
        let mut conn = self.conn()?;

        let row = portfolios::table
            .filter(portfolios::id.eq(portfolio_id))
            .filter(portfolios::user_id.eq(user_id))
            .first::<PortfolioDB>(&mut conn)
            .optional()?;

        Ok(row.map(Portfolio::from))
    }

    fn find_default(&self, user_id: &str) -> Result<Option<Portfolio>> {
        let mut conn = self.conn()?;

        let row = portfolios::table
            .filter(portfolios::user_id.eq(user_id))
            .filter(portfolios::is_default.eq(true))
            .first::<PortfolioDB>(&mut conn)
            .optional()?;

        Ok(row.map(Portfolio::from))
    }

    async fn update(&self, portfolio_db: PortfolioDB) -> Result<Portfolio> {
        let mut conn = self.conn()?;

        diesel::update(portfolios::table.find(&portfolio_db.id))
            .set(&portfolio_db)
            .execute(&mut conn)?;

        Ok(portfolio_db.into())
    }

    async fn delete_with_reassignment(
        &self,
        portfolio_id: &str,
        user_id: &str,
        target: Option<&str>,
    ) -> Result<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<_, PortfolioError, _>(|tx_conn| {
            diesel::update(
                properties::table
                    .filter(properties::portfolio_id.eq(portfolio_id))
                    .filter(properties::user_id.eq(user_id)),
            )
            .set(properties::portfolio_id.eq(target))
            .execute(tx_conn)?;

            Ok(diesel::delete(
                portfolios::table
                    .filter(portfolios::id.eq(portfolio_id))
                    .filter(portfolios::user_id.eq(user_id)),
            )
            .execute(tx_conn)?)
        })
    }

    fn properties_in(&self, portfolio_id: &str, user_id: &str) -> Result<Vec<Property>> {
        let mut conn = self.conn()?;

        let rows = properties::table
            .left_join(property_financials::table)
            .filter(properties::portfolio_id.eq(portfolio_id))
            .filter(properties::user_id.eq(user_id))
            .select((
                PropertyDB::as_select(),
                Option::<PropertyFinancialsDB>::as_select(),
            ))
            .load::<(PropertyDB, Option<PropertyFinancialsDB>)>(&mut conn)?;

        Ok(rows.into_iter().map(Property::from).collect())
    }

    async fn assign_property(
        &self,
        property_id: &str,
        portfolio_id: Option<&str>,
        user_id: &str,
    ) -> Result<usize> {
        let mut conn = self.conn()?;

        Ok(diesel::update(
            properties::table
                .filter(properties::id.eq(property_id))
                .filter(properties::user_id.eq(user_id)),
        )
        .set(properties::portfolio_id.eq(portfolio_id))
        .execute(&mut conn)?)
    }

    async fn adopt_unassigned(&self, portfolio_id: &str, user_id: &str) -> Result<usize> {
        let mut conn = self.conn()?;

        Ok(diesel::update(
            properties::table
                .filter(properties::user_id.eq(user_id))
                .filter(properties::portfolio_id.is_null()),
        )
        .set(properties::portfolio_id.eq(portfolio_id))
        .execute(&mut conn)?)
    }
}

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::properties_model::{Property, PropertyDB, PropertyFinancialsDB};
use crate::db::get_connection;
use crate::properties::{PropertyError, Result};
use crate::schema::{properties, property_financials};

/// Repository for managing property data in the database
pub struct PropertyRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl PropertyRepository {
    /// Creates a new PropertyRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Inserts a property together with its financial record
    pub fn create(
        &self,
        property_db: &PropertyDB,
        financials_db: &PropertyFinancialsDB,
    ) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        conn.transaction::<_, PropertyError, _>(|tx_conn| {
            diesel::insert_into(properties::table)
                .values(property_db)
                .execute(tx_conn)?;

            diesel::insert_into(property_financials::table)
                .values(financials_db)
                .execute(tx_conn)?;

            Ok(())
        })
    }

    /// Loads a property with its financials, scoped to the owning user
    pub fn get_by_id(
        &self,
        property_id: &str,
        owner_id: &str,
    ) -> Result<Option<(PropertyDB, Option<PropertyFinancialsDB>)>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        let row = properties::table
            .left_join(property_financials::table)
            .filter(properties::id.eq(property_id))
            .filter(properties::user_id.eq(owner_id))
            .select((
                PropertyDB::as_select(),
                Option::<PropertyFinancialsDB>::as_select(),
            ))
            .first::<(PropertyDB, Option<PropertyFinancialsDB>)>(&mut conn)
            .optional()?;

        Ok(row)
    }

    /// Lists all of a user's properties, newest first
    pub fn list(&self, owner_id: &str) -> Result<Vec<Property>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        let rows = properties::table
            .left_join(property_financials::table)
            .filter(properties::user_id.eq(owner_id))
            .order(properties::created_at.desc())
            .select((
                PropertyDB::as_select(),
                Option::<PropertyFinancialsDB>::as_select(),
            ))
            .load::<(PropertyDB, Option<PropertyFinancialsDB>)>(&mut conn)?;

        Ok(rows.into_iter().map(Property::from).collect())
    }

    /// Updates a property and its financial record in one transaction
    pub fn update(
        &self,
        property_db: &PropertyDB,
        financials_db: &PropertyFinancialsDB,
    ) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        conn.transaction::<_, PropertyError, _>(|tx_conn| {
            diesel::update(properties::table.find(&property_db.id))
                .set(property_db)
                .execute(tx_conn)?;

            diesel::insert_into(property_financials::table)
                .values(financials_db)
                .on_conflict(property_financials::property_id)
                .do_update()
                .set(financials_db)
                .execute(tx_conn)?;

            Ok(())
        })
    }

    /// Deletes a property (and its financials) and returns the number of
    /// deleted property rows
    pub fn delete(&self, property_id: &str, owner_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PropertyError::DatabaseError(e.to_string()))?;

        conn.transaction::<_, PropertyError, _>(|tx_conn| {
            let owned = properties::table
                .filter(properties::id.eq(property_id))
                .filter(properties::user_id.eq(owner_id))
                .count()
                .get_result::<i64>(tx_conn)?;

            if owned == 0 {
                return Ok(0);
            }

            diesel::delete(
                property_financials::table
                    .filter(property_financials::property_id.eq(property_id)),
            )
            .execute(tx_conn)?;

            Ok(diesel::delete(properties::table.find(property_id)).execute(tx_conn)?)
        })
    }
}

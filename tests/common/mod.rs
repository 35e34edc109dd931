use chrono::Local;
use std::sync::Arc;

use propfolio_core::db::{self, DbPool};

pub fn get_test_db_path(test_id: &str) -> String {
    let now = Local::now();

    now.format(&format!("./tests/output/%Y%m%d/%H%M%S-{}/", test_id))
        .to_string()
}

pub fn setup_pool(test_id: &str) -> Arc<DbPool> {
    let db_dir = get_test_db_path(test_id);

    let db_path = db::init(&db_dir).expect("Failed to initialize database");

    let pool = db::create_pool(&db_path).expect("Failed to create database pool");

    db::run_migrations(&pool).expect("Failed to run migrations");

    pool
}

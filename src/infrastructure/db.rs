pub mod models;

use crate::infrastructure::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;

pub type DbPool = Pool<Postgres>;

/// Build the connection pool; every connection carries a server-side statement timeout
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let connect_options = PgConnectOptions::from_str(&config.url)?.options([(
        "statement_timeout",
        format!("{}ms", config.statement_timeout.as_millis()),
    )]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect_with(connect_options)
        .await
}

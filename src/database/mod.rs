use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, Executor, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::config::DbConfig;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Connects eagerly so that an unreachable database stops the server at startup,
    /// then brings the schema up to date.
    pub async fn init(db_config: &DbConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let max_cons = if cfg!(test) { 1 } else { 5 };

        let con_opts = db_config.connection_options();

        let db_pool = PgPoolOptions::new()
            .max_connections(max_cons)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(con_opts)
            .await
            .map_err(Error::FailToCreatePool)?;

        info!("{:<20} - Running migrations", "init_db");
        sqlx::migrate!("./migrations").run(&db_pool).await?;

        Ok(Self { db: db_pool })
    }

    /// Creates a fresh, randomly named database on the configured server and initializes it.
    /// Used by the Postgres integration tests.
    pub async fn test_init(db_config: &DbConfig) -> Result<Self> {
        let mut db_config = db_config.clone();
        db_config.db_name = format!("test_{}", Uuid::new_v4().simple());

        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;
        connection
            .execute(format!(r#"CREATE DATABASE "{}";"#, db_config.db_name).as_str())
            .await?;

        Self::init(&db_config).await
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(#[source] sqlx::Error),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}

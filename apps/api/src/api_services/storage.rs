use std::sync::Arc;

use marquee_application::ItemStore;
use marquee_core::AppError;
use marquee_infrastructure::{InMemoryItemStore, PostgresItemStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, StorageConfig};

/// Opens the configured item store, applying migrations first for PostgreSQL.
///
/// Returns `None` when the process was started only to migrate.
pub async fn open_item_store(config: &ApiConfig) -> Result<Option<Arc<dyn ItemStore>>, AppError> {
    match &config.storage {
        StorageConfig::Memory => {
            if config.migrate_only {
                warn!("in-memory storage has no migrations to apply");
                return Ok(None);
            }
            info!("using in-memory item store");
            Ok(Some(Arc::new(InMemoryItemStore::new())))
        }
        StorageConfig::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to connect to database: {error}"))
                })?;

            sqlx::migrate!("../../crates/infrastructure/migrations")
                .run(&pool)
                .await
                .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(None);
            }
            Ok(Some(Arc::new(PostgresItemStore::new(pool))))
        }
    }
}

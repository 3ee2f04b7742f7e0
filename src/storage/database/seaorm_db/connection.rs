use crate::config::StorageConfig;
use crate::utils::error::{PipelineError, Result};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::super::entities;
use super::super::migration::Migrator;
use super::types::{DatabaseBackendType, SeaOrmCatalogStore};

impl SeaOrmCatalogStore {
    /// Connect and bring the schema up to date
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let backend_type = DatabaseBackendType::from_url(&config.url);
        if backend_type == DatabaseBackendType::SQLite {
            ensure_sqlite_dir(&config.url)?;
        }

        let db = Self::try_connect(config).await?;
        info!("Database connection established ({:?})", backend_type);

        let store = Self { db, backend_type };
        store.migrate().await?;
        Ok(store)
    }

    /// Try to connect to a database
    async fn try_connect(config: &StorageConfig) -> Result<DatabaseConnection> {
        // Every connection to an in-memory SQLite database sees its own database
        let max_connections = if config.url.contains(":memory:") {
            1
        } else {
            config.max_connections
        };

        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(PipelineError::Database)
    }

    /// Get the current backend type
    pub fn backend_type(&self) -> DatabaseBackendType {
        self.backend_type
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        debug!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            PipelineError::Database(e)
        })?;
        debug!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Close the database connection
    pub async fn close(self) -> Result<()> {
        self.db.close().await.map_err(PipelineError::Database)?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        let _result = entities::Category::find()
            .limit(1)
            .all(&self.db)
            .await
            .map_err(PipelineError::Database)?;

        debug!("Database health check passed");
        Ok(())
    }
}

/// Create the parent directory of a file-backed SQLite URL
fn ensure_sqlite_dir(url: &str) -> Result<()> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }

    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                PipelineError::storage(format!(
                    "Failed to create database directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

use sea_orm::DatabaseConnection;

/// SeaORM-backed catalog store
#[derive(Debug)]
pub struct SeaOrmCatalogStore {
    pub(super) db: DatabaseConnection,
    /// Backend type indicator
    pub(super) backend_type: DatabaseBackendType,
}

/// Database backend type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

impl DatabaseBackendType {
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("sqlite") {
            Self::SQLite
        } else {
            Self::PostgreSQL
        }
    }
}

//! Database testing utilities
//!
//! A `TestDatabase` is a migrated SQLite file in its own temp directory,
//! removed when the value is dropped.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use thiserror::Error;

use ncobase_caching::{InvalidationMode, SharedStringCache, TtlCache};
use ncobase_config::DatabaseConfig;

use crate::caches::{CachePolicies, StorageCaches};
use crate::connection::DatabaseConnection;
use crate::repositories::SeaOrmRepositoryFactory;

#[derive(Error, Debug)]
pub enum TestDatabaseError {
    #[error("Failed to create temporary directory: {0}")]
    TempDirCreation(String),

    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Failed to run migrations: {0}")]
    Migration(String),
}

/// Test database for isolated testing
pub struct TestDatabase {
    _temp_dir: TempDir,
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    pub async fn new() -> Result<Self, TestDatabaseError> {
        let temp_dir = TempDir::new().map_err(|e| TestDatabaseError::TempDirCreation(e.to_string()))?;
        let db_path = temp_dir.path().join("test.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", db_path.display()),
            max_connections: 1,
            connection_timeout: Duration::from_secs(5),
            ..Default::default()
        };

        let connection = DatabaseConnection::new(config)
            .await
            .map_err(|e| TestDatabaseError::Connection(e.to_string()))?;
        connection
            .migrate()
            .await
            .map_err(|e| TestDatabaseError::Migration(e.to_string()))?;

        Ok(Self {
            _temp_dir: temp_dir,
            connection,
        })
    }

    /// Repositories over an in-process cache with awaited invalidation
    pub fn factory(&self) -> SeaOrmRepositoryFactory {
        SeaOrmRepositoryFactory::new(self.connection.clone(), memory_caches())
    }

    /// Repositories with caching turned off
    pub fn uncached_factory(&self) -> SeaOrmRepositoryFactory {
        SeaOrmRepositoryFactory::new(self.connection.clone(), StorageCaches::disabled())
    }
}

/// In-process caches in `Sync` mode, so reads after a write are deterministic
pub fn memory_caches() -> StorageCaches {
    let backend: SharedStringCache = Arc::new(TtlCache::<String, String>::new(Duration::from_secs(600)));
    StorageCaches::new(
        Some(backend),
        "ncobase",
        CachePolicies::default().with_mode(InvalidationMode::Sync),
    )
}

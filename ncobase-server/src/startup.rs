//! Server startup and shutdown logic

use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use ncobase_caching::{create_string_cache, BackendOptions};
use ncobase_config::{CacheBackend, CacheConfig, NcobaseConfig};
use ncobase_interfaces::RepositoryFactory;
use ncobase_rest_api::{create_rest_app, ApiContext, AppConfig, JwtManager};
use ncobase_storage::{CachePolicies, DatabaseConnection, SeaOrmGroupLookup, SeaOrmRepositoryFactory, StorageCaches};
use ncobase_system::{Initializer, SystemError};
use ncobase_tenant::{Collaborators, TenantServices};

use crate::sweep::spawn_overdue_sweep;

/// Map the cache section onto a concrete store
pub fn backend_options(config: &CacheConfig) -> Result<BackendOptions> {
    if !config.enabled {
        return Ok(BackendOptions::Disabled);
    }
    let options = match config.backend {
        CacheBackend::Memory => BackendOptions::Memory {
            default_ttl: config.ttl.tenant,
        },
        CacheBackend::Moka => BackendOptions::Moka {
            max_capacity: config.max_capacity,
        },
        CacheBackend::Redis => BackendOptions::Redis {
            url: config
                .redis_url
                .clone()
                .ok_or_else(|| anyhow!("cache.redis_url is required for the redis backend"))?,
            prefix: config.key_prefix.clone(),
            default_ttl: config.ttl.tenant,
        },
    };
    Ok(options)
}

/// Server application struct
pub struct Server {
    config: NcobaseConfig,
    context: ApiContext,
}

impl Server {
    /// Connect, migrate and wire every service. Logging must already be set up.
    pub async fn new(config: NcobaseConfig) -> Result<Self> {
        let db = DatabaseConnection::new(config.database.clone()).await?;
        if config.database.auto_migrate {
            db.migrate().await?;
        }

        let backend = create_string_cache(&backend_options(&config.cache)?).await?;
        if backend.is_none() {
            info!("Caching disabled, all reads go to the database");
        }
        let caches = StorageCaches::new(
            backend,
            config.cache.key_prefix.clone(),
            CachePolicies::from_config(&config.cache),
        );

        let repositories: Arc<dyn RepositoryFactory> = Arc::new(SeaOrmRepositoryFactory::new(db.clone(), caches));
        let collaborators = Collaborators {
            groups: Some(Arc::new(SeaOrmGroupLookup::new(db.clone()))),
            ..Collaborators::default()
        };
        let services = TenantServices::new(repositories.clone(), collaborators, config.billing.clone());
        let initializer = Arc::new(Initializer::new(db, repositories.clone(), config.system.clone()));
        let auth = Arc::new(JwtManager::new(config.auth.clone()));

        let context = ApiContext::new(services, initializer, repositories, auth)
            .with_reinitialization(config.system.allow_reinitialization);

        Ok(Self { config, context })
    }

    pub fn config(&self) -> &NcobaseConfig {
        &self.config
    }

    /// Run the seed sequencer. An already initialized system is not an error.
    pub async fn initialize(&self) -> Result<()> {
        match self
            .context
            .initializer
            .execute(self.config.system.allow_reinitialization)
            .await
        {
            Ok(report) => {
                info!(
                    "System initialization finished, executed steps: {:?}",
                    report.executed_steps().collect::<Vec<_>>()
                );
                Ok(())
            }
            Err(SystemError::AlreadyInitialized) => {
                info!("System already initialized, skipping seed");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        create_rest_app(self.context.clone(), AppConfig::from(&self.config.server))
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn start(self) -> Result<()> {
        let app = self.build_app();
        let addr = self.config.server.socket_address();

        self.log_config_summary();

        let sweep = if self.config.billing.sweep_enabled() {
            Some(spawn_overdue_sweep(
                self.context.services.billing.clone(),
                self.config.billing.overdue_sweep_interval,
            ))
        } else {
            info!("Overdue sweep disabled");
            None
        };

        let listener = TcpListener::bind(&addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Some(handle) = sweep {
            handle.abort();
        }

        info!("Server shutdown complete");
        Ok(())
    }

    fn log_config_summary(&self) {
        let config = &self.config;
        info!("=== ncobase Server Configuration ===");
        info!("Bind Address: {}", config.server.socket_address());
        info!("API Prefix: {}", config.server.api_prefix);
        info!("CORS: {}", if config.server.enable_cors { "Enabled" } else { "Disabled" });
        info!(
            "Cache: {}",
            if config.cache.enabled {
                format!("{:?}", config.cache.backend)
            } else {
                "Disabled".to_string()
            }
        );
        info!(
            "Overdue Sweep: {}",
            if config.billing.sweep_enabled() {
                format!("every {:?}", config.billing.overdue_sweep_interval)
            } else {
                "Disabled".to_string()
            }
        );
        info!("====================================");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn sqlite_config(dir: &tempfile::TempDir) -> NcobaseConfig {
        let mut config = NcobaseConfig::default();
        config.database.url = format!("sqlite://{}?mode=rwc", dir.path().join("server.db").display());
        config.cache.backend = CacheBackend::Moka;
        config
    }

    #[test]
    fn test_disabled_cache_maps_to_disabled_backend() {
        let mut config = CacheConfig::default();
        config.enabled = false;
        config.backend = CacheBackend::Redis;
        assert_eq!(backend_options(&config).unwrap(), BackendOptions::Disabled);
    }

    #[test]
    fn test_redis_backend_needs_url() {
        let mut config = CacheConfig::default();
        config.backend = CacheBackend::Redis;
        assert!(backend_options(&config).is_err());

        config.redis_url = Some("redis://127.0.0.1:6379".to_string());
        match backend_options(&config).unwrap() {
            BackendOptions::Redis { url, prefix, .. } => {
                assert_eq!(url, "redis://127.0.0.1:6379");
                assert_eq!(prefix, config.key_prefix);
            }
            other => panic!("unexpected backend {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_initialize_twice_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let server = Server::new(sqlite_config(&dir)).await.unwrap();

        server.initialize().await.unwrap();
        server.initialize().await.unwrap();

        let status = server.context.initializer.status().await.unwrap();
        assert!(status.initialized);
    }

    #[tokio::test]
    async fn test_built_app_answers_health() {
        let dir = tempfile::tempdir().unwrap();
        let server = Server::new(sqlite_config(&dir)).await.unwrap();

        let response = server
            .build_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

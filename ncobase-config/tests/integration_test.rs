//! Integration tests for ncobase-config

use ncobase_config::*;
use std::io::Write;
use std::time::Duration;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = NcobaseConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("NCOBASE_SERVER_PORT", Some("9090")),
        ("NCOBASE_DATABASE_URL", Some("postgres://ncobase@localhost/ncobase")),
        ("NCOBASE_LOG_LEVEL", Some("debug")),
        ("NCOBASE_LOG_FORMAT", Some("json")),
        ("NCOBASE_CACHE_BACKEND", Some("moka")),
        ("NCOBASE_OVERDUE_SWEEP_SECONDS", Some("0")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "postgres://ncobase@localhost/ncobase");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.cache.backend, CacheBackend::Moka);
        assert!(!config.billing.sweep_enabled());
    });
}

#[test]
fn test_invalid_env_value_names_variable() {
    with_vars(vec![("NCOBASE_SERVER_PORT", Some("eighty"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("NCOBASE_SERVER_PORT"));
    });
}

#[test]
fn test_redis_backend_from_env_requires_url() {
    with_vars(
        vec![("NCOBASE_CACHE_BACKEND", Some("redis")), ("NCOBASE_REDIS_URL", None::<&str>)],
        || {
            let err = ConfigLoader::new().from_env().unwrap_err();
            assert!(matches!(err, ConfigError::DomainError { ref domain, .. } if domain == "cache"));
        },
    );
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("TENANTS_SERVER_PORT", Some("7000"))], || {
        let config = ConfigLoader::with_prefix("TENANTS").from_env().unwrap();
        assert_eq!(config.server.port, 7000);
    });
}

#[test]
fn test_yaml_config_serialization() {
    let yaml = NcobaseConfig::generate_sample();
    let parsed: NcobaseConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(parsed.cache.ttl.tenant, Duration::from_secs(14400));
}

#[test]
fn test_partial_yaml_file_uses_defaults() {
    let yaml = r#"
server:
  port: 3000
cache:
  backend: memory
  invalidation_mode: sync
  ttl:
    tenant: 60
    setting: 60
    quota: 60
    billing: 60
    relation: 60
    user_tenant: 60
billing:
  invoice_due_days: 14
  default_currency: EUR
"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(vec![("NCOBASE_SERVER_PORT", None::<&str>)], || {
        let config = ConfigLoader::new().from_file(file.path()).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.api_prefix, "/api/v1");
        assert_eq!(config.cache.invalidation_mode, "sync");
        assert_eq!(config.cache.ttl.tenant, Duration::from_secs(60));
        assert_eq!(config.billing.invoice_due_days, 14);
        assert_eq!(config.billing.default_currency, "EUR");
        assert_eq!(config.system.default_tenant_slug, "ncobase");
    });
}

#[test]
fn test_env_overrides_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"server:\n  port: 3000\n").unwrap();

    with_vars(vec![("NCOBASE_SERVER_PORT", Some("4000"))], || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 4000);
    });
}

#[test]
fn test_missing_file_is_read_error() {
    let err = ConfigLoader::new()
        .from_file("/nonexistent/ncobase.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}

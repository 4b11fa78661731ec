//! Tracing initialisation for ncobase binaries and tests

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};

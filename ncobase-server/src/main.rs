//! ncobase Server Binary

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

use ncobase_config::{ConfigLoader, NcobaseConfig};
use ncobase_logging::init_logging_from_config;
use ncobase_server::Server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server bind address, e.g. 0.0.0.0:8080
    #[arg(short, long)]
    bind: Option<String>,

    /// Database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Run system initialization before serving, even if auto_initialize is off
    #[arg(long)]
    initialize: bool,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", serde_yaml::to_string(&NcobaseConfig::default())?);
        return Ok(());
    }

    let mut config = ConfigLoader::new().load(cli.config.as_ref())?;
    apply_cli_overrides(&mut config, &cli)?;

    init_logging_from_config(&config.logging)?;

    let server = Server::new(config).await?;
    if cli.initialize || server.config().system.auto_initialize {
        server.initialize().await?;
    }
    server.start().await
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut NcobaseConfig, cli: &Cli) -> Result<()> {
    if let Some(bind) = &cli.bind {
        let (host, port) = bind
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("Invalid bind address '{}': expected host:port", bind))?;
        config.server.port = port
            .parse()
            .map_err(|e| anyhow!("Invalid bind address '{}': {}", bind, e))?;
        config.server.bind_address = host.to_string();
    }

    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_override_splits_host_and_port() {
        let cli = Cli::parse_from(["ncobase-server", "--bind", "0.0.0.0:9000", "--database-url", "sqlite::memory:"]);
        let mut config = NcobaseConfig::default();
        apply_cli_overrides(&mut config, &cli).unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn test_bind_without_port_is_rejected() {
        let cli = Cli::parse_from(["ncobase-server", "--bind", "localhost"]);
        let mut config = NcobaseConfig::default();
        assert!(apply_cli_overrides(&mut config, &cli).is_err());
    }
}

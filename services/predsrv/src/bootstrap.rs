//! Service Bootstrap and Initialization
//!
//! Command line, logging setup and bind address resolution

use std::path::PathBuf;

use clap::Parser;
use common::logging::LogConfig;
use common::service_bootstrap::{get_service_port, ServiceInfo};
use tracing::info;

use crate::config::{LoggingConfig, PredsrvConfig, DEFAULT_PORT};
use crate::error::{PredSrvError, Result};

/// Command-line arguments for predsrv
#[derive(Parser, Debug, Clone)]
#[command(
    name = "predsrv",
    version = env!("CARGO_PKG_VERSION"),
    about = "FreshPoint forecast service",
    long_about = None
)]
pub struct Args {
    /// Configuration file (YAML)
    #[arg(short = 'c', long, value_name = "FILE", env = "PREDSRV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind address for API server, e.g. 127.0.0.1:3000
    #[arg(short = 'b', long)]
    pub bind_address: Option<String>,

    /// Disable the startup banner
    #[arg(long)]
    pub no_banner: bool,

    /// Validation mode - only validate configuration without starting service
    #[arg(long)]
    pub validate: bool,
}

pub fn service_info(config: &PredsrvConfig) -> ServiceInfo {
    ServiceInfo::new(
        config.service.name.clone(),
        env!("CARGO_PKG_VERSION"),
        "Sales forecasting API - EMA smoothing with linear trend",
        DEFAULT_PORT,
    )
}

pub fn log_config(service: &ServiceInfo, logging: &LoggingConfig) -> LogConfig {
    LogConfig {
        service_name: service.name.clone(),
        level: logging.level.clone(),
        log_dir: logging.dir.clone(),
        enable_file: logging.enable_file,
        enable_json: logging.enable_json,
        ..LogConfig::default()
    }
}

/// Initialize logging system from the loaded configuration
pub fn initialize_logging(service: &ServiceInfo, logging: &LoggingConfig) -> Result<()> {
    common::logging::init_with_config(log_config(service, logging))
        .map_err(|e| PredSrvError::config(format!("Failed to init logging: {:#}", e)))
}

/// Determine bind address from multiple sources
/// Priority: CLI > Config > ENV > Default
pub fn determine_bind_address(
    cli_arg: Option<String>,
    config: &PredsrvConfig,
    service: &ServiceInfo,
) -> String {
    if let Some(addr) = cli_arg {
        info!("Using bind address from command line: {}", addr);
        return addr;
    }

    let port = get_service_port(config.service.port, service);
    let addr = format!("{}:{}", config.service.host, port);
    info!("Using bind address: {}", addr);
    addr
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args =
            Args::try_parse_from(["predsrv", "--config", "custom.yaml", "-b", "127.0.0.1:9100"])
                .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("custom.yaml")));
        assert_eq!(args.bind_address.as_deref(), Some("127.0.0.1:9100"));
        assert!(!args.validate);

        let args = Args::try_parse_from(["predsrv", "--validate"]).unwrap();
        assert!(args.validate);
    }

    #[test]
    fn test_cli_bind_address_wins() {
        let config = PredsrvConfig::default();
        let service = service_info(&config);
        let addr = determine_bind_address(Some("127.0.0.1:9999".to_string()), &config, &service);
        assert_eq!(addr, "127.0.0.1:9999");
    }

    #[test]
    fn test_explicit_config_port() {
        let mut config = PredsrvConfig::default();
        config.service.host = "127.0.0.1".to_string();
        config.service.port = 8123;
        let service = service_info(&config);
        assert_eq!(determine_bind_address(None, &config, &service), "127.0.0.1:8123");
    }

    #[test]
    fn test_log_config_mapping() {
        let config = PredsrvConfig::default();
        let service = service_info(&config);
        let log = log_config(&service, &config.logging);
        assert_eq!(log.service_name, "predsrv");
        assert!(!log.enable_file);
        assert_eq!(log.default_directive(), "info,predsrv=debug,api_access=info");
    }
}

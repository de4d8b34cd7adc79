//! Unified service bootstrap utilities
//!
//! Startup banner and port resolution shared by FreshPoint services.

use tracing::info;

/// Service metadata for startup
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    /// Service name (e.g., "predsrv")
    pub name: String,
    /// Service version from Cargo.toml
    pub version: String,
    /// Service description
    pub description: String,
    /// Default port
    pub default_port: u16,
}

impl ServiceInfo {
    /// Create new service info with the calling crate's version
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
        default_port: u16,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
            default_port,
        }
    }
}

/// Print unified startup banner for any service
pub fn print_startup_banner(service: &ServiceInfo) {
    let banner = r#"
 ███████╗██████╗ ███████╗███████╗██╗  ██╗██████╗  ██████╗ ██╗███╗   ██╗████████╗
 ██╔════╝██╔══██╗██╔════╝██╔════╝██║  ██║██╔══██╗██╔═══██╗██║████╗  ██║╚══██╔══╝
 █████╗  ██████╔╝█████╗  ███████╗███████║██████╔╝██║   ██║██║██╔██╗ ██║   ██║
 ██╔══╝  ██╔══██╗██╔══╝  ╚════██║██╔══██║██╔═══╝ ██║   ██║██║██║╚██╗██║   ██║
 ██║     ██║  ██║███████╗███████║██║  ██║██║     ╚██████╔╝██║██║ ╚████║   ██║
 ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝  ╚═╝╚═╝      ╚═════╝ ╚═╝╚═╝  ╚═══╝   ╚═╝
    "#;

    info!("{}", banner);
    info!("");
    info!(" {} v{}", service.name.to_uppercase(), service.version);
    info!(" {}", service.description);
    info!(" Default Port: {}", service.default_port);
    info!("");
}

/// Environment variables consulted for the port, highest priority first
fn port_env_vars(service: &ServiceInfo) -> [String; 3] {
    [
        "PORT".to_string(),
        "SERVICE_PORT".to_string(),
        format!("{}_PORT", service.name.to_uppercase()),
    ]
}

fn resolve_port<F>(config_port: u16, service: &ServiceInfo, lookup: F) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    let is_default = config_port == 0 || config_port == service.default_port;

    if is_default {
        for var in port_env_vars(service) {
            if let Some(p) = lookup(&var).and_then(|v| v.trim().parse::<u16>().ok()) {
                if p > 0 {
                    return p;
                }
            }
        }
    }

    if config_port > 0 {
        config_port
    } else {
        service.default_port
    }
}

/// Helper to get service port from configuration or environment
///
/// An explicitly configured port wins. When the configured port is the
/// default, `PORT`, `SERVICE_PORT` and `<NAME>_PORT` are checked in order.
pub fn get_service_port(config_port: u16, service: &ServiceInfo) -> u16 {
    resolve_port(config_port, service, |var| std::env::var(var).ok())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn service() -> ServiceInfo {
        ServiceInfo::new("predsrv", "0.1.0", "Forecast service", 3000)
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_service_info_creation() {
        let service = service();
        assert_eq!(service.name, "predsrv");
        assert_eq!(service.description, "Forecast service");
        assert_eq!(service.default_port, 3000);
    }

    #[test]
    fn test_port_explicit_config_wins() {
        let vars = env(&[("PORT", "9000")]);
        assert_eq!(resolve_port(8081, &service(), |k| vars.get(k).cloned()), 8081);
    }

    #[test]
    fn test_port_env_priority() {
        let vars = env(&[("SERVICE_PORT", "9001"), ("PREDSRV_PORT", "9002")]);
        assert_eq!(resolve_port(3000, &service(), |k| vars.get(k).cloned()), 9001);

        let vars = env(&[("PORT", "9000"), ("SERVICE_PORT", "9001")]);
        assert_eq!(resolve_port(0, &service(), |k| vars.get(k).cloned()), 9000);

        let vars = env(&[("PREDSRV_PORT", "9002")]);
        assert_eq!(resolve_port(3000, &service(), |k| vars.get(k).cloned()), 9002);
    }

    #[test]
    fn test_port_invalid_env_ignored() {
        let vars = env(&[("PORT", "not-a-port"), ("SERVICE_PORT", "0")]);
        assert_eq!(resolve_port(0, &service(), |k| vars.get(k).cloned()), 3000);
    }
}

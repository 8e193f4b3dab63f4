use crate::sla::{SlaConfigError, SlaConfiguration};
use chrono_tz::Tz;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    /// Budgets applied when a request does not carry an agency's own.
    pub default_sla: SlaConfiguration,
    /// Zone in which calendar-day budgets are counted.
    pub time_zone: Tz,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let fallback = SlaConfiguration::default();
        let default_sla = SlaConfiguration {
            emergency_response_hours: sla_budget(
                "SLA_EMERGENCY_HOURS",
                fallback.emergency_response_hours,
            )?,
            urgent_response_hours: sla_budget("SLA_URGENT_HOURS", fallback.urgent_response_hours)?,
            routine_response_hours: sla_budget(
                "SLA_ROUTINE_HOURS",
                fallback.routine_response_hours,
            )?,
            maintenance_response_days: sla_budget(
                "SLA_MAINTENANCE_DAYS",
                fallback.maintenance_response_days,
            )?,
        };
        default_sla.validate()?;

        let time_zone = match env::var("APP_TIME_ZONE") {
            Ok(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimeZone { value: raw })?,
            Err(_) => Tz::Europe__London,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            default_sla,
            time_zone,
        })
    }
}

fn sla_budget(key: &'static str, fallback: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidSlaValue { key }),
        Err(_) => Ok(fallback),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSlaValue { key: &'static str },
    InvalidTimeZone { value: String },
    Sla(SlaConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSlaValue { key } => {
                write!(f, "{} must be a whole number of hours or days", key)
            }
            ConfigError::InvalidTimeZone { value } => {
                write!(f, "APP_TIME_ZONE '{}' is not an IANA time zone name", value)
            }
            ConfigError::Sla(err) => write!(f, "default SLA configuration invalid: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidSlaValue { .. }
            | ConfigError::InvalidTimeZone { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Sla(err) => Some(err),
        }
    }
}

impl From<SlaConfigError> for ConfigError {
    fn from(value: SlaConfigError) -> Self {
        Self::Sla(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SLA_EMERGENCY_HOURS",
            "SLA_URGENT_HOURS",
            "SLA_ROUTINE_HOURS",
            "SLA_MAINTENANCE_DAYS",
            "APP_TIME_ZONE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.default_sla, SlaConfiguration::default());
        assert_eq!(config.time_zone, Tz::Europe__London);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_sla_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SLA_EMERGENCY_HOURS", "2");
        env::set_var("SLA_MAINTENANCE_DAYS", " 28 ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.default_sla.emergency_response_hours, 2);
        assert_eq!(config.default_sla.maintenance_response_days, 28);
        assert_eq!(config.default_sla.urgent_response_hours, 24);
        reset_env();
    }

    #[test]
    fn rejects_zero_and_garbage_sla_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SLA_URGENT_HOURS", "0");
        assert!(matches!(AppConfig::load(), Err(ConfigError::Sla(_))));

        env::set_var("SLA_URGENT_HOURS", "a day");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidSlaValue {
                key: "SLA_URGENT_HOURS"
            })
        ));
        reset_env();
    }

    #[test]
    fn reads_agency_time_zone() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_TIME_ZONE", "America/New_York");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.time_zone, Tz::America__New_York);

        env::set_var("APP_TIME_ZONE", "Mars/Olympus_Mons");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidTimeZone { .. })
        ));
        reset_env();
    }
}

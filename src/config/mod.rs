use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::intake::{Pacing, DEFAULT_SESSION_KEY};

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
    pub intake: IntakeConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            intake: IntakeConfig::from_env()?,
        })
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

/// Session persistence, pacing, and remote service settings.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub storage_dir: PathBuf,
    pub storage_enabled: bool,
    pub session_key: String,
    pub thinking_delay_ms: u64,
    pub generation_delay_ms: u64,
    pub api_url: Option<String>,
}

impl IntakeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let storage_dir = env::var("INTAKE_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/sessions"));

        let storage_enabled = match env::var("INTAKE_ENABLE_STORAGE") {
            Ok(value) => parse_flag("INTAKE_ENABLE_STORAGE", &value)?,
            Err(_) => true,
        };

        let session_key =
            env::var("INTAKE_SESSION_KEY").unwrap_or_else(|_| DEFAULT_SESSION_KEY.to_string());

        let api_url = env::var("INTAKE_API_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            storage_dir,
            storage_enabled,
            session_key,
            thinking_delay_ms: parse_millis("INTAKE_THINKING_DELAY_MS", 750)?,
            generation_delay_ms: parse_millis("INTAKE_GENERATION_DELAY_MS", 2000)?,
            api_url,
        })
    }

    pub fn pacing(&self) -> Pacing {
        Pacing::from_millis(self.thinking_delay_ms, self.generation_delay_ms)
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { variable }),
    }
}

fn parse_millis(variable: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidDelay { variable }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFlag { variable: &'static str },
    InvalidDelay { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFlag { variable } => {
                write!(f, "{variable} must be one of true/false/1/0/yes/no/on/off")
            }
            ConfigError::InvalidDelay { variable } => {
                write!(f, "{variable} must be a whole number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFlag { .. }
            | ConfigError::InvalidDelay { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "INTAKE_STORAGE_DIR",
            "INTAKE_ENABLE_STORAGE",
            "INTAKE_SESSION_KEY",
            "INTAKE_THINKING_DELAY_MS",
            "INTAKE_GENERATION_DELAY_MS",
            "INTAKE_API_URL",
        ] {
            env::remove_var(variable);
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
        assert_eq!(config.intake.storage_dir, PathBuf::from("./data/sessions"));
        assert!(config.intake.storage_enabled);
        assert_eq!(config.intake.session_key, DEFAULT_SESSION_KEY);
        assert_eq!(config.intake.api_url, None);
        assert_eq!(config.intake.pacing().thinking, Duration::from_millis(750));
        assert_eq!(config.intake.pacing().generation, Duration::from_millis(2000));
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
    fn reads_intake_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INTAKE_ENABLE_STORAGE", "off");
        env::set_var("INTAKE_THINKING_DELAY_MS", "0");
        env::set_var("INTAKE_API_URL", "http://localhost:8000");
        let config = AppConfig::load().expect("config loads");
        assert!(!config.intake.storage_enabled);
        assert_eq!(config.intake.thinking_delay_ms, 0);
        assert_eq!(config.intake.api_url.as_deref(), Some("http://localhost:8000"));
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_delay() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INTAKE_GENERATION_DELAY_MS", "soon");
        let err = AppConfig::load().expect_err("delay must be numeric");
        assert!(matches!(
            err,
            ConfigError::InvalidDelay {
                variable: "INTAKE_GENERATION_DELAY_MS"
            }
        ));
        reset_env();
    }
}

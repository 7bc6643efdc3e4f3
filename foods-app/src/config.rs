use auth::AuthConfig;
use error_stack::{Report, ResultExt};
use tracing::{debug, info};

const DATABASE_URL: &str = "DATABASE_URL";
const FOODS_DB_NAME: &str = "FOODS_DB_NAME";
const PAYMENT_SECRET_KEY: &str = "PAYMENT_SECRET_KEY";
const PAYMENT_API_URL: &str = "PAYMENT_API_URL";
const PORT: &str = "PORT";
const ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
const FOODS_METRICS: &str = "FOODS_METRICS";

const DEFAULT_DB_NAME: &str = "foods";
const DEFAULT_PAYMENT_API_URL: &str = "https://api.stripe.com";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";

pub type ConfigResult<T> = Result<T, Report<ConfigError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} property not specified")]
    Missing(&'static str),
    #[error("{0} property is invalid")]
    Invalid(&'static str),
    #[error("auth properties could not be loaded")]
    Auth,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub api_url: String,
    pub secret_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_name: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub metrics_enabled: bool,
    pub payment: PaymentConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> ConfigResult<Self> {
        let database_url = required(DATABASE_URL)?;

        let port = match std::env::var(PORT) {
            Ok(port) => port
                .trim()
                .parse()
                .change_context(ConfigError::Invalid(PORT))
                .attach_with(|| format!("'{port}' is not a port number"))?,
            Err(_) => DEFAULT_PORT,
        };

        let metrics_enabled = match std::env::var(FOODS_METRICS) {
            Ok(flag) => parse_flag(&flag).ok_or(ConfigError::Invalid(FOODS_METRICS)).attach_with(|| {
                format!("'{flag}' is not one of true/false")
            })?,
            Err(_) => true,
        };

        let config = Self {
            database_url,
            db_name: optional(FOODS_DB_NAME, DEFAULT_DB_NAME),
            port,
            allowed_origins: parse_origins(&optional(ALLOWED_ORIGINS, DEFAULT_ALLOWED_ORIGINS)),
            metrics_enabled,
            payment: PaymentConfig {
                api_url: optional(PAYMENT_API_URL, DEFAULT_PAYMENT_API_URL),
                secret_key: required(PAYMENT_SECRET_KEY)?,
            },
            auth: AuthConfig::from_env().change_context(ConfigError::Auth)?,
        };

        info!(
            "loaded config: port {}, database '{}', origins {:?}, metrics {}",
            config.port, config.db_name, config.allowed_origins, config.metrics_enabled
        );
        Ok(config)
    }
}

fn required(name: &'static str) -> ConfigResult<String> {
    std::env::var(name).change_context(ConfigError::Missing(name))
}

fn optional(name: &'static str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        debug!("{name} not specified, defaulting to '{default}'");
        default.to_string()
    })
}

fn parse_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect()
}

fn parse_flag(flag: &str) -> Option<bool> {
    match flag.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_flag, parse_origins};

    #[test]
    fn origins_are_comma_separated() {
        assert_eq!(
            vec!["http://localhost:5173", "https://foods.example.com"],
            parse_origins(" http://localhost:5173 ,https://foods.example.com/,,")
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn flags() {
        assert_eq!(Some(true), parse_flag("TRUE"));
        assert_eq!(Some(false), parse_flag(" off "));
        assert_eq!(None, parse_flag("maybe"));
    }
}

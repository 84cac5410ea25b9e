use std::{env, path::PathBuf, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    NotANumber { key: &'static str, value: String },

    #[error("{key} must be true or false, got '{value}'")]
    NotABool { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_file: PathBuf,
    pub ai_service_url: String,
    pub ai_timeout: Duration,
    pub schemes_url: String,
    pub schemes_timeout: Duration,
    pub seed_demo_user: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            db_file: PathBuf::from("db.json"),
            ai_service_url: "http://127.0.0.1:8000".to_string(),
            ai_timeout: Duration::from_secs(10),
            schemes_url: "https://msme.gov.in/".to_string(),
            schemes_timeout: Duration::from_secs(5),
            seed_demo_user: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(value) => parse_number("PORT", value)?,
            None => defaults.port,
        };
        let ai_timeout = match lookup("AI_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_number("AI_TIMEOUT_SECS", value)?),
            None => defaults.ai_timeout,
        };
        let schemes_timeout = match lookup("SCHEMES_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_number("SCHEMES_TIMEOUT_SECS", value)?),
            None => defaults.schemes_timeout,
        };
        let seed_demo_user = match lookup("SEED_DEMO_USER") {
            Some(value) => parse_bool("SEED_DEMO_USER", value)?,
            None => defaults.seed_demo_user,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            db_file: lookup("DB_FILE").map(PathBuf::from).unwrap_or(defaults.db_file),
            ai_service_url: lookup("AI_SERVICE_URL").unwrap_or(defaults.ai_service_url),
            ai_timeout,
            schemes_url: lookup("SCHEMES_URL").unwrap_or(defaults.schemes_url),
            schemes_timeout,
            seed_demo_user,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber { key, value })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::NotABool { key, value }),
    }
}

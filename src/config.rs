// config.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    // Falls back to the bundled Albanian table when unset
    pub location_variations_path: Option<String>,
    pub lead_rate_limit: usize,
    pub db_max_connections: u32,
}

fn parsed_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        _ => Ok(default),
    }
}

pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| split_origins(&raw))
            .unwrap_or_else(|_| vec!["http://localhost:3000".to_string()]);

        let location_variations_path = std::env::var("LOCATION_VARIATIONS_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty());

        Ok(Config {
            database_url,
            port: parsed_or("PORT", 8000)?,
            allowed_origins,
            location_variations_path,
            lead_rate_limit: parsed_or("LEAD_RATE_LIMIT", 5)?,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("http://localhost:3000, https://estates.al/ ,,"),
            vec!["http://localhost:3000".to_string(), "https://estates.al".to_string()]
        );
        assert!(split_origins("").is_empty());
    }

    #[test]
    fn test_parsed_or_default() {
        assert_eq!(parsed_or("REALESTATE_TEST_UNSET_VALUE", 42u16).unwrap(), 42);
    }
}

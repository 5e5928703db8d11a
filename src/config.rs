// config.rs
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub log_level: LevelFilter,
    pub admin_email: String,
    // Discovery settings
    pub nearby_radius_km: f64,
    pub featured_limit: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

pub const DEFAULT_ADMIN_EMAIL: &str = "adminme@gmail.com";

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let port = parse_env("PORT", 8000)?;
        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 10)?;
        let nearby_radius_km = parse_env("NEARBY_RADIUS_KM", 100.0)?;
        let featured_limit = parse_env("FEATURED_LIMIT", 4)?;
        let log_level = parse_env("LOG_LEVEL", LevelFilter::DEBUG)?;

        let admin_email = std::env::var("ADMIN_EMAIL")
            .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string())
            .to_lowercase();

        Ok(Config {
            database_url,
            database_max_connections,
            port,
            log_level,
            admin_email,
            nearby_radius_km,
            featured_limit,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_falls_back_to_default_when_unset() {
        let value: u16 = parse_env("TAXMITRA_TEST_UNSET_PORT", 8000).unwrap();
        assert_eq!(value, 8000);
    }

    #[test]
    fn parse_env_rejects_garbage() {
        std::env::set_var("TAXMITRA_TEST_BAD_RADIUS", "far");
        let result: Result<f64, _> = parse_env("TAXMITRA_TEST_BAD_RADIUS", 100.0);
        assert!(matches!(result, Err(ConfigError::Invalid { name: "TAXMITRA_TEST_BAD_RADIUS", .. })));
    }
}

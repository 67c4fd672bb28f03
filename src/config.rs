use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub admin_token: String,
    /// Zero disables the background reconciliation loop.
    pub reconcile_interval_secs: u64,
    /// Zero disables the reminder loop.
    pub reminder_interval_secs: u64,
    pub reminder_window_hours: i64,
    pub reminder_send_delay_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parse_or(&env_map, "PORT", 8080u16, "must be a valid u16")?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let admin_token = env_map
            .get("ADMIN_TOKEN")
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ConfigError::MissingEnv("ADMIN_TOKEN".to_string()))?;
        if admin_token.is_empty() {
            return Err(ConfigError::InvalidValue(
                "ADMIN_TOKEN".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let reconcile_interval_secs = parse_or(
            &env_map,
            "RECONCILE_INTERVAL_SECS",
            60u64,
            "must be a non-negative integer",
        )?;
        let reminder_interval_secs = parse_or(
            &env_map,
            "REMINDER_INTERVAL_SECS",
            3600u64,
            "must be a non-negative integer",
        )?;
        let reminder_window_hours = parse_or(
            &env_map,
            "REMINDER_WINDOW_HOURS",
            24i64,
            "must be a valid i64",
        )?;
        if reminder_window_hours <= 0 {
            return Err(ConfigError::InvalidValue(
                "REMINDER_WINDOW_HOURS".to_string(),
                "must be positive".to_string(),
            ));
        }
        let reminder_send_delay_ms = parse_or(
            &env_map,
            "REMINDER_SEND_DELAY_MS",
            500u64,
            "must be a non-negative integer",
        )?;

        Ok(Config {
            port,
            database_path,
            admin_token,
            reconcile_interval_secs,
            reminder_interval_secs,
            reminder_window_hours,
            reminder_send_delay_ms,
        })
    }

    pub fn reconcile_interval(&self) -> Option<Duration> {
        (self.reconcile_interval_secs > 0).then(|| Duration::from_secs(self.reconcile_interval_secs))
    }

    pub fn reminder_interval(&self) -> Option<Duration> {
        (self.reminder_interval_secs > 0).then(|| Duration::from_secs(self.reminder_interval_secs))
    }
}

fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
    reason: &str,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), reason.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map.insert("ADMIN_TOKEN".to_string(), "s3cret".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.reconcile_interval(), Some(Duration::from_secs(60)));
        assert_eq!(config.reminder_interval(), Some(Duration::from_secs(3600)));
        assert_eq!(config.reminder_window_hours, 24);
        assert_eq!(config.reminder_send_delay_ms, 500);
    }

    #[test]
    fn test_missing_database_path() {
        let mut env_map = setup_required_env();
        env_map.remove("DATABASE_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_missing_admin_token() {
        let mut env_map = setup_required_env();
        env_map.remove("ADMIN_TOKEN");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "ADMIN_TOKEN"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_blank_admin_token() {
        let mut env_map = setup_required_env();
        env_map.insert("ADMIN_TOKEN".to_string(), "   ".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "ADMIN_TOKEN"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_zero_interval_disables_loop() {
        let mut env_map = setup_required_env();
        env_map.insert("REMINDER_INTERVAL_SECS".to_string(), "0".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.reminder_interval(), None);
    }

    #[test]
    fn test_non_positive_reminder_window() {
        let mut env_map = setup_required_env();
        env_map.insert("REMINDER_WINDOW_HOURS".to_string(), "0".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "REMINDER_WINDOW_HOURS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}

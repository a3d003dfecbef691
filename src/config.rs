//! Start-up configuration read from the environment (and `.env`, via dotenvy)

use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::traits::ScraperConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_timeout: Duration,
    pub port: u16,
    pub cache_capacity: usize,
    pub scraper: ScraperConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let gemini_api_key = match lookup("GEMINI_API_KEY") {
            Some(key) if !key.trim().is_empty() => key,
            _ => bail!("GEMINI_API_KEY is required"),
        };

        let scraper = match lookup("SELECTORS_FILE") {
            Some(path) => ScraperConfig::from_file(&path)?,
            None => ScraperConfig::flipkart(),
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-flash".to_string()),
            gemini_timeout: Duration::from_secs(parse_or(&lookup, "GEMINI_TIMEOUT_SECS", 60)?),
            port: parse_or(&lookup, "PORT", 5000)?,
            cache_capacity: parse_or(&lookup, "CACHE_CAPACITY", 100)?,
            scraper,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(config_from(&[("GEMINI_API_KEY", "  ")]).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("GEMINI_API_KEY", "secret")]).unwrap();
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.gemini_timeout, Duration::from_secs(60));
        assert_eq!(config.port, 5000);
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.scraper.name, "Flipkart");
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("PORT", "8080"),
            ("CACHE_CAPACITY", "0"),
        ])
        .unwrap();
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_capacity, 0);

        let err = config_from(&[("GEMINI_API_KEY", "secret"), ("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_missing_selectors_file_is_an_error() {
        assert!(
            config_from(&[
                ("GEMINI_API_KEY", "secret"),
                ("SELECTORS_FILE", "/nonexistent/selectors.toml"),
            ])
            .is_err()
        );
    }
}

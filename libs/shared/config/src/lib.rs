use std::env;
use tracing::warn;

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            default_page_size: parse_var("VET_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE),
            max_page_size: parse_var("VET_MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE),
            port: parse_var("PORT", DEFAULT_PORT),
        }
        .with_valid_page_sizes();

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// The max must allow at least one row and the default must fit under it.
    pub fn with_valid_page_sizes(mut self) -> Self {
        if self.max_page_size == 0 {
            warn!("VET_MAX_PAGE_SIZE must be at least 1, using default {}", DEFAULT_MAX_PAGE_SIZE);
            self.max_page_size = DEFAULT_MAX_PAGE_SIZE;
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            let fallback = DEFAULT_PAGE_SIZE.min(self.max_page_size);
            warn!(
                "VET_DEFAULT_PAGE_SIZE {} outside 1..={}, using {}",
                self.default_page_size, self.max_page_size, fallback
            );
            self.default_page_size = fallback;
        }

        self
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            port: DEFAULT_PORT,
        }
    }
}

fn parse_var<T: std::str::FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", name, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_not_configured() {
        let config = AppConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_configured_when_credentials_present() {
        let config = AppConfig {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "anon".to_string(),
            ..AppConfig::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn test_oversized_default_page_size_is_reset() {
        let config = AppConfig {
            default_page_size: 200,
            max_page_size: 100,
            ..AppConfig::default()
        }
        .with_valid_page_sizes();

        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn test_default_page_size_fits_small_max() {
        let config = AppConfig {
            default_page_size: 10,
            max_page_size: 5,
            ..AppConfig::default()
        }
        .with_valid_page_sizes();

        assert_eq!(config.default_page_size, 5);
    }

    #[test]
    fn test_zero_page_sizes_are_reset() {
        let config = AppConfig {
            default_page_size: 0,
            max_page_size: 0,
            ..AppConfig::default()
        }
        .with_valid_page_sizes();

        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.default_page_size, 10);
    }

    #[test]
    fn test_parse_var_missing_falls_back_to_default() {
        assert_eq!(parse_var("VET_CONFIG_TEST_SURELY_UNSET", 42u32), 42);
    }
}

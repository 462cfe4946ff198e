//! Runtime configuration, read from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

pub const DEFAULT_AI_URL: &str = "http://localhost:9000";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Key used to sign session cookies. `None` means a random key is
    /// generated at startup, so sessions do not survive a restart.
    pub session_secret: Option<String>,
    pub ai: AiConfig,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub base_url: String,
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            db_path: PathBuf::from(".thinknotes_db"),
            session_secret: None,
            ai: AiConfig {
                base_url: DEFAULT_AI_URL.to_string(),
                enabled: true,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let defaults = Config::default();
        Config {
            host: env::var("THINKNOTES_HOST").unwrap_or(defaults.host),
            port: env::var("THINKNOTES_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            db_path: env::var("THINKNOTES_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            session_secret: env::var("THINKNOTES_SESSION_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            ai: AiConfig {
                base_url: env::var("THINKNOTES_AI_URL")
                    .ok()
                    .and_then(|u| normalize_base_url(&u))
                    .unwrap_or(defaults.ai.base_url),
                enabled: env::var("THINKNOTES_AI_ENABLED")
                    .map(|v| parse_bool(&v))
                    .unwrap_or(defaults.ai.enabled),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Accept only absolute http(s) URLs; the trailing slash is dropped so
/// endpoint paths can be appended directly.
fn normalize_base_url(raw: &str) -> Option<String> {
    match url::Url::parse(raw.trim()) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => {
            Some(u.as_str().trim_end_matches('/').to_string())
        }
        _ => {
            tracing::warn!("ignoring invalid THINKNOTES_AI_URL: {:?}", raw);
            None
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.ai.base_url, DEFAULT_AI_URL);
        assert!(config.ai.enabled);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" on "));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("nope"));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://ai.local:9000/").as_deref(),
            Some("http://ai.local:9000")
        );
        assert_eq!(
            normalize_base_url("https://ai.example.com/v1/").as_deref(),
            Some("https://ai.example.com/v1")
        );
        assert_eq!(normalize_base_url("ftp://ai.local"), None);
        assert_eq!(normalize_base_url("not a url"), None);
    }
}

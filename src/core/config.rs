//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.newsify/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::core::state::Category;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NewsifyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_category: Option<String>,
    pub typing_chars_per_sec: Option<u32>,
    pub session_poll_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BACKEND_URL: &str = "https://news-chatbot-backend-new.onrender.com";
/// ≈ one character per 20 ms, the reveal cadence of the original web client.
pub const DEFAULT_TYPING_CHARS_PER_SEC: u32 = 50;
pub const DEFAULT_SESSION_POLL_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend_url: String,
    pub default_category: Category,
    pub typing_chars_per_sec: u32,
    pub session_poll_secs: u64,
    pub request_timeout_secs: u64,
    /// Session to open on startup (CLI/env/cache); None falls back to the
    /// default session.
    pub session_id: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.newsify/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".newsify").join("config.toml"))
}

/// Load config from `~/.newsify/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `NewsifyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<NewsifyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(NewsifyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(NewsifyConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: NewsifyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Newsify Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_category = "general"       # general, technology, sports, business, health, entertainment
# typing_chars_per_sec = 50          # reply reveal speed
# session_poll_secs = 5              # sidebar refresh interval

# [backend]
# base_url = "https://news-chatbot-backend-new.onrender.com"
# request_timeout_secs = 30
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_*` values come from CLI flags (None = not specified).
pub fn resolve(
    config: &NewsifyConfig,
    cli_backend_url: Option<&str>,
    cli_session: Option<&str>,
    cli_category: Option<&str>,
) -> ResolvedConfig {
    // Backend URL: CLI → env → config → default
    let backend_url = cli_backend_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("NEWSIFY_BACKEND_URL").ok())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    // Category: CLI → env → config → default; unknown names fall back
    let default_category = cli_category
        .map(|s| s.to_string())
        .or_else(|| std::env::var("NEWSIFY_CATEGORY").ok())
        .or_else(|| config.general.default_category.clone())
        .and_then(|name| {
            let parsed = Category::from_name(&name);
            if parsed.is_none() {
                warn!("Unknown category '{}', using General", name);
            }
            parsed
        })
        .unwrap_or_default();

    // Session: CLI → env → cached id from the last run
    let session_id = cli_session
        .map(|s| s.to_string())
        .or_else(|| std::env::var("NEWSIFY_SESSION").ok())
        .or_else(crate::core::session::last_session_id);

    ResolvedConfig {
        backend_url,
        default_category,
        typing_chars_per_sec: config
            .general
            .typing_chars_per_sec
            .unwrap_or(DEFAULT_TYPING_CHARS_PER_SEC)
            .max(1),
        session_poll_secs: config
            .general
            .session_poll_secs
            .unwrap_or(DEFAULT_SESSION_POLL_SECS)
            .max(1),
        request_timeout_secs: config
            .backend
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .max(1),
        session_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = NewsifyConfig::default();
        assert!(config.general.default_category.is_none());
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = NewsifyConfig::default();
        let resolved = resolve(&config, None, None, None);
        assert_eq!(resolved.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(resolved.default_category, Category::General);
        assert_eq!(resolved.typing_chars_per_sec, DEFAULT_TYPING_CHARS_PER_SEC);
        assert_eq!(resolved.session_poll_secs, DEFAULT_SESSION_POLL_SECS);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = NewsifyConfig {
            general: GeneralConfig {
                default_category: Some("sports".to_string()),
                typing_chars_per_sec: Some(80),
                session_poll_secs: Some(10),
            },
            backend: BackendConfig {
                base_url: Some("http://localhost:8000".to_string()),
                request_timeout_secs: Some(5),
            },
        };
        let resolved = resolve(&config, None, None, None);
        assert_eq!(resolved.backend_url, "http://localhost:8000");
        assert_eq!(resolved.default_category, Category::Sports);
        assert_eq!(resolved.typing_chars_per_sec, 80);
        assert_eq!(resolved.session_poll_secs, 10);
        assert_eq!(resolved.request_timeout_secs, 5);
    }

    #[test]
    fn test_resolve_cli_backend_url_wins() {
        let config = NewsifyConfig {
            backend: BackendConfig {
                base_url: Some("http://from-config".to_string()),
                request_timeout_secs: None,
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("http://from-cli"), None, None);
        assert_eq!(resolved.backend_url, "http://from-cli");
    }

    #[test]
    fn test_resolve_cli_session_wins() {
        let config = NewsifyConfig::default();
        let resolved = resolve(&config, None, Some("session-cli"), None);
        assert_eq!(resolved.session_id.as_deref(), Some("session-cli"));
    }

    #[test]
    fn test_resolve_unknown_category_falls_back() {
        let config = NewsifyConfig {
            general: GeneralConfig {
                default_category: Some("weather".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, None, None, None);
        assert_eq!(resolved.default_category, Category::General);
    }

    #[test]
    fn test_resolve_zero_rates_are_clamped() {
        let config = NewsifyConfig {
            general: GeneralConfig {
                typing_chars_per_sec: Some(0),
                session_poll_secs: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, None, None, None);
        assert_eq!(resolved.typing_chars_per_sec, 1);
        assert_eq!(resolved.session_poll_secs, 1);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
default_category = "business"
typing_chars_per_sec = 100

[backend]
base_url = "http://192.168.1.20:8000"
request_timeout_secs = 10
"#;
        let config: NewsifyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_category.as_deref(), Some("business"));
        assert_eq!(config.general.typing_chars_per_sec, Some(100));
        assert!(config.general.session_poll_secs.is_none());
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("http://192.168.1.20:8000")
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[backend]
base_url = "http://localhost:8000"
"#;
        let config: NewsifyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url.as_deref(), Some("http://localhost:8000"));
        assert!(config.general.default_category.is_none());
        assert!(config.general.typing_chars_per_sec.is_none());
    }
}

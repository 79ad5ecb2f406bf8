use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;
use timesheet_connector::config::{BASE_URL, PAGE_SIZE, TIMEOUT_SECONDS};
use timesheet_connector::{ConnectorConfig, WeekStart};

/// Complete bridge configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Timesheet backend endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Derived from `base_url` when unset
    #[serde(default)]
    pub authorize_url: Option<String>,
    /// Derived from `base_url` when unset
    #[serde(default)]
    pub token_url: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    PAGE_SIZE
}

fn default_timeout_seconds() -> u64 {
    TIMEOUT_SECONDS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            authorize_url: None,
            token_url: None,
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// OAuth client registration
#[derive(Clone, Default, Deserialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Report date range evaluation
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// IANA zone name, e.g. "Europe/Vienna"
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub week_start: WeekStart,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            week_start: WeekStart::default(),
        }
    }
}

impl BridgeConfig {
    /// Load from the file named by `TIMESHEET_CONFIG` (if any), then apply
    /// environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("TIMESHEET_CONFIG") {
            Ok(path) => load_config(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `TIMESHEET_*` overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("TIMESHEET_CLIENT_ID") {
            self.oauth.client_id = v;
        }
        if let Some(v) = get("TIMESHEET_CLIENT_SECRET") {
            self.oauth.client_secret = v;
        }
        if let Some(v) = get("TIMESHEET_BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = get("TIMESHEET_BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Some(v) = get("TIMESHEET_TIMEZONE") {
            self.report.timezone = v;
        }
    }

    /// Build the connector configuration, validating the time zone.
    pub fn connector_config(&self) -> Result<ConnectorConfig> {
        let timezone: Tz = self
            .report
            .timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid report timezone '{}': {}", self.report.timezone, e))?;

        let mut config =
            ConnectorConfig::new(self.oauth.client_id.clone(), self.oauth.client_secret.clone())
                .with_base_url(self.api.base_url.clone())
                .with_timezone(timezone)
                .with_week_start(self.report.week_start);

        if let Some(url) = &self.api.authorize_url {
            config.authorize_url = url.clone();
        }
        if let Some(url) = &self.api.token_url {
            config.token_url = url.clone();
        }
        config.page_size = self.api.page_size;
        config.timeout = Duration::from_secs(self.api.timeout_seconds);

        Ok(config)
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<BridgeConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: BridgeConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.api.base_url, "https://api.timesheet.io");
        assert_eq!(config.api.page_size, 20);
        assert_eq!(config.report.timezone, "UTC");
        assert_eq!(config.report.week_start, WeekStart::Monday);
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [server]
            bind_addr = "127.0.0.1:8080"

            [api]
            base_url = "http://localhost:9000"
            page_size = 50
            timeout_seconds = 5

            [oauth]
            client_id = "client"
            client_secret = "secret"

            [report]
            timezone = "Europe/Vienna"
            week_start = "sunday"
        "#;

        let config: BridgeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.api.page_size, 50);
        assert_eq!(config.oauth.client_id, "client");
        assert_eq!(config.report.week_start, WeekStart::Sunday);

        let connector = config.connector_config().unwrap();
        assert_eq!(connector.base_url, "http://localhost:9000");
        assert_eq!(connector.token_url, "http://localhost:9000/oauth2/token");
        assert_eq!(connector.timezone, chrono_tz::Europe::Vienna);
        assert_eq!(connector.timeout, Duration::from_secs(5));
        assert_eq!(connector.page_size, 50);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [report]
            timezone = "America/New_York"
        "#;

        let config: BridgeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.report.timezone, "America/New_York");
        assert_eq!(config.api.timeout_seconds, 30); // Default
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000"); // Default
    }

    #[test]
    fn test_explicit_oauth_urls_win() {
        let toml = r#"
            [api]
            token_url = "https://auth.example.com/token"
        "#;
        let config: BridgeConfig = toml::from_str(toml).unwrap();
        let connector = config.connector_config().unwrap();
        assert_eq!(connector.token_url, "https://auth.example.com/token");
        assert_eq!(connector.authorize_url, "https://api.timesheet.io/oauth2/auth");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TIMESHEET_CLIENT_ID", "env_client"),
            ("TIMESHEET_CLIENT_SECRET", "env_secret"),
            ("TIMESHEET_BIND_ADDR", "127.0.0.1:4000"),
            ("TIMESHEET_TIMEZONE", "Asia/Tokyo"),
            ("TIMESHEET_BASE_URL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = BridgeConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.oauth.client_id, "env_client");
        assert_eq!(config.oauth.client_secret, "env_secret");
        assert_eq!(config.server.bind_addr, "127.0.0.1:4000");
        assert_eq!(config.report.timezone, "Asia/Tokyo");
        // Empty values leave the default in place
        assert_eq!(config.api.base_url, "https://api.timesheet.io");
    }

    #[test]
    fn test_invalid_timezone() {
        let mut config = BridgeConfig::default();
        config.report.timezone = "Mars/Olympus_Mons".to_string();
        let err = config.connector_config().unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[oauth]\nclient_id = \"from_file\"").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.oauth.client_id, "from_file");
        assert_eq!(config.oauth.client_secret, "");
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("/nonexistent/timesheet.toml").is_err());
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let mut config = BridgeConfig::default();
        config.oauth.client_secret = "very_secret".to_string();
        assert!(!format!("{:?}", config).contains("very_secret"));
    }
}

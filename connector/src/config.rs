use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const BASE_URL: &str = "https://api.timesheet.io";
pub const AUTHORIZE_URL: &str = "https://api.timesheet.io/oauth2/auth";
pub const TOKEN_URL: &str = "https://api.timesheet.io/oauth2/token";
pub const PAGE_SIZE: u32 = 20;
pub const TIMEOUT_SECONDS: u64 = 30;

/// First day of a calendar week for the relative report ranges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }
}

/// Connector configuration.
///
/// Built once by the host process and passed to the client and the
/// authenticator. Nothing in this crate reads process environment.
#[derive(Clone)]
pub struct ConnectorConfig {
    /// Timesheet REST API base URL (no trailing slash)
    pub base_url: String,

    /// OAuth authorization endpoint
    pub authorize_url: String,

    /// OAuth token endpoint (code exchange and refresh)
    pub token_url: String,

    pub client_id: String,
    pub client_secret: String,

    /// Items per page for list and search calls
    pub page_size: u32,

    /// Per-request timeout applied by the HTTP client
    pub timeout: Duration,

    /// Zone in which "today" is evaluated for relative report ranges
    pub timezone: Tz,

    pub week_start: WeekStart,
}

impl ConnectorConfig {
    /// Config against the production Timesheet endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            page_size: PAGE_SIZE,
            timeout: Duration::from_secs(TIMEOUT_SECONDS),
            timezone: Tz::UTC,
            week_start: WeekStart::default(),
        }
    }

    /// Point the API and both OAuth endpoints at another host (for testing with a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        self.authorize_url = format!("{}/oauth2/auth", base_url);
        self.token_url = format!("{}/oauth2/token", base_url);
        self.base_url = base_url;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    /// Absolute URL for an API path such as `/v1/teams`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("base_url", &self.base_url)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .field("timezone", &self.timezone)
            .field("week_start", &self.week_start)
            .finish()
    }
}

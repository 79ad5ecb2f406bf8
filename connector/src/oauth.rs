//! OAuth 2.0 authorization code flow against the Timesheet token endpoint.
//!
//! The platform drives the flow; this module builds the authorize URL,
//! exchanges the returned code, refreshes expired access tokens and tests a
//! token by fetching the profile.

use crate::client::{Profile, TimesheetClient};
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Token pair handed back to the platform after a code exchange.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// OAuth access token (sent as bearer on every API call)
    pub access_token: String,

    /// OAuth refresh token (used to obtain new access tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Refreshed access token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RefreshedToken {
    pub access_token: String,
}

/// Standard OAuth 2.0 token response
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// OAuth client bound to one connector configuration.
#[derive(Clone)]
pub struct Authenticator {
    config: Arc<ConnectorConfig>,
    http_client: Client,
}

impl Authenticator {
    pub fn new(config: Arc<ConnectorConfig>) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Build the provider authorization URL for the given state and redirect URI.
    pub fn authorize_url(&self, state: &str, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&state={}&redirect_uri={}&response_type=code",
            self.config.authorize_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(state),
            urlencoding::encode(redirect_uri)
        )
    }

    /// Exchange an authorization code for an access/refresh token pair.
    ///
    /// Any status other than 200 fails with `Upstream`, carrying the body.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Credentials> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        debug!(token_url = %self.config.token_url, "Exchanging authorization code for token");

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), body = %body, "Unable to fetch access token");
            return Err(ConnectorError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ConnectorError::Decode(format!("token response: {}", e)))?;

        debug!(
            has_refresh_token = token.refresh_token.is_some(),
            "Token exchange successful"
        );

        Ok(Credentials {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
        })
    }

    /// Obtain a new access token from a refresh token.
    ///
    /// Failure is reported as `Auth` so the platform restarts the
    /// authorization flow instead of retrying.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        debug!(token_url = %self.config.token_url, "Refreshing access token");

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Token refresh failed");
            return Err(ConnectorError::Auth(format!(
                "Unable to refresh access token: {}",
                body
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ConnectorError::Decode(format!("token response: {}", e)))?;

        Ok(RefreshedToken {
            access_token: token.access_token,
        })
    }

    /// Validate an access token by fetching the profile it belongs to.
    pub async fn test(&self, access_token: Option<String>) -> Result<Profile> {
        let client = TimesheetClient::new(Arc::clone(&self.config), access_token)?;
        client.fetch_profile().await.map_err(|e| match e {
            ConnectorError::Auth(_) => {
                ConnectorError::Auth("The access token you supplied is not valid".to_string())
            }
            other => other,
        })
    }
}

/// Label the platform shows for a connected account.
pub fn connection_label(profile: &Profile) -> String {
    profile.email.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn authenticator_for(server: &Server) -> Authenticator {
        let config = ConnectorConfig::new("client_1", "secret_1").with_base_url(server.url());
        Authenticator::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn test_authorize_url() {
        let config = ConnectorConfig::new("test_client_id", "secret");
        let auth = Authenticator::new(Arc::new(config)).unwrap();

        let url = auth.authorize_url("random_state", "https://hooks.example.com/oauth/cb");

        assert!(url.starts_with("https://api.timesheet.io/oauth2/auth?"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains("state=random_state"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fhooks.example.com%2Foauth%2Fcb"));
        assert!(url.contains("response_type=code"));
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "code_123".into()),
                Matcher::UrlEncoded("client_id".into(), "client_1".into()),
                Matcher::UrlEncoded("client_secret".into(), "secret_1".into()),
                Matcher::UrlEncoded("redirect_uri".into(), "https://cb.example.com".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "at_1", "refresh_token": "rt_1", "expires_in": 3600}"#)
            .create_async()
            .await;

        let creds = authenticator_for(&server)
            .exchange_code("code_123", "https://cb.example.com")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(creds.access_token, "at_1");
        assert_eq!(creds.refresh_token.as_deref(), Some("rt_1"));
    }

    #[tokio::test]
    async fn test_exchange_failure_is_upstream() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(400)
            .with_body("invalid_grant")
            .create_async()
            .await;

        let err = authenticator_for(&server)
            .exchange_code("bad", "https://cb.example.com")
            .await
            .unwrap_err();
        match err {
            ConnectorError::Upstream { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "invalid_grant");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("refresh_token".into(), "rt_1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token": "at_2"}"#)
            .create_async()
            .await;

        let token = authenticator_for(&server).refresh("rt_1").await.unwrap();
        assert_eq!(token.access_token, "at_2");
    }

    #[tokio::test]
    async fn test_refresh_failure_is_auth_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/oauth2/token")
            .with_status(401)
            .with_body("revoked")
            .create_async()
            .await;

        let err = authenticator_for(&server).refresh("rt_1").await.unwrap_err();
        assert!(matches!(err, ConnectorError::Auth(ref msg) if msg.contains("revoked")));
    }

    #[tokio::test]
    async fn test_auth_test_rejects_invalid_token() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/profiles/me")
            .with_status(401)
            .create_async()
            .await;

        let err = authenticator_for(&server)
            .test(Some("bad".to_string()))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication failed: The access token you supplied is not valid"
        );
    }

    #[tokio::test]
    async fn test_auth_test_returns_profile() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/profiles/me")
            .match_header("authorization", "Bearer good")
            .with_status(200)
            .with_body(r#"{"email": "support@timesheet.io", "activatedTeams": true}"#)
            .create_async()
            .await;

        let profile = authenticator_for(&server)
            .test(Some("good".to_string()))
            .await
            .unwrap();
        assert_eq!(connection_label(&profile), "support@timesheet.io");
        assert!(profile.activated_teams);
    }

    #[test]
    fn test_token_response_minimal() {
        let json = r#"{"access_token": "token_12345"}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "token_12345");
        assert_eq!(response.refresh_token, None);
    }
}

//! OAuth2 client-credentials flow against the Azure AD token endpoint.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{AccessToken, TokenCredential};
use crate::error::{Error, Result};

/// Default Azure AD authority host.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Request timeout for the token endpoint.
const TOKEN_TIMEOUT_SECS: u64 = 30;

/// A service-principal credential using the OAuth2 client-credentials grant.
///
/// Exchanges a client id and secret for a bearer token by POSTing to
/// `{authority}/{tenant}/oauth2/v2.0/token`. The authority host is
/// overridable for sovereign clouds and for tests.
pub struct ClientSecretCredential {
    client: reqwest::Client,
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("authority_host", &self.authority_host)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Azure AD error payload.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

impl ClientSecretCredential {
    /// Creates a credential for the given service principal.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TOKEN_TIMEOUT_SECS))
            .user_agent(format!("azvm/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::authentication_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    /// Overrides the authority host (sovereign clouds, tests).
    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = authority_host.into();
        self
    }

    /// The token endpoint URL for this credential's tenant.
    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let url = self.token_url();
        let scope = scopes.join(" ");

        debug!(tenant = %self.tenant_id, client_id = %self.client_id, "Requesting token from Azure AD");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::authentication_with_source("Token request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<TokenErrorResponse>()
                .await
                .ok()
                .and_then(|body| {
                    let code = body.error.unwrap_or_default();
                    let description = body.error_description.unwrap_or_default();
                    if code.is_empty() && description.is_empty() {
                        None
                    } else {
                        Some(format!("{}: {}", code, description))
                    }
                })
                .unwrap_or_else(|| "no error detail in response".to_string());

            return Err(Error::authentication(format!(
                "Token endpoint returned {}: {}",
                status, detail
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::authentication_with_source("Failed to parse token response", e))?;

        let expires_on = Utc::now() + ChronoDuration::seconds(body.expires_in);
        Ok(AccessToken::new(body.access_token, expires_on))
    }
}

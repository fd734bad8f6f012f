//! Identity collaborator: credentials for the Azure management API.
//!
//! This module provides the credential abstraction the compute client
//! authenticates with, plus the concrete credential sources:
//!
//! - [`ClientSecretCredential`]: OAuth2 client-credentials flow against the
//!   Azure AD token endpoint
//! - [`EnvironmentCredential`]: client-credentials flow configured from
//!   `AZURE_TENANT_ID` / `AZURE_CLIENT_ID` / `AZURE_CLIENT_SECRET`
//! - [`AzureCliCredential`]: token acquisition via a logged-in `az` CLI
//! - [`DefaultCredential`]: tries the above sources in order
//!
//! Every `get_token` call performs the full flow; tokens are not cached or
//! refreshed locally.

pub mod azure_cli;
pub mod client_secret;
pub mod default;

pub use azure_cli::AzureCliCredential;
pub use client_secret::ClientSecretCredential;
pub use default::{DefaultCredential, EnvironmentCredential};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// An OAuth2 bearer token for the management API.
///
/// The token value is only reachable through [`AccessToken::secret`]; the
/// `Debug` representation never reveals it.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    expires_on: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a token with the given expiry instant.
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    /// The raw bearer token value.
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// When the token expires, as reported by the identity collaborator.
    pub fn expires_on(&self) -> DateTime<Utc> {
        self.expires_on
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"***")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Trait for credential sources.
///
/// This is the injectable seam between the compute client and the identity
/// collaborator: tests substitute a double, production code uses one of the
/// concrete sources in this module.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Obtains a bearer token valid for the given scopes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`](crate::error::Error::Authentication)
    /// if no token could be obtained.
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken>;
}

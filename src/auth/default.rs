//! Environment-driven credential sources.

use async_trait::async_trait;
use tracing::debug;

use super::client_secret::ClientSecretCredential;
use super::{AccessToken, AzureCliCredential, TokenCredential};
use crate::error::{Error, Result};

/// Environment variable holding the Azure AD tenant id.
pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
/// Environment variable holding the service principal client id.
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
/// Environment variable holding the service principal client secret.
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
/// Optional environment variable overriding the Azure AD authority host.
pub const ENV_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";

/// A client-secret credential configured from the process environment.
pub struct EnvironmentCredential {
    inner: ClientSecretCredential,
}

impl std::fmt::Debug for EnvironmentCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentCredential")
            .field("inner", &self.inner)
            .finish()
    }
}

impl EnvironmentCredential {
    /// Builds the credential from `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and
    /// `AZURE_CLIENT_SECRET`, honoring `AZURE_AUTHORITY_HOST` when set.
    ///
    /// # Errors
    ///
    /// Returns an authentication error naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        let tenant_id = require_var(ENV_TENANT_ID)?;
        let client_id = require_var(ENV_CLIENT_ID)?;
        let client_secret = require_var(ENV_CLIENT_SECRET)?;

        let mut inner = ClientSecretCredential::new(tenant_id, client_id, client_secret)?;
        if let Ok(authority) = std::env::var(ENV_AUTHORITY_HOST) {
            inner = inner.with_authority_host(authority);
        }

        Ok(Self { inner })
    }
}

#[async_trait]
impl TokenCredential for EnvironmentCredential {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        self.inner.get_token(scopes).await
    }
}

fn require_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::authentication(format!("Environment variable {} is not set", name)))
}

/// The default credential chain.
///
/// Mirrors the ambient-environment-driven flow of the vendor SDKs: service
/// principal configuration from the environment first, then a logged-in Azure
/// CLI. Construction never fails; source selection happens at `get_token`
/// time, and a failure of every source yields one authentication error naming
/// what was tried.
#[derive(Debug, Default)]
pub struct DefaultCredential;

impl DefaultCredential {
    /// Creates the default credential chain.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TokenCredential for DefaultCredential {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let mut attempts = Vec::new();

        match EnvironmentCredential::from_env() {
            Ok(credential) => match credential.get_token(scopes).await {
                Ok(token) => {
                    debug!("DefaultCredential authenticated via the environment");
                    return Ok(token);
                }
                Err(e) => attempts.push(format!("environment: {}", e)),
            },
            Err(e) => attempts.push(format!("environment: {}", e)),
        }

        match AzureCliCredential::new().get_token(scopes).await {
            Ok(token) => {
                debug!("DefaultCredential authenticated via the Azure CLI");
                return Ok(token);
            }
            Err(e) => attempts.push(format!("azure cli: {}", e)),
        }

        Err(Error::authentication(format!(
            "No credential source succeeded ({})",
            attempts.join("; ")
        )))
    }
}

//! Token acquisition through a logged-in Azure CLI.

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::{AccessToken, TokenCredential};
use crate::error::{Error, Result};

/// A credential that shells out to `az account get-access-token`.
///
/// Requires an `az login` session in the ambient environment. No state is
/// held; every call runs the CLI again.
#[derive(Debug, Default)]
pub struct AzureCliCredential;

/// Output of `az account get-access-token --output json`.
///
/// Newer CLI versions emit `expires_on` as a unix timestamp next to the
/// locale-formatted `expiresOn`; either is accepted.
#[derive(Debug, Deserialize)]
struct CliTokenOutput {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "expires_on")]
    expires_on_unix: Option<i64>,
    #[serde(rename = "expiresOn")]
    expires_on_local: Option<String>,
}

impl AzureCliCredential {
    /// Creates a new Azure CLI credential.
    pub fn new() -> Self {
        Self
    }

    fn parse_expiry(output: &CliTokenOutput) -> Result<DateTime<Utc>> {
        if let Some(ts) = output.expires_on_unix {
            if let Some(expires) = DateTime::from_timestamp(ts, 0) {
                return Ok(expires);
            }
        }

        if let Some(local) = &output.expires_on_local {
            // The CLI formats expiresOn in local time without an offset.
            let naive = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M:%S%.f")
                .map_err(|e| {
                    Error::authentication_with_source(
                        format!("Could not parse Azure CLI token expiry '{}'", local),
                        e,
                    )
                })?;
            if let Some(expires) = Local.from_local_datetime(&naive).single() {
                return Ok(expires.with_timezone(&Utc));
            }
        }

        Err(Error::authentication(
            "Azure CLI token output carried no usable expiry",
        ))
    }
}

#[async_trait]
impl TokenCredential for AzureCliCredential {
    async fn get_token(&self, scopes: &[&str]) -> Result<AccessToken> {
        let scope = scopes.join(" ");

        debug!(%scope, "Requesting token from the Azure CLI");

        let output = Command::new("az")
            .args(["account", "get-access-token", "--output", "json", "--scope"])
            .arg(&scope)
            .output()
            .await
            .map_err(|e| Error::authentication_with_source("Failed to run the Azure CLI", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::authentication(format!(
                "Azure CLI token request failed: {}",
                stderr.trim()
            )));
        }

        let parsed: CliTokenOutput = serde_json::from_slice(&output.stdout).map_err(|e| {
            Error::authentication_with_source("Failed to parse Azure CLI token output", e)
        })?;

        let expires_on = Self::parse_expiry(&parsed)?;
        Ok(AccessToken::new(parsed.access_token, expires_on))
    }
}

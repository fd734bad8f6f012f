//! HTTP client for the Azure Resource Manager compute surface.
//!
//! [`ComputeClient`] is bound at construction to a subscription id and a
//! [`TokenCredential`]. It speaks the vendor REST contract over HTTPS and
//! performs exactly one outbound call per invocation: no retry, no polling,
//! no response caching. Completion of the server-side provisioning job is
//! represented by the returned [`OperationHandle`] and is never awaited here.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::model::VirtualMachine;
use crate::auth::TokenCredential;
use crate::error::{Error, Result};

/// Default ARM endpoint (public cloud).
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Compute resource provider API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2023-09-01";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the compute client.
#[derive(Debug, Clone)]
pub struct ComputeClientConfig {
    /// ARM endpoint base URL
    pub endpoint: String,
    /// `api-version` query value
    pub api_version: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ComputeClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("azvm/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builder for creating a [`ComputeClient`].
pub struct ComputeClientBuilder {
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
    config: ComputeClientConfig,
}

impl ComputeClientBuilder {
    /// Creates a builder bound to a subscription and credential.
    pub fn new(subscription_id: impl Into<String>, credential: Arc<dyn TokenCredential>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            credential,
            config: ComputeClientConfig::default(),
        }
    }

    /// Overrides the ARM endpoint (sovereign clouds, tests).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Overrides the API version.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = api_version.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<ComputeClient> {
        ComputeClient::from_config(self.subscription_id, self.credential, self.config)
    }
}

/// An opaque handle to the server-side provisioning job.
///
/// Returned immediately by the management API; the job continues remotely and
/// this crate never polls it. The handle exposes what the API reported at
/// acceptance time.
#[derive(Debug, Clone)]
pub struct OperationHandle {
    status_url: Option<String>,
    provisioning_state: Option<String>,
    request_id: Option<String>,
}

impl OperationHandle {
    /// Assembles a handle from its parts.
    ///
    /// Production handles come out of [`ComputeClient`]; this constructor
    /// exists for substituted implementations of [`VirtualMachinesApi`].
    pub fn new(
        status_url: Option<String>,
        provisioning_state: Option<String>,
        request_id: Option<String>,
    ) -> Self {
        Self {
            status_url,
            provisioning_state,
            request_id,
        }
    }

    /// URL the server designated for polling the operation, if any.
    pub fn status_url(&self) -> Option<&str> {
        self.status_url.as_deref()
    }

    /// Provisioning state echoed in the acceptance response, if any.
    pub fn provisioning_state(&self) -> Option<&str> {
        self.provisioning_state.as_deref()
    }

    /// Server-assigned request id, useful when raising support tickets.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

/// Trait for the management API collaborator.
///
/// The injectable seam between the issuer and Azure: tests substitute a
/// double, production code uses [`ComputeClient`].
#[async_trait]
pub trait VirtualMachinesApi: Send + Sync {
    /// Submits a create-or-update request for a virtual machine.
    ///
    /// Returns the long-running-operation handle without waiting for the
    /// server-side job to complete.
    ///
    /// # Errors
    ///
    /// [`Error::Authentication`] if no credential could be obtained (in which
    /// case no management call is made), [`Error::Request`] if the API
    /// rejected the request or it could not be delivered.
    async fn begin_create_or_update(
        &self,
        resource_group: &str,
        vm_name: &str,
        parameters: &VirtualMachine,
    ) -> Result<OperationHandle>;
}

/// ARM error payload envelope.
#[derive(Debug, Deserialize)]
struct ArmErrorResponse {
    error: Option<ArmErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ArmErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// The slice of the acceptance response body this crate reads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VirtualMachineResponse {
    properties: Option<VirtualMachineResponseProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VirtualMachineResponseProperties {
    provisioning_state: Option<String>,
}

/// HTTP client for the ARM compute surface, bound to one subscription.
pub struct ComputeClient {
    client: Client,
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
    config: ComputeClientConfig,
}

impl std::fmt::Debug for ComputeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputeClient")
            .field("subscription_id", &self.subscription_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ComputeClient {
    /// Creates a client with default configuration.
    pub fn new(
        subscription_id: impl Into<String>,
        credential: Arc<dyn TokenCredential>,
    ) -> Result<Self> {
        Self::builder(subscription_id, credential).build()
    }

    /// Creates a new builder bound to a subscription and credential.
    pub fn builder(
        subscription_id: impl Into<String>,
        credential: Arc<dyn TokenCredential>,
    ) -> ComputeClientBuilder {
        ComputeClientBuilder::new(subscription_id, credential)
    }

    fn from_config(
        subscription_id: String,
        credential: Arc<dyn TokenCredential>,
        config: ComputeClientConfig,
    ) -> Result<Self> {
        Url::parse(&config.endpoint)
            .map_err(|e| Error::request_with_source("Invalid management endpoint URL", e))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::request_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            subscription_id,
            credential,
            config,
        })
    }

    /// The subscription this client is bound to.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// The ARM endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// OAuth2 scope for this client's endpoint.
    fn token_scope(&self) -> String {
        format!("{}/.default", self.config.endpoint.trim_end_matches('/'))
    }

    /// Resource URL of a virtual machine under this subscription.
    fn vm_url(&self, resource_group: &str, vm_name: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/virtualMachines/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.subscription_id,
            resource_group,
            vm_name
        )
    }

    /// Maps a non-success management response to a request error.
    async fn rejection(response: Response) -> Error {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();

        match serde_json::from_slice::<ArmErrorResponse>(&body) {
            Ok(ArmErrorResponse { error: Some(detail) }) => Error::rejected(
                status.as_u16(),
                detail.code,
                detail
                    .message
                    .unwrap_or_else(|| format!("management API returned {}", status)),
            ),
            _ => Error::rejected(
                status.as_u16(),
                None,
                format!(
                    "management API returned {}: {}",
                    status,
                    String::from_utf8_lossy(&body)
                ),
            ),
        }
    }

    fn handle_from(response: &Response) -> OperationHandle {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };

        OperationHandle {
            // ARM points at the operation status through either header,
            // depending on the resource provider.
            status_url: header("azure-asyncoperation").or_else(|| header("location")),
            provisioning_state: None,
            request_id: header("x-ms-request-id"),
        }
    }
}

#[async_trait]
impl VirtualMachinesApi for ComputeClient {
    async fn begin_create_or_update(
        &self,
        resource_group: &str,
        vm_name: &str,
        parameters: &VirtualMachine,
    ) -> Result<OperationHandle> {
        let scope = self.token_scope();
        let token = self.credential.get_token(&[scope.as_str()]).await?;

        let url = self.vm_url(resource_group, vm_name);
        debug!(%url, api_version = %self.config.api_version, "Submitting create-or-update");

        let response = self
            .client
            .put(&url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .bearer_auth(token.secret())
            .json(parameters)
            .send()
            .await
            .map_err(|e| Error::request_with_source("Failed to reach the management API", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::rejection(response).await);
        }

        let mut handle = Self::handle_from(&response);
        if let Ok(body) = response.json::<VirtualMachineResponse>().await {
            handle.provisioning_state = body.properties.and_then(|p| p.provisioning_state);
        }

        info!(
            vm = vm_name,
            resource_group,
            state = handle.provisioning_state().unwrap_or("unknown"),
            "Provisioning request accepted"
        );

        Ok(handle)
    }
}

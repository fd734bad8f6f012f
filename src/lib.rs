//! # azvm - Azure VM Provisioning Request Issuer
//!
//! azvm authenticates against Azure Active Directory and issues a single
//! Azure Resource Manager call to provision a virtual machine. It is a thin,
//! type-safe binding over the vendor REST contract: the descriptor is
//! constructed locally, submitted once, and the resulting long-running
//! operation is left to complete server-side.
//!
//! ## Core Concepts
//!
//! - **Descriptor**: the nested [`VirtualMachine`](compute::VirtualMachine)
//!   record describing location, image, size, OS profile, and network
//!   attachment
//! - **Credential**: an opaque token source implementing
//!   [`TokenCredential`](auth::TokenCredential)
//! - **Client**: a [`ComputeClient`](compute::ComputeClient) bound to a
//!   subscription id and a credential
//! - **Issuer**: the [`ProvisioningIssuer`](issuer::ProvisioningIssuer) that
//!   submits the descriptor and returns an
//!   [`OperationHandle`](compute::OperationHandle)
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use azvm::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credential = Arc::new(DefaultCredential::new());
//!     let client = ComputeClient::new("your-subscription-id", credential)?;
//!
//!     let descriptor = VirtualMachine::new("eastus")
//!         .with_image(ImageReference::new("Canonical", "UbuntuServer", "18.04-LTS", "latest"))
//!         .with_vm_size("Standard_DS1_v2")
//!         .with_os_profile("myVM", "azureuser", std::env::var("AZVM_ADMIN_PASSWORD")?)
//!         .with_network_interface("/subscriptions/.../networkInterfaces/myNic");
//!
//!     let issuer = ProvisioningIssuer::new(Arc::new(client));
//!     let handle = issuer.submit("MyResourceGroup", "myVM", &descriptor).await?;
//!
//!     println!("accepted: {:?}", handle.provisioning_state());
//!     Ok(())
//! }
//! ```
//!
//! There is deliberately no retry policy, connection pooling tuning, token
//! caching, or completion polling in this crate; the issuer performs one
//! request-response interaction and surfaces the collaborator's errors
//! unchanged.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of the types most callers need.

    pub use crate::auth::{
        AccessToken, AzureCliCredential, ClientSecretCredential, DefaultCredential,
        EnvironmentCredential, TokenCredential,
    };
    pub use crate::compute::{
        ComputeClient, ImageReference, OperationHandle, VirtualMachine, VirtualMachinesApi,
    };
    pub use crate::error::{Error, Result};
    pub use crate::issuer::ProvisioningIssuer;
}

/// Error types and result alias for azvm operations.
///
/// Exactly two kinds exist: [`Error::Authentication`](error::Error::Authentication)
/// and [`Error::Request`](error::Error::Request); both propagate to the
/// caller without local recovery.
pub mod error;

/// Identity collaborator: credential sources for the management API.
pub mod auth;

/// Cloud management API collaborator: descriptor model and ARM client.
pub mod compute;

/// The provisioning request issuer.
pub mod issuer;

/// Returns the current version of azvm.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! The provisioning request issuer.

use std::sync::Arc;
use tracing::{debug, info};

use crate::compute::{OperationHandle, VirtualMachine, VirtualMachinesApi};
use crate::error::Result;

/// Submits VM provisioning requests to the management API collaborator.
///
/// The issuer performs a single request-response interaction: one call to the
/// collaborator per [`submit`](Self::submit), no local retry, no polling, no
/// branching. Errors from the collaborator propagate unchanged. Submitting
/// the same descriptor twice produces two independent calls; the VM name
/// collision policy, if any, lives entirely server-side.
pub struct ProvisioningIssuer {
    api: Arc<dyn VirtualMachinesApi>,
}

impl ProvisioningIssuer {
    /// Creates an issuer over the given management API collaborator.
    pub fn new(api: Arc<dyn VirtualMachinesApi>) -> Self {
        Self { api }
    }

    /// Submits one create-or-update request and returns the operation handle.
    ///
    /// The underlying provisioning job is asynchronous on the server side;
    /// this method returns as soon as the request is accepted and never waits
    /// for completion.
    ///
    /// # Errors
    ///
    /// Propagates the collaborator's error: authentication failures occur
    /// before any management call is made, request failures after exactly
    /// one.
    pub async fn submit(
        &self,
        resource_group: &str,
        vm_name: &str,
        descriptor: &VirtualMachine,
    ) -> Result<OperationHandle> {
        debug!(
            vm = vm_name,
            resource_group,
            location = %descriptor.location,
            "Issuing provisioning request"
        );

        let handle = self
            .api
            .begin_create_or_update(resource_group, vm_name, descriptor)
            .await?;

        info!(
            vm = vm_name,
            resource_group,
            status_url = handle.status_url().unwrap_or("none"),
            "Provisioning request issued; not waiting for completion"
        );

        Ok(handle)
    }
}

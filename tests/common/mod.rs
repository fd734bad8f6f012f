//! Shared test doubles for the identity and management API collaborators.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Mutex;

use azvm::auth::{AccessToken, TokenCredential};
use azvm::compute::{OperationHandle, VirtualMachine, VirtualMachinesApi};
use azvm::error::{Error, Result};

/// A credential that always hands out the same token.
pub struct StaticCredential {
    token: String,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticCredential {
    async fn get_token(&self, _scopes: &[&str]) -> Result<AccessToken> {
        Ok(AccessToken::new(
            self.token.clone(),
            Utc::now() + Duration::hours(1),
        ))
    }
}

/// A credential that always fails, as when no identity context exists.
pub struct FailingCredential;

#[async_trait]
impl TokenCredential for FailingCredential {
    async fn get_token(&self, _scopes: &[&str]) -> Result<AccessToken> {
        Err(Error::authentication("no identity context available"))
    }
}

/// What a [`RecordingApi`] should answer with.
pub enum ApiBehavior {
    /// Accept every request and return a fixed operation handle.
    Accept,
    /// Reject every request with a 409 conflict.
    Reject,
}

/// One recorded invocation of the management API double.
pub struct RecordedCall {
    pub resource_group: String,
    pub vm_name: String,
    pub descriptor: VirtualMachine,
}

/// Management API double that records every invocation.
pub struct RecordingApi {
    behavior: ApiBehavior,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingApi {
    pub fn accepting() -> Self {
        Self {
            behavior: ApiBehavior::Accept,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            behavior: ApiBehavior::Reject,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VirtualMachinesApi for RecordingApi {
    async fn begin_create_or_update(
        &self,
        resource_group: &str,
        vm_name: &str,
        parameters: &VirtualMachine,
    ) -> Result<OperationHandle> {
        self.calls.lock().unwrap().push(RecordedCall {
            resource_group: resource_group.to_string(),
            vm_name: vm_name.to_string(),
            descriptor: parameters.clone(),
        });

        match self.behavior {
            ApiBehavior::Accept => Ok(OperationHandle::new(
                Some("https://management.azure.com/operations/op-1".to_string()),
                Some("Creating".to_string()),
                Some("req-1".to_string()),
            )),
            ApiBehavior::Reject => Err(Error::rejected(
                409,
                Some("OperationNotAllowed".to_string()),
                "Operation results in exceeding quota limits of Core",
            )),
        }
    }
}

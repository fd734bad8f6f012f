//! Cloud management API collaborator.
//!
//! The compute surface of Azure Resource Manager, reduced to what this crate
//! issues: a typed VM descriptor ([`model`]) and a client that submits it
//! ([`client`]).

pub mod client;
pub mod model;

pub use client::{
    ComputeClient, ComputeClientBuilder, ComputeClientConfig, OperationHandle,
    VirtualMachinesApi, DEFAULT_API_VERSION, DEFAULT_MANAGEMENT_ENDPOINT,
};
pub use model::{
    HardwareProfile, ImageReference, NetworkInterfaceReference, NetworkProfile, OsProfile,
    StorageProfile, VirtualMachine, VirtualMachineProperties,
};

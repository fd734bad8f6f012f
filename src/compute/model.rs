//! Typed VM provisioning descriptor matching the ARM wire contract.
//!
//! A [`VirtualMachine`] is the nested record submitted to the management API:
//! a top-level `location` plus a `properties` envelope carrying the hardware,
//! storage, OS, and network profiles. Field names serialize camelCased and
//! unset optional fields are omitted entirely, as the REST contract expects.
//!
//! The descriptor is caller-supplied data: it is constructed, submitted once,
//! and discarded. Nothing in this module validates values locally - name
//! uniqueness, image availability, and SKU quotas are all enforced
//! server-side.

use serde::{Deserialize, Serialize};

/// Description of a virtual machine to create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    /// Cloud-region identifier, e.g. `eastus`
    pub location: String,
    /// VM settings envelope required by the REST contract
    pub properties: VirtualMachineProperties,
}

/// The `properties` envelope of a virtual machine resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_profile: Option<HardwareProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_profile: Option<OsProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,
}

/// Compute SKU selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    /// VM size, e.g. `Standard_DS1_v2`
    pub vm_size: String,
}

/// Storage configuration; for this crate, the base image selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,
}

/// Marketplace image coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    /// Image publisher, e.g. `Canonical`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Image offer, e.g. `UbuntuServer`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
    /// Image SKU, e.g. `18.04-LTS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Image version, or `latest`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ImageReference {
    /// Creates a fully-specified marketplace image reference.
    pub fn new(
        publisher: impl Into<String>,
        offer: impl Into<String>,
        sku: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            publisher: Some(publisher.into()),
            offer: Some(offer.into()),
            sku: Some(sku.into()),
            version: Some(version.into()),
        }
    }
}

/// Guest OS settings.
///
/// `Debug` masks the admin password so descriptors can be logged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for OsProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsProfile")
            .field("computer_name", &self.computer_name)
            .field("admin_username", &self.admin_username)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

/// Network attachment: references to pre-existing network interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    /// Ordered sequence of NIC references; order is preserved on the wire
    pub network_interfaces: Vec<NetworkInterfaceReference>,
}

/// Reference to a network interface resource by its ARM id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceReference {
    /// Full resource id of the network interface
    pub id: String,
}

impl VirtualMachine {
    /// Creates a descriptor for the given region with empty properties.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            properties: VirtualMachineProperties::default(),
        }
    }

    /// Sets the compute SKU.
    pub fn with_vm_size(mut self, vm_size: impl Into<String>) -> Self {
        self.properties.hardware_profile = Some(HardwareProfile {
            vm_size: vm_size.into(),
        });
        self
    }

    /// Sets the base image.
    pub fn with_image(mut self, image: ImageReference) -> Self {
        self.properties.storage_profile = Some(StorageProfile {
            image_reference: Some(image),
        });
        self
    }

    /// Sets the guest OS profile.
    pub fn with_os_profile(
        mut self,
        computer_name: impl Into<String>,
        admin_username: impl Into<String>,
        admin_password: impl Into<String>,
    ) -> Self {
        self.properties.os_profile = Some(OsProfile {
            computer_name: Some(computer_name.into()),
            admin_username: Some(admin_username.into()),
            admin_password: Some(admin_password.into()),
        });
        self
    }

    /// Appends a network interface reference.
    pub fn with_network_interface(mut self, id: impl Into<String>) -> Self {
        self.properties
            .network_profile
            .get_or_insert_with(NetworkProfile::default)
            .network_interfaces
            .push(NetworkInterfaceReference { id: id.into() });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_descriptor() -> VirtualMachine {
        VirtualMachine::new("eastus")
            .with_image(ImageReference::new(
                "Canonical",
                "UbuntuServer",
                "18.04-LTS",
                "latest",
            ))
            .with_vm_size("Standard_DS1_v2")
            .with_os_profile("myVM", "azureuser", "hunter2!")
            .with_network_interface(
                "/subscriptions/xxxx-xxxx/resourceGroups/MyResourceGroup/providers/Microsoft.Network/networkInterfaces/myNic",
            )
    }

    #[test]
    fn test_descriptor_serializes_to_arm_wire_shape() {
        let vm = sample_descriptor();
        let expected = serde_json::json!({
            "location": "eastus",
            "properties": {
                "hardwareProfile": {
                    "vmSize": "Standard_DS1_v2"
                },
                "storageProfile": {
                    "imageReference": {
                        "publisher": "Canonical",
                        "offer": "UbuntuServer",
                        "sku": "18.04-LTS",
                        "version": "latest"
                    }
                },
                "osProfile": {
                    "computerName": "myVM",
                    "adminUsername": "azureuser",
                    "adminPassword": "hunter2!"
                },
                "networkProfile": {
                    "networkInterfaces": [
                        { "id": "/subscriptions/xxxx-xxxx/resourceGroups/MyResourceGroup/providers/Microsoft.Network/networkInterfaces/myNic" }
                    ]
                }
            }
        });
        assert_eq!(serde_json::to_value(&vm).unwrap(), expected);
    }

    #[test]
    fn test_unset_profiles_are_omitted() {
        let vm = VirtualMachine::new("westeurope");
        let value = serde_json::to_value(&vm).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "location": "westeurope", "properties": {} })
        );
    }

    #[test]
    fn test_partial_os_profile_omits_unset_fields() {
        let vm = VirtualMachine {
            location: "eastus".to_string(),
            properties: VirtualMachineProperties {
                os_profile: Some(OsProfile {
                    computer_name: None,
                    admin_username: Some("azureuser".to_string()),
                    admin_password: None,
                }),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&vm).unwrap();
        assert_eq!(
            value["properties"]["osProfile"],
            serde_json::json!({ "adminUsername": "azureuser" })
        );
    }

    #[test]
    fn test_nic_order_is_preserved() {
        let vm = VirtualMachine::new("eastus")
            .with_network_interface("/subscriptions/s/nics/first")
            .with_network_interface("/subscriptions/s/nics/second");
        let nics = &vm.properties.network_profile.as_ref().unwrap().network_interfaces;
        assert_eq!(nics[0].id, "/subscriptions/s/nics/first");
        assert_eq!(nics[1].id, "/subscriptions/s/nics/second");
    }

    #[test]
    fn test_os_profile_debug_masks_password() {
        let vm = sample_descriptor();
        let debug = format!("{:?}", vm);
        assert!(!debug.contains("hunter2!"));
        assert!(debug.contains("azureuser"));
    }

    #[test]
    fn test_descriptor_round_trips() {
        let vm = sample_descriptor();
        let json = serde_json::to_string(&vm).unwrap();
        let back: VirtualMachine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vm);
    }
}

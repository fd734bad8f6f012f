//! Command-line interface for azvm.
//!
//! Running with no arguments submits the built-in sample descriptor; every
//! value can be overridden by flag or environment variable. The admin
//! password has no default on purpose and must come from `--admin-password`
//! or `AZVM_ADMIN_PASSWORD`.

use clap::Parser;

use azvm::compute::{ImageReference, VirtualMachine, DEFAULT_MANAGEMENT_ENDPOINT};

/// Provision an Azure virtual machine via Azure Resource Manager.
///
/// Authenticates through the default credential chain (environment service
/// principal, then Azure CLI), submits one create-or-update request, and
/// exits without waiting for the server-side job to finish.
#[derive(Parser, Debug, Clone)]
#[command(name = "azvm")]
#[command(author = "Azvm Contributors")]
#[command(version)]
#[command(about = "Issue an Azure VM provisioning request", long_about = None)]
pub struct Cli {
    /// Azure subscription identifier
    #[arg(
        short = 's',
        long,
        env = "AZURE_SUBSCRIPTION_ID",
        default_value = "your-subscription-id"
    )]
    pub subscription_id: String,

    /// Resource group that will own the virtual machine
    #[arg(short = 'g', long, default_value = "MyResourceGroup")]
    pub resource_group: String,

    /// Virtual machine name
    #[arg(short = 'n', long, default_value = "myVM")]
    pub name: String,

    /// Azure region
    #[arg(short = 'l', long, default_value = "eastus")]
    pub location: String,

    /// Image publisher
    #[arg(long, default_value = "Canonical")]
    pub image_publisher: String,

    /// Image offer
    #[arg(long, default_value = "UbuntuServer")]
    pub image_offer: String,

    /// Image SKU
    #[arg(long, default_value = "18.04-LTS")]
    pub image_sku: String,

    /// Image version
    #[arg(long, default_value = "latest")]
    pub image_version: String,

    /// VM size SKU
    #[arg(long, default_value = "Standard_DS1_v2")]
    pub vm_size: String,

    /// Admin username for the guest OS
    #[arg(long, default_value = "azureuser")]
    pub admin_username: String,

    /// Admin password for the guest OS; never hardcoded, so it must be
    /// supplied by flag or environment
    #[arg(long, env = "AZVM_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Computer name inside the guest (defaults to the VM name)
    #[arg(long)]
    pub computer_name: Option<String>,

    /// Resource id of a pre-existing network interface to attach (repeatable)
    #[arg(
        long = "nic-id",
        default_value = "/subscriptions/xxxx-xxxx/resourceGroups/MyResourceGroup/providers/Microsoft.Network/networkInterfaces/myNic"
    )]
    pub nic_ids: Vec<String>,

    /// ARM endpoint (sovereign cloud override)
    #[arg(long, env = "AZVM_MANAGEMENT_ENDPOINT", default_value = DEFAULT_MANAGEMENT_ENDPOINT)]
    pub management_endpoint: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Builds the VM provisioning descriptor from the parsed arguments.
    pub fn descriptor(&self) -> VirtualMachine {
        let computer_name = self.computer_name.clone().unwrap_or_else(|| self.name.clone());

        let mut vm = VirtualMachine::new(self.location.clone())
            .with_image(ImageReference::new(
                self.image_publisher.clone(),
                self.image_offer.clone(),
                self.image_sku.clone(),
                self.image_version.clone(),
            ))
            .with_vm_size(self.vm_size.clone())
            .with_os_profile(
                computer_name,
                self.admin_username.clone(),
                self.admin_password.clone(),
            );

        for nic_id in &self.nic_ids {
            vm = vm.with_network_interface(nic_id.clone());
        }

        vm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_build_the_sample_descriptor() {
        let cli = Cli::parse_from(["azvm", "--admin-password", "hunter2!"]);
        let vm = cli.descriptor();

        assert_eq!(cli.subscription_id, "your-subscription-id");
        assert_eq!(cli.resource_group, "MyResourceGroup");
        assert_eq!(cli.name, "myVM");
        assert_eq!(
            serde_json::to_value(&vm).unwrap(),
            serde_json::json!({
                "location": "eastus",
                "properties": {
                    "hardwareProfile": { "vmSize": "Standard_DS1_v2" },
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
            })
        );
    }

    #[test]
    fn test_computer_name_defaults_to_vm_name() {
        let cli = Cli::parse_from([
            "azvm",
            "--admin-password",
            "pw",
            "--name",
            "web-01",
        ]);
        let vm = cli.descriptor();
        let os = vm.properties.os_profile.unwrap();
        assert_eq!(os.computer_name.as_deref(), Some("web-01"));
    }

    #[test]
    fn test_multiple_nics_preserve_order() {
        let cli = Cli::parse_from([
            "azvm",
            "--admin-password",
            "pw",
            "--nic-id",
            "/subscriptions/s/nics/a",
            "--nic-id",
            "/subscriptions/s/nics/b",
        ]);
        let vm = cli.descriptor();
        let nics = vm.properties.network_profile.unwrap().network_interfaces;
        assert_eq!(nics.len(), 2);
        assert_eq!(nics[0].id, "/subscriptions/s/nics/a");
        assert_eq!(nics[1].id, "/subscriptions/s/nics/b");
    }

    #[test]
    fn test_password_is_required() {
        // Clap should refuse to parse when neither the flag nor the
        // environment variable supplies a password.
        std::env::remove_var("AZVM_ADMIN_PASSWORD");
        assert!(Cli::try_parse_from(["azvm"]).is_err());
    }
}

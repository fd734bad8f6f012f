//! azvm - Issue an Azure VM provisioning request
//!
//! Authenticates through the default credential chain, submits one
//! create-or-update request for a virtual machine, prints the resulting
//! operation handle, and exits without waiting for server-side completion.

mod cli;

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use azvm::auth::{DefaultCredential, TokenCredential};
use azvm::compute::{ComputeClient, OperationHandle};
use azvm::issuer::ProvisioningIssuer;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(&cli).await {
        Ok(handle) => {
            report(&cli, &handle);
            Ok(())
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            std::process::exit(err.exit_code());
        }
    }
}

/// Acquire a credential, bind the client, and issue the request.
async fn run(cli: &Cli) -> azvm::error::Result<OperationHandle> {
    let credential: Arc<dyn TokenCredential> = Arc::new(DefaultCredential::new());

    let client = ComputeClient::builder(cli.subscription_id.clone(), credential)
        .endpoint(cli.management_endpoint.clone())
        .build()?;

    let issuer = ProvisioningIssuer::new(Arc::new(client));
    let descriptor = cli.descriptor();

    issuer
        .submit(&cli.resource_group, &cli.name, &descriptor)
        .await
}

fn report(cli: &Cli, handle: &OperationHandle) {
    println!(
        "Provisioning request accepted for '{}' in resource group '{}'",
        cli.name, cli.resource_group
    );
    if let Some(state) = handle.provisioning_state() {
        println!("  provisioning state: {}", state);
    }
    if let Some(url) = handle.status_url() {
        println!("  operation status:   {}", url);
    }
    if let Some(id) = handle.request_id() {
        println!("  request id:         {}", id);
    }
    println!("The operation continues server-side; azvm does not wait for completion.");
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbosity >= 3))
        .with(env_filter)
        .init();
}

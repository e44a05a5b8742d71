//! Invoice store - Entry Point
//!
//! Stores uploaded invoices under collision-free random names and hands back
//! their public URLs.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use invoice_store::config::ServiceConfig;
use invoice_store::error::ServiceError;
use invoice_store::{FileStore, InvoiceProfile, Server};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Invoice store failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServiceError> {
    let config = ServiceConfig::load()?;
    info!(
        "Launching invoice store (public domain {})",
        config.store.public_domain
    );

    let profile = InvoiceProfile::from_settings(&config.store)?;
    let store = FileStore::new(profile, config.store.store_config())
        .with_naming(config.store.naming_policy());
    info!(
        "Storing invoices in {} on the {:?} backend",
        store.folder(),
        store.storage_driver()
    );

    let server = Server::bind(&config.server, Arc::new(store)).await?;
    server.start().await;
    Ok(())
}

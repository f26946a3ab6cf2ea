use std::sync::Arc;

use anyhow::Result;
use cookbook_checkout::{
    config::config_loader, infrastructure::axum_http::http_serve, observability,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        // logging may be the thing that failed to start
        if tracing::dispatcher::has_been_set() {
            error!("cookbook-checkout exited with error: {:#}", error);
        } else {
            eprintln!("cookbook-checkout exited with error: {error:#}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("cookbook-checkout")?;

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    http_serve::start(Arc::new(dotenvy_env)).await?;

    Ok(())
}

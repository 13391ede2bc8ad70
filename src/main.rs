use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tracing::{error, info};

mod client;
mod config;
mod generator;
mod logging;
mod target;
mod vehicle;

#[tokio::main]
async fn main() -> Result<()> {
    let tuning = match std::env::args().nth(1) {
        Some(path) => config::Tuning::from_file(&path)?,
        None => config::Tuning::default(),
    };
    let config = config::Config::from_env(tuning)?;

    logging::init(&config);

    info!(
        "Starting rideshare load generator against {}-[1..={}]:{}",
        config.host_prefix, config.replicas, config.tuning.port
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // keep the sender alive so the loop runs until the process is killed
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl-C, shutting down");
        let _ = shutdown_tx.send(true);
    });

    let transport = client::HttpTransport::new(config.tuning.request_timeout());
    let rng = StdRng::from_rng(&mut rand::rng());

    generator::LoadGenerator::new(&config, transport, rng, shutdown_rx)
        .run()
        .await;

    Ok(())
}

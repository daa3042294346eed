//! Point-cloud animation server
//!
//! Run with: cargo run --features cli --bin wave-server
//! Config: WAVE_CONFIG (JSON file), WAVE_MODE, WAVE_RESOLUTION, WAVE_LISTEN

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use wave_cloud::animator::Shutdown;
use wave_cloud::core::AnimationConfig;
use wave_cloud::server::{serve, DEFAULT_LISTEN_ADDR};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wave_cloud=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = AnimationConfig::load()?;
    let addr = std::env::var("WAVE_LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());

    info!(
        mode = config.mode.label(),
        resolution = config.grid.resolution,
        update_rate = config.update_rate,
        redraw_rate = config.redraw_rate,
        "Starting wave server"
    );

    let listener = TcpListener::bind(&addr).await?;
    let (shutdown, shutdown_rx) = Shutdown::new();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received");
                shutdown.trigger();
            }
            Err(e) => {
                warn!(error = %e, "Ctrl-C handler unavailable");
                // the server runs until this handle is dropped
                let _shutdown = shutdown;
                std::future::pending::<()>().await
            }
        }
    });

    serve(listener, config, shutdown_rx).await?;
    Ok(())
}

//! Headless renderer probe for the wave-cloud server
//!
//! Connects, applies every message to an in-memory point buffer, acknowledges
//! frames and logs stats. Client-driven scenes are animated locally.
//!
//! Run with: cargo run --features cli --bin wave-cli

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use futures_util::{SinkExt, StreamExt};
    use std::time::Duration;
    use tokio_tungstenite::{connect_async, tungstenite::Message};
    use tracing::{error, info, warn};
    use tracing_subscriber::{fmt, EnvFilter};
    use wave_cloud::core::protocol::{decode_server, encode};
    use wave_cloud::core::{ClientMessage, Mode};
    use wave_cloud::renderer::{apply_message, Applied, FrameLoop, PointBuffer};
    use wave_cloud::time::now_millis;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wave_cloud=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let url = std::env::var("WAVE_WS").unwrap_or_else(|_| wave_cloud::DEFAULT_WS_URL.to_string());

    info!(url = %url, "Connecting to wave server");
    let (ws_stream, _) = connect_async(&url).await?;
    let (mut write, mut read) = ws_stream.split();
    info!("WebSocket connected, waiting for scene...");

    let mut buffer = PointBuffer::new();
    let mut frame_loop: Option<FrameLoop> = None;
    let mut mode = None;
    let mut frames_total = 0u64;
    let mut frames_last_interval = 0u64;
    let mut latest_t = 0.0f64;
    let mut stats_interval = tokio::time::interval(Duration::from_secs(5));
    // stand-in for a 120 Hz display refresh; the frame loop throttles itself
    let mut display = tokio::time::interval(Duration::from_micros(8_333));

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match decode_server(&text).and_then(|msg| apply_message(&mut buffer, msg)) {
                            Ok(Applied::Frame { frame, t }) => {
                                frames_total += 1;
                                frames_last_interval += 1;
                                latest_t = t;
                                let ack = encode(&ClientMessage::Ack { frame })?;
                                write.send(Message::Text(ack)).await?;
                            }
                            Ok(Applied::Initialized { points }) => {
                                info!(points, "Server-driven scene");
                                mode = Some(Mode::ServerDriven);
                                frame_loop = None;
                            }
                            Ok(Applied::ClientDriven(local)) => {
                                info!(
                                    points = buffer.len(),
                                    interval_ms = local.frame_interval_ms(),
                                    "Client-driven scene"
                                );
                                mode = Some(Mode::ClientDriven);
                                frame_loop = Some(local);
                            }
                            Ok(Applied::Colors) => {}
                            Err(e) => warn!(error = %e, "Rejected message"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("WebSocket closed");
                        break;
                    }
                    Some(Err(e)) => error!(error = %e, "WebSocket error"),
                    _ => {}
                }
            }
            _ = display.tick(), if frame_loop.is_some() => {
                if let Some(local) = frame_loop.as_mut() {
                    match local.on_frame(now_millis(), &mut buffer) {
                        Ok(true) => {
                            frames_total += 1;
                            frames_last_interval += 1;
                            latest_t = local.time();
                        }
                        Ok(false) => {}
                        Err(e) => {
                            error!(error = %e, "Local animation stopped");
                            frame_loop = None;
                        }
                    }
                }
            }
            _ = stats_interval.tick() => {
                info!(
                    mode = mode.map(Mode::label).unwrap_or("none"),
                    points = buffer.len(),
                    frames = frames_total,
                    "/sec" = format!("{:.1}", frames_last_interval as f64 / 5.0),
                    t = format!("{:.2}", latest_t),
                    z_range = ?buffer.z_range(),
                    "stats"
                );
                frames_last_interval = 0;
            }
        }
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}

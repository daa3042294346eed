//! WebSocket server - one animation session per connection
//!
//! Every connection gets its own animator, clock and buffers. Server-driven
//! sessions stream frames through a latest-wins slot; client-driven sessions
//! send the scene once and then just keep the socket open.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, info, trace, warn};

use crate::animator::{run_server_driven, ClientAnimator, EmitOutcome, LatestSlot, ServerAnimator, Shutdown};
use crate::core::protocol::{decode_client, encode};
use crate::core::{AnimationConfig, ClientMessage, Mode, PointSet, SceneSetup, ServerMessage, VisResult};

/// Default listen address (override with WAVE_LISTEN env var)
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:38090";

/// Per-session totals, logged when the session ends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub frames_sent: u64,
    pub frames_acked: u64,
    pub last_ack: Option<u64>,
    /// Text messages that did not decode as a client message
    pub rejected: u64,
}

/// Accept connections until `shutdown` fires
pub async fn serve(listener: TcpListener, config: AnimationConfig, mut shutdown: watch::Receiver<bool>) -> VisResult<()> {
    config.validate()?;
    info!(addr = ?listener.local_addr().ok(), mode = config.mode.label(), "Listening");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let config = config.clone();
                        tokio::spawn(async move {
                            match run_session(stream, peer, config).await {
                                Ok(report) => info!(
                                    %peer,
                                    sent = report.frames_sent,
                                    acked = report.frames_acked,
                                    rejected = report.rejected,
                                    "Session closed"
                                ),
                                Err(e) => warn!(%peer, error = %e, "Session ended with error"),
                            }
                        });
                    }
                    Err(e) => error!(error = %e, "Accept failed"),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("Server shutting down");
                    break;
                }
            }
        }
    }
    Ok(())
}

pub async fn run_session(stream: TcpStream, peer: SocketAddr, config: AnimationConfig) -> VisResult<SessionReport> {
    debug!(%peer, mode = config.mode.label(), "Session opened");
    match config.mode {
        Mode::ServerDriven => server_driven_session(stream, peer, &config).await,
        Mode::ClientDriven => client_driven_session(stream, peer, &config).await,
    }
}

async fn server_driven_session(stream: TcpStream, peer: SocketAddr, config: &AnimationConfig) -> VisResult<SessionReport> {
    let animator = ServerAnimator::new(config)?;
    let period = config.update_interval()?;
    let initial = animator.snapshot()?;
    let point_size = animator.point_size();

    // The clock starts now; frames produced before the renderer attaches are dropped.
    let slot: LatestSlot<Arc<PointSet>> = LatestSlot::new();
    let (shutdown, shutdown_rx) = Shutdown::new();
    let animation = tokio::spawn(run_server_driven(animator, slot.clone(), period, shutdown_rx));

    let result = stream_frames(stream, peer, &slot, &initial, point_size).await;

    shutdown.trigger();
    match animation.await {
        Ok(Ok(animator)) => debug!(%peer, t = animator.time(), "Session animator finished"),
        Ok(Err(e)) => warn!(%peer, error = %e, "Session animator failed"),
        Err(e) => error!(%peer, error = %e, "Session animator panicked"),
    }
    result
}

async fn stream_frames(
    stream: TcpStream,
    peer: SocketAddr,
    slot: &LatestSlot<Arc<PointSet>>,
    initial: &PointSet,
    point_size: f32,
) -> VisResult<SessionReport> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    let init = encode(&ServerMessage::initialize(initial, point_size))?;
    write.send(Message::Text(init)).await?;
    debug!(%peer, points = initial.len(), "Renderer initialized");

    let frames = slot.attach();
    let mut report = SessionReport::default();

    loop {
        tokio::select! {
            frame = frames.recv() => {
                let msg = encode(&ServerMessage::update_positions(&frame))?;
                if let Err(e) = write.send(Message::Text(msg)).await {
                    warn!(%peer, error = %e, "Failed to send frame");
                    break;
                }
                report.frames_sent += 1;
                trace!(%peer, frame = frame.frame, t = frame.t, "Frame sent");
            }
            msg = read.next() => {
                if !handle_incoming(msg, peer, &mut report) {
                    break;
                }
            }
        }
    }
    Ok(report)
}

async fn client_driven_session(stream: TcpStream, peer: SocketAddr, config: &AnimationConfig) -> VisResult<SessionReport> {
    let mut animator = ClientAnimator::new(config)?;
    let mut ws = tokio_tungstenite::accept_async(stream).await?;

    let mut slot: LatestSlot<Arc<SceneSetup>> = LatestSlot::new();
    let setups = slot.attach();
    if animator.emit(&mut slot)? != EmitOutcome::Emitted {
        warn!(%peer, "Scene setup was not handed over");
    }

    if let Some(setup) = setups.take() {
        send_setup(&mut ws, &setup).await?;
        debug!(%peer, points = setup.positions.len(), redraw_rate = setup.redraw_rate, "Scene sent");
    }

    let mut report = SessionReport::default();
    while handle_incoming(ws.next().await, peer, &mut report) {}
    Ok(report)
}

async fn send_setup(ws: &mut WebSocketStream<TcpStream>, setup: &SceneSetup) -> VisResult<()> {
    let msg = encode(&ServerMessage::ClientDriven(setup.clone()))?;
    ws.send(Message::Text(msg)).await?;
    Ok(())
}

/// Returns false once the peer is gone
fn handle_incoming(
    msg: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
    peer: SocketAddr,
    report: &mut SessionReport,
) -> bool {
    match msg {
        Some(Ok(Message::Text(text))) => {
            match decode_client(&text) {
                Ok(ClientMessage::Ack { frame }) => {
                    report.frames_acked += 1;
                    report.last_ack = Some(frame);
                    trace!(%peer, frame, "Ack");
                }
                Err(_) => report.rejected += 1,
            }
            true
        }
        Some(Ok(Message::Close(_))) | None => {
            debug!(%peer, "Peer closed");
            false
        }
        Some(Err(e)) => {
            warn!(%peer, error = %e, "WebSocket error");
            false
        }
        _ => true,
    }
}

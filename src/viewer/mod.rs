//! Browser viewer
//!
//! Drains buffered server messages into a `PointBuffer`, animates client-driven
//! scenes locally and paints the cloud with an orbit camera.

mod header;
mod scene;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use eframe::egui;
use tracing::{info, warn};

use crate::core::protocol::{decode_server, encode};
use crate::core::{ClientMessage, Mode};
use crate::renderer::{apply_message, Applied, FrameLoop, OrbitCamera, PointBuffer};
use crate::theme::{colors, viewer_visuals};
use crate::time::{now_millis, FpsCounter};
use crate::websocket_wasm::{MessageBuffer, WsClient};
use crate::ws_state::LinkState;
use crate::DEFAULT_WS_URL;

pub struct WaveViewer {
    buffer: PointBuffer,
    /// Set while a client-driven scene is loaded
    frame_loop: Option<FrameLoop>,
    mode: Option<Mode>,
    camera: OrbitCamera,
    paused: bool,
    link: Rc<RefCell<LinkState>>,
    msg_buffer: MessageBuffer,
    ws_client: Option<WsClient>,
    fps_counter: FpsCounter,
    last_frame: Option<u64>,
    /// Scratch list reused for depth sorting
    sprites: Vec<scene::Sprite>,
}

impl WaveViewer {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(viewer_visuals());

        let link = Rc::new(RefCell::new(LinkState::Connecting));
        let msg_buffer: MessageBuffer = Rc::new(RefCell::new(VecDeque::new()));

        let ws_client = match WsClient::connect(DEFAULT_WS_URL, msg_buffer.clone(), link.clone()) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(?e, "WebSocket connect failed");
                *link.borrow_mut() = LinkState::Error(format!("{e:?}"));
                None
            }
        };

        Self {
            buffer: PointBuffer::new(),
            frame_loop: None,
            mode: None,
            camera: OrbitCamera::default(),
            paused: false,
            link,
            msg_buffer,
            ws_client,
            fps_counter: FpsCounter::new(),
            last_frame: None,
            sprites: Vec::new(),
        }
    }

    /// Apply buffered messages, yielding after ~12ms to keep the frame rate
    fn process_messages(&mut self) {
        const BUDGET_MS: f64 = 12.0;
        let deadline = now_millis() + BUDGET_MS;

        loop {
            let Some(text) = self.msg_buffer.borrow_mut().pop_front() else {
                break;
            };
            match decode_server(&text).and_then(|msg| apply_message(&mut self.buffer, msg)) {
                Ok(Applied::Frame { frame, .. }) => {
                    self.last_frame = Some(frame);
                    self.ack(frame);
                }
                Ok(Applied::Initialized { points }) => {
                    info!(points, "Server-driven scene");
                    self.mode = Some(Mode::ServerDriven);
                    self.frame_loop = None;
                }
                Ok(Applied::ClientDriven(mut local)) => {
                    info!(points = self.buffer.len(), interval_ms = local.frame_interval_ms(), "Client-driven scene");
                    local.set_enabled(!self.paused);
                    self.mode = Some(Mode::ClientDriven);
                    self.frame_loop = Some(local);
                }
                Ok(Applied::Colors) => {}
                Err(e) => warn!(error = %e, "Rejected message"),
            }
            if now_millis() >= deadline {
                break;
            }
        }
    }

    fn ack(&self, frame: u64) {
        let Some(client) = &self.ws_client else { return };
        match encode(&ClientMessage::Ack { frame }) {
            Ok(text) => client.send(&text),
            Err(e) => warn!(error = %e, "Failed to encode ack"),
        }
    }

    fn advance_local(&mut self, now_ms: f64) {
        let Some(local) = self.frame_loop.as_mut() else { return };
        if let Err(e) = local.on_frame(now_ms, &mut self.buffer) {
            warn!(error = %e, "Local animation stopped");
            self.frame_loop = None;
        }
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if let Some(local) = self.frame_loop.as_mut() {
            local.set_enabled(!paused);
        }
    }

    fn link_state(&self) -> LinkState {
        self.link.borrow().clone()
    }
}

impl eframe::App for WaveViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        let now = now_millis();
        self.fps_counter.tick(now);
        self.process_messages();
        self.advance_local(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY))
            .show(ctx, |ui| {
                self.render_header(ui);
                ui.add_space(4.0);
                self.render_scene(ui);
            });
    }
}

//! Header bar with pause toggle and status

use eframe::egui;

use super::WaveViewer;
use crate::core::Mode;
use crate::theme::colors;
use crate::ws_state::LinkState;

impl WaveViewer {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        let link = self.link_state();

        ui.horizontal(|ui| {
            let local = self.mode == Some(Mode::ClientDriven);
            let pause_text = if self.paused { "Resume" } else { "Pause" };
            if ui.add_enabled(local, egui::Button::new(pause_text)).clicked() {
                self.set_paused(!self.paused);
            }

            // right-to-left order
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mode = self.mode.map(Mode::label).unwrap_or("waiting");
                ui.label(egui::RichText::new(mode).color(colors::TEXT_MUTED));
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));

                if let Some(frame) = self.last_frame {
                    ui.label(egui::RichText::new(format!("frame {frame}")).color(colors::TEXT_MUTED));
                    ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                } else if let Some(local) = &self.frame_loop {
                    ui.label(egui::RichText::new(format!("t {:.2}", local.time())).color(colors::TEXT_MUTED));
                    ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                }

                ui.label(egui::RichText::new(format!("{} points", self.buffer.len())).color(colors::TEXT_MUTED));
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));

                ui.label(
                    egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps())).color(colors::TEXT_SECONDARY),
                );

                ui.add_space(10.0);

                let status_color = match &link {
                    LinkState::Connected => colors::STATUS_OK,
                    LinkState::Connecting => colors::STATUS_PENDING,
                    LinkState::Disconnected | LinkState::Error(_) => colors::STATUS_BAD,
                };
                ui.colored_label(status_color, link.label());
            });
        });
    }
}

//! Point painting and camera input

use eframe::egui;

use super::WaveViewer;
use crate::theme::{colors, point_color};

pub(crate) struct Sprite {
    depth: f32,
    center: egui::Pos2,
    radius: f32,
    color: egui::Color32,
}

impl WaveViewer {
    pub(crate) fn render_scene(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());

        if response.dragged() {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x, delta.y);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                // wheel up moves the camera closer
                self.camera.zoom(-scroll);
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, colors::BG_PRIMARY);

        if !self.buffer.is_initialized() || rect.height() <= 0.0 {
            return;
        }

        let aspect = rect.width() / rect.height();
        let center = rect.center();
        let half = rect.size() * 0.5;
        let size = self.buffer.point_size();

        self.sprites.clear();
        for (p, c) in self.buffer.positions().iter().zip(self.buffer.colors()) {
            let Some(proj) = self.camera.project(*p, aspect) else { continue };
            self.sprites.push(Sprite {
                depth: proj.depth,
                center: egui::pos2(center.x + proj.x * half.x, center.y - proj.y * half.y),
                radius: (self.camera.point_pixels(size, proj.depth, rect.height()) * 0.5).max(0.5),
                color: point_color(*c),
            });
        }

        // far to near
        self.sprites.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        for s in &self.sprites {
            if rect.expand(s.radius).contains(s.center) {
                painter.circle_filled(s.center, s.radius, s.color);
            }
        }
    }
}

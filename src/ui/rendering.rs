//! Painting the board: grid frame, wires, components and the scale-bar overlay.

use super::state::BoardApp;
use crate::component::Component;
use crate::constants::{CONTACT_RADIUS, SCALE_BAR_MARGIN};
use crate::surface::{Color, DrawSurface, LineStyle, Segment, TextBounds, TextStyle};
use eframe::egui;
use eframe::epaint::StrokeKind;
use std::sync::PoisonError;

/// Converts a packed ARGB color to egui's representation.
pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), color.a())
}

/// A [`DrawSurface`] painting straight onto an egui painter, offset by `origin`.
pub struct PainterCanvas<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl<'a> PainterCanvas<'a> {
    /// Draws with `origin` as the canvas' `(0, 0)`.
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self { painter, origin }
    }

    fn at(&self, x: f32, y: f32) -> egui::Pos2 {
        self.origin + egui::vec2(x, y)
    }
}

impl DrawSurface for PainterCanvas<'_> {
    fn clear(&mut self, color: Color) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, to_color32(color));
    }

    fn draw_lines(&mut self, segments: &[Segment], style: &LineStyle) {
        let stroke = egui::Stroke::new(style.thickness, to_color32(style.color));
        for segment in segments {
            self.painter.line_segment(
                [
                    self.at(segment.x0, segment.y0),
                    self.at(segment.x1, segment.y1),
                ],
                stroke,
            );
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.painter.text(
            self.at(x, y),
            egui::Align2::LEFT_BOTTOM,
            text,
            egui::FontId::proportional(style.size),
            to_color32(style.color),
        );
    }

    fn text_bounds(&self, text: &str, style: &TextStyle) -> TextBounds {
        let galley = self.painter.layout_no_wrap(
            text.to_owned(),
            egui::FontId::proportional(style.size),
            to_color32(style.color),
        );
        let size = galley.size();
        TextBounds {
            left: 0.0,
            top: -size.y,
            width: size.x,
            height: size.y,
        }
    }
}

impl BoardApp {
    /// Paints everything in layers: grid, wires, components, scale-bar.
    pub fn render_board(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let painter = painter.with_clip_rect(canvas_rect);
        let mut canvas = PainterCanvas::new(&painter, canvas_rect.min);

        match self
            .frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(frame) => frame.replay(&mut canvas),
            None => canvas.clear(self.settings.grid.background),
        }

        for component in self.board.circuit().components() {
            if component.is_wire() {
                self.draw_wire(&painter, component);
            } else {
                self.draw_component(&painter, component);
            }
        }

        if self.settings.show_scale_bar {
            self.draw_scale_bar(&painter, canvas_rect);
        }
    }

    fn draw_wire(&self, painter: &egui::Painter, wire: &Component) {
        let ends: Vec<egui::Pos2> = wire
            .contacts()
            .iter()
            .filter_map(|end| end.link())
            .filter_map(|peer| self.board.contact_screen_position(peer))
            .map(|point| self.to_screen(point))
            .collect();
        if let &[start, end] = ends.as_slice() {
            let selected = self.interaction.selected == Some(wire.id);
            let color = if selected {
                egui::Color32::from_rgb(255, 165, 0)
            } else {
                egui::Color32::from_rgb(40, 90, 200)
            };
            painter.line_segment([start, end], egui::Stroke::new(2.5, color));
        }
    }

    fn draw_component(&self, painter: &egui::Painter, component: &Component) {
        let Some((left, top, right, bottom)) = self.board.component_screen_rect(component.id)
        else {
            return;
        };
        let rect = egui::Rect::from_min_max(
            self.to_screen((left, top)),
            self.to_screen((right, bottom)),
        );

        painter.rect_filled(rect, 2.0, egui::Color32::from_rgb(235, 235, 210));
        let (stroke_color, stroke_width) = if self.interaction.selected == Some(component.id) {
            (egui::Color32::from_rgb(255, 165, 0), 2.5)
        } else {
            (egui::Color32::BLACK, 1.0)
        };
        painter.rect_stroke(
            rect,
            2.0,
            egui::Stroke::new(stroke_width, stroke_color),
            StrokeKind::Outside,
        );

        // Scale the label with the part, but keep it legible
        let font_size = (rect.height() * 0.5).clamp(8.0, 24.0);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            component.name(),
            egui::FontId::proportional(font_size),
            egui::Color32::DARK_GRAY,
        );

        if !self.settings.show_contacts {
            return;
        }
        for contact in component.contacts() {
            let Some(point) = self.board.contact_screen_position(contact.uuid()) else {
                continue;
            };
            let color = if self.interaction.pending_contact == Some(contact.uuid()) {
                egui::Color32::YELLOW
            } else if contact.is_linked() {
                egui::Color32::from_rgb(40, 90, 200)
            } else {
                egui::Color32::from_rgb(180, 40, 40)
            };
            painter.circle_filled(self.to_screen(point), CONTACT_RADIUS, color);
        }
    }

    fn draw_scale_bar(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let Some(scale_bar) = self.board.scale_bar() else {
            return;
        };
        let scale_bar = scale_bar.lock().unwrap_or_else(PoisonError::into_inner);

        let probe = PainterCanvas::new(painter, canvas_rect.min);
        let (width, height) = scale_bar.measure(&probe);
        let origin = egui::pos2(
            canvas_rect.min.x + SCALE_BAR_MARGIN,
            canvas_rect.max.y - SCALE_BAR_MARGIN - height,
        );
        let mut canvas = PainterCanvas::new(painter, origin);
        scale_bar.draw(&mut canvas, width, height);
    }
}

//! Canvas interaction: surface lifecycle, panning, zooming, component dragging
//! and click-to-connect.
//!
//! Positions handed to the board are relative to the canvas' top-left corner,
//! which is where the grid surface starts.

use super::state::{BoardApp, EguiSurface};
use crate::component::ComponentId;
use crate::connector::ContactId;
use crate::constants::{CONTACT_HIT_RADIUS, SCROLL_ZOOM_SPEED};
use crate::grid::{PointerEvent, PointerId};
use eframe::egui;

/// Pointer id used for the mouse and emulated single touches.
const PRIMARY_POINTER: PointerId = 0;

impl BoardApp {
    /// Converts a screen position to canvas-local coordinates.
    pub fn to_local(&self, screen_pos: egui::Pos2) -> (f32, f32) {
        let local = screen_pos - self.canvas_origin;
        (local.x, local.y)
    }

    /// Converts canvas-local coordinates to a screen position.
    pub fn to_screen(&self, (x, y): (f32, f32)) -> egui::Pos2 {
        self.canvas_origin + egui::vec2(x, y)
    }

    /// Attaches the grid surface on the first frame and reports size changes after.
    pub fn sync_surface(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        self.canvas_origin = rect.min;
        let size = rect.size();
        match self.surface_size {
            None => {
                let surface = EguiSurface::new(size, self.frame.clone(), ctx.clone());
                match self.board.engine_mut().surface_created(surface) {
                    Ok(()) => self.surface_size = Some(size),
                    Err(err) => log::error!("could not attach grid surface: {}", err),
                }
            }
            Some(current) if current != size => {
                self.board.engine_mut().surface_changed(size.x, size.y);
                self.surface_size = Some(size);
            }
            Some(_) => {}
        }
    }

    /// Feeds pinch and scroll zoom to the engine.
    pub fn handle_canvas_zoom(&mut self, ui: &egui::Ui) {
        let (pinch, scroll) = ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta.y));
        if pinch != 1.0 {
            self.board.engine_mut().handle_pinch(pinch);
        } else if scroll != 0.0 {
            self.board
                .engine_mut()
                .handle_pinch((scroll * SCROLL_ZOOM_SPEED).exp());
        }
    }

    /// Drags either move the component under the pointer or pan the board.
    pub fn handle_canvas_drag(&mut self, response: &egui::Response) {
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = self.to_local(pos);
                match self.board.component_at(local) {
                    Some(id) => {
                        self.interaction.dragging = Some(id);
                        self.interaction.selected = Some(id);
                    }
                    None => {
                        self.interaction.panning = true;
                        self.board.engine_mut().handle_pointer(PointerEvent::Down {
                            id: PRIMARY_POINTER,
                            x: local.0,
                            y: local.1,
                        });
                    }
                }
            }
        }

        if response.dragged() {
            if let Some(id) = self.interaction.dragging {
                let delta = response.drag_delta();
                self.move_component_by_pixels(id, delta);
            } else if self.interaction.panning {
                if let Some(pos) = response.interact_pointer_pos() {
                    let (x, y) = self.to_local(pos);
                    self.board.engine_mut().handle_pointer(PointerEvent::Move {
                        id: PRIMARY_POINTER,
                        x,
                        y,
                    });
                }
            }
        }

        if response.drag_stopped() {
            if self.interaction.panning {
                self.board
                    .engine_mut()
                    .handle_pointer(PointerEvent::Up { id: PRIMARY_POINTER });
            }
            self.interaction.panning = false;
            self.interaction.dragging = None;
        }
    }

    /// Moves a component by a screen-space delta.
    pub fn move_component_by_pixels(&mut self, id: ComponentId, delta: egui::Vec2) {
        let (scale_x, scale_y) = self.board.engine().density().px_per_mm();
        let multiplier = self.board.engine().multiplier();
        if let Some(component) = self.board.circuit_mut().component_mut(id) {
            component.position.0 += delta.x / (scale_x * multiplier);
            component.position.1 += delta.y / (scale_y * multiplier);
        }
    }

    /// Placed contact within the hit radius of a canvas-local point.
    pub fn contact_at(&self, (x, y): (f32, f32)) -> Option<ContactId> {
        self.board
            .circuit()
            .components()
            .iter()
            .flat_map(|c| c.contacts())
            .filter_map(|contact| {
                let (cx, cy) = self.board.contact_screen_position(contact.uuid())?;
                let distance = ((cx - x).powi(2) + (cy - y).powi(2)).sqrt();
                (distance <= CONTACT_HIT_RADIUS).then_some((contact.uuid(), distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Primary click at a canvas-local point.
    ///
    /// Clicking two contacts in a row connects them. Clicking elsewhere selects
    /// the component under the pointer, or clears the selection.
    pub fn handle_click(&mut self, local: (f32, f32)) {
        let Some(contact) = self.contact_at(local) else {
            self.interaction.pending_contact = None;
            self.interaction.selected = self.board.component_at(local);
            return;
        };

        match self.interaction.pending_contact.take() {
            None => {
                self.interaction.pending_contact = Some(contact);
                self.interaction.status = Some("Pick a second contact".into());
            }
            Some(first) if first == contact => {
                self.interaction.status = None;
            }
            Some(first) => match self.board.connect(first, contact) {
                Ok(()) => {
                    self.interaction.status = Some("Connected".into());
                }
                Err(err) => {
                    log::info!("connect refused: {}", err);
                    self.interaction.status = Some(err.to_string());
                }
            },
        }
    }

    /// Secondary click at a canvas-local point: unlinks the contact under it.
    pub fn handle_secondary_click(&mut self, local: (f32, f32)) {
        if let Some(contact) = self.contact_at(local) {
            if self.board.disconnect(contact) {
                self.interaction.status = Some("Disconnected".into());
            }
        }
    }

    /// Allocates the canvas, wires its input to the board and paints it.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        self.sync_surface(ui.ctx(), rect);
        self.handle_canvas_zoom(ui);
        self.handle_canvas_drag(&response);

        if let Some(pos) = response.interact_pointer_pos() {
            if response.clicked() {
                self.handle_click(self.to_local(pos));
            } else if response.secondary_clicked() {
                self.handle_secondary_click(self.to_local(pos));
            }
        }

        self.render_board(&painter, rect);
    }
}

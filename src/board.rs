//! The board: a grid engine, the circuit placed on it and an optional scale-bar.

use crate::circuit::{Circuit, ContactAddress};
use crate::component::{Component, ComponentId};
use crate::connector::ContactId;
use crate::error::ConnectError;
use crate::grid::GridEngine;
use crate::scale_bar::ScaleBar;
use std::sync::{Arc, Mutex};

/// Screen rectangle as `(left, top, right, bottom)` in pixels.
pub type ScreenRect = (f32, f32, f32, f32);

/// Components on a pannable, zoomable grid.
#[derive(Default)]
pub struct Board {
    engine: GridEngine,
    circuit: Circuit,
    scale_bar: Option<Arc<Mutex<ScaleBar>>>,
}

impl Board {
    /// Creates an empty board driven by `engine`.
    pub fn new(engine: GridEngine) -> Self {
        Self {
            engine,
            circuit: Circuit::new(),
            scale_bar: None,
        }
    }

    /// Attaches a scale-bar that follows the grid after every render pass.
    pub fn with_scale_bar(mut self, scale_bar: Arc<Mutex<ScaleBar>>) -> Self {
        self.attach_scale_bar(scale_bar);
        self
    }

    /// Attaches or replaces the scale-bar.
    pub fn attach_scale_bar(&mut self, scale_bar: Arc<Mutex<ScaleBar>>) {
        self.engine.attach_scale_bar(scale_bar.clone());
        self.scale_bar = Some(scale_bar);
    }

    /// The attached scale-bar.
    pub fn scale_bar(&self) -> Option<&Arc<Mutex<ScaleBar>>> {
        self.scale_bar.as_ref()
    }

    /// The grid engine.
    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    /// The grid engine, for lifecycle and gesture calls.
    pub fn engine_mut(&mut self) -> &mut GridEngine {
        &mut self.engine
    }

    /// The component collection.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// The component collection, for placement edits.
    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    // === Circuit shortcuts ===

    /// Adds a component to the board.
    pub fn add_component(&mut self, component: Component) -> Result<ComponentId, ConnectError> {
        self.circuit.add_component(component)
    }

    /// Removes a component, unlinking it first.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Component> {
        self.circuit.remove_component(id)
    }

    /// Links two contacts.
    pub fn connect(&mut self, a: ContactId, b: ContactId) -> Result<(), ConnectError> {
        self.circuit.connect(a, b)
    }

    /// Unlinks a contact from its peer.
    pub fn disconnect(&mut self, contact: ContactId) -> bool {
        self.circuit.disconnect(contact)
    }

    /// Every link once.
    pub fn links(&self) -> Vec<(ContactAddress, ContactAddress)> {
        self.circuit.links()
    }

    // === Placement ===

    /// Maps a board point in millimeters to surface pixels.
    pub fn mm_to_screen(&self, (x, y): (f32, f32)) -> (f32, f32) {
        let (origin_x, origin_y) = self.engine.origin();
        let (scale_x, scale_y) = self.engine.density().px_per_mm();
        let multiplier = self.engine.multiplier();
        (
            origin_x + x * scale_x * multiplier,
            origin_y + y * scale_y * multiplier,
        )
    }

    /// Maps a surface pixel back to a board point in millimeters.
    pub fn screen_to_mm(&self, (x, y): (f32, f32)) -> (f32, f32) {
        let (origin_x, origin_y) = self.engine.origin();
        let (scale_x, scale_y) = self.engine.density().px_per_mm();
        let multiplier = self.engine.multiplier();
        (
            (x - origin_x) / (scale_x * multiplier),
            (y - origin_y) / (scale_y * multiplier),
        )
    }

    /// Where a component's footprint lands on screen.
    pub fn component_screen_rect(&self, id: ComponentId) -> Option<ScreenRect> {
        let (left, top, right, bottom) = self.circuit.component(id)?.bounds_mm();
        let (left, top) = self.mm_to_screen((left, top));
        let (right, bottom) = self.mm_to_screen((right, bottom));
        Some((left, top, right, bottom))
    }

    /// Where a wire's span lands on screen, once both ends are linked.
    pub fn wire_screen_rect(&self, wire: ComponentId) -> Option<ScreenRect> {
        let (left, top, right, bottom) = self.circuit.wire_bounds(wire)?;
        let (left, top) = self.mm_to_screen((left, top));
        let (right, bottom) = self.mm_to_screen((right, bottom));
        Some((left, top, right, bottom))
    }

    /// Screen position of a placed contact.
    pub fn contact_screen_position(&self, contact: ContactId) -> Option<(f32, f32)> {
        self.circuit
            .absolute_position(contact)
            .map(|point| self.mm_to_screen(point))
    }

    /// Topmost non-wire component under a surface pixel.
    pub fn component_at(&self, point: (f32, f32)) -> Option<ComponentId> {
        let (x, y) = self.screen_to_mm(point);
        self.circuit
            .components()
            .iter()
            .rev()
            .filter(|c| !c.is_wire())
            .find(|c| {
                let (left, top, right, bottom) = c.bounds_mm();
                (left..=right).contains(&x) && (top..=bottom).contains(&y)
            })
            .map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use crate::units::Density;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    /// 10 px per millimeter on a 400x300 surface, origin at (200, 150).
    fn board() -> Board {
        let engine = GridEngine::new(GridConfig::default(), &Density::uniform(254.0)).unwrap();
        let mut board = Board::new(engine);
        board.engine_mut().surface_changed(400.0, 300.0);
        board
    }

    #[test]
    fn test_component_follows_pan_and_zoom() {
        let mut board = board();
        let id = board
            .add_component(Component::passthrough("p").at((10.0, 20.0)))
            .unwrap();

        let (l, t, r, b) = board.component_screen_rect(id).unwrap();
        assert!(close((l, t), (300.0, 350.0)));
        assert!(close((r, b), (380.0, 370.0)));

        board.engine().pan_by(-50.0, 5.0);
        board.engine().set_multiplier(2.0);
        let (l, t, r, b) = board.component_screen_rect(id).unwrap();
        assert!(close((l, t), (350.0, 555.0)));
        assert!(close((r, b), (510.0, 595.0)));
    }

    #[test]
    fn test_screen_and_mm_round_trip() {
        let board = board();
        board.engine().set_multiplier(3.0);
        let point = (12.5, -4.0);
        assert!(close(board.screen_to_mm(board.mm_to_screen(point)), point));
    }

    #[test]
    fn test_component_at_prefers_topmost() {
        let mut board = board();
        let below = board
            .add_component(Component::passthrough("below").at((0.0, 0.0)))
            .unwrap();
        let above = board
            .add_component(Component::passthrough("above").at((4.0, 0.0)))
            .unwrap();

        assert_eq!(board.component_at(board.mm_to_screen((6.0, 1.0))), Some(above));
        assert_eq!(board.component_at(board.mm_to_screen((1.0, 1.0))), Some(below));
        assert_eq!(board.component_at(board.mm_to_screen((30.0, 30.0))), None);
    }

    #[test]
    fn test_wire_screen_rect_needs_both_ends() {
        let mut board = board();
        let a = board
            .add_component(Component::passthrough("a").at((0.0, 0.0)))
            .unwrap();
        let wire = board.add_component(Component::wire("w")).unwrap();
        let out = board.circuit().component(a).unwrap().contact(2).unwrap().uuid();
        let start = board.circuit().component(wire).unwrap().contacts()[0].uuid();

        board.connect(out, start).unwrap();
        assert_eq!(board.wire_screen_rect(wire), None);
        assert!(board.contact_screen_position(start).is_none());
        let pos = board.contact_screen_position(out).unwrap();
        assert!(close(pos, (275.0, 155.0)));
    }

    #[test]
    fn test_scale_bar_reserves_max_showing_width() {
        let bar = Arc::new(Mutex::new(ScaleBar::default()));
        let board = board().with_scale_bar(bar.clone());
        assert!(board.scale_bar().is_some());
        // 20 mm at 10 px/mm
        let reserved = bar.lock().unwrap().max_interval_pixel();
        assert!((reserved - 200.0).abs() < 1e-3);
    }
}

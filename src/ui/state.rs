//! Application state for the board host.
//!
//! The render worker draws the grid into a [`DrawList`] and hands it over through
//! a shared [`FrameSlot`]; the UI thread paints whatever frame is latest. Change
//! notifications arrive through an `mpsc` channel and are drained once per frame.

use crate::board::Board;
use crate::component::{Component, ComponentId};
use crate::connector::ContactId;
use crate::error::ConnectError;
use crate::grid::{GridConfig, GridEngine, ViewportSnapshot};
use crate::scale_bar::{ScaleBar, ScaleBarStyle};
use crate::surface::{DrawList, Surface};
use crate::units::Density;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex, PoisonError};

/// Latest frame presented by the render worker.
pub type FrameSlot = Arc<Mutex<Option<DrawList>>>;

/// Surface that parks presented frames in a [`FrameSlot`] and asks egui to repaint.
pub struct EguiSurface {
    width: f32,
    height: f32,
    slot: FrameSlot,
    ctx: egui::Context,
}

impl EguiSurface {
    /// Creates a surface of the given size.
    pub fn new(size: egui::Vec2, slot: FrameSlot, ctx: egui::Context) -> Self {
        Self {
            width: size.x,
            height: size.y,
            slot,
            ctx,
        }
    }
}

impl Surface for EguiSurface {
    type Canvas = DrawList;

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn lock_for_drawing(&mut self) -> Option<DrawList> {
        Some(DrawList::new())
    }

    fn present(&mut self, canvas: DrawList) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(canvas);
        self.ctx.request_repaint();
    }
}

/// Settings persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    /// Grid engine options
    pub grid: GridConfig,
    /// Scale-bar look
    pub scale_bar: ScaleBarStyle,
    /// Whether the scale-bar overlay is shown
    pub show_scale_bar: bool,
    /// Whether contact dots are drawn
    pub show_contacts: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            scale_bar: ScaleBarStyle::default(),
            show_scale_bar: true,
            show_contacts: true,
        }
    }
}

impl BoardSettings {
    /// Serializes the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reads settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Transient pointer and selection state.
#[derive(Debug, Default)]
pub struct InteractionState {
    /// Component last clicked
    pub selected: Option<ComponentId>,
    /// Component being dragged, if the drag started on one
    pub dragging: Option<ComponentId>,
    /// Whether the current drag pans the board
    pub panning: bool,
    /// First contact of a connect gesture
    pub pending_contact: Option<ContactId>,
    /// Last message shown in the toolbar
    pub status: Option<String>,
}

/// The demo host: a board, its settings and the plumbing to the render worker.
pub struct BoardApp {
    /// Grid, circuit and scale-bar
    pub board: Board,
    /// Persisted options
    pub settings: BoardSettings,
    /// Pointer and selection state
    pub interaction: InteractionState,
    /// Frame handed over by the render worker
    pub frame: FrameSlot,
    /// Viewport changes reported by the render worker
    pub changes: Receiver<ViewportSnapshot>,
    /// Most recent viewport change
    pub last_change: Option<ViewportSnapshot>,
    /// Size of the attached surface, `None` before the first frame
    pub surface_size: Option<egui::Vec2>,
    /// Screen position of the surface's top-left corner
    pub canvas_origin: egui::Pos2,
}

impl Default for BoardApp {
    fn default() -> Self {
        Self::new(BoardSettings::default())
    }
}

impl BoardApp {
    /// Builds the host from settings and seeds a small demo circuit.
    pub fn new(settings: BoardSettings) -> Self {
        let density = Density::default();
        let engine = match GridEngine::new(settings.grid.clone(), &density) {
            Ok(engine) => engine,
            Err(err) => {
                log::warn!("stored grid settings rejected, using defaults: {}", err);
                GridEngine::default()
            }
        };
        let settings = BoardSettings {
            grid: engine.config(),
            ..settings
        };

        let (sender, changes) = channel();
        let sender = Mutex::new(sender);
        engine.on_change(move |snapshot| {
            let _ = sender
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .send(snapshot);
        });

        let scale_bar = Arc::new(Mutex::new(ScaleBar::new(settings.scale_bar)));
        let mut board = Board::new(engine).with_scale_bar(scale_bar);
        if let Err(err) = seed_demo_circuit(&mut board) {
            log::warn!("demo circuit incomplete: {}", err);
        }

        Self {
            board,
            settings,
            interaction: InteractionState::default(),
            frame: Arc::new(Mutex::new(None)),
            changes,
            last_change: None,
            surface_size: None,
            canvas_origin: egui::Pos2::ZERO,
        }
    }

    /// Restores persisted settings, if any.
    pub fn from_storage(storage: Option<&dyn eframe::Storage>) -> Self {
        let settings = storage
            .and_then(|s| s.get_string(crate::constants::SETTINGS_KEY))
            .and_then(|json| match BoardSettings::from_json(&json) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    log::warn!("ignoring stored settings: {}", err);
                    None
                }
            })
            .unwrap_or_default();
        Self::new(settings)
    }

    /// Takes every pending change notification, keeping the latest.
    pub fn drain_changes(&mut self) -> usize {
        let mut count = 0;
        while let Ok(snapshot) = self.changes.try_recv() {
            self.last_change = Some(snapshot);
            count += 1;
        }
        count
    }
}

/// Two passthroughs joined by a wire.
fn seed_demo_circuit(board: &mut Board) -> Result<(), ConnectError> {
    let left = board.add_component(Component::passthrough("left").at((-20.0, -5.0)))?;
    let right = board.add_component(Component::passthrough("right").at((12.0, 3.0)))?;
    let wire = board.add_component(Component::wire("link"))?;

    let circuit = board.circuit();
    let pin = |component: ComponentId, index: usize| {
        circuit
            .component(component)
            .and_then(|c| c.contacts().get(index))
            .map(|c| c.uuid())
    };
    let pins = (pin(left, 1), pin(wire, 0), pin(wire, 1), pin(right, 0));
    let (Some(out), Some(start), Some(end), Some(input)) = pins else {
        return Ok(());
    };
    board.connect(out, start)?;
    board.connect(end, input)
}

//! The grid engine: surface lifecycle, gesture handling and the render worker.
//!
//! The engine is `Inactive` until the host reports a surface. While `Active`, a
//! dedicated worker thread owns the surface and sleeps on a condition variable.
//! Gestures write pan/zoom into atomics and raise a dirty flag; the worker wakes,
//! compares what it would draw against the last frame and renders at most once per
//! coalesced change. After each pass the attached scale-bar and the change listener
//! are notified on the worker, in pass order.

use super::config::GridConfig;
use super::input::{PointerEvent, PointerTracker};
use super::render::GridFrame;
use super::viewport::{Viewport, ViewportSnapshot};
use crate::error::ConfigError;
use crate::interval::{ActiveIntervals, IntervalPriority, IntervalSet, IntervalStrategy};
use crate::scale_bar::ScaleBar;
use crate::surface::Surface;
use crate::units::{mm_to_pixels, Density, DensityProvider};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
    Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::thread::{self, JoinHandle};

/// Callback fired once per completed render pass with the viewport it drew.
pub type ChangeListener = Arc<dyn Fn(ViewportSnapshot) + Send + Sync>;

/// Read access to the grid state an external scale readout needs.
pub trait GridSource {
    /// Active interval in millimeters at `priority`, falling back to the other tier, else `0.0`.
    fn interval_mm(&self, priority: IntervalPriority) -> f32;
    /// Zoom factor.
    fn multiplier(&self) -> f32;
    /// Display density used for millimeter conversion.
    fn density(&self) -> Density;
}

/// The grid state produced by one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridReading {
    /// Tiers drawn by the pass
    pub active: ActiveIntervals,
    /// Multiplier the pass used
    pub multiplier: f32,
    /// Density the pass used
    pub density: Density,
}

impl GridSource for GridReading {
    fn interval_mm(&self, priority: IntervalPriority) -> f32 {
        self.active.interval_mm(priority)
    }

    fn multiplier(&self) -> f32 {
        self.multiplier
    }

    fn density(&self) -> Density {
        self.density
    }
}

/// Lifecycle of the engine's drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No surface; nothing renders
    Inactive,
    /// A surface is attached and the render worker is running
    Active,
}

#[derive(Debug)]
struct Signal {
    dirty: bool,
    running: bool,
}

/// What a pass depends on. Equal keys produce identical frames.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RenderKey {
    view: ViewportSnapshot,
    size: (f32, f32),
    revision: u64,
}

struct Shared {
    viewport: Viewport,
    config: RwLock<GridConfig>,
    revision: AtomicU64,
    density: RwLock<Density>,
    active: Mutex<ActiveIntervals>,
    signal: Mutex<Signal>,
    wake: Condvar,
    listener: RwLock<Option<ChangeListener>>,
    scale_bar: RwLock<Option<Arc<Mutex<ScaleBar>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn request_render(&self) {
        let mut signal = lock(&self.signal);
        signal.dirty = true;
        self.wake.notify_one();
    }

    /// Blocks until there is something to draw. Returns `false` once the worker must stop.
    fn wait_for_work(&self) -> bool {
        let mut signal = lock(&self.signal);
        while signal.running && !signal.dirty {
            signal = self
                .wake
                .wait(signal)
                .unwrap_or_else(PoisonError::into_inner);
        }
        signal.dirty = false;
        signal.running
    }

    fn render_key(&self) -> RenderKey {
        RenderKey {
            view: self.viewport.snapshot(),
            size: self.viewport.size(),
            revision: self.revision.load(Ordering::Acquire),
        }
    }

    fn render_pass<S: Surface>(&self, surface: &mut S, key: RenderKey) -> bool {
        let Some(mut canvas) = surface.lock_for_drawing() else {
            log::debug!("surface refused a canvas, skipping render pass");
            return false;
        };
        let density = *read(&self.density);
        let active = {
            let config = read(&self.config);
            GridFrame::new(&config, density, key.size, key.view).draw(&mut canvas)
        };
        *lock(&self.active) = active;
        surface.present(canvas);

        let reading = GridReading {
            active,
            multiplier: key.view.multiplier,
            density,
        };
        let scale_bar = read(&self.scale_bar).clone();
        if let Some(scale_bar) = scale_bar {
            lock(&scale_bar).update(&reading);
        }
        let listener = read(&self.listener).clone();
        if let Some(listener) = listener {
            listener(key.view);
        }
        true
    }

    fn max_interval_pixel(&self) -> f32 {
        let max_mm = read(&self.config).max_showing_interval_mm;
        mm_to_pixels(max_mm, read(&self.density).x_dpi)
    }

    fn sync_scale_bar(&self) {
        let scale_bar = read(&self.scale_bar).clone();
        if let Some(scale_bar) = scale_bar {
            lock(&scale_bar).set_max_interval_pixel(self.max_interval_pixel());
        }
    }
}

fn run_worker<S: Surface>(shared: Arc<Shared>, mut surface: S) {
    let mut last: Option<RenderKey> = None;
    while shared.wait_for_work() {
        let key = shared.render_key();
        if last == Some(key) {
            continue;
        }
        if shared.render_pass(&mut surface, key) {
            last = Some(key);
        }
    }
    log::debug!("render worker stopped");
}

/// Pannable, zoomable grid backed by a render worker.
pub struct GridEngine {
    shared: Arc<Shared>,
    tracker: PointerTracker,
    worker: Option<JoinHandle<()>>,
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::with_config(GridConfig::default(), Density::default())
    }
}

impl GridEngine {
    /// Creates an inactive engine after validating `config`.
    pub fn new(config: GridConfig, density: &impl DensityProvider) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config, density.density()))
    }

    fn with_config(config: GridConfig, density: Density) -> Self {
        Self {
            shared: Arc::new(Shared {
                viewport: Viewport::default(),
                config: RwLock::new(config),
                revision: AtomicU64::new(0),
                density: RwLock::new(density),
                active: Mutex::new(ActiveIntervals::default()),
                signal: Mutex::new(Signal {
                    dirty: false,
                    running: false,
                }),
                wake: Condvar::new(),
                listener: RwLock::new(None),
                scale_bar: RwLock::new(None),
            }),
            tracker: PointerTracker::new(),
            worker: None,
        }
    }

    // === Surface lifecycle ===

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        if self.worker.is_some() {
            EngineState::Active
        } else {
            EngineState::Inactive
        }
    }

    /// Whether a surface is attached.
    pub fn is_active(&self) -> bool {
        self.state() == EngineState::Active
    }

    /// Attaches `surface` and starts the render worker. The first frame renders
    /// immediately. An already attached surface is torn down first.
    pub fn surface_created<S: Surface>(&mut self, surface: S) -> std::io::Result<()> {
        if self.is_active() {
            log::warn!("surface created while another is active, replacing it");
            self.surface_destroyed();
        }
        self.shared.viewport.resize(surface.width(), surface.height());
        {
            let mut signal = lock(&self.shared.signal);
            signal.running = true;
            signal.dirty = true;
        }

        let shared = self.shared.clone();
        let spawned = thread::Builder::new()
            .name("grid-render".into())
            .spawn(move || run_worker(shared, surface));
        match spawned {
            Ok(worker) => {
                let (width, height) = self.shared.viewport.size();
                log::info!("grid surface active at {}x{}", width, height);
                self.worker = Some(worker);
                Ok(())
            }
            Err(err) => {
                lock(&self.shared.signal).running = false;
                log::error!("failed to start render worker: {}", err);
                Err(err)
            }
        }
    }

    /// Records a new surface size and schedules a render pass.
    pub fn surface_changed(&mut self, width: f32, height: f32) {
        self.shared.viewport.resize(width, height);
        self.shared.request_render();
    }

    /// Stops the render worker, waits for it to release the surface and resets the
    /// viewport. Does nothing while inactive.
    pub fn surface_destroyed(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        {
            let mut signal = lock(&self.shared.signal);
            signal.running = false;
            self.shared.wake.notify_all();
        }
        if worker.join().is_err() {
            log::error!("render worker panicked");
        }
        self.tracker = PointerTracker::new();
        self.shared.viewport.reset();
        *lock(&self.shared.active) = ActiveIntervals::default();
        log::info!("grid surface released");
    }

    // === Gestures ===

    /// Feeds a pointer event; a drag of the tracked pointer pans the board.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some((dx, dy)) = self.tracker.handle(event) {
            self.pan_by(dx, dy);
        }
    }

    /// Feeds an incremental pinch scale factor.
    pub fn handle_pinch(&mut self, scale_factor: f32) {
        self.zoom_by(scale_factor);
    }

    /// Pans by a pixel delta, independent of the zoom level.
    pub fn pan_by(&self, dx: f32, dy: f32) {
        self.shared.viewport.pan_by(dx, dy);
        self.shared.request_render();
    }

    /// Multiplies the zoom by `factor` and clamps it to the configured range.
    pub fn zoom_by(&self, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            log::debug!("ignoring pinch scale factor {}", factor);
            return;
        }
        let config = read(&self.shared.config);
        self.shared
            .viewport
            .update_multiplier(|m| config.clamp_multiplier(m * factor));
        drop(config);
        self.shared.request_render();
    }

    // === Viewport access ===

    /// Current zoom factor.
    pub fn multiplier(&self) -> f32 {
        self.shared.viewport.multiplier()
    }

    /// Sets the zoom factor, clamped to the configured range.
    pub fn set_multiplier(&self, multiplier: f32) {
        if multiplier.is_nan() {
            return;
        }
        let clamped = read(&self.shared.config).clamp_multiplier(multiplier);
        self.shared.viewport.update_multiplier(|_| clamped);
        self.shared.request_render();
    }

    /// Current pan offset in pixels from the surface center.
    pub fn offset(&self) -> (f32, f32) {
        self.shared.viewport.offset()
    }

    /// Replaces the pan offset.
    pub fn set_offset(&self, x: f32, y: f32) {
        self.shared.viewport.set_offset(x, y);
        self.shared.request_render();
    }

    /// Pan and zoom as one value.
    pub fn snapshot(&self) -> ViewportSnapshot {
        self.shared.viewport.snapshot()
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (f32, f32) {
        self.shared.viewport.size()
    }

    /// Screen position of the board origin.
    pub fn origin(&self) -> (f32, f32) {
        let (width, height) = self.size();
        let (x, y) = self.offset();
        (width / 2.0 + x, height / 2.0 + y)
    }

    // === Configuration ===

    /// A copy of the current configuration.
    pub fn config(&self) -> GridConfig {
        read(&self.shared.config).clone()
    }

    /// Edits the configuration. The edit is discarded if the result does not validate.
    pub fn update_config(&self, edit: impl FnOnce(&mut GridConfig)) -> Result<(), ConfigError> {
        let mut next = self.config();
        edit(&mut next);
        next.validate()?;

        let clamped = next.clamp_multiplier(self.multiplier());
        *write(&self.shared.config) = next;
        self.shared.viewport.update_multiplier(|_| clamped);
        self.shared.revision.fetch_add(1, Ordering::AcqRel);
        self.shared.sync_scale_bar();
        self.shared.request_render();
        Ok(())
    }

    /// Replaces the interval set. A malformed set is logged and the previous one kept.
    pub fn set_intervals(&self, values: Vec<f32>) -> Result<(), ConfigError> {
        match IntervalSet::new(values) {
            Ok(set) => self.update_config(|config| config.intervals = set),
            Err(err) => {
                log::warn!("rejected interval set, keeping the previous one: {}", err);
                Err(err)
            }
        }
    }

    /// Changes how tiers are picked.
    pub fn set_strategy(&self, strategy: IntervalStrategy) -> Result<(), ConfigError> {
        self.update_config(|config| config.strategy = strategy)
    }

    /// Changes the showing window in millimeters.
    pub fn set_showing_range(&self, min_mm: f32, max_mm: f32) -> Result<(), ConfigError> {
        self.update_config(|config| {
            config.min_showing_interval_mm = min_mm;
            config.max_showing_interval_mm = max_mm;
        })
    }

    /// Density used for millimeter conversion.
    pub fn density(&self) -> Density {
        *read(&self.shared.density)
    }

    /// Replaces the density, e.g. when the surface moves to another display.
    pub fn set_density(&self, density: &impl DensityProvider) {
        *write(&self.shared.density) = density.density();
        self.shared.revision.fetch_add(1, Ordering::AcqRel);
        self.shared.sync_scale_bar();
        self.shared.request_render();
    }

    // === Observers ===

    /// Installs or clears the per-pass change listener.
    pub fn set_change_listener(&self, listener: Option<ChangeListener>) {
        *write(&self.shared.listener) = listener;
    }

    /// Convenience for installing a closure as change listener.
    pub fn on_change(&self, listener: impl Fn(ViewportSnapshot) + Send + Sync + 'static) {
        self.set_change_listener(Some(Arc::new(listener)));
    }

    /// Attaches a scale-bar that is updated after every pass. Its reserved width is
    /// set from the maximum showing interval.
    pub fn attach_scale_bar(&self, scale_bar: Arc<Mutex<ScaleBar>>) {
        lock(&scale_bar).set_max_interval_pixel(self.shared.max_interval_pixel());
        *write(&self.shared.scale_bar) = Some(scale_bar);
    }

    /// Detaches the scale-bar, if any.
    pub fn detach_scale_bar(&self) -> Option<Arc<Mutex<ScaleBar>>> {
        write(&self.shared.scale_bar).take()
    }

    // === Interval readout ===

    /// Tiers drawn by the last pass.
    pub fn active_intervals(&self) -> ActiveIntervals {
        *lock(&self.shared.active)
    }

    /// Secondary tier of the last pass.
    pub fn current_secondary_interval(&self) -> Option<f32> {
        self.active_intervals().secondary
    }

    /// Tertiary tier of the last pass.
    pub fn current_tertiary_interval(&self) -> Option<f32> {
        self.active_intervals().tertiary
    }

    /// Active interval in millimeters at `priority`.
    pub fn proper_interval_mm(&self, priority: IntervalPriority) -> f32 {
        self.active_intervals().interval_mm(priority)
    }

    /// Active interval at `priority` converted to horizontal pixels, without zoom.
    pub fn proper_interval_pixel(&self, priority: IntervalPriority) -> f32 {
        mm_to_pixels(self.proper_interval_mm(priority), self.density().x_dpi)
    }
}

impl GridSource for GridEngine {
    fn interval_mm(&self, priority: IntervalPriority) -> f32 {
        self.proper_interval_mm(priority)
    }

    fn multiplier(&self) -> f32 {
        GridEngine::multiplier(self)
    }

    fn density(&self) -> Density {
        GridEngine::density(self)
    }
}

impl Drop for GridEngine {
    fn drop(&mut self) {
        self.surface_destroyed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawList;
    use std::sync::atomic::AtomicBool;
    use std::sync::mpsc::{channel, Receiver, Sender};
    use std::time::Duration;

    const FRAME_TIMEOUT: Duration = Duration::from_secs(5);
    const QUIET_PERIOD: Duration = Duration::from_millis(150);

    /// Surface that forwards every presented frame to a channel.
    struct ChannelSurface {
        frames: Sender<DrawList>,
        released: Arc<AtomicBool>,
    }

    impl Surface for ChannelSurface {
        type Canvas = DrawList;

        fn width(&self) -> f32 {
            400.0
        }

        fn height(&self) -> f32 {
            300.0
        }

        fn lock_for_drawing(&mut self) -> Option<DrawList> {
            Some(DrawList::new())
        }

        fn present(&mut self, canvas: DrawList) {
            let _ = self.frames.send(canvas);
        }
    }

    impl Drop for ChannelSurface {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn active_engine() -> (GridEngine, Receiver<DrawList>, Arc<AtomicBool>) {
        let (tx, rx) = channel();
        let released = Arc::new(AtomicBool::new(false));
        let mut engine = GridEngine::default();
        engine
            .surface_created(ChannelSurface {
                frames: tx,
                released: released.clone(),
            })
            .unwrap();
        rx.recv_timeout(FRAME_TIMEOUT).expect("first frame");
        (engine, rx, released)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[test]
    fn test_starts_inactive_with_defaults() {
        let engine = GridEngine::default();
        assert_eq!(engine.state(), EngineState::Inactive);
        assert_eq!(engine.multiplier(), 1.0);
        assert_eq!(engine.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GridConfig {
            min_multiplier: -1.0,
            ..Default::default()
        };
        assert!(GridEngine::new(config, &Density::default()).is_err());
    }

    #[test]
    fn test_first_frame_renders_on_creation() {
        let (engine, _rx, _) = active_engine();
        assert!(engine.is_active());
        assert_eq!(engine.size(), (400.0, 300.0));
        assert_eq!(engine.current_secondary_interval(), Some(1.25));
        assert_eq!(engine.current_tertiary_interval(), Some(2.5));
    }

    #[test]
    fn test_destroy_releases_surface_and_resets_viewport() {
        let (mut engine, _rx, released) = active_engine();
        engine.pan_by(40.0, 10.0);
        engine.set_multiplier(3.0);
        engine.surface_destroyed();

        assert!(released.load(Ordering::SeqCst));
        assert_eq!(engine.state(), EngineState::Inactive);
        assert_eq!(engine.snapshot(), ViewportSnapshot::default());
        assert_eq!(engine.active_intervals(), ActiveIntervals::default());
    }

    #[test]
    fn test_destroy_while_inactive_is_noop() {
        let mut engine = GridEngine::default();
        engine.surface_destroyed();
        assert_eq!(engine.state(), EngineState::Inactive);
    }

    // ========================================================================
    // Change detection
    // ========================================================================

    #[test]
    fn test_no_render_without_change() {
        let (engine, rx, _) = active_engine();
        engine.pan_by(0.0, 0.0);
        engine.set_multiplier(1.0);
        assert!(rx.recv_timeout(QUIET_PERIOD).is_err());
    }

    #[test]
    fn test_each_change_renders() {
        let (engine, rx, _) = active_engine();
        engine.pan_by(5.0, 0.0);
        rx.recv_timeout(FRAME_TIMEOUT).expect("frame after pan");
        engine.zoom_by(2.0);
        rx.recv_timeout(FRAME_TIMEOUT).expect("frame after zoom");
        assert!(rx.recv_timeout(QUIET_PERIOD).is_err());
    }

    #[test]
    fn test_resize_renders() {
        let (mut engine, rx, _) = active_engine();
        engine.surface_changed(800.0, 600.0);
        rx.recv_timeout(FRAME_TIMEOUT).expect("frame after resize");
        assert_eq!(engine.origin(), (400.0, 300.0));
    }

    #[test]
    fn test_listener_sees_passes_in_order() {
        let (engine, _frames, _) = active_engine();
        let (tx, rx) = channel();
        let tx = Mutex::new(tx);
        engine.on_change(move |snapshot| {
            let _ = tx.lock().unwrap().send(snapshot);
        });
        let mut xs = Vec::new();
        for _ in 0..3 {
            engine.pan_by(10.0, 0.0);
            xs.push(rx.recv_timeout(FRAME_TIMEOUT).expect("change").offset_x);
        }
        assert_eq!(xs, vec![10.0, 20.0, 30.0]);
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    #[test]
    fn test_drag_pans_by_sum_of_deltas_regardless_of_zoom() {
        let mut engine = GridEngine::default();
        engine.handle_pointer(PointerEvent::Down { id: 0, x: 100.0, y: 100.0 });
        engine.handle_pointer(PointerEvent::Move { id: 0, x: 110.0, y: 95.0 });
        engine.handle_pinch(4.0);
        engine.handle_pointer(PointerEvent::Move { id: 0, x: 130.0, y: 90.0 });
        engine.handle_pinch(0.5);
        engine.handle_pointer(PointerEvent::Move { id: 0, x: 131.0, y: 120.0 });
        engine.handle_pointer(PointerEvent::Up { id: 0 });

        assert_eq!(engine.offset(), (31.0, 20.0));
        assert_eq!(engine.multiplier(), 2.0);
    }

    #[test]
    fn test_pinch_clamps_to_range() {
        let engine = GridEngine::default();
        engine.zoom_by(1000.0);
        assert_eq!(engine.multiplier(), 75.0);
        engine.zoom_by(1e-9);
        assert_eq!(engine.multiplier(), 0.075);
        engine.zoom_by(f32::NAN);
        assert_eq!(engine.multiplier(), 0.075);
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    #[test]
    fn test_malformed_interval_set_keeps_previous() {
        let engine = GridEngine::default();
        assert!(engine.set_intervals(vec![3.0]).is_err());
        assert_eq!(engine.config().intervals, IntervalSet::default());

        engine.set_intervals(vec![4.0, 8.0]).unwrap();
        assert_eq!(engine.config().intervals.values(), &[4.0, 8.0]);
    }

    #[test]
    fn test_config_change_rerenders_with_same_viewport() {
        let (engine, rx, _) = active_engine();
        engine.set_strategy(IntervalStrategy::MinMax).unwrap();
        rx.recv_timeout(FRAME_TIMEOUT).expect("frame after strategy change");
        assert_eq!(engine.current_secondary_interval(), Some(1.25));
        assert_eq!(engine.current_tertiary_interval(), Some(20.0));
    }

    #[test]
    fn test_set_strategy_reports_result_and_updates_config() {
        let engine = GridEngine::default();
        assert!(engine.set_strategy(IntervalStrategy::Min2).is_ok());
        assert_eq!(engine.config().strategy, IntervalStrategy::Min2);
    }

    #[test]
    fn test_narrowed_zoom_range_clamps_current_multiplier() {
        let engine = GridEngine::default();
        engine.set_multiplier(50.0);
        engine
            .update_config(|config| config.max_multiplier = 10.0)
            .unwrap();
        assert_eq!(engine.multiplier(), 10.0);
    }

    #[test]
    fn test_proper_interval_pixel_uses_x_density() {
        let (engine, _rx, _) = active_engine();
        engine.set_density(&Density::new(254.0, 100.0));
        // 1.25mm secondary at 10 px/mm horizontally
        let px = engine.proper_interval_pixel(IntervalPriority::Secondary);
        assert!((px - 12.5).abs() < 1e-3);
    }
}

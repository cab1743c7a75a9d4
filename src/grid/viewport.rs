//! Pan and zoom state shared between the event side and the render worker.
//!
//! Every field is an `f32` stored in an [`AtomicU32`]. Writers go through
//! compare-and-swap loops, so concurrent pans and zooms never lose an update and
//! the render worker never reads a torn value.

use crate::constants::DEFAULT_MULTIPLIER;
use std::sync::atomic::{AtomicU32, Ordering};

/// An `f32` cell that can be shared across threads.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    /// Creates a cell holding `value`.
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    /// Reads the current value.
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    /// Replaces the current value.
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }

    /// Applies `f` atomically and returns the new value.
    pub fn update(&self, f: impl Fn(f32) -> f32) -> f32 {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            let next = f(f32::from_bits(current)).to_bits();
            match self
                .0
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return f32::from_bits(next),
                Err(actual) => current = actual,
            }
        }
    }
}

/// A consistent-enough read of the viewport used to key render passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    /// Zoom factor
    pub multiplier: f32,
    /// Pan offset from the surface center along x, in pixels
    pub offset_x: f32,
    /// Pan offset from the surface center along y, in pixels
    pub offset_y: f32,
}

impl Default for ViewportSnapshot {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Shared pan/zoom state plus the surface size it applies to.
#[derive(Debug)]
pub struct Viewport {
    multiplier: AtomicF32,
    offset_x: AtomicF32,
    offset_y: AtomicF32,
    width: AtomicF32,
    height: AtomicF32,
}

impl Default for Viewport {
    fn default() -> Self {
        let defaults = ViewportSnapshot::default();
        Self {
            multiplier: AtomicF32::new(defaults.multiplier),
            offset_x: AtomicF32::new(defaults.offset_x),
            offset_y: AtomicF32::new(defaults.offset_y),
            width: AtomicF32::new(0.0),
            height: AtomicF32::new(0.0),
        }
    }
}

impl Viewport {
    /// Current zoom factor.
    pub fn multiplier(&self) -> f32 {
        self.multiplier.load()
    }

    /// Current pan offset in pixels.
    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x.load(), self.offset_y.load())
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (f32, f32) {
        (self.width.load(), self.height.load())
    }

    /// Reads all three pan/zoom fields.
    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            multiplier: self.multiplier.load(),
            offset_x: self.offset_x.load(),
            offset_y: self.offset_y.load(),
        }
    }

    /// Adds a pixel delta to the pan offset, 1:1 regardless of zoom.
    pub fn pan_by(&self, dx: f32, dy: f32) {
        self.offset_x.update(|x| x + dx);
        self.offset_y.update(|y| y + dy);
    }

    /// Replaces the pan offset.
    pub fn set_offset(&self, x: f32, y: f32) {
        self.offset_x.store(x);
        self.offset_y.store(y);
    }

    /// Applies `f` to the multiplier atomically and returns the new value.
    pub fn update_multiplier(&self, f: impl Fn(f32) -> f32) -> f32 {
        self.multiplier.update(f)
    }

    /// Records a new surface size.
    pub fn resize(&self, width: f32, height: f32) {
        self.width.store(width);
        self.height.store(height);
    }

    /// Restores the default pan and zoom. The size is left alone.
    pub fn reset(&self) {
        let defaults = ViewportSnapshot::default();
        self.multiplier.store(defaults.multiplier);
        self.set_offset(defaults.offset_x, defaults.offset_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_defaults() {
        let viewport = Viewport::default();
        assert_eq!(viewport.snapshot(), ViewportSnapshot::default());
        assert_eq!(viewport.multiplier(), 1.0);
        assert_eq!(viewport.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_pan_accumulates_deltas() {
        let viewport = Viewport::default();
        viewport.pan_by(3.0, -2.0);
        viewport.pan_by(5.0, 4.0);
        assert_eq!(viewport.offset(), (8.0, 2.0));
    }

    #[test]
    fn test_concurrent_pan_and_zoom_keep_exact_sums() {
        let viewport = Arc::new(Viewport::default());
        let panner = {
            let viewport = viewport.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    viewport.pan_by(1.0, 2.0);
                }
            })
        };
        let zoomer = {
            let viewport = viewport.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    let factor = if i % 2 == 0 { 2.0 } else { 0.5 };
                    viewport.update_multiplier(|m| m * factor);
                }
            })
        };
        panner.join().unwrap();
        zoomer.join().unwrap();

        assert_eq!(viewport.offset(), (1000.0, 2000.0));
        assert_eq!(viewport.multiplier(), 1.0);
    }

    #[test]
    fn test_reset_keeps_size() {
        let viewport = Viewport::default();
        viewport.resize(640.0, 480.0);
        viewport.pan_by(10.0, 10.0);
        viewport.update_multiplier(|_| 4.0);
        viewport.reset();
        assert_eq!(viewport.snapshot(), ViewportSnapshot::default());
        assert_eq!(viewport.size(), (640.0, 480.0));
    }
}

//! Pointer tracking for drag panning.
//!
//! Only one pointer drives a pan at a time. When it lifts while other pointers
//! are still down, the earliest remaining pointer takes over from its current
//! position, so a two-finger gesture keeps panning without a jump.

/// Host-assigned pointer identifier.
pub type PointerId = u64;

/// A pointer event delivered by the host's input source, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// A pointer touched down
    Down {
        /// Pointer identifier
        id: PointerId,
        /// Surface x
        x: f32,
        /// Surface y
        y: f32,
    },
    /// A pointer moved while down
    Move {
        /// Pointer identifier
        id: PointerId,
        /// Surface x
        x: f32,
        /// Surface y
        y: f32,
    },
    /// A pointer lifted
    Up {
        /// Pointer identifier
        id: PointerId,
    },
    /// The gesture was aborted; every pointer is released
    Cancel,
}

/// Turns pointer events into pan deltas.
#[derive(Debug, Default)]
pub struct PointerTracker {
    /// Pointers currently down, in touch-down order, with their last position
    pointers: Vec<(PointerId, f32, f32)>,
    active: Option<PointerId>,
    last: (f32, f32),
}

impl PointerTracker {
    /// Creates a tracker with no pointer down.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pointer currently driving the pan.
    pub fn active_pointer(&self) -> Option<PointerId> {
        self.active
    }

    /// Feeds one event and returns the pan delta it produces, if any.
    pub fn handle(&mut self, event: PointerEvent) -> Option<(f32, f32)> {
        match event {
            PointerEvent::Down { id, x, y } => {
                match self.pointers.iter_mut().find(|(pid, _, _)| *pid == id) {
                    Some(entry) => *entry = (id, x, y),
                    None => self.pointers.push((id, x, y)),
                }
                if self.active.is_none() {
                    self.active = Some(id);
                    self.last = (x, y);
                }
                None
            }
            PointerEvent::Move { id, x, y } => {
                // hovering pointers that never touched down are ignored
                let entry = self.pointers.iter_mut().find(|(pid, _, _)| *pid == id)?;
                *entry = (id, x, y);
                if self.active != Some(id) {
                    return None;
                }
                let delta = (x - self.last.0, y - self.last.1);
                self.last = (x, y);
                Some(delta)
            }
            PointerEvent::Up { id } => {
                self.pointers.retain(|(pid, _, _)| *pid != id);
                if self.active == Some(id) {
                    // hand the drag over to the earliest pointer still down
                    self.active = match self.pointers.first().copied() {
                        Some((next, x, y)) => {
                            self.last = (x, y);
                            Some(next)
                        }
                        None => None,
                    };
                }
                None
            }
            PointerEvent::Cancel => {
                self.pointers.clear();
                self.active = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(id: PointerId, x: f32, y: f32) -> PointerEvent {
        PointerEvent::Down { id, x, y }
    }

    fn moved(id: PointerId, x: f32, y: f32) -> PointerEvent {
        PointerEvent::Move { id, x, y }
    }

    #[test]
    fn test_single_pointer_drag() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.handle(down(1, 10.0, 10.0)), None);
        assert_eq!(tracker.handle(moved(1, 15.0, 8.0)), Some((5.0, -2.0)));
        assert_eq!(tracker.handle(moved(1, 20.0, 8.0)), Some((5.0, 0.0)));
        assert_eq!(tracker.handle(PointerEvent::Up { id: 1 }), None);
        assert_eq!(tracker.active_pointer(), None);
        assert_eq!(tracker.handle(moved(1, 30.0, 30.0)), None);
    }

    #[test]
    fn test_secondary_pointer_does_not_pan() {
        let mut tracker = PointerTracker::new();
        tracker.handle(down(1, 0.0, 0.0));
        tracker.handle(down(2, 100.0, 100.0));
        assert_eq!(tracker.handle(moved(2, 120.0, 120.0)), None);
        assert_eq!(tracker.active_pointer(), Some(1));
    }

    #[test]
    fn test_second_pointer_takes_over_without_jump() {
        let mut tracker = PointerTracker::new();
        tracker.handle(down(1, 0.0, 0.0));
        tracker.handle(down(2, 100.0, 100.0));
        tracker.handle(moved(2, 110.0, 105.0));
        tracker.handle(PointerEvent::Up { id: 1 });

        assert_eq!(tracker.active_pointer(), Some(2));
        // delta is measured from pointer 2's own last position
        assert_eq!(tracker.handle(moved(2, 112.0, 109.0)), Some((2.0, 4.0)));
    }

    #[test]
    fn test_hovering_pointer_never_takes_over() {
        let mut tracker = PointerTracker::new();
        tracker.handle(down(1, 0.0, 0.0));
        assert_eq!(tracker.handle(moved(2, 50.0, 50.0)), None);
        tracker.handle(PointerEvent::Up { id: 1 });

        assert_eq!(tracker.active_pointer(), None);
        assert_eq!(tracker.handle(moved(2, 80.0, 90.0)), None);
    }

    #[test]
    fn test_cancel_releases_everything() {
        let mut tracker = PointerTracker::new();
        tracker.handle(down(1, 0.0, 0.0));
        tracker.handle(down(2, 5.0, 5.0));
        tracker.handle(PointerEvent::Cancel);
        assert_eq!(tracker.active_pointer(), None);
        assert_eq!(tracker.handle(moved(2, 9.0, 9.0)), None);
    }

    #[test]
    fn test_deltas_sum_to_total_travel() {
        let mut tracker = PointerTracker::new();
        tracker.handle(down(7, 3.0, 4.0));
        let mut total = (0.0, 0.0);
        for step in 1..=10 {
            let (dx, dy) = tracker
                .handle(moved(7, 3.0 + step as f32 * 2.0, 4.0 - step as f32))
                .unwrap();
            total.0 += dx;
            total.1 += dy;
        }
        assert_eq!(total, (20.0, -10.0));
    }
}

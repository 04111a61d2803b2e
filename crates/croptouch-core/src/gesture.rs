//! Single-pointer drag detection.
//!
//! Raw pointer events go in, semantic gesture events come out. The detector
//! tracks one pointer and two states (idle, dragging); there are no timers
//! and no tap or long-press semantics. Move deltas are incremental - each
//! `Moved` carries the displacement since the previous event, not since the
//! press - so consumers accumulate if they need total displacement.

/// A raw pointer event in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    /// Delivered when the surface loses the gesture (teardown, focus loss).
    Cancel { x: f32, y: f32 },
}

/// A semantic gesture event produced by [`TouchGestureDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Down { x: f32, y: f32 },
    Moved { x: f32, y: f32, dx: f32, dy: f32 },
    Up { x: f32, y: f32 },
}

/// Moves smaller than this on both axes are swallowed.
const MOVE_DETECT_THRESHOLD: f32 = 0.05;

/// Converts raw pointer events into semantic press/move/release events.
#[derive(Debug, Default)]
pub struct TouchGestureDetector {
    last_x: f32,
    last_y: f32,
    dragging: bool,
}

impl TouchGestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a press is being tracked.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feed one pointer event; returns the semantic event it produced, if
    /// any.
    ///
    /// Moves while idle and releases without a press are spurious input and
    /// produce nothing. The last-seen position is updated on every event
    /// either way.
    pub fn handle(&mut self, event: PointerEvent) -> Option<GestureEvent> {
        let out = match event {
            PointerEvent::Down { x, y } => {
                self.dragging = true;
                Some(GestureEvent::Down { x, y })
            }
            PointerEvent::Move { x, y } => {
                let moved = (x - self.last_x).abs() > MOVE_DETECT_THRESHOLD
                    || (y - self.last_y).abs() > MOVE_DETECT_THRESHOLD;
                if self.dragging && moved {
                    Some(GestureEvent::Moved {
                        x,
                        y,
                        dx: x - self.last_x,
                        dy: y - self.last_y,
                    })
                } else {
                    None
                }
            }
            PointerEvent::Up { x, y } | PointerEvent::Cancel { x, y } => {
                let was_dragging = self.dragging;
                self.dragging = false;
                was_dragging.then_some(GestureEvent::Up { x, y })
            }
        };

        let (x, y) = match event {
            PointerEvent::Down { x, y }
            | PointerEvent::Move { x, y }
            | PointerEvent::Up { x, y }
            | PointerEvent::Cancel { x, y } => (x, y),
        };
        self.last_x = x;
        self.last_y = y;

        out
    }
}

//! Shared plumbing for the game session engines: the timer-driven update
//! contract and play-area geometry.

use crate::session::Position;
use crate::timer::{Millis, TimerQueue};

/// A session state machine whose scheduled work arrives as timer messages.
pub trait Engine {
    type Timer: Copy + std::fmt::Debug;

    fn timers_mut(&mut self) -> &mut TimerQueue<Self::Timer>;

    /// The single update function for scheduled work. `at` is the time the
    /// timer was scheduled for, not the time it was polled.
    fn on_timer(&mut self, timer: Self::Timer, at: Millis);
}

/// Fires every timer due at or before `now`, in order. Returns how many fired.
pub fn advance<E: Engine + ?Sized>(engine: &mut E, now: Millis) -> usize {
    let mut fired = 0;
    while let Some((at, timer)) = engine.timers_mut().pop_due(now) {
        engine.on_timer(timer, at);
        fired += 1;
    }
    fired
}

/// Pointer position in pixels, in the same space as [`PlayArea`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Measured bounding box of the play area, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlayArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x < self.left + self.width
            && p.y >= self.top
            && p.y < self.top + self.height
    }

    /// Centre of a percent-positioned element, in pixels relative to the area
    pub fn to_local_px(&self, pos: Position) -> Point {
        Point::new(pos.x / 100.0 * self.width, pos.y / 100.0 * self.height)
    }

    /// Euclidean distance between the pointer and a target centre, in pixels
    pub fn distance_px(&self, pointer: Point, centre: Position) -> f64 {
        let c = self.to_local_px(centre);
        let dx = (pointer.x - self.left) - c.x;
        let dy = (pointer.y - self.top) - c.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn hits(&self, pointer: Point, centre: Position, diameter_px: u32) -> bool {
        self.distance_px(pointer, centre) <= diameter_px as f64 / 2.0
    }
}

/// Hit test that fails safe when either measurement is missing.
pub fn pointer_over(
    area: Option<&PlayArea>,
    pointer: Option<Point>,
    centre: Position,
    diameter_px: u32,
) -> bool {
    match (area, pointer) {
        (Some(area), Some(pointer)) => area.hits(pointer, centre, diameter_px),
        _ => false,
    }
}

//! Swipe gesture recognition for the game board
//!
//! A gesture is the pair of points captured at touch-start and touch-end.
//! [`classify`] turns that pair into at most one [`Direction`]; [`SwipeTracker`]
//! owns the pending start point between the two touch events.

pub mod tracker;

pub use tracker::SwipeTracker;

use serde::{Deserialize, Serialize};

/// Gestures whose dominant axis moves this far or less are treated as taps
pub const DEFAULT_MIN_SWIPE_DISTANCE: f64 = 20.0;

/// Screen coordinate in client pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Move intent sent to the game controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a completed gesture.
///
/// Displacement is measured from `end` back to `start`, so a finger moving
/// towards smaller x produces a positive `dx` and maps to [`Direction::Left`].
/// Horizontal wins only when strictly dominant; equal magnitudes go vertical.
/// Returns `None` when the dominant axis does not exceed `min_distance`.
pub fn classify(start: Point, end: Point, min_distance: f64) -> Option<Direction> {
    let dx = start.x - end.x;
    let dy = start.y - end.y;
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }

    if dx.abs() > dy.abs() {
        if dx.abs() > min_distance {
            return Some(if dx > 0.0 {
                Direction::Left
            } else {
                Direction::Right
            });
        }
        return None;
    }

    if dy.abs() > min_distance {
        Some(if dy > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        })
    } else {
        None
    }
}

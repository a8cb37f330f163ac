// src/generation/event.rs
//! The generated event record

use serde::{Deserialize, Serialize};

/// Number of event type categories; types are `0..EVENT_TYPE_COUNT`
pub const EVENT_TYPE_COUNT: i32 = 6;

/// Half-open coordinate range `[POSITION_MIN, POSITION_MAX)`
pub const POSITION_MIN: f32 = -100.0;
pub const POSITION_MAX: f32 = 100.0;

/// Mean of the exponential energy distribution
pub const ENERGY_MEAN: f64 = 100.0;

/// Point in detector space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Whether every coordinate lies in the generation range
    pub fn in_range(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|c| (POSITION_MIN..POSITION_MAX).contains(c))
    }
}

/// One simulated physics event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Sequential identifier, equal to the generation index
    pub event_id: i64,

    /// Category code in `0..EVENT_TYPE_COUNT`
    pub event_type: i32,

    /// Deposited energy, never negative
    pub energy: f32,

    pub position: Position,
}

impl Event {
    /// Check the record-level invariants
    pub fn is_valid(&self) -> bool {
        self.event_id >= 0
            && (0..EVENT_TYPE_COUNT).contains(&self.event_type)
            && self.energy >= 0.0
            && self.position.in_range()
    }
}

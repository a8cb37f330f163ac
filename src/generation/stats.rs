// src/generation/stats.rs
//! Streaming statistics over a sequence of events
//!
//! Built while a run writes its events, and rebuilt from disk by the reader,
//! so the two can be compared without holding records in memory.

use crate::generation::event::{Event, EVENT_TYPE_COUNT};
use serde::{Deserialize, Serialize};

/// Summary of a generated dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of records observed
    pub records: u64,

    /// First and last `event_id` seen
    pub first_id: Option<i64>,
    pub last_id: Option<i64>,

    /// True while every id equals the previous id plus one, starting at 0
    pub ids_contiguous: bool,

    pub energy_sum: f64,
    pub energy_min: Option<f32>,
    pub energy_max: Option<f32>,

    /// Records per event type
    pub type_counts: [u64; EVENT_TYPE_COUNT as usize],

    /// Records whose type fell outside the known categories
    pub unknown_types: u64,

    /// Per-axis (x, y, z) extremes
    pub position_min: Option<[f32; 3]>,
    pub position_max: Option<[f32; 3]>,
}

impl Default for DatasetSummary {
    fn default() -> Self {
        Self {
            records: 0,
            first_id: None,
            last_id: None,
            ids_contiguous: true,
            energy_sum: 0.0,
            energy_min: None,
            energy_max: None,
            type_counts: [0; EVENT_TYPE_COUNT as usize],
            unknown_types: 0,
            position_min: None,
            position_max: None,
        }
    }
}

impl DatasetSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the summary
    pub fn observe(&mut self, event: &Event) {
        let expected_id = match self.last_id {
            None => Some(0),
            Some(id) => id.checked_add(1),
        };
        if expected_id != Some(event.event_id) {
            self.ids_contiguous = false;
        }
        if self.first_id.is_none() {
            self.first_id = Some(event.event_id);
        }
        self.last_id = Some(event.event_id);
        self.records += 1;

        self.energy_sum += f64::from(event.energy);
        self.energy_min = Some(self.energy_min.map_or(event.energy, |m| m.min(event.energy)));
        self.energy_max = Some(self.energy_max.map_or(event.energy, |m| m.max(event.energy)));

        match usize::try_from(event.event_type) {
            Ok(t) if t < self.type_counts.len() => self.type_counts[t] += 1,
            _ => self.unknown_types += 1,
        }

        let coords = [event.position.x, event.position.y, event.position.z];
        let mut min = self.position_min.unwrap_or(coords);
        let mut max = self.position_max.unwrap_or(coords);
        for axis in 0..3 {
            min[axis] = min[axis].min(coords[axis]);
            max[axis] = max[axis].max(coords[axis]);
        }
        self.position_min = Some(min);
        self.position_max = Some(max);
    }

    /// Mean energy, 0 for an empty dataset
    pub fn energy_mean(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.energy_sum / self.records as f64
        }
    }

    /// Fraction of records with the given type
    pub fn type_fraction(&self, event_type: usize) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        self.type_counts
            .get(event_type)
            .map_or(0.0, |count| *count as f64 / self.records as f64)
    }
}

// src/generation/sampler.rs
//! Distributions behind each generated field
//!
//! - `event_type`: uniform over `0..6`
//! - `energy`: exponential with mean 100
//! - `position.{x,y,z}`: uniform over `[-100, 100)`
//!
//! Fields are drawn in that order for every event so a seeded source
//! always yields the same sequence.

use crate::generation::event::{
    Event, Position, ENERGY_MEAN, EVENT_TYPE_COUNT, POSITION_MAX, POSITION_MIN,
};
use crate::utils::errors::{GeneratorError, Result};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Exp;

/// Samples events from the fixed field distributions
#[derive(Debug, Clone)]
pub struct EventSampler {
    event_type: Uniform<i32>,
    energy: Exp<f64>,
    coordinate: Uniform<f32>,
}

impl EventSampler {
    /// Create a sampler with the standard distributions
    pub fn new() -> Result<Self> {
        let energy = Exp::new(1.0 / ENERGY_MEAN).map_err(|e| {
            GeneratorError::SamplingError(format!("Invalid energy distribution: {}", e))
        })?;

        Ok(Self {
            event_type: Uniform::new(0, EVENT_TYPE_COUNT),
            energy,
            coordinate: Uniform::new(POSITION_MIN, POSITION_MAX),
        })
    }

    /// Draw the event with the given id
    pub fn sample<R: Rng + ?Sized>(&self, event_id: i64, rng: &mut R) -> Event {
        let event_type = self.event_type.sample(rng);
        let energy = self.energy.sample(rng) as f32;
        let x = self.coordinate.sample(rng);
        let y = self.coordinate.sample(rng);
        let z = self.coordinate.sample(rng);

        Event {
            event_id,
            event_type,
            energy,
            position: Position::new(x, y, z),
        }
    }
}

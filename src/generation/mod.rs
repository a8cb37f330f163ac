// src/generation/mod.rs
//! Synthetic event generation
//!
//! - **Event**: the record written for every simulated event
//! - **Sampler**: field distributions (uniform type, exponential energy,
//!   uniform position)
//! - **Stats**: streaming summary of a run
//! - **Generator**: drives a sink from `event_id = 0` to `n_events - 1`
//!
//! # Flow
//!
//! ```text
//! for event_id in 0..n_events
//!     sample(type, energy, x, y, z) → Event → sink.append()
//!                                        ↓
//!                                  DatasetSummary
//! sink.finalize()
//! ```

pub mod event;
pub mod generator;
pub mod sampler;
pub mod stats;

// Re-export commonly used types
pub use event::{Event, Position, EVENT_TYPE_COUNT};
pub use generator::{generate, EventGenerator, GenerationReport};
pub use sampler::EventSampler;
pub use stats::DatasetSummary;

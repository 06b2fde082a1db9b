//! Proximity data model module.
//!
//! # Purpose
//! Re-exports the selection record, validated submission, and upsert outcome
//! used by the API and store layers.
mod selection;

pub use selection::{
    PROXIMITY_MAX, PROXIMITY_MIN, ProximityLabel, Selection, Submission, UpsertOutcome,
};

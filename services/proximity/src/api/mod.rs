//! Proximity HTTP API handlers.
pub mod error;
pub mod openapi;
pub mod results;
pub mod submit;
pub mod system;
pub mod types;

//! Proximity selection service library crate.
//!
//! # Purpose
//! Exposes the HTTP API, validation and aggregation logic, configuration, and
//! storage backends for use by the binaries and tests.
pub mod aggregate;
pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
pub mod validation;

//! Gramgeo - geocoding and spatial validation for census administrative units.
//!
//! This library provides the batch geocoding pipeline shared by the server
//! binary: name normalization, the provider client, envelope validation,
//! entity-store access, status aggregation and the coordinate audit pass.

pub mod config;
pub mod error;
pub mod geocode;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod store;
pub mod validate;

pub use models::{AdminUnit, Level, Residence};
pub use pipeline::GeocodePipeline;

//! Core data models for the geocoding pipeline.

pub mod unit;

pub use unit::{AdminUnit, Level, Residence};

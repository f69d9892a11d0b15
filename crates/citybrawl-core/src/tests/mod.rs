//! Test module for determinism, scenario and property tests.
//!
//! # Test Structure
//!
//! - `determinism.rs`: same seed and inputs give the same states
//! - `integration.rs`: end-to-end scenarios through the reducer and session
//! - `properties.rs`: invariants checked over generated action sequences
//! - `helpers.rs`: setup utilities and factory functions

mod helpers;
mod properties;

// Re-export for convenience
pub use helpers::*;

//! Hierarchical Temporal Memory (HTM) sequence learning with sensorimotor (external) input.
//!
//! The crate is organized around a base `TemporalMemory` and a `SensorimotorTemporalMemory`
//! layer that composes it. See the `core` module for the building blocks.

pub mod core;

pub use crate::core::error::{HtmError, Result};

//! Common test utilities for rlockcheck
//!
//! Go fixtures and assertions shared by the integration and unit suites.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;

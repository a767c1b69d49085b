//! Reporting Feature
//!
//! Turns violations into diagnostics.
//!
//! ## Structure
//! - `ports/` - ReportRenderer trait
//! - `infrastructure/` - text and JSON renderers

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{renderer_for, JsonRenderer, TextRenderer};
pub use ports::ReportRenderer;

//! Shared models

mod span;

pub use span::{Location, SourceLocation, Span};

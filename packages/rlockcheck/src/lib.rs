/*
 * rlockcheck - recursive read-lock detection for Go
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, SourceLocation, ScopeStack)
 * - features/    : Vertical slices (syntax → parsing → lock_analysis → reporting)
 * - config/      : Presets and YAML configuration
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::len_without_is_empty)] // Index sizes are informational

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{AnalyzerConfig, OutputFormat, Preset};
pub use errors::{CheckError, Result};
pub use features::lock_analysis::{
    check_program, CheckLocksUseCase, LockAnalyzer, ReentrancyAnalyzer, StackFrame, Violation,
    ViolationKind,
};
pub use features::parsing::{GoFrontend, ParsedProgram};
pub use features::reporting::{renderer_for, JsonRenderer, ReportRenderer, TextRenderer};
pub use shared::models::SourceLocation;

/// Parse in-memory Go sources and check them in one step
pub fn check_sources<P, S>(sources: &[(P, S)], config: &AnalyzerConfig) -> Result<Vec<Violation>>
where
    P: AsRef<str>,
    S: AsRef<str>,
{
    let mut frontend = GoFrontend::new();
    for (path, source) in sources {
        frontend.add_source(path.as_ref(), source.as_ref());
    }
    let parsed = frontend.build()?;
    Ok(check_program(&parsed, config))
}

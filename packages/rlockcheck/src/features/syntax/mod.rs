/// Syntax Feature
///
/// The front-end contract shared by the Go front end and the lock analysis.
///
/// ## Architecture
/// - **Domain**: owned Go syntax tree, symbol and type tables
/// - **Infrastructure**: `Inspector` (pre-order node streams, binding index)
/// - **Ports**: `TypeOracle` trait
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::*;
pub use ports::*;

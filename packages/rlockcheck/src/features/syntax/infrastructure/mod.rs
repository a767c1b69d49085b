pub mod inspector;

pub use inspector::{Binding, Inspector, TraversalNode};

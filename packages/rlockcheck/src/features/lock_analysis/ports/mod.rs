pub mod lock_analyzer;

pub use lock_analyzer::LockAnalyzer;

//! Shared utilities

pub mod diagnostic;
pub mod fs;
pub mod path;

pub use diagnostic::Diagnostic;

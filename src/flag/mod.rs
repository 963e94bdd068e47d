//! Go-style flag parsing
//!
//! This module implements the flag-set collaborator used at every level of
//! the command tree: typed registration, parsing, and visiting.

pub mod set;
pub mod value;

// Re-export main types
pub use set::*;
pub use value::*;

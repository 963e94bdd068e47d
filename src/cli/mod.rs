//! Demo CLI application
//!
//! This module wires a small command tree into the `cmdtree` binary and
//! sets up logging.

pub mod app;

// Re-export main types
pub use app::*;

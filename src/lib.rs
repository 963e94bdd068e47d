//! cmdtree - A minimal subcommand dispatcher
//!
//! cmdtree routes a flat argument list through a tree of named commands,
//! parsing each level's flags Go-style and running the action at the leaf.

// Public modules
pub mod cli;
pub mod command;
pub mod context;
pub mod error;
pub mod flag;

// Re-export commonly used types
pub use command::{Action, Command, OnParseError};
pub use context::{CancelHandle, Context};
pub use error::{ContextError, DispatchError, FlagError, Result};
pub use flag::{Flag, FlagSet, FlagType, FlagVar, Value};

/// Current version of cmdtree
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

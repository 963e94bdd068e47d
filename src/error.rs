//! Error types for cmdtree

use std::io;
use thiserror::Error;

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Main error type returned by [`Command::dispatch`](crate::Command::dispatch)
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A flag token could not be parsed at some level of the tree
    #[error("{command}: {source}")]
    Parse {
        command: String,
        #[source]
        source: FlagError,
    },

    /// The error returned by an action handler, untouched
    #[error(transparent)]
    Action(anyhow::Error),

    /// Help text could not be written to the output sink
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DispatchError {
    /// The flag error, if this is a parse failure
    pub fn as_flag_error(&self) -> Option<&FlagError> {
        match self {
            DispatchError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Unwrap the handler error, if this came from an action
    pub fn into_action(self) -> Option<anyhow::Error> {
        match self {
            DispatchError::Action(err) => Some(err),
            _ => None,
        }
    }
}

/// Flag parsing and assignment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    #[error("flag provided but not defined: -{0}")]
    NotDefined(String),

    #[error("flag needs an argument: -{0}")]
    MissingArgument(String),

    #[error("invalid boolean value {value:?} for -{name}: {reason}")]
    InvalidBool {
        name: String,
        value: String,
        reason: String,
    },

    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    /// `-h` or `-help` was given and no such flag is defined
    #[error("help requested")]
    HelpRequested,
}

/// Reasons a [`Context`](crate::Context) is no longer live
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Specialized result type for flag operations
pub type FlagResult<T> = std::result::Result<T, FlagError>;

/// Helper to tell whether a flag error only asks for help
/// (which is answered with help text, not a failure)
pub fn is_help_request(err: &FlagError) -> bool {
    matches!(err, FlagError::HelpRequested)
}

//! Execution context passed down to action handlers
//!
//! The dispatcher never looks at the context. It exists so that the business
//! logic at the leaves can honour cancellation and deadlines set by the caller.

use crate::error::ContextError;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Execution context carrying a deadline and a cancellation token
#[derive(Debug, Clone)]
pub struct Context {
    /// Point in time after which work should stop
    deadline: Option<Instant>,

    /// Cancelled with this context's parent, or on its own
    cancel_token: CancellationToken,
}

/// Handle that cancels a context (and everything derived from it)
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancel_token: CancellationToken,
}

impl CancelHandle {
    /// Cancel the associated context
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

impl Context {
    /// Create a live context with no deadline
    pub fn new() -> Self {
        Context {
            deadline: None,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Derive a context that expires at `deadline`
    ///
    /// An earlier deadline already on the context is kept. Cancelling the
    /// derived context leaves the original live.
    pub fn with_deadline(self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        };
        Context {
            deadline: Some(deadline),
            cancel_token: self.cancel_token.child_token(),
        }
    }

    /// Derive a context that expires `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Get a handle able to cancel this context
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            cancel_token: self.cancel_token.clone(),
        }
    }

    /// Whether the context was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// The deadline, if one was set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline (zero once passed)
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Why the context is done, or `None` while it is live
    pub fn err(&self) -> Option<ContextError> {
        if self.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// `Ok(())` while live, the reason otherwise
    pub fn check(&self) -> Result<(), ContextError> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

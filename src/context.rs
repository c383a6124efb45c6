//! Per-operation context passed explicitly into every store-facing call
//!
//! Replaces ambient global tracing/logging state: each inbound request gets
//! its own `OpContext` carrying a request id for log correlation and an
//! optional deadline that every downstream store call must honor.

use std::time::{Duration, Instant};

use thiserror::Error;
use uuid::Uuid;

/// The operation's deadline has passed before the work could finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation deadline exceeded")]
pub struct DeadlineExceeded;

/// Context for a single logical operation.
///
/// Cloned freely into spawned tasks; all clones share the same request id
/// and deadline instant.
#[derive(Debug, Clone)]
pub struct OpContext {
    request_id: String,
    deadline: Option<Instant>,
}

impl OpContext {
    /// A context with no deadline, for startup probes and tests.
    pub fn background() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            deadline: None,
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Request id used for log correlation across the operation.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Time left before the deadline. `None` means unbounded.
    ///
    /// Once the deadline has passed this returns `Some(Duration::ZERO)`.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Fails if the deadline has already passed.
    ///
    /// Callers check this before starting network work so an expired
    /// operation short-circuits instead of issuing a doomed request.
    pub fn check(&self) -> Result<(), DeadlineExceeded> {
        match self.remaining() {
            Some(rem) if rem.is_zero() => Err(DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

//! # Scheduler Error Codes
//!
//! Every public scheduler entry point is a total function returning one of
//! these codes. The numeric values are stable and FFI-friendly (`u32`), and
//! are organized by domain: lifecycle, operations, resources, scheduling.

use std::fmt;

/// Result alias used across the scheduler API.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Error codes returned by the scheduler API.
///
/// `#[repr(u32)]` keeps the codes stable across an FFI boundary. A successful
/// call is represented by `Ok(..)`; there is no `Success` variant. The last
/// failure of each call is also latched into the scheduler's last-error slot,
/// queryable via [`Scheduler::last_error`](crate::Scheduler::last_error).
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerError {
    // === Internal errors (1xx) ===
    /// Unclassified internal failure.
    Failure = 100,
    /// A strategy/kernel invariant was violated.
    InternalError = 101,
    /// The exploration strategy is disabled; the scheduler is a no-op.
    SchedulerDisabled = 102,

    // === Lifecycle errors (2xx) ===
    /// `attach` was called while an iteration is already attached.
    ClientAttached = 200,
    /// A scheduler call was issued while detached, or the caller woke up
    /// after `detach` canceled its operation.
    ClientNotAttached = 201,

    // === Operation errors (3xx) ===
    /// `create_operation` was called with an id that is still live.
    DuplicateOperation = 300,
    /// The referenced operation does not exist.
    NotExistingOperation = 301,
    /// The reserved main operation id was passed to `create_operation`.
    MainOperationExplicitlyCreated = 302,
    /// The reserved main operation id was passed to `start_operation`.
    MainOperationExplicitlyStarted = 303,
    /// The reserved main operation id was passed to `complete_operation`.
    MainOperationExplicitlyCompleted = 304,
    /// `complete_operation` was called on an operation that never started.
    OperationNotStarted = 305,
    /// `start_operation` was called on an operation that already started.
    OperationAlreadyStarted = 306,
    /// The referenced operation has already completed.
    OperationAlreadyCompleted = 307,

    // === Resource errors (4xx) ===
    /// `create_resource` was called with an id that already exists.
    DuplicateResource = 400,
    /// The referenced resource does not exist.
    NotExistingResource = 401,

    // === Scheduling errors (5xx) ===
    /// The schedule is exhausted but non-completed operations remain blocked.
    DeadlockDetected = 500,
}

impl SchedulerError {
    /// Get the stable numeric code for this error.
    #[inline(always)]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Failure => "unclassified internal failure",
            Self::InternalError => "strategy/kernel invariant violation",
            Self::SchedulerDisabled => "exploration strategy is disabled",
            Self::ClientAttached => "client is already attached",
            Self::ClientNotAttached => "client is not attached",
            Self::DuplicateOperation => "operation id already exists",
            Self::NotExistingOperation => "operation does not exist",
            Self::MainOperationExplicitlyCreated => {
                "the main operation cannot be created explicitly"
            }
            Self::MainOperationExplicitlyStarted => {
                "the main operation cannot be started explicitly"
            }
            Self::MainOperationExplicitlyCompleted => {
                "the main operation cannot be completed explicitly"
            }
            Self::OperationNotStarted => "operation has not started",
            Self::OperationAlreadyStarted => "operation has already started",
            Self::OperationAlreadyCompleted => "operation has already completed",
            Self::DuplicateResource => "resource id already exists",
            Self::NotExistingResource => "resource does not exist",
            Self::DeadlockDetected => "deadlock detected",
        };
        write!(f, "{} ({})", msg, self.as_u32())
    }
}

impl std::error::Error for SchedulerError {}

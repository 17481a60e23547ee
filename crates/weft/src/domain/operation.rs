//! Operation Control Block
//!
//! An operation is the scheduler's proxy for one controlled unit of user
//! work, typically backed by one OS thread. The control block tracks the
//! operation's lifecycle status, whether it currently holds the execution
//! token, the operations waiting to join it, and the join/resource targets
//! it is itself blocked on.
//!
//! # State Machine
//!
//! ```text
//! Created ──start──▶ Enabled ◀──────────────┐
//!                      │ join                │ target completes /
//!                      ▼                     │ resource signaled
//!                    BlockedOnJoin ──────────┤
//!                      │ wait_resource       │
//!                    BlockedOnResource ──────┘
//!
//! any non-terminal ──complete / detach──▶ Completed
//! ```
//!
//! `Completed` is terminal for the running iteration; the only way out is
//! `create_operation` reusing the id, which resets the slot to `Created`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Condvar;

use crate::domain::resource::ResourceId;

/// Operation identifier.
///
/// The identifier space belongs to the embedding test: the scheduler treats
/// ids opaquely and only requires equality and hashing. Id `0` is reserved
/// for the main operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(pub u64);

impl OperationId {
    /// Create a new operation identifier.
    #[inline(always)]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying value.
    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

/// Lifecycle status of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationStatus {
    /// Created but not yet started by its thread.
    Created,
    /// Eligible to be scheduled.
    Enabled,
    /// Waiting for one or more operations to complete.
    BlockedOnJoin,
    /// Waiting for one or more resources to be signaled.
    BlockedOnResource,
    /// Finished. Terminal for the running iteration.
    Completed,
}

impl OperationStatus {
    /// Check whether the operation is eligible to be scheduled.
    #[inline(always)]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Check whether the operation is blocked on a join or a resource.
    #[inline(always)]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::BlockedOnJoin | Self::BlockedOnResource)
    }

    /// Check whether the operation has completed.
    #[inline(always)]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Enabled => write!(f, "ENABLED"),
            Self::BlockedOnJoin => write!(f, "BLOCKED_ON_JOIN"),
            Self::BlockedOnResource => write!(f, "BLOCKED_ON_RESOURCE"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Per-operation control block owned by the scheduler.
///
/// Cross-references between operations and resources are by id; the blocked
/// sets never hold pointers into the scheduler maps.
pub struct Operation {
    pub(crate) id: OperationId,
    /// Creation sequence number. Enabled-set iteration is ordered by this,
    /// which keeps scheduling decisions independent of the racy order in
    /// which worker threads reach `start_operation`.
    pub(crate) seq: u64,
    pub(crate) status: OperationStatus,
    /// True iff this operation currently holds the execution token.
    pub(crate) is_scheduled: bool,
    /// Condition variable the operation's thread parks on. Paired with the
    /// single scheduler mutex; stored behind `Arc` so a handle can be cloned
    /// out of the state map before waiting.
    pub(crate) cv: Arc<Condvar>,
    /// Operations blocked waiting for this one to complete.
    pub(crate) join_waiters: HashSet<OperationId>,
    /// When blocked on joins: the targets still outstanding.
    pending_joins: HashSet<OperationId>,
    join_wait_all: bool,
    /// When blocked on resources: the resources still outstanding.
    pending_resources: HashSet<ResourceId>,
    resource_wait_all: bool,
}

impl Operation {
    /// Create a fresh control block in the `Created` state.
    pub(crate) fn new(id: OperationId, seq: u64) -> Self {
        Self {
            id,
            seq,
            status: OperationStatus::Created,
            is_scheduled: false,
            cv: Arc::new(Condvar::new()),
            join_waiters: HashSet::new(),
            pending_joins: HashSet::new(),
            join_wait_all: false,
            pending_resources: HashSet::new(),
            resource_wait_all: false,
        }
    }

    /// The operation's identifier.
    #[inline(always)]
    pub fn id(&self) -> OperationId {
        self.id
    }

    /// The operation's lifecycle status.
    #[inline(always)]
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    /// Whether the operation currently holds the execution token.
    #[inline(always)]
    pub fn is_scheduled(&self) -> bool {
        self.is_scheduled
    }

    /// Reset a `Completed` slot so the id can be reused by a new thread.
    pub(crate) fn reset(&mut self) {
        self.status = OperationStatus::Created;
        self.is_scheduled = false;
        self.join_waiters.clear();
        self.pending_joins.clear();
        self.join_wait_all = false;
        self.pending_resources.clear();
        self.resource_wait_all = false;
    }

    /// Block this operation until the target operations complete.
    ///
    /// With `wait_all` the operation stays blocked until every target has
    /// completed; otherwise the first completion releases it.
    pub(crate) fn block_on_joins(&mut self, targets: &[OperationId], wait_all: bool) {
        self.pending_joins = targets.iter().copied().collect();
        self.join_wait_all = wait_all;
        self.status = OperationStatus::BlockedOnJoin;
    }

    /// Block this operation until the resources are signaled.
    pub(crate) fn block_on_resources(&mut self, resources: &[ResourceId], wait_all: bool) {
        self.pending_resources = resources.iter().copied().collect();
        self.resource_wait_all = wait_all;
        self.status = OperationStatus::BlockedOnResource;
    }

    /// Notify this operation that a join target completed.
    ///
    /// Returns `true` iff the wait predicate is now satisfied, in which case
    /// the operation transitions back to `Enabled` and must be re-inserted
    /// into the enabled set by the caller. Stale notifications (the operation
    /// is not blocked on joins, or the target is not one it waits for) are
    /// ignored.
    pub(crate) fn on_join_target_completed(&mut self, target: OperationId) -> bool {
        if self.status != OperationStatus::BlockedOnJoin {
            return false;
        }
        if !self.pending_joins.remove(&target) {
            return false;
        }
        if self.join_wait_all && !self.pending_joins.is_empty() {
            return false;
        }
        self.pending_joins.clear();
        self.status = OperationStatus::Enabled;
        true
    }

    /// Notify this operation that a resource it waits on was signaled.
    ///
    /// Symmetric to [`on_join_target_completed`](Self::on_join_target_completed).
    pub(crate) fn on_resource_signaled(&mut self, resource: ResourceId) -> bool {
        if self.status != OperationStatus::BlockedOnResource {
            return false;
        }
        if !self.pending_resources.remove(&resource) {
            return false;
        }
        if self.resource_wait_all && !self.pending_resources.is_empty() {
            return false;
        }
        self.pending_resources.clear();
        self.status = OperationStatus::Enabled;
        true
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("id", &self.id)
            .field("seq", &self.seq)
            .field("status", &self.status)
            .field("is_scheduled", &self.is_scheduled)
            .field("join_waiters", &self.join_waiters)
            .field("pending_joins", &self.pending_joins)
            .field("pending_resources", &self.pending_resources)
            .finish()
    }
}

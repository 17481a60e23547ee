//! Scheduler Kernel
//!
//! # Overview
//!
//! The kernel serializes a multi-threaded test: at any instant exactly one
//! operation runs user code, and every scheduling decision is delegated to
//! the configured exploration strategy. User threads cede control by calling
//! into the kernel; the kernel parks them on per-operation condition
//! variables and wakes exactly the one the strategy picked.
//!
//! # Concurrency Model
//!
//! One `parking_lot::Mutex` guards the whole kernel state. Every public
//! entry point holds it for its full duration, releasing it only while
//! parked on a condition variable:
//!
//! - `start_operation` parks until the operation is first scheduled,
//! - `schedule_next` (and every blocking operation that ends in a handoff)
//!   parks the previous operation until it is scheduled again,
//! - `schedule_next` also parks until all created operations have started,
//!   so the strategy never decides over a half-registered enabled set.
//!
//! The strategy is only ever touched under the kernel mutex.
//!
//! # Determinism
//!
//! The sequence of scheduling decisions is a function of the seed, the
//! structure of the test, and the operation-creation order. Re-running with
//! the same seed and deterministic user code replays the same schedule.
//!
//! # Cancellation
//!
//! `detach` is the only cancellation path: it completes every operation,
//! wakes every parked thread, and those threads observe the detached state
//! and return [`ClientNotAttached`](SchedulerError::ClientNotAttached).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::enabled::EnabledOperations;
use crate::domain::operation::{Operation, OperationId, OperationStatus};
use crate::domain::resource::{Resource, ResourceId};
use crate::domain::strategy::{ExplorationStrategy, Strategy};
use crate::error::{SchedulerError, SchedulerResult};

/// The reserved id of the main operation, created by `attach` and
/// representing the test driver itself.
pub const MAIN_OPERATION_ID: OperationId = OperationId(0);

/// State behind the kernel mutex.
struct KernelState {
    /// Map from unique operation ids to their control blocks.
    operations: HashMap<OperationId, Operation>,
    /// Map from unique resource ids to their blocked sets.
    resources: HashMap<ResourceId, Resource>,
    /// Enabled and blocked operations, in creation order.
    enabled: EnabledOperations,
    /// The configured exploration strategy; `None` disables the kernel.
    strategy: Option<ExplorationStrategy>,
    /// The operation currently holding the execution token.
    scheduled_op_id: OperationId,
    /// Created operations whose threads have not called `start_operation`.
    pending_start_count: usize,
    /// Monotonic counter handing out creation sequence numbers.
    creation_counter: u64,
    /// True while an iteration is attached.
    is_attached: bool,
    /// Attach/detach cycles seen so far.
    iteration_count: u64,
    /// The first failure of the most recent call, if any.
    last_error: Option<SchedulerError>,
}

/// Controlled concurrency scheduler.
///
/// One instance serializes one test process. Clients instantiate and own it
/// (usually behind an `Arc` shared with the worker threads); there is no
/// process-global state.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::thread;
/// use weft::{Config, OperationId, Scheduler, StrategyKind};
///
/// let scheduler = Arc::new(Scheduler::with_config(
///     Config::new().with_strategy(StrategyKind::Pct).with_random_seed(42),
/// ));
///
/// scheduler.attach().unwrap();
/// scheduler.create_operation(OperationId(1)).unwrap();
///
/// let worker = {
///     let scheduler = Arc::clone(&scheduler);
///     thread::spawn(move || {
///         scheduler.start_operation(OperationId(1)).unwrap();
///         // ... controlled work ...
///         scheduler.complete_operation(OperationId(1)).unwrap();
///     })
/// };
///
/// scheduler.join_operation(OperationId(1)).unwrap();
/// worker.join().unwrap();
/// scheduler.detach().unwrap();
/// ```
pub struct Scheduler {
    state: Mutex<KernelState>,
    /// Signaled when the last pending operation starts; `schedule_next`
    /// drains this before consulting the strategy.
    pending_start_cv: Condvar,
    config: Config,
}

impl Scheduler {
    /// Create a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a scheduler with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            state: Mutex::new(KernelState {
                operations: HashMap::new(),
                resources: HashMap::new(),
                enabled: EnabledOperations::new(),
                strategy: ExplorationStrategy::from_config(&config),
                scheduled_op_id: MAIN_OPERATION_ID,
                pending_start_count: 0,
                creation_counter: 0,
                is_attached: false,
                iteration_count: 0,
                last_error: None,
            }),
            pending_start_cv: Condvar::new(),
            config,
        }
    }

    // === Lifecycle ===

    /// Attach to the scheduler, beginning a testing iteration.
    ///
    /// Creates and starts the main operation (id 0), which becomes the
    /// initially scheduled operation. From the second iteration on, the
    /// strategy is rolled over first.
    pub fn attach(&self) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.attach_locked(&mut guard);
        Self::latch(&mut guard, result)
    }

    /// Detach from the scheduler, ending the iteration.
    ///
    /// Completes every operation, wakes every parked thread, and clears all
    /// kernel state. Threads that were inside a scheduler call return
    /// [`ClientNotAttached`](SchedulerError::ClientNotAttached).
    pub fn detach(&self) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.detach_locked(&mut guard);
        Self::latch(&mut guard, result)
    }

    // === Operations ===

    /// Declare a new operation with the given id.
    ///
    /// Must be called before the operation's thread is spawned, so the
    /// kernel can account for the pending start. A `Completed` slot with the
    /// same id is reset for reuse.
    pub fn create_operation(&self, id: OperationId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.create_operation_locked(&mut guard, id);
        Self::latch(&mut guard, result)
    }

    /// Start executing the operation with the given id.
    ///
    /// Called by the worker thread itself. Blocks until the strategy first
    /// schedules this operation.
    pub fn start_operation(&self, id: OperationId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.start_operation_locked(&mut guard, id);
        Self::latch(&mut guard, result)
    }

    /// Block the calling operation until the target operation completes.
    ///
    /// A target that has already completed satisfies the join immediately.
    pub fn join_operation(&self, id: OperationId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.join_operations_locked(&mut guard, &[id], true);
        Self::latch(&mut guard, result)
    }

    /// Block the calling operation until the target operations complete.
    ///
    /// With `wait_all`, every target must complete; otherwise the first
    /// completion releases the caller.
    pub fn join_operations(&self, ids: &[OperationId], wait_all: bool) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.join_operations_locked(&mut guard, ids, wait_all);
        Self::latch(&mut guard, result)
    }

    /// Complete the operation with the given id and schedule the next one.
    ///
    /// Called by the worker thread itself as its last scheduler call.
    pub fn complete_operation(&self, id: OperationId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.complete_operation_locked(&mut guard, id);
        Self::latch(&mut guard, result)
    }

    // === Resources ===

    /// Create a new resource with the given id.
    pub fn create_resource(&self, id: ResourceId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.create_resource_locked(&mut guard, id);
        Self::latch(&mut guard, result)
    }

    /// Block the calling operation until the resource is signaled.
    pub fn wait_resource(&self, id: ResourceId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.wait_resources_locked(&mut guard, &[id], true);
        Self::latch(&mut guard, result)
    }

    /// Block the calling operation until the resources are signaled.
    ///
    /// With `wait_all`, every resource must be signaled; otherwise the first
    /// signal releases the caller.
    pub fn wait_resources(&self, ids: &[ResourceId], wait_all: bool) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.wait_resources_locked(&mut guard, ids, wait_all);
        Self::latch(&mut guard, result)
    }

    /// Signal the resource to every operation blocked on it.
    pub fn signal_resource(&self, id: ResourceId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.signal_resource_locked(&mut guard, id, None);
        Self::latch(&mut guard, result)
    }

    /// Signal the resource to one specific blocked operation.
    ///
    /// Operations not currently blocked on the resource are left untouched.
    pub fn signal_resource_for(&self, id: ResourceId, op: OperationId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.signal_resource_locked(&mut guard, id, Some(op));
        Self::latch(&mut guard, result)
    }

    /// Delete the resource with the given id.
    pub fn delete_resource(&self, id: ResourceId) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.delete_resource_locked(&mut guard, id);
        Self::latch(&mut guard, result)
    }

    // === Scheduling ===

    /// Introduce a scheduling point: let the strategy pick the next
    /// operation, which may or may not be the caller.
    pub fn schedule_next(&self) -> SchedulerResult<()> {
        let mut guard = self.state.lock();
        let result = self.schedule_next_locked(&mut guard);
        Self::latch(&mut guard, result)
    }

    /// Draw a controlled nondeterministic boolean from the strategy.
    pub fn next_boolean(&self) -> SchedulerResult<bool> {
        let mut guard = self.state.lock();
        let result = match guard.strategy.as_mut() {
            None => Err(SchedulerError::SchedulerDisabled),
            Some(strategy) => Ok(strategy.next_boolean()),
        };
        Self::latch(&mut guard, result)
    }

    /// Draw a controlled nondeterministic integer in `[0, max_exclusive)`.
    pub fn next_integer(&self, max_exclusive: u64) -> SchedulerResult<u64> {
        let mut guard = self.state.lock();
        let result = match guard.strategy.as_mut() {
            None => Err(SchedulerError::SchedulerDisabled),
            Some(strategy) => Ok(strategy.next_integer(max_exclusive)),
        };
        Self::latch(&mut guard, result)
    }

    // === Introspection ===

    /// The seed that produced the current iteration.
    pub fn random_seed(&self) -> u64 {
        let guard = self.state.lock();
        guard
            .strategy
            .as_ref()
            .map(Strategy::random_seed)
            .unwrap_or(self.config.random_seed)
    }

    /// The id of the operation currently holding the execution token.
    pub fn scheduled_operation_id(&self) -> OperationId {
        self.state.lock().scheduled_op_id
    }

    /// The status of the given operation, if it exists.
    pub fn operation_status(&self, id: OperationId) -> Option<OperationStatus> {
        self.state.lock().operations.get(&id).map(Operation::status)
    }

    /// Whether an iteration is currently attached.
    pub fn is_attached(&self) -> bool {
        self.state.lock().is_attached
    }

    /// Attach/detach cycles seen so far.
    pub fn iteration_count(&self) -> u64 {
        self.state.lock().iteration_count
    }

    /// The first failure of the most recent call, if any.
    pub fn last_error(&self) -> Option<SchedulerError> {
        self.state.lock().last_error
    }

    // === Internals ===

    fn check_enabled(state: &KernelState) -> SchedulerResult<()> {
        if state.strategy.is_none() {
            return Err(SchedulerError::SchedulerDisabled);
        }
        Ok(())
    }

    fn check_attached(state: &KernelState) -> SchedulerResult<()> {
        if !state.is_attached {
            return Err(SchedulerError::ClientNotAttached);
        }
        Ok(())
    }

    fn latch<T>(state: &mut KernelState, result: SchedulerResult<T>) -> SchedulerResult<T> {
        if let Err(code) = result {
            state.last_error = Some(code);
        }
        result
    }

    fn attach_locked(&self, guard: &mut MutexGuard<'_, KernelState>) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        if guard.is_attached {
            return Err(SchedulerError::ClientAttached);
        }

        guard.is_attached = true;
        guard.iteration_count += 1;
        guard.last_error = None;
        debug!(iteration = guard.iteration_count, "attaching the main operation");

        if guard.iteration_count > 1 {
            let iteration = guard.iteration_count;
            if let Some(strategy) = guard.strategy.as_mut() {
                strategy.prepare_next_iteration(iteration);
            }
        }

        Self::create_operation_inner(guard, MAIN_OPERATION_ID)?;
        self.start_operation_inner(guard, MAIN_OPERATION_ID)
    }

    fn detach_locked(&self, guard: &mut MutexGuard<'_, KernelState>) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;
        debug!("detaching and releasing all operations");

        guard.is_attached = false;
        for op in guard.operations.values_mut() {
            if op.status != OperationStatus::Completed {
                debug!(operation = %op.id, "canceling operation");
                op.is_scheduled = true;
                op.status = OperationStatus::Completed;
                op.cv.notify_all();
            }
        }

        guard.operations.clear();
        guard.resources.clear();
        guard.enabled.clear();
        guard.pending_start_count = 0;
        self.pending_start_cv.notify_all();
        Ok(())
    }

    fn create_operation_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        id: OperationId,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;
        if id == MAIN_OPERATION_ID {
            return Err(SchedulerError::MainOperationExplicitlyCreated);
        }
        debug!(operation = %id, "creating operation");
        Self::create_operation_inner(guard, id)
    }

    fn create_operation_inner(state: &mut KernelState, id: OperationId) -> SchedulerResult<()> {
        if let Some(existing) = state.operations.get_mut(&id) {
            if existing.status != OperationStatus::Completed {
                return Err(SchedulerError::DuplicateOperation);
            }
            // A completed slot is reset so the id can back a new thread.
            existing.reset();
        } else {
            let seq = state.creation_counter;
            state.creation_counter += 1;
            let mut op = Operation::new(id, seq);
            if state.operations.is_empty() {
                // The first operation of the iteration starts out scheduled.
                state.scheduled_op_id = id;
                op.is_scheduled = true;
            }
            state.operations.insert(id, op);
        }

        state.pending_start_count += 1;
        Ok(())
    }

    fn start_operation_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        id: OperationId,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;
        if id == MAIN_OPERATION_ID {
            return Err(SchedulerError::MainOperationExplicitlyStarted);
        }
        debug!(operation = %id, "starting operation");
        self.start_operation_inner(guard, id)
    }

    fn start_operation_inner(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        id: OperationId,
    ) -> SchedulerResult<()> {
        {
            let op = guard
                .operations
                .get(&id)
                .ok_or(SchedulerError::NotExistingOperation)?;
            if op.status == OperationStatus::Completed {
                return Err(SchedulerError::OperationAlreadyCompleted);
            }
            if op.status != OperationStatus::Created {
                return Err(SchedulerError::OperationAlreadyStarted);
            }
        }

        guard.pending_start_count -= 1;
        debug!(pending = guard.pending_start_count, "operations pending start");
        if guard.pending_start_count == 0 {
            self.pending_start_cv.notify_all();
        }

        let op = guard
            .operations
            .get_mut(&id)
            .ok_or(SchedulerError::InternalError)?;
        op.status = OperationStatus::Enabled;
        let seq = op.seq;
        let cv = Arc::clone(&op.cv);
        op.cv.notify_all();
        guard.enabled.insert(seq, id);

        self.wait_until_scheduled(guard, id, &cv)
    }

    fn join_operations_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        ids: &[OperationId],
        wait_all: bool,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;

        let mut pending = Vec::with_capacity(ids.len());
        for &id in ids {
            match guard.operations.get(&id) {
                None => {
                    debug!(operation = %id, "join target does not exist");
                    return Err(SchedulerError::NotExistingOperation);
                }
                Some(op) if op.status == OperationStatus::Completed => {
                    debug!(operation = %id, "join target already completed");
                }
                Some(_) => pending.push(id),
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        let current = guard.scheduled_op_id;
        debug!(operation = %current, targets = pending.len(), wait_all, "joining operations");
        for &target in &pending {
            if let Some(op) = guard.operations.get_mut(&target) {
                op.join_waiters.insert(current);
            }
        }

        let op = guard
            .operations
            .get_mut(&current)
            .ok_or(SchedulerError::InternalError)?;
        op.block_on_joins(&pending, wait_all);
        guard.enabled.disable(current);

        self.schedule_next_inner(guard)
    }

    fn complete_operation_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        id: OperationId,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;
        if id == MAIN_OPERATION_ID {
            return Err(SchedulerError::MainOperationExplicitlyCompleted);
        }
        debug!(operation = %id, "completing operation");

        let op = guard
            .operations
            .get_mut(&id)
            .ok_or(SchedulerError::NotExistingOperation)?;
        match op.status {
            OperationStatus::Completed => return Err(SchedulerError::OperationAlreadyCompleted),
            OperationStatus::Created => return Err(SchedulerError::OperationNotStarted),
            _ => {}
        }

        op.status = OperationStatus::Completed;
        let waiters: Vec<OperationId> = op.join_waiters.drain().collect();
        guard.enabled.remove(id);

        // Release any operations joined on this one.
        for waiter in waiters {
            let released = match guard.operations.get_mut(&waiter) {
                Some(op) => op.on_join_target_completed(id),
                None => false,
            };
            if released {
                guard.enabled.enable(waiter);
            }
        }

        self.schedule_next_inner(guard)
    }

    fn create_resource_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        id: ResourceId,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;
        debug!(resource = %id, "creating resource");

        if guard.resources.contains_key(&id) {
            return Err(SchedulerError::DuplicateResource);
        }
        guard.resources.insert(id, Resource::new(id));
        Ok(())
    }

    fn wait_resources_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        ids: &[ResourceId],
        wait_all: bool,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;

        for &rid in ids {
            if !guard.resources.contains_key(&rid) {
                return Err(SchedulerError::NotExistingResource);
            }
        }

        let current = guard.scheduled_op_id;
        debug!(operation = %current, resources = ids.len(), wait_all, "waiting for resources");
        for &rid in ids {
            if let Some(resource) = guard.resources.get_mut(&rid) {
                resource.blocked.insert(current);
            }
        }

        let op = guard
            .operations
            .get_mut(&current)
            .ok_or(SchedulerError::InternalError)?;
        op.block_on_resources(ids, wait_all);
        guard.enabled.disable(current);

        self.schedule_next_inner(guard)
    }

    fn signal_resource_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        id: ResourceId,
        target: Option<OperationId>,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;

        let resource = guard
            .resources
            .get_mut(&id)
            .ok_or(SchedulerError::NotExistingResource)?;

        let released: Vec<OperationId> = match target {
            None => {
                debug!(resource = %id, waiters = resource.blocked.len(), "signaling all blocked operations");
                resource.blocked.drain().collect()
            }
            Some(op) => {
                debug!(resource = %id, operation = %op, "signaling blocked operation");
                if resource.blocked.remove(&op) {
                    vec![op]
                } else {
                    Vec::new()
                }
            }
        };

        for op_id in released {
            let unblocked = match guard.operations.get_mut(&op_id) {
                Some(op) => op.on_resource_signaled(id),
                None => false,
            };
            if unblocked {
                guard.enabled.enable(op_id);
            }
        }
        Ok(())
    }

    fn delete_resource_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        id: ResourceId,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;
        debug!(resource = %id, "deleting resource");

        let resource = guard
            .resources
            .get(&id)
            .ok_or(SchedulerError::NotExistingResource)?;
        if resource.waiter_count() > 0 {
            warn!(
                resource = %id,
                waiters = resource.waiter_count(),
                "deleting a resource with blocked operations"
            );
        }
        guard.resources.remove(&id);
        Ok(())
    }

    fn schedule_next_locked(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
    ) -> SchedulerResult<()> {
        Self::check_enabled(guard)?;
        Self::check_attached(guard)?;
        self.schedule_next_inner(guard)
    }

    /// The central handoff. Must be called with the kernel mutex held.
    fn schedule_next_inner(&self, guard: &mut MutexGuard<'_, KernelState>) -> SchedulerResult<()> {
        debug!(operation = %guard.scheduled_op_id, "scheduling next operation");

        // Wait for any recently created operations to start, so the strategy
        // sees a fully registered enabled set.
        while guard.pending_start_count > 0 {
            debug!(pending = guard.pending_start_count, "waiting for pending operations");
            self.pending_start_cv.wait(guard);
            if !guard.is_attached {
                return Err(SchedulerError::ClientNotAttached);
            }
        }

        // Check if the schedule has finished or if there is a deadlock.
        if guard.enabled.is_empty() {
            if guard.enabled.blocked_len() > 0 {
                debug!("deadlock detected");
                return Err(SchedulerError::DeadlockDetected);
            }
            debug!("no enabled operation to schedule");
            return Ok(());
        }

        // Ask the strategy for the next operation to schedule.
        let state = &mut **guard;
        let strategy = state
            .strategy
            .as_mut()
            .ok_or(SchedulerError::SchedulerDisabled)?;
        let next_id = strategy.next_operation(&state.enabled, state.scheduled_op_id)?;

        let previous_id = state.scheduled_op_id;
        state.scheduled_op_id = next_id;
        debug!(operation = %next_id, "next operation");

        if previous_id != next_id {
            // Resume the next operation.
            {
                let next_op = state
                    .operations
                    .get_mut(&next_id)
                    .ok_or(SchedulerError::InternalError)?;
                next_op.is_scheduled = true;
                next_op.cv.notify_all();
            }

            // Pause the previous operation until it is scheduled again.
            let previous = guard
                .operations
                .get_mut(&previous_id)
                .ok_or(SchedulerError::InternalError)?;
            if previous.status != OperationStatus::Completed {
                previous.is_scheduled = false;
                let cv = Arc::clone(&previous.cv);
                self.wait_until_scheduled(guard, previous_id, &cv)?;
            }
        }
        Ok(())
    }

    /// Park the calling thread until its operation holds the execution
    /// token. The kernel mutex is released while parked.
    fn wait_until_scheduled(
        &self,
        guard: &mut MutexGuard<'_, KernelState>,
        id: OperationId,
        cv: &Arc<Condvar>,
    ) -> SchedulerResult<()> {
        loop {
            match guard.operations.get(&id) {
                Some(op) if op.is_scheduled => return Ok(()),
                Some(_) => {}
                None => return Err(SchedulerError::ClientNotAttached),
            }
            debug!(operation = %id, "pausing operation");
            cv.wait(guard);
            debug!(operation = %id, "resuming operation");
            if !guard.is_attached {
                return Err(SchedulerError::ClientNotAttached);
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyKind;

    fn pct_scheduler() -> Scheduler {
        Scheduler::with_config(
            Config::new()
                .with_strategy(StrategyKind::Pct)
                .with_random_seed(42)
                .with_strategy_bound(3),
        )
    }

    #[test]
    fn test_disabled_strategy_short_circuits() {
        let scheduler = Scheduler::with_config(Config::new().with_strategy(StrategyKind::None));
        assert_eq!(scheduler.attach(), Err(SchedulerError::SchedulerDisabled));
        assert_eq!(
            scheduler.create_operation(OperationId(1)),
            Err(SchedulerError::SchedulerDisabled)
        );
        assert_eq!(
            scheduler.next_boolean(),
            Err(SchedulerError::SchedulerDisabled)
        );
        assert_eq!(
            scheduler.last_error(),
            Some(SchedulerError::SchedulerDisabled)
        );
    }

    #[test]
    fn test_calls_require_attach() {
        let scheduler = pct_scheduler();
        assert_eq!(
            scheduler.create_operation(OperationId(1)),
            Err(SchedulerError::ClientNotAttached)
        );
        assert_eq!(
            scheduler.create_resource(ResourceId(1)),
            Err(SchedulerError::ClientNotAttached)
        );
        assert_eq!(
            scheduler.schedule_next(),
            Err(SchedulerError::ClientNotAttached)
        );
        assert_eq!(scheduler.detach(), Err(SchedulerError::ClientNotAttached));
    }

    #[test]
    fn test_double_attach_is_rejected() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();
        assert_eq!(scheduler.attach(), Err(SchedulerError::ClientAttached));
        scheduler.detach().unwrap();
    }

    #[test]
    fn test_attach_detach_round_trip() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();
        assert!(scheduler.is_attached());
        assert_eq!(scheduler.iteration_count(), 1);
        assert_eq!(scheduler.scheduled_operation_id(), MAIN_OPERATION_ID);

        scheduler.detach().unwrap();
        assert!(!scheduler.is_attached());
        assert_eq!(scheduler.operation_status(MAIN_OPERATION_ID), None);

        // A second iteration attaches cleanly.
        scheduler.attach().unwrap();
        assert_eq!(scheduler.iteration_count(), 2);
        scheduler.detach().unwrap();
    }

    #[test]
    fn test_main_operation_is_reserved() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();
        assert_eq!(
            scheduler.create_operation(MAIN_OPERATION_ID),
            Err(SchedulerError::MainOperationExplicitlyCreated)
        );
        assert_eq!(
            scheduler.start_operation(MAIN_OPERATION_ID),
            Err(SchedulerError::MainOperationExplicitlyStarted)
        );
        assert_eq!(
            scheduler.complete_operation(MAIN_OPERATION_ID),
            Err(SchedulerError::MainOperationExplicitlyCompleted)
        );
        scheduler.detach().unwrap();
    }

    #[test]
    fn test_duplicate_operation_is_rejected() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();
        scheduler.create_operation(OperationId(1)).unwrap();
        assert_eq!(
            scheduler.create_operation(OperationId(1)),
            Err(SchedulerError::DuplicateOperation)
        );
        scheduler.detach().unwrap();
    }

    #[test]
    fn test_complete_before_start_is_rejected() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();
        scheduler.create_operation(OperationId(1)).unwrap();
        assert_eq!(
            scheduler.complete_operation(OperationId(1)),
            Err(SchedulerError::OperationNotStarted)
        );
        assert_eq!(
            scheduler.complete_operation(OperationId(9)),
            Err(SchedulerError::NotExistingOperation)
        );
        assert_eq!(
            scheduler.start_operation(OperationId(9)),
            Err(SchedulerError::NotExistingOperation)
        );
        scheduler.detach().unwrap();
    }

    #[test]
    fn test_resource_round_trip() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();

        scheduler.create_resource(ResourceId(1)).unwrap();
        assert_eq!(
            scheduler.create_resource(ResourceId(1)),
            Err(SchedulerError::DuplicateResource)
        );
        scheduler.delete_resource(ResourceId(1)).unwrap();
        assert_eq!(
            scheduler.delete_resource(ResourceId(1)),
            Err(SchedulerError::NotExistingResource)
        );
        assert_eq!(
            scheduler.signal_resource(ResourceId(1)),
            Err(SchedulerError::NotExistingResource)
        );

        scheduler.detach().unwrap();
    }

    #[test]
    fn test_join_missing_operation() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();
        assert_eq!(
            scheduler.join_operation(OperationId(5)),
            Err(SchedulerError::NotExistingOperation)
        );
        scheduler.detach().unwrap();
    }

    #[test]
    fn test_self_deadlock_is_detected() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();
        scheduler.create_resource(ResourceId(1)).unwrap();

        // The main operation waits on a resource no one will signal.
        assert_eq!(
            scheduler.wait_resource(ResourceId(1)),
            Err(SchedulerError::DeadlockDetected)
        );
        assert_eq!(
            scheduler.last_error(),
            Some(SchedulerError::DeadlockDetected)
        );
        scheduler.detach().unwrap();
    }

    #[test]
    fn test_last_error_resets_on_attach() {
        let scheduler = pct_scheduler();
        assert_eq!(
            scheduler.schedule_next(),
            Err(SchedulerError::ClientNotAttached)
        );
        assert!(scheduler.last_error().is_some());

        scheduler.attach().unwrap();
        assert_eq!(scheduler.last_error(), None);
        scheduler.detach().unwrap();
    }

    #[test]
    fn test_random_seed_is_exposed() {
        let scheduler = pct_scheduler();
        assert_eq!(scheduler.random_seed(), 42);
    }

    #[test]
    fn test_schedule_next_with_only_main() {
        let scheduler = pct_scheduler();
        scheduler.attach().unwrap();
        // Only the main operation exists; the handoff is a no-op.
        scheduler.schedule_next().unwrap();
        scheduler.schedule_next().unwrap();
        assert_eq!(scheduler.scheduled_operation_id(), MAIN_OPERATION_ID);
        scheduler.detach().unwrap();
    }
}

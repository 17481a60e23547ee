//! PCT Exploration Strategy
//!
//! Priority-based Controlled Testing (Burckhardt et al., "A Randomized
//! Scheduler with Probabilistic Guarantees of Finding Bugs", ASPLOS 2010).
//!
//! # Algorithm
//!
//! Each operation gets a position in a priority list (front = highest). The
//! scheduler always runs the highest-priority enabled operation. At up to
//! `K` randomly chosen steps per iteration, the currently highest-priority
//! enabled operation is demoted to the tail. For a program with `n` threads
//! and schedules of length `N`, a bug of depth `d ≤ K` is hit with
//! probability at least `1 / (N · n^(d−1))` per iteration.
//!
//! # Invariants
//!
//! - Newcomers are inserted at a random index in `[1, len]`, never at the
//!   head: a newly created operation must not preempt the running priority
//!   order on arrival.
//! - Change points are drawn from `[1, schedule_length)` by a Fisher–Yates
//!   shuffle; at most `min(K, schedule_length − 1)` are active.
//! - Priority assignment and the shuffle draw from one generator without
//!   reseeding, so a whole run replays from a single seed.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::domain::enabled::EnabledOperations;
use crate::domain::operation::OperationId;
use crate::domain::random::XorShift64;
use crate::domain::strategy::Strategy;
use crate::error::{SchedulerError, SchedulerResult};

/// Priority-based controlled testing strategy.
#[derive(Debug)]
pub struct PctStrategy {
    /// The pseudo-random generator. One stream per run.
    rng: XorShift64,
    /// The seed that produced the current iteration.
    iteration_seed: u64,
    /// Max number of priority change points during one iteration (`K`).
    max_priority_switches: usize,
    /// Prioritized operations; index 0 is the highest priority.
    prioritized: Vec<OperationId>,
    /// Operations that already have a priority.
    known: HashSet<OperationId>,
    /// Step indices at which the top operation is deprioritized.
    change_points: BTreeSet<usize>,
    /// Scheduling decisions taken during the current iteration.
    scheduled_steps: usize,
    /// Longest schedule observed across iterations.
    schedule_length: usize,
}

impl PctStrategy {
    /// Create a PCT strategy from a seed and the change-point bound.
    pub fn new(seed: u64, max_priority_switches: usize) -> Self {
        Self {
            rng: XorShift64::new(seed),
            iteration_seed: seed,
            max_priority_switches,
            prioritized: Vec::new(),
            known: HashSet::new(),
            change_points: BTreeSet::new(),
            scheduled_steps: 0,
            schedule_length: 0,
        }
    }

    /// Scheduling decisions taken so far in this iteration.
    #[inline]
    pub fn scheduled_steps(&self) -> usize {
        self.scheduled_steps
    }

    /// Longest schedule observed across iterations.
    #[inline]
    pub fn schedule_length(&self) -> usize {
        self.schedule_length
    }

    /// The active change points, for inspection in tests and debugging.
    pub fn priority_change_points(&self) -> &BTreeSet<usize> {
        &self.change_points
    }

    /// The current priority order, highest first, for inspection.
    pub fn priorities(&self) -> &[OperationId] {
        &self.prioritized
    }

    /// Assign priorities to operations seen for the first time.
    ///
    /// The very first operation seeds the list at the head; every later
    /// newcomer lands at a random index in `[1, len]`.
    fn assign_new_priorities(&mut self, enabled: &EnabledOperations, current: OperationId) {
        if self.prioritized.is_empty() {
            self.prioritized.push(current);
            self.known.insert(current);
            debug!(operation = %current, priority = 0usize, "assigning priority");
        }

        for id in enabled.iter() {
            if self.known.contains(&id) {
                continue;
            }
            let index = (self.rng.next_below(self.prioritized.len() as u64) as usize) + 1;
            self.prioritized.insert(index, id);
            self.known.insert(id);
            debug!(operation = %id, priority = index, "assigning priority");
        }
    }

    /// Demote the highest-priority enabled operation if a change point is due.
    fn try_deprioritize(&mut self, enabled: &EnabledOperations) -> SchedulerResult<bool> {
        if enabled.len() <= 1 {
            // Only one choice anyway.
            return Ok(false);
        }
        if !self.change_points.contains(&self.scheduled_steps) {
            return Ok(false);
        }

        let op = self.highest_enabled(enabled)?;
        self.prioritized.retain(|&p| p != op);
        self.prioritized.push(op);
        debug!(operation = %op, step = self.scheduled_steps, "deprioritized");
        Ok(true)
    }

    /// First operation in priority order that is currently enabled.
    fn highest_enabled(&self, enabled: &EnabledOperations) -> SchedulerResult<OperationId> {
        self.prioritized
            .iter()
            .copied()
            .find(|&id| enabled.is_enabled(id))
            .ok_or(SchedulerError::InternalError)
    }

    /// Rebuild the change-point set for a new iteration.
    ///
    /// Shuffles the step range `[1, schedule_length)` with Fisher–Yates and
    /// keeps the first `max_priority_switches` entries.
    fn shuffle_priority_change_points(&mut self) {
        if self.schedule_length <= 1 {
            return;
        }

        let mut range: Vec<usize> = (1..self.schedule_length).collect();
        for idx in (1..range.len()).rev() {
            let point = self.rng.next_below(range.len() as u64) as usize;
            range.swap(idx, point);
        }

        for &step in range.iter().take(self.max_priority_switches) {
            debug!(step, "assigning priority change point");
            self.change_points.insert(step);
        }
    }
}

impl Strategy for PctStrategy {
    fn next_operation(
        &mut self,
        enabled: &EnabledOperations,
        current: OperationId,
    ) -> SchedulerResult<OperationId> {
        self.assign_new_priorities(enabled, current);
        self.try_deprioritize(enabled)?;
        self.scheduled_steps += 1;
        self.highest_enabled(enabled)
    }

    fn next_boolean(&mut self) -> bool {
        self.scheduled_steps += 1;
        self.rng.next_bool()
    }

    fn next_integer(&mut self, max_exclusive: u64) -> u64 {
        self.scheduled_steps += 1;
        self.rng.next_below(max_exclusive)
    }

    fn random_seed(&self) -> u64 {
        self.iteration_seed
    }

    /// Prepare the strategy for the given iteration.
    ///
    /// Iteration 1 is left untouched so one unperturbed schedule is always
    /// explored. From iteration 2 on, the observed schedule length is folded
    /// into the running maximum and fresh change points are drawn.
    fn prepare_next_iteration(&mut self, iteration: u64) {
        if iteration <= 1 {
            return;
        }

        if self.schedule_length < self.scheduled_steps {
            self.schedule_length = self.scheduled_steps;
        }
        self.scheduled_steps = 0;

        self.prioritized.clear();
        self.known.clear();
        self.change_points.clear();

        self.shuffle_priority_change_points();
    }
}

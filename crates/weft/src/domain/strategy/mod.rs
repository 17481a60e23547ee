//! Exploration Strategies
//!
//! The scheduler interacts with its strategy through a small capability set:
//! pick the next operation, draw nondeterministic values, report the seed,
//! and roll over between iterations. Strategies are selected at construction
//! time from [`Config`](crate::Config) and dispatched through a tagged enum,
//! so the scheduler never pays for dynamic dispatch and the set of strategies
//! is closed and auditable.

pub mod pct;
pub mod random;

pub use pct::PctStrategy;
pub use random::RandomStrategy;

use crate::config::{Config, StrategyKind};
use crate::domain::enabled::EnabledOperations;
use crate::domain::operation::OperationId;
use crate::error::SchedulerResult;

/// Capability set the scheduler requires from an exploration strategy.
///
/// All methods are called with the scheduler mutex held, so implementations
/// are free to keep plain mutable state.
pub trait Strategy {
    /// Choose the next operation to schedule.
    ///
    /// `enabled` is never empty when the scheduler calls this; `current` is
    /// the operation holding the execution token (it may itself be blocked).
    ///
    /// # Errors
    ///
    /// [`InternalError`](crate::SchedulerError::InternalError) if the
    /// strategy's bookkeeping and the enabled set have diverged.
    fn next_operation(
        &mut self,
        enabled: &EnabledOperations,
        current: OperationId,
    ) -> SchedulerResult<OperationId>;

    /// Draw a nondeterministic boolean.
    fn next_boolean(&mut self) -> bool;

    /// Draw a nondeterministic integer in `[0, max_exclusive)`.
    fn next_integer(&mut self, max_exclusive: u64) -> u64;

    /// The seed that produced the current iteration, for reproduction.
    fn random_seed(&self) -> u64;

    /// Roll strategy state over to the given iteration (1-based).
    fn prepare_next_iteration(&mut self, iteration: u64);
}

/// Tagged dispatcher over the available strategies.
#[derive(Debug)]
pub enum ExplorationStrategy {
    /// Uniformly random exploration.
    Random(RandomStrategy),
    /// Priority-based controlled testing.
    Pct(PctStrategy),
}

impl ExplorationStrategy {
    /// Build the strategy selected by the configuration.
    ///
    /// Returns `None` for [`StrategyKind::None`]: the scheduler then rejects
    /// every call with [`SchedulerDisabled`](crate::SchedulerError::SchedulerDisabled).
    pub fn from_config(config: &Config) -> Option<Self> {
        match config.strategy {
            StrategyKind::None => None,
            StrategyKind::Random => Some(Self::Random(RandomStrategy::new(config.random_seed))),
            StrategyKind::Pct => Some(Self::Pct(PctStrategy::new(
                config.random_seed,
                config.strategy_bound,
            ))),
        }
    }
}

impl Strategy for ExplorationStrategy {
    fn next_operation(
        &mut self,
        enabled: &EnabledOperations,
        current: OperationId,
    ) -> SchedulerResult<OperationId> {
        match self {
            Self::Random(s) => s.next_operation(enabled, current),
            Self::Pct(s) => s.next_operation(enabled, current),
        }
    }

    fn next_boolean(&mut self) -> bool {
        match self {
            Self::Random(s) => s.next_boolean(),
            Self::Pct(s) => s.next_boolean(),
        }
    }

    fn next_integer(&mut self, max_exclusive: u64) -> u64 {
        match self {
            Self::Random(s) => s.next_integer(max_exclusive),
            Self::Pct(s) => s.next_integer(max_exclusive),
        }
    }

    fn random_seed(&self) -> u64 {
        match self {
            Self::Random(s) => s.random_seed(),
            Self::Pct(s) => s.random_seed(),
        }
    }

    fn prepare_next_iteration(&mut self, iteration: u64) {
        match self {
            Self::Random(s) => s.prepare_next_iteration(iteration),
            Self::Pct(s) => s.prepare_next_iteration(iteration),
        }
    }
}

//! # Scheduler Configuration
//!
//! A [`Config`] is captured once when a [`Scheduler`](crate::Scheduler) is
//! constructed and never changes afterwards: the random seed feeds the
//! exploration strategy of iteration 1, and the strategy kind plus its bound
//! select which exploration strategy the scheduler consults.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default random seed used when none is configured.
///
/// Tests that care about a specific schedule should set their own seed; the
/// default exists so that out-of-the-box runs are still reproducible.
pub const DEFAULT_RANDOM_SEED: u64 = 5489;

/// Default bound on PCT priority change points per iteration.
pub const DEFAULT_STRATEGY_BOUND: usize = 10;

/// Which exploration strategy drives scheduling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// No exploration: every scheduler call short-circuits with
    /// [`SchedulerDisabled`](crate::SchedulerError::SchedulerDisabled).
    None,
    /// Uniformly random choice over the enabled operations.
    Random,
    /// Priority-based controlled testing (PCT) with a bounded number of
    /// priority change points per iteration.
    Pct,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Random => write!(f, "random"),
            Self::Pct => write!(f, "pct"),
        }
    }
}

/// Scheduler configuration.
///
/// # Example
///
/// ```rust
/// use weft::{Config, StrategyKind};
///
/// let config = Config::new()
///     .with_random_seed(42)
///     .with_strategy(StrategyKind::Pct)
///     .with_strategy_bound(3);
///
/// assert_eq!(config.random_seed, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Seed for the strategy RNG in iteration 1.
    pub random_seed: u64,
    /// Which exploration strategy to use.
    pub strategy: StrategyKind,
    /// Strategy-specific bound. For PCT this is the maximum number of
    /// priority change points injected per iteration.
    pub strategy_bound: usize,
}

impl Config {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            random_seed: DEFAULT_RANDOM_SEED,
            strategy: StrategyKind::Random,
            strategy_bound: DEFAULT_STRATEGY_BOUND,
        }
    }

    /// Set the random seed for iteration 1.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Select the exploration strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the strategy bound (PCT: max priority change points).
    pub fn with_strategy_bound(mut self, bound: usize) -> Self {
        self.strategy_bound = bound;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.random_seed, DEFAULT_RANDOM_SEED);
        assert_eq!(config.strategy, StrategyKind::Random);
        assert_eq!(config.strategy_bound, DEFAULT_STRATEGY_BOUND);
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::new()
            .with_random_seed(7)
            .with_strategy(StrategyKind::Pct)
            .with_strategy_bound(3);
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.strategy, StrategyKind::Pct);
        assert_eq!(config.strategy_bound, 3);
    }
}

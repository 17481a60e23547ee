//! Weft - Controlled Concurrency Scheduler
//!
//! # Overview
//!
//! `weft` systematically tests multi-threaded programs by taking over their
//! scheduling. The test under control creates logical *operations* (proxies
//! for threads) and *resources* (proxies for semaphores, events, locks) and
//! cedes every scheduling decision to the scheduler. Execution is fully
//! serialized: at any moment exactly one operation runs, and a pluggable
//! exploration strategy decides which enabled operation runs next. Repeated
//! iterations with different seeds explore interleavings and surface
//! concurrency bugs such as data races, deadlocks, and liveness violations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Scheduler (kernel)                   │
//! │   one mutex, per-operation condvars, cooperative handoff │
//! ├──────────────────────────────────────────────────────────┤
//! │  Operation map    Resource map    EnabledOperations      │
//! ├──────────────────────────────────────────────────────────┤
//! │          ExplorationStrategy (tagged dispatch)           │
//! │          ├─ PctStrategy  (bounded change points)         │
//! │          └─ RandomStrategy (uniform choice)              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Guarantees
//!
//! - At most one operation holds the execution token at any time.
//! - An operation is enabled iff it is a member of the enabled set.
//! - A completed operation never transitions to any other status.
//! - For identical `(seed, strategy bound, test structure)`, two runs
//!   produce identical schedules.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::thread;
//! use weft::{Config, OperationId, Scheduler, StrategyKind};
//!
//! let scheduler = Arc::new(Scheduler::with_config(
//!     Config::new()
//!         .with_strategy(StrategyKind::Pct)
//!         .with_strategy_bound(3)
//!         .with_random_seed(42),
//! ));
//!
//! for _ in 0..100 {
//!     scheduler.attach().unwrap();
//!     scheduler.create_operation(OperationId(1)).unwrap();
//!     let worker = {
//!         let scheduler = Arc::clone(&scheduler);
//!         thread::spawn(move || {
//!             scheduler.start_operation(OperationId(1)).unwrap();
//!             // ... the code under test ...
//!             scheduler.complete_operation(OperationId(1)).unwrap();
//!         })
//!     };
//!     scheduler.join_operation(OperationId(1)).unwrap();
//!     worker.join().unwrap();
//!     scheduler.detach().unwrap();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod error;

// Re-export the primary types at the crate root.
pub use config::{Config, StrategyKind, DEFAULT_RANDOM_SEED, DEFAULT_STRATEGY_BOUND};
pub use domain::{
    EnabledOperations,
    ExplorationStrategy,
    OperationId,
    OperationStatus,
    PctStrategy,
    RandomStrategy,
    ResourceId,
    Scheduler,
    Strategy,
    XorShift64,
    MAIN_OPERATION_ID,
};
pub use error::{SchedulerError, SchedulerResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Integration Test: Schedule Reproducibility
//!
//! The sequence of scheduling decisions must be a pure function of the seed,
//! the strategy bound, and the structure of the test. A recording wrapper
//! around the worker bodies captures the scheduled operation id at every
//! controlled step; two runs with identical configuration must produce
//! bit-identical traces.

use std::sync::{Arc, Mutex};
use std::thread;

use weft::{Config, OperationId, Scheduler, StrategyKind};

const WORKERS: u64 = 3;
const YIELDS_PER_WORKER: usize = 3;
const ITERATIONS: usize = 20;

/// Run the whole exploration and record the scheduled operation id observed
/// at every controlled step of every worker.
fn run_trace(seed: u64) -> Vec<u64> {
    let scheduler = Arc::new(Scheduler::with_config(
        Config::new()
            .with_strategy(StrategyKind::Pct)
            .with_strategy_bound(5)
            .with_random_seed(seed),
    ));
    let trace: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));

    for _ in 0..ITERATIONS {
        scheduler.attach().unwrap();

        let mut workers = Vec::new();
        for raw_id in 1..=WORKERS {
            let id = OperationId(raw_id);
            scheduler.create_operation(id).unwrap();
            let scheduler = Arc::clone(&scheduler);
            let trace = Arc::clone(&trace);
            workers.push(thread::spawn(move || {
                scheduler.start_operation(id).unwrap();
                for _ in 0..YIELDS_PER_WORKER {
                    let current = scheduler.scheduled_operation_id();
                    trace.lock().unwrap().push(current.as_u64());
                    scheduler.schedule_next().unwrap();
                }
                scheduler.complete_operation(id).unwrap();
            }));
        }

        let ids: Vec<OperationId> = (1..=WORKERS).map(OperationId).collect();
        scheduler.join_operations(&ids, true).unwrap();
        for worker in workers {
            worker.join().unwrap();
        }
        scheduler.detach().unwrap();
    }

    Arc::try_unwrap(trace).unwrap().into_inner().unwrap()
}

#[test]
fn test_identical_seeds_produce_identical_schedules() {
    let first = run_trace(42);
    let second = run_trace(42);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_different_seeds_explore_different_schedules() {
    // Twenty iterations of three workers give the priority assignment ample
    // room to diverge between seeds.
    assert_ne!(run_trace(1), run_trace(2));
}

#[test]
fn test_reported_seed_matches_configuration() {
    let scheduler = Scheduler::with_config(
        Config::new()
            .with_strategy(StrategyKind::Pct)
            .with_random_seed(42),
    );
    assert_eq!(scheduler.random_seed(), 42);
}

//! Domain Layer
//!
//! Core scheduling logic, leaves first:
//!
//! ```text
//! domain/
//! ├── random.rs      deterministic RNG (XorShift64)
//! ├── operation.rs   per-thread control block and status machine
//! ├── enabled.rs     creation-ordered enabled set
//! ├── resource.rs    named synchronization conditions
//! ├── strategy/      exploration strategies (PCT, Random)
//! └── scheduler.rs   the kernel: serialization and cooperative handoff
//! ```

pub mod enabled;
pub mod operation;
pub mod random;
pub mod resource;
pub mod scheduler;
pub mod strategy;

// Re-export commonly used types
pub use enabled::EnabledOperations;
pub use operation::{OperationId, OperationStatus};
pub use random::XorShift64;
pub use resource::ResourceId;
pub use scheduler::{Scheduler, MAIN_OPERATION_ID};
pub use strategy::{ExplorationStrategy, PctStrategy, RandomStrategy, Strategy};

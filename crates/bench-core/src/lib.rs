//! bench-core: comparación de estrategias de inserción idempotente y sonda
//! de cancelación.
//!
//! Orden de dependencias: `existence` -> `batch` -> `drivers` -> `routines`.
//! `probe` es independiente del resto.
pub mod batch;
pub mod constants;
pub mod drivers;
pub mod errors;
pub mod existence;
pub mod mapping;
pub mod probe;
pub mod provision;
pub mod routines;

pub use batch::{BatchAccumulator, FlushOutcome, RemainderPolicy};
pub use drivers::{DriverReport, DriverSettings, Strategy, StrategyDriver};
pub use errors::CoreError;
pub use existence::{check_exists, Existence, ExistenceCheck, FailurePolicy};
pub use probe::{CancellationProbe, DelayOutcome, ProbeReport, ProbeSettings, ProbeState};
pub use provision::ensure_table;
pub use routines::{run_cancellation_probe, run_insertion_comparison};

//! TableBench Rust Library
//!
//! Capa de aplicación del harness:
//! - `config`: variables de entorno y ajustes de cada rutina.
//! - `errors`: errores de arranque y ejecución.
//! - `scheduler`: disparo periódico (o único) de las rutinas.
//!
//! La lógica de las estrategias y de la sonda vive en `bench-core`.

pub mod config;
pub mod errors;
pub mod scheduler;

pub use config::BenchConfig;
pub use errors::AppError;
pub use scheduler::{run_once, spawn_routines, RunSummary};

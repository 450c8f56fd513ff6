//! Valores por defecto del benchmark y de la sonda.

use std::time::Duration;

/// Nombre base de tabla; cada estrategia añade su sufijo.
pub const DEFAULT_TABLE_NAME: &str = "InsertTest";

/// Registros por lote transaccional.
pub const DEFAULT_BATCH_SIZE: usize = 50;

pub const DEFAULT_PROBE_CONTAINER: &str = "local";
pub const DEFAULT_PROBE_PREFIX: &str = "TestLogType";
pub const DEFAULT_PROBE_PAGE_SIZE: usize = 1;
/// La señal se dispara cuando el contador de páginas supera este umbral.
pub const DEFAULT_CANCEL_AFTER_PAGES: usize = 2;
pub const DEFAULT_PROBE_DELAY: Duration = Duration::from_secs(10);

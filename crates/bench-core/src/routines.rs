//! Puntos de entrada de cada ejecución programada.
//! Cada llamada es independiente: no comparte estado con la anterior salvo
//! lo que ya esté persistido en el store.

use std::sync::Arc;

use bench_store::{BlobStore, StoreError, TableStore};
use chrono::Utc;
use log::info;

use crate::drivers::{DriverReport, DriverSettings, StrategyDriver};
use crate::errors::CoreError;
use crate::probe::{CancellationProbe, ProbeReport, ProbeSettings};

/// Ejecuta las tres estrategias en secuencia y devuelve sus informes.
pub async fn run_insertion_comparison(store: Arc<dyn TableStore>,
                                      settings: DriverSettings)
                                      -> Result<Vec<DriverReport>, CoreError> {
    info!("insertion comparison triggered at {}", Utc::now());
    let driver = StrategyDriver::new(store, settings)?;
    driver.run_all().await
}

/// Ejecuta la sonda de cancelación una vez.
pub async fn run_cancellation_probe(store: Arc<dyn BlobStore>,
                                    settings: ProbeSettings)
                                    -> Result<ProbeReport, StoreError> {
    info!("cancellation probe triggered at {}", Utc::now());
    CancellationProbe::new(store, settings).run().await
}

//! Disparo periódico de las dos rutinas.
//!
//! Cada rutina corre en su propia tarea con un `tokio::time::interval`; el
//! primer tick es inmediato. Un canal `watch` de apagado detiene los bucles
//! entre ejecuciones. Los errores de una ejecución se registran y el bucle
//! sigue con el siguiente tick.

use std::future::Future;
use std::time::Duration;

use bench_core::{run_cancellation_probe, run_insertion_comparison, CoreError, DriverReport, ProbeReport};
use bench_store::{StoreClients, StoreError};
use log::{error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::config::BenchConfig;

/// Resultado de ejecutar ambas rutinas una vez.
#[derive(Debug)]
pub struct RunSummary {
    pub comparison: Result<Vec<DriverReport>, CoreError>,
    pub probe: Result<ProbeReport, StoreError>,
}

/// Ejecuta cada rutina una vez, en paralelo, y devuelve ambos resultados.
pub async fn run_once(clients: &StoreClients, config: &BenchConfig) -> RunSummary {
    let (comparison, probe) = tokio::join!(comparison_pass(clients, config), probe_pass(clients, config));
    RunSummary { comparison, probe }
}

async fn comparison_pass(clients: &StoreClients, config: &BenchConfig) -> Result<Vec<DriverReport>, CoreError> {
    let result = run_insertion_comparison(clients.tables.clone(), config.drivers.clone()).await;
    match &result {
        Ok(reports) => {
            for r in reports {
                info!("{} -> table={} inserted={} failed={} dropped={} in {}ms",
                      r.strategy.map(|s| s.label()).unwrap_or("?"),
                      r.table,
                      r.inserted,
                      r.insert_failures,
                      r.dropped,
                      r.elapsed.as_millis());
            }
        }
        Err(e) => error!("insertion comparison failed: {e}"),
    }
    result
}

async fn probe_pass(clients: &StoreClients, config: &BenchConfig) -> Result<ProbeReport, StoreError> {
    let result = run_cancellation_probe(clients.blobs.clone(), config.probe.clone()).await;
    match &result {
        Ok(report) => info!("probe finished as {:?} after {} pages ({} blobs)",
                            report.outcome, report.pages_seen, report.blobs_seen),
        Err(e) => error!("cancellation probe failed: {e}"),
    }
    result
}

/// Lanza un bucle por rutina. Terminan cuando `shutdown` pasa a `true` o se
/// cierra el emisor.
pub fn spawn_routines(clients: StoreClients,
                      config: BenchConfig,
                      shutdown: watch::Receiver<bool>)
                      -> Vec<JoinHandle<()>> {
    let period = config.schedule;
    let comparison = {
        let clients = clients.clone();
        let config = config.clone();
        spawn_loop("insertion-comparison", period, shutdown.clone(), move || {
            let clients = clients.clone();
            let config = config.clone();
            async move {
                let _ = comparison_pass(&clients, &config).await;
            }
        })
    };
    let probe = spawn_loop("cancellation-probe", period, shutdown, move || {
        let clients = clients.clone();
        let config = config.clone();
        async move {
            let _ = probe_pass(&clients, &config).await;
        }
    });
    vec![comparison, probe]
}

fn spawn_loop<F, Fut>(name: &'static str,
                      period: Duration,
                      mut shutdown: watch::Receiver<bool>,
                      mut routine: F)
                      -> JoinHandle<()>
    where F: FnMut() -> Fut + Send + 'static,
          Fut: Future<Output = ()> + Send + 'static
{
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => routine().await,
            }
        }
        info!("{name} loop stopped");
    })
}

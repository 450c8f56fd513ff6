use bench_store::connect_stores;
use log::{error, info};
use tablebench_rust::{run_once, spawn_routines, AppError, BenchConfig};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // sin cadena de conexión no hay nada que medir: error fatal de arranque
    let config = BenchConfig::from_env()?;
    let clients = connect_stores(&config.storage)?;
    info!("table base={} batch size={} schedule={:?}",
          config.drivers.table_base,
          config.drivers.batch_size,
          config.schedule);

    if config.run_once {
        let summary = run_once(&clients, &config).await;
        if summary.comparison.is_err() && summary.probe.is_err() {
            error!("both routines failed");
        }
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handles = spawn_routines(clients, config, shutdown_rx);
    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    let _ = shutdown_tx.send(true);
    for handle in handles {
        if let Err(e) = handle.await {
            error!("routine task ended abnormally: {e}");
        }
    }
    Ok(())
}

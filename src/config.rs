//! Configuración central del binario.
//! Carga variables de entorno (.env) y construye los ajustes de cada rutina.
//! Sólo `STORAGE_CONNECTION_STRING` es obligatoria; el resto tiene valores por
//! defecto y un valor que no se pueda interpretar vuelve al defecto.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use bench_core::constants::{DEFAULT_BATCH_SIZE, DEFAULT_CANCEL_AFTER_PAGES, DEFAULT_PROBE_CONTAINER,
                            DEFAULT_PROBE_DELAY, DEFAULT_PROBE_PAGE_SIZE, DEFAULT_PROBE_PREFIX,
                            DEFAULT_TABLE_NAME};
use bench_core::{DriverSettings, FailurePolicy, ProbeSettings, RemainderPolicy};
use bench_domain::workload::{DEFAULT_CLUSTERS, DEFAULT_LOG_TYPES, DEFAULT_PER_LOG_TYPE};
use bench_domain::Workload;
use bench_store::table::MAX_BATCH_ACTIONS;
use bench_store::StorageConfig;
use log::warn;

use crate::errors::AppError;

pub const DEFAULT_SCHEDULE: Duration = Duration::from_secs(60);

/// Configuración completa de una ejecución del binario.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub storage: StorageConfig,
    pub drivers: DriverSettings,
    pub probe: ProbeSettings,
    /// Periodo entre disparos de cada rutina.
    pub schedule: Duration,
    /// Ejecuta cada rutina una vez y termina.
    pub run_once: bool,
}

impl BenchConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let storage = StorageConfig::from_env()?;
        Self::from_lookup(storage, |key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable.
    pub fn from_lookup<F>(storage: StorageConfig, lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let batch_size = parse_or(&lookup, "BENCH_BATCH_SIZE", DEFAULT_BATCH_SIZE);
        if batch_size == 0 || batch_size > MAX_BATCH_ACTIONS {
            return Err(AppError::Config(format!("BENCH_BATCH_SIZE must be within 1..={MAX_BATCH_ACTIONS}, got {batch_size}")));
        }
        let remainder = match lookup("BENCH_REMAINDER_POLICY").as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("drop") => RemainderPolicy::Drop,
            Some(v) if !v.eq_ignore_ascii_case("flush") => {
                warn!("BENCH_REMAINDER_POLICY={v:?} no reconocido, se usa flush");
                RemainderPolicy::Flush
            }
            _ => RemainderPolicy::Flush,
        };
        let on_check_failure = match lookup("BENCH_ON_CHECK_FAILURE").as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("skip") => FailurePolicy::SkipRecord,
            Some(v) if !v.eq_ignore_ascii_case("absent") => {
                warn!("BENCH_ON_CHECK_FAILURE={v:?} no reconocido, se usa absent");
                FailurePolicy::TreatAsAbsent
            }
            _ => FailurePolicy::TreatAsAbsent,
        };
        let per_log_type = parse_or(&lookup, "BENCH_RECORDS_PER_LOG_TYPE", DEFAULT_PER_LOG_TYPE);
        let drivers = DriverSettings { table_base: string_or(&lookup, "BENCH_TABLE_NAME", DEFAULT_TABLE_NAME),
                                       workload: Workload::new(&DEFAULT_CLUSTERS, &DEFAULT_LOG_TYPES, per_log_type),
                                       batch_size,
                                       remainder,
                                       on_check_failure };

        let delay_ms = parse_or(&lookup, "PROBE_DELAY_MS", DEFAULT_PROBE_DELAY.as_millis() as u64);
        let probe = ProbeSettings { container: string_or(&lookup, "PROBE_CONTAINER", DEFAULT_PROBE_CONTAINER),
                                    prefix: string_or(&lookup, "PROBE_PREFIX", DEFAULT_PROBE_PREFIX),
                                    page_size: parse_or(&lookup, "PROBE_PAGE_SIZE", DEFAULT_PROBE_PAGE_SIZE).max(1),
                                    cancel_after_pages: parse_or(&lookup,
                                                                 "PROBE_CANCEL_AFTER_PAGES",
                                                                 DEFAULT_CANCEL_AFTER_PAGES),
                                    delay: Duration::from_millis(delay_ms) };

        let schedule_secs = parse_or(&lookup, "BENCH_SCHEDULE_SECS", DEFAULT_SCHEDULE.as_secs()).max(1);
        Ok(Self { storage,
                  drivers,
                  probe,
                  schedule: Duration::from_secs(schedule_secs),
                  run_once: parse_or(&lookup, "BENCH_RUN_ONCE", false) })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
    where T: FromStr,
          F: Fn(&str) -> Option<String>
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                                           warn!("{key}={raw:?} no es válido, se usa el valor por defecto");
                                           default
                                       }),
    }
}

fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
    where F: Fn(&str) -> Option<String>
{
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

//! Sonda de cancelación cooperativa sobre un listado paginado de blobs.
//!
//! Máquina de estados: `Idle -> Paging(n) -> Cancelling -> Cancelled | Completed`.
//!
//! Por cada página recibida:
//! 1. el contador avanza;
//! 2. se lanza la tarea de espera (`delayed_task`) en segundo plano;
//! 3. si el contador supera el umbral se dispara la señal compartida;
//! 4. se espera a la tarea, que falla con `StoreError::Cancelled` si observa
//!    la señal.
//!
//! La señal tiene un único escritor (el bucle de páginas) y dos lectores (la
//! tarea de espera y el `BlobPager`). Una vez disparada no se revierte.

use std::sync::Arc;
use std::time::Duration;

use bench_store::{BlobPager, BlobStore, CancelSignal, CancelToken, StoreError};
use log::{debug, error, info};
use tokio::time::Instant;

use crate::constants::{DEFAULT_CANCEL_AFTER_PAGES, DEFAULT_PROBE_CONTAINER, DEFAULT_PROBE_DELAY,
                       DEFAULT_PROBE_PAGE_SIZE, DEFAULT_PROBE_PREFIX};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub container: String,
    pub prefix: String,
    pub page_size: usize,
    pub cancel_after_pages: usize,
    pub delay: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self { container: DEFAULT_PROBE_CONTAINER.to_string(),
               prefix: DEFAULT_PROBE_PREFIX.to_string(),
               page_size: DEFAULT_PROBE_PAGE_SIZE,
               cancel_after_pages: DEFAULT_CANCEL_AFTER_PAGES,
               delay: DEFAULT_PROBE_DELAY }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Idle,
    Paging(usize),
    Cancelling,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub outcome: ProbeState,
    pub pages_seen: usize,
    pub blobs_seen: usize,
    /// Veces que el bucle disparó la señal (0 o 1).
    pub triggers: usize,
    pub delays: Vec<DelayOutcome>,
    pub transitions: Vec<ProbeState>,
    pub elapsed: Duration,
}

/// Espera `delay` salvo que la señal se dispare antes (o ya esté disparada).
pub async fn delayed_task(mut token: CancelToken, delay: Duration) -> Result<(), StoreError> {
    token.check()?;
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(StoreError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}

#[derive(Default)]
struct Counters {
    pages: usize,
    blobs: usize,
    triggers: usize,
    delays: Vec<DelayOutcome>,
}

pub struct CancellationProbe {
    store: Arc<dyn BlobStore>,
    settings: ProbeSettings,
    state: ProbeState,
    transitions: Vec<ProbeState>,
}

impl CancellationProbe {
    pub fn new(store: Arc<dyn BlobStore>, settings: ProbeSettings) -> Self {
        Self { store, settings, state: ProbeState::Idle, transitions: vec![ProbeState::Idle] }
    }

    pub fn state(&self) -> ProbeState { self.state }

    fn transition(&mut self, next: ProbeState) {
        debug!("probe state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.transitions.push(next);
    }

    /// Recorre el listado. La cancelación es el final esperado y se devuelve
    /// como `Ok` con `outcome == Cancelled`; cualquier otro error se propaga.
    /// Cada llamada parte de `Idle` con una señal nueva.
    pub async fn run(&mut self) -> Result<ProbeReport, StoreError> {
        self.state = ProbeState::Idle;
        self.transitions = vec![ProbeState::Idle];
        let started = Instant::now();
        let signal = CancelSignal::new();
        let mut counters = Counters::default();
        let result = self.page_loop(&signal, &mut counters).await;
        let elapsed = started.elapsed();
        match result {
            Ok(()) => {
                self.transition(ProbeState::Completed);
                info!("Time elapsed: {:?} (pages={})", elapsed, counters.pages);
            }
            Err(StoreError::Cancelled) => {
                self.transition(ProbeState::Cancelled);
                error!("Operation canceled after {} pages ({:?})", counters.pages, elapsed);
            }
            Err(other) => return Err(other),
        }
        Ok(ProbeReport { outcome: self.state,
                         pages_seen: counters.pages,
                         blobs_seen: counters.blobs,
                         triggers: counters.triggers,
                         delays: counters.delays,
                         transitions: self.transitions.clone(),
                         elapsed })
    }

    async fn page_loop(&mut self, signal: &CancelSignal, counters: &mut Counters) -> Result<(), StoreError> {
        let mut pager = BlobPager::new(self.store.clone(),
                                       self.settings.container.clone(),
                                       self.settings.prefix.clone(),
                                       self.settings.page_size,
                                       signal.token());
        while let Some(page) = pager.next_page().await? {
            counters.pages += 1;
            counters.blobs += page.items.len();
            self.transition(ProbeState::Paging(counters.pages));

            let delay = tokio::spawn(delayed_task(signal.token(), self.settings.delay));
            if counters.pages > self.settings.cancel_after_pages && signal.cancel() {
                counters.triggers += 1;
                self.transition(ProbeState::Cancelling);
            }
            let outcome = delay.await
                               .map_err(|e| StoreError::request_failed(500, format!("delay task failed: {e}")))?;
            match outcome {
                Ok(()) => counters.delays.push(DelayOutcome::Completed),
                Err(e) => {
                    counters.delays.push(DelayOutcome::Cancelled);
                    return Err(e);
                }
            }
            info!("Page {}", page.items.len());
        }
        Ok(())
    }
}

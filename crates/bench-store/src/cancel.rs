//! Señal de cancelación cooperativa sobre un canal `watch`.
//!
//! - `CancelSignal`: único escritor. `cancel()` es idempotente e irreversible.
//! - `CancelToken`: lectores clonables; pueden consultar el estado o esperar
//!   a que la señal se dispare.
//!
//! Si el escritor se descarta sin cancelar, los lectores nunca observan la
//! cancelación.

use tokio::sync::watch;

use crate::StoreError;

#[derive(Debug)]
pub struct CancelSignal {
    tx: watch::Sender<bool>,
}

impl Default for CancelSignal {
    fn default() -> Self { Self::new() }
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken { CancelToken { rx: self.tx.subscribe() } }

    /// Dispara la señal. Devuelve `true` sólo la primera vez.
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|cancelled| {
            if *cancelled {
                false
            } else {
                *cancelled = true;
                true
            }
        })
    }

    pub fn is_cancelled(&self) -> bool { *self.tx.borrow() }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool { *self.rx.borrow() }

    /// `Err(StoreError::Cancelled)` si la señal ya se disparó.
    pub fn check(&self) -> Result<(), StoreError> {
        if self.is_cancelled() {
            Err(StoreError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Completa cuando la señal se dispara.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // escritor descartado sin cancelar
            std::future::pending::<()>().await;
        }
    }
}

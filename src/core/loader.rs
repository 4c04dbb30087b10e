//! One-shot rate table fetch issued when the converter is mounted

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::currency::RateTableProvider;
use super::rates::RateTable;

/// Message shown whenever the rate table cannot be fetched or decoded.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching exchange rates.";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(RateTable),
    Failed(String),
}

/// Owns the background fetch. Dropping the loader aborts a fetch still in flight.
pub struct RateLoader {
    state: watch::Receiver<LoadState>,
    task: JoinHandle<()>,
}

impl RateLoader {
    /// Spawns the fetch on the current tokio runtime.
    pub fn spawn(provider: Arc<dyn RateTableProvider>) -> Self {
        let (tx, rx) = watch::channel(LoadState::Loading);

        let task = tokio::spawn(async move {
            let state = match provider.fetch_rates().await {
                Ok(table) => {
                    debug!(entries = table.len(), "Exchange rates loaded");
                    LoadState::Ready(table)
                }
                Err(e) => {
                    warn!(error = %e, "Exchange rate fetch failed");
                    LoadState::Failed(FETCH_ERROR_MESSAGE.to_string())
                }
            };
            // Nobody is listening once the loader is gone
            let _ = tx.send(state);
        });

        RateLoader { state: rx, task }
    }

    /// Current state. A task that ended without publishing counts as failed.
    pub fn state(&self) -> LoadState {
        let state = self.state.borrow().clone();
        if state == LoadState::Loading && self.task.is_finished() {
            return LoadState::Failed(FETCH_ERROR_MESSAGE.to_string());
        }
        state
    }

    pub fn is_loading(&self) -> bool {
        self.state() == LoadState::Loading
    }

    pub fn error(&self) -> Option<String> {
        match self.state() {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The loaded table, or an empty one while loading or after a failure.
    pub fn rates(&self) -> RateTable {
        match self.state() {
            LoadState::Ready(table) => table,
            _ => RateTable::default(),
        }
    }

    /// Waits until the fetch has either succeeded or failed.
    pub async fn settled(&mut self) -> LoadState {
        match self
            .state
            .wait_for(|s| !matches!(s, LoadState::Loading))
            .await
        {
            Ok(state) => state.clone(),
            Err(_) => {
                debug!("Rate loader task ended without publishing a result");
                LoadState::Failed(FETCH_ERROR_MESSAGE.to_string())
            }
        }
    }
}

impl Drop for RateLoader {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            debug!("Aborting in-flight exchange rate fetch");
            self.task.abort();
        }
    }
}

//! services/app/src/viewmodels/list.rs
//!
//! Loading state for screens that show a fetched list (feed, matches).
//!
//! Only the most recent load may write the list: starting a load cancels the
//! one still in flight, so a slow, older response can never overwrite a newer one.

use std::future::Future;

use pawtrack_core::ports::PortResult;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    /// True until the first load settles, and during non-refresh reloads.
    pub is_loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: true,
            refreshing: false,
            error: None,
        }
    }
}

pub struct ListLoader<T> {
    state: watch::Sender<ListState<T>>,
    in_flight: Mutex<CancellationToken>,
}

impl<T: Clone + Send + Sync> ListLoader<T> {
    pub fn new() -> Self {
        let (state, _rx) = watch::channel(ListState::default());
        Self {
            state,
            in_flight: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn snapshot(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    /// Marks the next load as a pull-to-refresh, which keeps the full-screen
    /// spinner off.
    pub fn begin_refresh(&self) {
        self.state.send_modify(|s| s.refreshing = true);
    }

    /// Runs `fetch` and stores its outcome, unless a newer load starts first.
    pub async fn load<F>(&self, fetch: F)
    where
        F: Future<Output = PortResult<Vec<T>>>,
    {
        let token = {
            let mut current = self.in_flight.lock().await;
            current.cancel();
            let next = CancellationToken::new();
            *current = next.clone();
            next
        };

        self.state.send_modify(|s| {
            if !s.refreshing {
                s.is_loading = true;
            }
            s.error = None;
        });

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("List load superseded by a newer one");
                return;
            }
            result = fetch => result,
        };

        self.state.send_modify(|s| {
            match result {
                Ok(items) => s.items = items,
                Err(e) => s.error = Some(e.to_string()),
            }
            s.is_loading = false;
            s.refreshing = false;
        });
    }
}

impl<T: Clone + Send + Sync> Default for ListLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

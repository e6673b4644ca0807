//! services/app/src/viewmodels/home.rs
//!
//! The home feed: active lost reports with a local search filter.

use std::sync::Arc;

use pawtrack_core::domain::LostReport;
use pawtrack_core::ports::FeedService;
use tokio::sync::watch;

use super::list::{ListLoader, ListState};
use super::state::AppState;

pub struct HomeViewModel {
    feed: Arc<dyn FeedService>,
    reports: ListLoader<LostReport>,
    search_query: watch::Sender<String>,
}

impl HomeViewModel {
    pub fn new(state: &AppState) -> Self {
        let (search_query, _rx) = watch::channel(String::new());
        Self {
            feed: state.feed.clone(),
            reports: ListLoader::new(),
            search_query,
        }
    }

    /// Loads the feed; call on mount.
    pub async fn load_reports(&self) {
        let feed = self.feed.clone();
        self.reports
            .load(async move { feed.get_lost_reports().await })
            .await;
    }

    /// Pull-to-refresh. A refresh started while another is running replaces it.
    pub async fn refresh(&self) {
        self.reports.begin_refresh();
        self.load_reports().await;
    }

    pub fn state(&self) -> ListState<LostReport> {
        self.reports.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<LostReport>> {
        self.reports.subscribe()
    }

    pub fn search_query(&self) -> String {
        self.search_query.borrow().clone()
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.search_query.send_replace(query.into());
    }

    /// The loaded reports that match the current search.
    pub fn visible_reports(&self) -> Vec<LostReport> {
        let query = self.search_query.borrow();
        self.reports
            .snapshot()
            .items
            .into_iter()
            .filter(|r| r.matches_query(&query))
            .collect()
    }
}

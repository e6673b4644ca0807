//! services/app/src/viewmodels/matches.rs
//!
//! The match results screen for the signed-in user.

use std::sync::Arc;

use pawtrack_core::domain::MatchResult;
use pawtrack_core::ports::MatchService;
use tokio::sync::watch;

use super::list::{ListLoader, ListState};
use super::state::AppState;

pub struct MatchViewModel {
    service: Arc<dyn MatchService>,
    matches: ListLoader<MatchResult>,
}

impl MatchViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: state.matches.clone(),
            matches: ListLoader::new(),
        }
    }

    pub async fn load_matches(&self) {
        let service = self.service.clone();
        self.matches
            .load(async move { service.get_my_matches().await })
            .await;
    }

    pub async fn refresh(&self) {
        self.matches.begin_refresh();
        self.load_matches().await;
    }

    pub fn state(&self) -> ListState<MatchResult> {
        self.matches.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<MatchResult>> {
        self.matches.subscribe()
    }
}

pub mod form;
pub mod home;
pub mod list;
pub mod matches;
pub mod report;
pub mod sighting;
pub mod state;

#[cfg(test)]
mod testing;

pub use form::FormStatus;
pub use home::HomeViewModel;
pub use list::ListState;
pub use matches::MatchViewModel;
pub use report::{ReportField, ReportViewModel};
pub use sighting::{SightingField, SightingViewModel};
pub use state::AppState;

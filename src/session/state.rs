//! The per-session state value. It is only mutated through
//! [`crate::session::machine::SessionClient`].

use crate::registry::model_registry::ModelRegistry;
use crate::session::error::InvalidHistoryIndex;
use crate::session::identity::Principal;
use crate::types::location::Location;
use crate::types::report::PredictionReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pages reachable once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Home,
    About,
    Contact,
    SelectingLocation,
    Predicting,
    History,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Home,
        View::About,
        View::Contact,
        View::SelectingLocation,
        View::Predicting,
        View::History,
    ];
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Home => "Home",
            View::About => "About",
            View::Contact => "Contact",
            View::SelectingLocation => "Select Location",
            View::Predicting => "Predict",
            View::History => "History",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Anonymous,
    /// The sign-in form is shown.
    Authenticating,
    Authenticated(View),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Anonymous => f.write_str("Signed out"),
            Stage::Authenticating => f.write_str("Sign in"),
            Stage::Authenticated(view) => write!(f, "{}", view),
        }
    }
}

impl Stage {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Stage::Authenticated(_))
    }

    /// The current view, if signed in.
    pub fn view(&self) -> Option<View> {
        match self {
            Stage::Authenticated(view) => Some(*view),
            _ => None,
        }
    }
}

/// Daily reports produced during the session, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    reports: Vec<PredictionReport>,
}

impl History {
    pub fn push(&mut self, report: PredictionReport) {
        self.reports.push(report);
    }

    /// Removes the report at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHistoryIndex`] unless `index < self.len()`. The history
    /// is unchanged in that case.
    pub fn remove(&mut self, index: usize) -> Result<PredictionReport, InvalidHistoryIndex> {
        if index >= self.reports.len() {
            return Err(InvalidHistoryIndex {
                index,
                len: self.reports.len(),
            });
        }
        Ok(self.reports.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&PredictionReport> {
        self.reports.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionReport> {
        self.reports.iter()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Everything one user session holds.
///
/// A new state is [`Stage::Anonymous`] with nothing selected. Read it freely;
/// change it with [`crate::Forecaster::session`].
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) stage: Stage,
    pub(crate) principal: Option<Principal>,
    pub(crate) location: Option<Location>,
    pub(crate) registry: Option<Arc<ModelRegistry>>,
    pub(crate) current_daily: Option<PredictionReport>,
    pub(crate) current_weekly: Option<PredictionReport>,
    pub(crate) history: History,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            stage: Stage::Anonymous,
            principal: None,
            location: None,
            registry: None,
            current_daily: None,
            current_weekly: None,
            history: History::default(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn view(&self) -> Option<View> {
        self.stage.view()
    }

    pub fn is_authenticated(&self) -> bool {
        self.stage.is_authenticated()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// The registry bound to [`SessionState::location`].
    pub fn registry(&self) -> Option<&Arc<ModelRegistry>> {
        self.registry.as_ref()
    }

    pub fn current_daily(&self) -> Option<&PredictionReport> {
        self.current_daily.as_ref()
    }

    pub fn current_weekly(&self) -> Option<&PredictionReport> {
        self.current_weekly.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::report::{PredictionRecord, ReportKind};
    use chrono::NaiveDate;

    fn report(day: u32) -> PredictionReport {
        let date = NaiveDate::from_ymd_opt(2023, 8, day).unwrap();
        PredictionReport::new(
            ReportKind::Daily,
            Location::Nsukka,
            date,
            vec![PredictionRecord {
                parameter: "Rainfall (mm)".to_string(),
                value: f64::from(day),
                date,
                location: Some(Location::Nsukka),
            }],
        )
    }

    #[test]
    fn test_history_remove_bounds() {
        let mut history = History::default();
        assert_eq!(
            history.remove(0),
            Err(InvalidHistoryIndex { index: 0, len: 0 })
        );

        for day in 1..=3 {
            history.push(report(day));
        }
        assert_eq!(
            history.remove(3),
            Err(InvalidHistoryIndex { index: 3, len: 3 })
        );
        assert_eq!(history.len(), 3);

        assert!(history.get(3).is_none());
        let removed = history.remove(1).unwrap();
        assert_eq!(removed.start_date().to_string(), "2023-08-02");
        let remaining: Vec<_> = history.iter().map(|r| r.start_date().to_string()).collect();
        assert_eq!(remaining, vec!["2023-08-01", "2023-08-03"]);
    }

    #[test]
    fn test_stage_names_are_page_titles() {
        let titles: Vec<_> = View::ALL
            .into_iter()
            .map(|view| Stage::Authenticated(view).to_string())
            .collect();
        assert_eq!(
            titles,
            ["Home", "About", "Contact", "Select Location", "Predict", "History"]
        );
        assert_eq!(Stage::Anonymous.to_string(), "Signed out");
    }

    #[test]
    fn test_new_state_is_anonymous_and_empty() {
        let state = SessionState::default();
        assert_eq!(state.stage(), Stage::Anonymous);
        assert_eq!(state.view(), None);
        assert!(state.principal().is_none());
        assert!(state.location().is_none());
        assert!(state.registry().is_none());
        assert!(state.history().is_empty());
    }
}

//! Transitions of the session state machine.
//!
//! Every user intent is one method on [`SessionClient`]. A method either
//! applies its whole transition or returns an error and leaves the
//! [`SessionState`] as it was.

use crate::error::ForecastError;
use crate::forecaster::Forecaster;
use crate::prediction::assembler::{assemble_daily, assemble_weekly};
use crate::prediction::engine::{predict_one, predict_range};
use crate::registry::error::RegistryError;
use crate::session::error::SessionError;
use crate::session::state::{SessionState, Stage, View};
use crate::types::feature_vector::FeatureVector;
use crate::types::location::Location;
use crate::types::report::PredictionReport;
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Applies intents to one session's state.
///
/// Obtained from [`Forecaster::session()`]. The client borrows the state
/// mutably, so a session cannot be changed from two places at once.
pub struct SessionClient<'a> {
    forecaster: &'a Forecaster,
    state: &'a mut SessionState,
}

impl<'a> SessionClient<'a> {
    pub(crate) fn new(forecaster: &'a Forecaster, state: &'a mut SessionState) -> Self {
        Self { forecaster, state }
    }

    /// Read access to the state being driven.
    pub fn state(&self) -> &SessionState {
        self.state
    }

    fn require_authenticated(&self) -> Result<View, SessionError> {
        self.state.view().ok_or(SessionError::NotAuthenticated)
    }

    fn require_view(&self, expected: View) -> Result<(), SessionError> {
        let view = self.require_authenticated()?;
        if view != expected {
            return Err(SessionError::WrongView {
                expected,
                actual: self.state.stage,
            });
        }
        Ok(())
    }

    /// Shows the sign-in form.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyAuthenticated`] when already signed in.
    pub fn begin_sign_in(&mut self) -> Result<(), ForecastError> {
        if self.state.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated.into());
        }
        self.state.stage = Stage::Authenticating;
        Ok(())
    }

    /// Signs in with the identity provider and lands on [`View::Home`].
    ///
    /// On failure the session falls back to [`Stage::Anonymous`].
    ///
    /// # Errors
    ///
    /// * [`SessionError::AlreadyAuthenticated`] when already signed in.
    /// * [`SessionError::Auth`] with the provider's reason.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<(), ForecastError> {
        if self.state.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated.into());
        }
        match self.forecaster.identity().authenticate(email, password) {
            Ok(principal) => {
                info!("Signed in {}", principal.uid);
                self.state.principal = Some(principal);
                self.state.stage = Stage::Authenticated(View::Home);
                Ok(())
            }
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                self.state.stage = Stage::Anonymous;
                Err(SessionError::Auth(e).into())
            }
        }
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// Same as [`SessionClient::sign_in`]; the provider's validation failures
    /// arrive as [`SessionError::Auth`].
    pub fn sign_up(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ForecastError> {
        if self.state.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated.into());
        }
        match self
            .forecaster
            .identity()
            .create_account(username, email, password)
        {
            Ok(principal) => {
                info!("Signed up {}", principal.uid);
                self.state.principal = Some(principal);
                self.state.stage = Stage::Authenticated(View::Home);
                Ok(())
            }
            Err(e) => {
                warn!("Sign-up failed: {}", e);
                self.state.stage = Stage::Anonymous;
                Err(SessionError::Auth(e).into())
            }
        }
    }

    /// Switches to `view`.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] unless signed in.
    pub fn navigate(&mut self, view: View) -> Result<(), ForecastError> {
        self.require_authenticated()?;
        debug!("Navigating to {}", view);
        self.state.stage = Stage::Authenticated(view);
        Ok(())
    }

    /// Binds `location` and its model registry to the session.
    ///
    /// The registry is resolved before anything changes. On success the
    /// current reports of the previous location are dropped; history is kept.
    ///
    /// # Errors
    ///
    /// * [`SessionError::NotAuthenticated`] unless signed in.
    /// * [`RegistryError`] if the registry cannot be resolved.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use hyperlocal_weather::{Forecaster, ForecastError, Location, MemoryIdentityProvider, View};
    /// # use std::sync::Arc;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), ForecastError> {
    /// let forecaster = Forecaster::builder()
    ///     .identity(Arc::new(MemoryIdentityProvider::new()))
    ///     .build()
    ///     .await?;
    /// let mut state = forecaster.new_session();
    /// let mut session = forecaster.session(&mut state);
    /// session.sign_up("Ada", "ada@example.org", "secret-pass")?;
    /// session.navigate(View::SelectingLocation)?;
    /// session.select_location(Location::Nsukka).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn select_location(&mut self, location: Location) -> Result<(), ForecastError> {
        self.require_authenticated()?;
        let registry = self.forecaster.registry(location).await?;

        if self.state.location != Some(location) {
            info!("Session location changed to {}", location);
            self.state.current_daily = None;
            self.state.current_weekly = None;
        }
        self.state.location = Some(location);
        self.state.registry = Some(registry);
        Ok(())
    }

    /// Predicts `date` and the configured horizon starting at `date`.
    ///
    /// Both reports become the session's current reports and the daily report
    /// is appended to history.
    ///
    /// # Errors
    ///
    /// * [`SessionError::WrongView`] unless on [`View::Predicting`].
    /// * [`SessionError::NoLocationSelected`] without a bound location.
    /// * [`crate::PredictionError`] if any model fails.
    pub fn submit_date(&mut self, date: NaiveDate) -> Result<&PredictionReport, ForecastError> {
        self.require_view(View::Predicting)?;
        let (location, registry) = match (self.state.location, self.state.registry.as_ref()) {
            (Some(location), Some(registry)) => (location, registry),
            _ => return Err(SessionError::NoLocationSelected.into()),
        };
        let profile = self
            .forecaster
            .catalog()
            .profile(location)
            .ok_or(RegistryError::UnknownLocation(location))?;

        let features = FeatureVector::derive(date);
        let daily = assemble_daily(profile, date, &predict_one(registry, &features)?)?;
        let days = predict_range(registry, date, self.forecaster.config().horizon_days())?;
        let weekly = assemble_weekly(profile, &days)?;

        info!("Predicted {} for {}", date, location);
        self.state.history.push(daily.clone());
        self.state.current_weekly = Some(weekly);
        Ok(self.state.current_daily.insert(daily))
    }

    /// Deletes the history entry at `index`.
    ///
    /// An index that is out of range, e.g. because the list changed since it
    /// was shown, is logged and ignored: `Ok(None)` is returned and nothing changes.
    ///
    /// # Errors
    ///
    /// [`SessionError::WrongView`] unless on [`View::History`].
    pub fn delete_history_entry(
        &mut self,
        index: usize,
    ) -> Result<Option<PredictionReport>, ForecastError> {
        self.require_view(View::History)?;
        match self.state.history.remove(index) {
            Ok(report) => {
                debug!("Deleted history entry {}", index);
                Ok(Some(report))
            }
            Err(e) => {
                warn!("Ignoring history deletion: {}", e);
                Ok(None)
            }
        }
    }

    /// Signs out and discards everything the session held, history included.
    pub fn sign_out(&mut self) {
        if let Some(principal) = &self.state.principal {
            info!("Signed out {}", principal.uid);
        }
        self.state.reset();
    }
}

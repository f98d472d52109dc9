//! The editing session that owns the committed intervals and the picking
//! gesture.
//!
//! UI event handlers talk only to [`AvailabilitySession`]: the calendar view is
//! presentational and the controller calls [`AvailabilitySession::confirm_pending`]
//! explicitly instead of reaching into the calendar.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::backend::AvailabilityBackend;
use crate::cache::{decode_snapshot, encode_snapshot, SessionCache};
use crate::config::SessionConfig;
use crate::error::{BlackoutError, Result};
use crate::interval::DateInterval;
use crate::selection::{SelectionEvent, SelectionMachine, SelectionState};
use crate::store::IntervalStore;
use crate::submission::{SaveAck, SubmissionTicket};

/// How a calendar day should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DayMark {
    /// First or last day of a committed or in-progress range.
    Boundary,
    /// Strictly inside a committed or pending range.
    Inside,
    Free,
}

pub struct AvailabilitySession {
    store: IntervalStore,
    selection: SelectionMachine,
    cache: Option<Box<dyn SessionCache>>,
    cache_key: String,
    busy: bool,
}

impl AvailabilitySession {
    /// A session without a local cache.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            store: IntervalStore::new(),
            selection: SelectionMachine::new(config.require_confirmation),
            cache: None,
            cache_key: config.cache_key.clone(),
            busy: false,
        }
    }

    /// A session rehydrated from `cache`.
    ///
    /// A malformed snapshot is logged and dropped, and the session starts
    /// empty.
    pub fn with_cache(config: &SessionConfig, cache: Box<dyn SessionCache>) -> Self {
        let mut session = Self {
            cache: Some(cache),
            ..Self::new(config)
        };
        session.store = session.rehydrate();
        session
    }

    fn rehydrate(&mut self) -> IntervalStore {
        let Some(cache) = self.cache.as_mut() else {
            return IntervalStore::new();
        };

        let raw = match cache.load(&self.cache_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return IntervalStore::new(),
            Err(err) => {
                warn!(key = %self.cache_key, error = %err, "failed to read the session cache");
                return IntervalStore::new();
            }
        };

        match decode_snapshot(&raw) {
            Ok(store) => {
                info!(n_intervals = store.len(), "session rehydrated from cache");
                store
            }
            Err(err) => {
                warn!(key = %self.cache_key, error = %err, "discarding the session cache");
                if let Err(err) = cache.remove(&self.cache_key) {
                    error!(key = %self.cache_key, error = %err, "failed to remove the session cache");
                }
                IntervalStore::new()
            }
        }
    }

    fn persist(&mut self) {
        let Some(cache) = self.cache.as_mut() else {
            return;
        };
        let written = encode_snapshot(self.store.as_slice())
            .and_then(|snapshot| cache.store(&self.cache_key, &snapshot));
        if let Err(err) = written {
            error!(key = %self.cache_key, error = %err, "failed to save the session cache");
        }
    }

    fn forget_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            if let Err(err) = cache.remove(&self.cache_key) {
                error!(key = %self.cache_key, error = %err, "failed to remove the session cache");
            }
        }
    }

    fn commit(&mut self, candidate: DateInterval) {
        self.store.add(candidate);
        info!(%candidate, n_intervals = self.store.len(), "range committed");
        self.persist();
    }

    /// Feed a calendar click.
    ///
    /// # Errors
    /// Returns `BlackoutError::OverlapRejected` when the closing click yields a
    /// range that conflicts with a committed one. The selection is already back
    /// to idle at that point; the error only carries the notice for the user.
    pub fn date_clicked(&mut self, day: NaiveDate) -> Result<SelectionEvent> {
        let event = self.selection.date_clicked(day, self.store.as_slice());
        match event {
            SelectionEvent::Rejected(candidate) => {
                warn!(%candidate, "range overlaps a committed range");
                Err(BlackoutError::OverlapRejected { candidate })
            }
            SelectionEvent::Committed(candidate) => {
                self.commit(candidate);
                Ok(event)
            }
            _ => Ok(event),
        }
    }

    /// Commit the pending candidate, if any, and return it.
    pub fn confirm_pending(&mut self) -> Option<DateInterval> {
        let candidate = self.selection.confirm()?;
        self.commit(candidate);
        Some(candidate)
    }

    /// Drop a half-picked or pending range.
    pub fn cancel_selection(&mut self) {
        self.selection.reset();
    }

    /// Remove the committed interval at `index` and abandon any selection in
    /// progress.
    ///
    /// # Errors
    /// Returns `BlackoutError::SubmissionInFlight` while a submission is
    /// outstanding, and `BlackoutError::IndexOutOfRange` for a bad index.
    pub fn remove_at(&mut self, index: usize) -> Result<DateInterval> {
        if self.busy {
            return Err(BlackoutError::SubmissionInFlight);
        }
        let removed = self.store.remove_at(index)?;
        self.selection.reset();
        info!(%removed, index, "range removed");
        self.persist();
        Ok(removed)
    }

    pub fn intervals(&self) -> &[DateInterval] {
        self.store.as_slice()
    }

    pub fn store(&self) -> &IntervalStore {
        &self.store
    }

    pub fn total_days(&self) -> i64 {
        self.store.total_days()
    }

    pub fn state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn pending(&self) -> Option<DateInterval> {
        self.selection.pending()
    }

    pub fn prompt(&self) -> Option<&'static str> {
        self.selection.prompt()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Highlight for `day` given the committed ranges and the gesture in
    /// progress.
    pub fn day_mark(&self, day: NaiveDate) -> DayMark {
        let in_progress = match self.selection.state() {
            SelectionState::Idle => None,
            SelectionState::Anchored { anchor } => Some(DateInterval::single(anchor)),
            SelectionState::Pending { candidate } => Some(candidate),
        };
        let mut ranges = self.store.iter().chain(in_progress.iter());

        if ranges.clone().any(|r| r.is_boundary(day)) {
            DayMark::Boundary
        } else if ranges.any(|r| r.strictly_contains(day)) {
            DayMark::Inside
        } else {
            DayMark::Free
        }
    }

    /// Snapshot the committed intervals and mark the session busy.
    ///
    /// # Errors
    /// Returns `BlackoutError::SubmissionInFlight` if a submission is already
    /// outstanding, and `BlackoutError::NothingToSubmit` if no interval is
    /// committed.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket> {
        if self.busy {
            return Err(BlackoutError::SubmissionInFlight);
        }
        if self.store.is_empty() {
            return Err(BlackoutError::NothingToSubmit);
        }
        self.busy = true;
        let ticket = SubmissionTicket::new(self.store.as_slice());
        debug!(n_intervals = ticket.intervals().len(), "submission started");
        Ok(ticket)
    }

    /// Settle the outstanding submission described by `ticket`.
    ///
    /// On success only the intervals carried by `ticket` are dropped; ranges
    /// committed while the request was in flight stay and are re-cached. On
    /// failure everything is kept so the user can retry. Without an
    /// outstanding submission this only logs a warning.
    pub fn finish_submission<T>(&mut self, ticket: &SubmissionTicket, outcome: &Result<T>) {
        if !self.busy {
            warn!("no submission in flight; ignoring its outcome");
            return;
        }
        self.busy = false;
        match outcome {
            Ok(_) => {
                let sent = ticket.intervals();
                self.store.retain(|interval| !sent.contains(interval));
                info!(
                    n_sent = sent.len(),
                    n_remaining = self.store.len(),
                    "submission succeeded"
                );
                if self.store.is_empty() {
                    self.forget_cache();
                } else {
                    self.persist();
                }
            }
            Err(err) => {
                error!(error = %err, "submission failed; keeping the committed ranges");
            }
        }
    }

    /// Submit the committed intervals through `backend`.
    ///
    /// # Errors
    /// Returns whatever [`begin_submission`](Self::begin_submission) or the
    /// backend returns; a backend error is reported as
    /// `BlackoutError::SubmissionFailed`.
    pub async fn submit<B>(&mut self, backend: &B) -> Result<SaveAck>
    where
        B: AvailabilityBackend + ?Sized,
    {
        let ticket = self.begin_submission()?;
        let outcome = backend.save(&ticket.request()).await.map_err(|err| match err {
            BlackoutError::SubmissionFailed(_) => err,
            other => BlackoutError::SubmissionFailed(other.to_string()),
        });
        self.finish_submission(&ticket, &outcome);
        outcome
    }
}

//! The two-click range picking gesture.
//!
//! A first click anchors the range, a second click closes it. The closed
//! range is normalized so that `start <= end`, checked against the committed
//! intervals, and then either rejected (back to idle) or staged as pending
//! until the owner calls [`SelectionMachine::confirm`].
//!
//! With `require_confirmation` turned off the second click commits directly,
//! which is how the gesture behaved before the confirmation step existed.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::interval::DateInterval;
use crate::overlap;

/// Hint shown while only the first day of a range has been picked.
pub const END_DATE_PROMPT: &str = "Select end date to complete the range";

/// Where the picking gesture currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SelectionState {
    #[default]
    Idle,
    /// The first day has been clicked.
    Anchored { anchor: NaiveDate },
    /// A valid range awaits confirmation.
    Pending { candidate: DateInterval },
}

/// What a click did to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// First day picked.
    Anchored(NaiveDate),
    /// Second day picked; the range is staged for confirmation.
    Pending(DateInterval),
    /// Second day picked with confirmation disabled; the owner must commit it.
    Committed(DateInterval),
    /// The range overlaps a committed interval and was discarded.
    Rejected(DateInterval),
    /// A click while a candidate is pending has no effect.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct SelectionMachine {
    state: SelectionState,
    require_confirmation: bool,
}

impl Default for SelectionMachine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SelectionMachine {
    pub fn new(require_confirmation: bool) -> Self {
        Self {
            state: SelectionState::Idle,
            require_confirmation,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn requires_confirmation(&self) -> bool {
        self.require_confirmation
    }

    pub fn pending(&self) -> Option<DateInterval> {
        match self.state {
            SelectionState::Pending { candidate } => Some(candidate),
            _ => None,
        }
    }

    pub fn anchor(&self) -> Option<NaiveDate> {
        match self.state {
            SelectionState::Anchored { anchor } => Some(anchor),
            _ => None,
        }
    }

    /// Feed a day click, checking a closing click against `existing`.
    pub fn date_clicked(&mut self, day: NaiveDate, existing: &[DateInterval]) -> SelectionEvent {
        match self.state {
            SelectionState::Idle => {
                self.state = SelectionState::Anchored { anchor: day };
                debug!(%day, "range anchored");
                SelectionEvent::Anchored(day)
            }
            SelectionState::Anchored { anchor } => {
                let candidate = DateInterval::from_unordered(anchor, day);

                if let Some(index) = overlap::find_overlap(&candidate, existing) {
                    self.state = SelectionState::Idle;
                    debug!(%candidate, conflicts_with = index, "range rejected");
                    return SelectionEvent::Rejected(candidate);
                }

                if self.require_confirmation {
                    self.state = SelectionState::Pending { candidate };
                    debug!(%candidate, "range pending confirmation");
                    SelectionEvent::Pending(candidate)
                } else {
                    self.state = SelectionState::Idle;
                    debug!(%candidate, "range committed without confirmation");
                    SelectionEvent::Committed(candidate)
                }
            }
            SelectionState::Pending { candidate } => {
                debug!(%day, %candidate, "click ignored while a range is pending");
                SelectionEvent::Ignored
            }
        }
    }

    /// Leave the pending state, handing back the candidate to commit.
    ///
    /// Returns `None`, leaving the state untouched, when nothing is pending.
    pub fn confirm(&mut self) -> Option<DateInterval> {
        let candidate = self.pending()?;
        self.state = SelectionState::Idle;
        Some(candidate)
    }

    /// Abandon any selection in progress.
    pub fn reset(&mut self) {
        if self.state != SelectionState::Idle {
            debug!(state = ?self.state, "selection reset");
        }
        self.state = SelectionState::Idle;
    }

    /// Hint for the user while the range is only half picked.
    pub fn prompt(&self) -> Option<&'static str> {
        self.anchor().map(|_| END_DATE_PROMPT)
    }
}

//! WASM bindings for blackout-engine.
//!
//! Exposes the editing session and the pure helpers to JavaScript via
//! `wasm-bindgen`. Complex values cross the boundary as JSON strings and days
//! as ISO `YYYY-MM-DD` strings. The JavaScript side owns HTTP and storage: it
//! posts the payload returned by `beginSubmission()` and persists the string
//! returned by `snapshot()`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p blackout-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/blackout-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/blackout_engine_wasm.wasm
//! ```

use blackout_engine::cache::{encode_snapshot, SessionCache};
use blackout_engine::interval::parse_iso_day;
use blackout_engine::{
    AvailabilitySession, BlackoutError, DateInterval, DayMark, MemoryCache, SelectionEvent,
    SessionConfig, SubmissionTicket,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IntervalDto {
    start_date: String,
    end_date: String,
    days: i64,
    label: String,
}

impl From<&DateInterval> for IntervalDto {
    fn from(interval: &DateInterval) -> Self {
        Self {
            start_date: interval.start().to_string(),
            end_date: interval.end().to_string(),
            days: interval.days(),
            label: interval.label(),
        }
    }
}

/// Outcome of a click, tagged by `kind`.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum ClickDto {
    Anchored { day: String, prompt: String },
    Pending { candidate: IntervalDto },
    Committed { candidate: IntervalDto },
    Rejected { message: String },
    Ignored,
}

/// Input format for intervals passed from JavaScript.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntervalInput {
    start_date: String,
    end_date: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(err: BlackoutError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_day(s: &str) -> Result<chrono::NaiveDate, JsValue> {
    parse_iso_day(s).map_err(js_error)
}

fn to_interval(input: IntervalInput) -> Result<DateInterval, JsValue> {
    let start = parse_day(&input.start_date)?;
    let end = parse_day(&input.end_date)?;
    DateInterval::new(start, end).map_err(js_error)
}

/// Convert one JSON `{startDate, endDate}` object into an interval.
fn parse_interval_json(json: &str) -> Result<DateInterval, JsValue> {
    let input: IntervalInput = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid interval JSON: {}", e)))?;
    to_interval(input)
}

/// Convert a JSON array of `{startDate, endDate}` objects into intervals.
fn parse_intervals_json(json: &str) -> Result<Vec<DateInterval>, JsValue> {
    let inputs: Vec<IntervalInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid intervals JSON: {}", e)))?;

    inputs.into_iter().map(to_interval).collect()
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub struct BlackoutCalendar {
    session: AvailabilitySession,
    cache_key: String,
    ticket: Option<SubmissionTicket>,
}

#[wasm_bindgen]
impl BlackoutCalendar {
    /// Start a session, optionally rehydrated from a string previously
    /// returned by `snapshot()`. A malformed snapshot yields an empty session.
    #[wasm_bindgen(constructor)]
    pub fn new(require_confirmation: bool, snapshot: Option<String>) -> Result<BlackoutCalendar, JsValue> {
        let config = SessionConfig {
            require_confirmation,
            ..SessionConfig::default()
        };
        let mut cache = MemoryCache::new();
        if let Some(raw) = snapshot {
            cache.store(&config.cache_key, &raw).map_err(js_error)?;
        }
        Ok(Self {
            session: AvailabilitySession::with_cache(&config, Box::new(cache)),
            cache_key: config.cache_key,
            ticket: None,
        })
    }

    /// Feed a day click. Returns a JSON object tagged by `kind`:
    /// `anchored`, `pending`, `committed`, `rejected` or `ignored`.
    #[wasm_bindgen(js_name = "clickDate")]
    pub fn click_date(&mut self, day: &str) -> Result<String, JsValue> {
        let day = parse_day(day)?;
        let dto = match self.session.date_clicked(day) {
            Ok(SelectionEvent::Anchored(anchor)) => ClickDto::Anchored {
                day: anchor.to_string(),
                prompt: self.session.prompt().unwrap_or_default().to_string(),
            },
            Ok(SelectionEvent::Pending(candidate)) => ClickDto::Pending {
                candidate: IntervalDto::from(&candidate),
            },
            Ok(SelectionEvent::Committed(candidate)) => ClickDto::Committed {
                candidate: IntervalDto::from(&candidate),
            },
            Ok(SelectionEvent::Ignored) => ClickDto::Ignored,
            Ok(SelectionEvent::Rejected(_)) => ClickDto::Rejected {
                message: "Product is unavailable for these dates".to_string(),
            },
            Err(err @ BlackoutError::OverlapRejected { .. }) => ClickDto::Rejected {
                message: err.to_string(),
            },
            Err(err) => return Err(js_error(err)),
        };
        to_json(&dto)
    }

    /// Commit the pending candidate. Returns it as JSON, or `null` when nothing
    /// was pending.
    #[wasm_bindgen(js_name = "confirmPending")]
    pub fn confirm_pending(&mut self) -> Result<String, JsValue> {
        let committed = self.session.confirm_pending();
        to_json(&committed.as_ref().map(IntervalDto::from))
    }

    #[wasm_bindgen(js_name = "cancelSelection")]
    pub fn cancel_selection(&mut self) {
        self.session.cancel_selection();
    }

    /// Remove the committed interval at `index`. Throws on a bad index or
    /// while a submission is outstanding.
    #[wasm_bindgen(js_name = "removeAt")]
    pub fn remove_at(&mut self, index: usize) -> Result<String, JsValue> {
        let removed = self.session.remove_at(index).map_err(js_error)?;
        to_json(&IntervalDto::from(&removed))
    }

    #[wasm_bindgen(js_name = "totalDays")]
    pub fn total_days(&self) -> f64 {
        self.session.total_days() as f64
    }

    /// Committed intervals in commit order, as a JSON array.
    pub fn intervals(&self) -> Result<String, JsValue> {
        let dtos: Vec<IntervalDto> = self.session.intervals().iter().map(IntervalDto::from).collect();
        to_json(&dtos)
    }

    /// Current selection state as JSON, tagged by `state`.
    pub fn state(&self) -> Result<String, JsValue> {
        to_json(&self.session.state())
    }

    /// `"boundary"`, `"inside"` or `"free"`.
    #[wasm_bindgen(js_name = "dayMark")]
    pub fn day_mark(&self, day: &str) -> Result<String, JsValue> {
        let mark = match self.session.day_mark(parse_day(day)?) {
            DayMark::Boundary => "boundary",
            DayMark::Inside => "inside",
            DayMark::Free => "free",
        };
        Ok(mark.to_string())
    }

    /// The string to keep in local storage and pass back to the constructor.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        encode_snapshot(self.session.intervals()).map_err(js_error)
    }

    #[wasm_bindgen(getter, js_name = "cacheKey")]
    pub fn cache_key(&self) -> String {
        self.cache_key.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn busy(&self) -> bool {
        self.session.is_busy()
    }

    /// Snapshot the committed intervals and return the save request body as
    /// JSON. Throws if a submission is already outstanding or nothing is
    /// committed.
    #[wasm_bindgen(js_name = "beginSubmission")]
    pub fn begin_submission(&mut self) -> Result<String, JsValue> {
        let ticket = self.session.begin_submission().map_err(js_error)?;
        let body = to_json(&ticket.request())?;
        self.ticket = Some(ticket);
        Ok(body)
    }

    /// Report how the save call ended. On success only the intervals that were
    /// sent are dropped; on failure everything is kept for a retry.
    #[wasm_bindgen(js_name = "finishSubmission")]
    pub fn finish_submission(&mut self, ok: bool, error: Option<String>) {
        // A settled or never-started submission has no ticket; its outcome is ignored.
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        let outcome = if ok {
            Ok(())
        } else {
            Err(BlackoutError::SubmissionFailed(
                error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        };
        self.session.finish_submission(&ticket, &outcome);
    }

    /// Per-day strings of the outstanding submission, or of the committed
    /// intervals when nothing is in flight.
    #[wasm_bindgen(js_name = "expandedDates")]
    pub fn expanded_dates(&self) -> Result<String, JsValue> {
        let dates = match &self.ticket {
            Some(ticket) => ticket.expanded_dates(),
            None => blackout_engine::expand(self.session.intervals()),
        };
        to_json(&dates)
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Expand a JSON array of `{startDate, endDate}` intervals into the flat list
/// of `"dd Month yyyy"` day strings the availability service stores.
#[wasm_bindgen(js_name = "expandDates")]
pub fn expand_dates(intervals_json: &str) -> Result<String, JsValue> {
    let intervals = parse_intervals_json(intervals_json)?;
    to_json(&blackout_engine::expand(&intervals))
}

/// Whether `candidate_json` (one `{startDate, endDate}` object) overlaps any
/// interval in `existing_json` (a JSON array of the same objects).
#[wasm_bindgen]
pub fn overlaps(candidate_json: &str, existing_json: &str) -> Result<bool, JsValue> {
    let candidate = parse_interval_json(candidate_json)?;
    let existing = parse_intervals_json(existing_json)?;
    Ok(blackout_engine::overlaps_any(&candidate, &existing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn single_interval_object_is_parsed() {
        let interval = parse_interval_json(r#" {"startDate":"2024-01-01","endDate":"2024-01-03"} "#).unwrap();
        assert_eq!(interval, DateInterval::new(day(1, 1), day(1, 3)).unwrap());
    }

    #[test]
    fn overlaps_reads_candidate_object() {
        let existing = r#"[{"startDate":"2024-01-03","endDate":"2024-01-05"}]"#;
        let shared = r#"{"startDate":"2024-01-01","endDate":"2024-01-03"}"#;
        let apart = r#"{"startDate":"2024-02-01","endDate":"2024-02-03"}"#;

        assert!(overlaps(shared, existing).unwrap());
        assert!(!overlaps(apart, existing).unwrap());
    }
}

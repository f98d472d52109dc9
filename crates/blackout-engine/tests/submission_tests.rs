//! Tests for day expansion and the persistence payloads.

use blackout_engine::submission::{
    expand_interval, format_day, AvailabilityList, SaveAck, StoredAvailability,
};
use blackout_engine::{expand, DateInterval, SaveRequest, SubmissionTicket};
use chrono::NaiveDate;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range(start: NaiveDate, end: NaiveDate) -> DateInterval {
    DateInterval::new(start, end).unwrap()
}

// ── expand ──────────────────────────────────────────────────────────────────

#[test]
fn expand_crosses_month_boundary() {
    let dates = expand(&[range(day(2024, 1, 30), day(2024, 2, 1))]);
    assert_eq!(
        dates,
        vec!["30 January 2024", "31 January 2024", "01 February 2024"]
    );
}

#[test]
fn expand_includes_leap_day() {
    let dates = expand(&[range(day(2024, 2, 28), day(2024, 3, 1))]);
    assert_eq!(dates, vec!["28 February 2024", "29 February 2024", "01 March 2024"]);
}

#[test]
fn expand_crosses_year_boundary() {
    let dates: Vec<String> = expand_interval(&range(day(2024, 12, 31), day(2025, 1, 1))).collect();
    assert_eq!(dates, vec!["31 December 2024", "01 January 2025"]);
}

#[test]
fn expand_flattens_in_commit_order() {
    let dates = expand(&[
        range(day(2024, 5, 10), day(2024, 5, 11)),
        range(day(2024, 1, 1), day(2024, 1, 1)),
    ]);
    assert_eq!(
        dates,
        vec!["10 May 2024", "11 May 2024", "01 January 2024"],
        "intervals keep commit order, not calendar order"
    );
}

#[test]
fn expand_of_empty_set_is_empty() {
    assert!(expand(&[]).is_empty());
}

#[test]
fn expand_is_idempotent() {
    let intervals = vec![
        range(day(2024, 1, 1), day(2024, 1, 3)),
        range(day(2024, 2, 1), day(2024, 2, 1)),
    ];
    assert_eq!(expand(&intervals), expand(&intervals));
    assert_eq!(expand(&intervals).len(), 4);
}

#[test]
fn format_day_pads_day_of_month() {
    assert_eq!(format_day(day(2024, 7, 4)), "04 July 2024");
}

// ── SaveRequest ─────────────────────────────────────────────────────────────

#[test]
fn save_request_matches_service_shape() {
    let request = SaveRequest::from_intervals(&[
        range(day(2024, 1, 1), day(2024, 1, 5)),
        range(day(2024, 1, 9), day(2024, 1, 9)),
    ]);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "unavailableDates": [
                { "startDate": "2024-01-01T12:00:00Z", "endDate": "2024-01-05T12:00:00Z" },
                { "startDate": "2024-01-09T12:00:00Z", "endDate": "2024-01-09T12:00:00Z" }
            ]
        })
    );
}

#[test]
fn save_request_expands_like_the_service() {
    let json = r#"{"unavailableDates":[{"startDate":"2024-01-30T12:00:00Z","endDate":"2024-02-01T12:00:00Z"}]}"#;
    let request: SaveRequest = serde_json::from_str(json).unwrap();
    assert_eq!(
        request.expanded_dates().unwrap(),
        vec!["30 January 2024", "31 January 2024", "01 February 2024"]
    );
}

#[test]
fn save_request_with_reversed_payload_fails_to_expand() {
    let json = r#"{"unavailableDates":[{"startDate":"2024-02-01T12:00:00Z","endDate":"2024-01-30T12:00:00Z"}]}"#;
    let request: SaveRequest = serde_json::from_str(json).unwrap();
    assert!(request.expanded_dates().is_err());
}

// ── Snapshot tickets ────────────────────────────────────────────────────────

#[test]
fn ticket_is_detached_from_source() {
    let mut intervals = vec![range(day(2024, 1, 1), day(2024, 1, 2))];
    let ticket = SubmissionTicket::new(&intervals);
    intervals.clear();

    assert_eq!(ticket.intervals().len(), 1);
    assert_eq!(ticket.expanded_dates(), vec!["01 January 2024", "02 January 2024"]);
    assert_eq!(ticket.request().unavailable_dates.len(), 1);
}

// ── Read side ───────────────────────────────────────────────────────────────

#[test]
fn availability_list_parses_service_response() {
    let json = r#"{
        "availabilities": [
            { "id": 7, "dates": ["05 March 2024", "06 March 2024"], "createdAt": "2024-03-01T09:30:00Z" },
            { "id": 6, "dates": ["01 January 2024"] }
        ]
    }"#;
    let list: AvailabilityList = serde_json::from_str(json).unwrap();

    assert_eq!(list.availabilities.len(), 2);
    assert_eq!(
        list.availabilities[0].days().unwrap(),
        vec![day(2024, 3, 5), day(2024, 3, 6)]
    );
    assert!(list.availabilities[1].created_at.is_none());
}

#[test]
fn stored_availability_with_bad_day_fails_to_parse() {
    let stored = StoredAvailability {
        id: None,
        dates: vec!["31 February 2024".to_string()],
        created_at: None,
    };
    assert!(stored.days().is_err());
}

#[test]
fn save_ack_tolerates_missing_fields() {
    let ack: SaveAck = serde_json::from_str(r#"{"message":"Availability updated successfully."}"#).unwrap();
    assert_eq!(ack.message, "Availability updated successfully.");
    assert!(ack.availability.is_none());
}

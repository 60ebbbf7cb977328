//! Booking quote construction: duration and price arithmetic plus the
//! field-scoped validation that gates every submission.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use venuehub_http::error::FieldError;
use venuehub_store::models::Venue;

/// Raw booking form: a calendar date plus start/end wall-clock times, the
/// way the booking form collects them. Times are interpreted as UTC.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub guest_count: u32,
}

/// A validated booking window with its derived price.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub duration_hours: i64,
    pub total_price: f64,
}

/// Whole hours between two instants, floored at zero on inverted input.
pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_hours().max(0)
}

/// total price = whole-hour duration × hourly rate.
pub fn total_price(hours: i64, price_per_hour: f64) -> f64 {
    hours as f64 * price_per_hour
}

/// Validate a booking form against a venue and produce a quote, or the
/// full set of field errors. Checks run in form order: date, start time,
/// end time, window ordering, minimum duration, then guest count bounds.
pub fn quote(form: &BookingForm, venue: &Venue, min_duration_hours: i64) -> Result<Quote, Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.date.is_none() {
        errors.push(FieldError::new("date", "a date is required"));
    }
    if form.start_time.is_none() {
        errors.push(FieldError::new("start_time", "a start time is required"));
    }
    if form.end_time.is_none() {
        errors.push(FieldError::new("end_time", "an end time is required"));
    }

    let window = match (form.date, form.start_time, form.end_time) {
        (Some(date), Some(start), Some(end)) => {
            let start_datetime = date.and_time(start).and_utc();
            let end_datetime = date.and_time(end).and_utc();
            if end_datetime <= start_datetime {
                errors.push(FieldError::new(
                    "end_time",
                    "end time must be after start time",
                ));
                None
            } else if duration_hours(start_datetime, end_datetime) < min_duration_hours {
                errors.push(FieldError::new(
                    "end_time",
                    format!("minimum rental duration is {min_duration_hours} hours"),
                ));
                None
            } else {
                Some((start_datetime, end_datetime))
            }
        }
        _ => None,
    };

    if form.guest_count < 1 {
        errors.push(FieldError::new("guest_count", "at least 1 guest is required"));
    } else if form.guest_count > venue.capacity {
        errors.push(FieldError::new(
            "guest_count",
            format!("maximum number of guests is {}", venue.capacity),
        ));
    }

    match (window, errors.is_empty()) {
        (Some((start_datetime, end_datetime)), true) => {
            let hours = duration_hours(start_datetime, end_datetime);
            Ok(Quote {
                start_datetime,
                end_datetime,
                duration_hours: hours,
                total_price: total_price(hours, venue.price_per_hour),
            })
        }
        _ => Err(errors),
    }
}

/// Whether a client-echoed total agrees with the server-computed one.
/// Prices are decimal displays of f64 arithmetic, so compare within half a
/// cent rather than bit-exactly.
pub fn totals_match(expected: f64, actual: f64) -> bool {
    (expected - actual).abs() < 0.005
}

//! Aggregate arithmetic behind the dashboards. Pure over booking slices so
//! the revenue rules are testable without a running store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use venuehub_store::models::{Booking, BookingStatus};
use venuehub_store::same_calendar_month;

#[derive(Debug, Serialize, PartialEq)]
pub struct HostStats {
    pub total_venues: usize,
    pub active_venues: usize,
    pub total_bookings: usize,
    pub bookings_by_status: StatusCounts,
    pub average_rating: f64,
    pub monthly_revenue: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_hosts: usize,
    pub total_venues: usize,
    pub active_venues: usize,
    pub total_bookings: usize,
    pub pending_bookings: usize,
    pub total_revenue: f64,
    pub monthly_revenue: f64,
}

/// Booking counts broken down by lifecycle status.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn tally(bookings: &[Booking]) -> Self {
        let mut counts = Self::default();
        for booking in bookings {
            match booking.status {
                BookingStatus::Pending => counts.pending += 1,
                BookingStatus::Confirmed => counts.confirmed += 1,
                BookingStatus::Cancelled => counts.cancelled += 1,
                BookingStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }
}

/// Revenue across all time: confirmed and completed bookings only.
pub fn total_revenue(bookings: &[Booking]) -> f64 {
    bookings
        .iter()
        .filter(|b| b.status.counts_as_revenue())
        .map(|b| b.total_price)
        .sum()
}

/// Revenue attributed to the calendar month of `now`, keyed by when the
/// booking was created rather than when the event takes place.
pub fn monthly_revenue(bookings: &[Booking], now: DateTime<Utc>) -> f64 {
    bookings
        .iter()
        .filter(|b| b.status.counts_as_revenue() && same_calendar_month(b.created_at, now))
        .map(|b| b.total_price)
        .sum()
}

pub fn pending_count(bookings: &[Booking]) -> usize {
    bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Pending)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn booking(status: BookingStatus, total_price: f64, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::now_v7(),
            venue_id: Uuid::now_v7(),
            guest_id: Uuid::now_v7(),
            start_datetime: created_at,
            end_datetime: created_at + chrono::Duration::hours(3),
            guest_count: 4,
            total_price,
            status,
            special_requests: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn only_confirmed_and_completed_bookings_earn_revenue() {
        let now = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        let rows = vec![
            booking(BookingStatus::Confirmed, 100.0, now),
            booking(BookingStatus::Completed, 50.0, now),
            booking(BookingStatus::Pending, 999.0, now),
            booking(BookingStatus::Cancelled, 999.0, now),
        ];
        assert!((total_revenue(&rows) - 150.0).abs() < f64::EPSILON);
        assert!((monthly_revenue(&rows, now) - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn monthly_revenue_requires_both_month_and_year_to_match() {
        let now = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        let last_month = Utc.with_ymd_and_hms(2026, 7, 31, 23, 0, 0).unwrap();
        let last_year = Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap();
        let rows = vec![
            booking(BookingStatus::Confirmed, 100.0, now),
            booking(BookingStatus::Confirmed, 40.0, last_month),
            booking(BookingStatus::Confirmed, 70.0, last_year),
        ];
        assert!((monthly_revenue(&rows, now) - 100.0).abs() < f64::EPSILON);
        assert!((total_revenue(&rows) - 210.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pending_count_ignores_settled_bookings() {
        let now = Utc::now();
        let rows = vec![
            booking(BookingStatus::Pending, 10.0, now),
            booking(BookingStatus::Pending, 10.0, now),
            booking(BookingStatus::Confirmed, 10.0, now),
        ];
        assert_eq!(pending_count(&rows), 2);
    }

    #[test]
    fn status_tally_covers_every_lifecycle_state() {
        let now = Utc::now();
        let rows = vec![
            booking(BookingStatus::Pending, 10.0, now),
            booking(BookingStatus::Confirmed, 10.0, now),
            booking(BookingStatus::Confirmed, 10.0, now),
            booking(BookingStatus::Cancelled, 10.0, now),
            booking(BookingStatus::Completed, 10.0, now),
        ];
        assert_eq!(
            StatusCounts::tally(&rows),
            StatusCounts {
                pending: 1,
                confirmed: 2,
                cancelled: 1,
                completed: 1,
            }
        );
    }
}

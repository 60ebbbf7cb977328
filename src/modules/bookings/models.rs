use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use venuehub_store::models::{Booking, BookingStatus};

use super::pricing::BookingForm;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub venue_id: Uuid,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub guest_count: u32,
    /// Client-side price echo; must agree with the server's own quote.
    pub total_price: Option<f64>,
    pub special_requests: Option<String>,
}

impl CreateBookingRequest {
    pub fn form(&self) -> BookingForm {
        BookingForm {
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            guest_count: self.guest_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

/// A booking row joined with its venue's display name.
#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub venue_name: String,
}

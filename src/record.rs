//! Persisted record shapes.
//!
//! Field names and order match what the salon's admin pages read out of
//! storage, so these structs serialize exactly as they are declared.

use std::cell::Cell;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validate::BookingRequest;

/// `type` of every feedback entry written here.
pub const FEEDBACK_TYPE: &str = "booking";

/// Rating given to the automatic feedback entry.
pub const FEEDBACK_RATING: u8 = 5;

/// `status` of every feedback entry written here.
pub const FEEDBACK_STATUS: &str = "good";

/// `source` of every feedback entry written here.
pub const FEEDBACK_SOURCE: &str = "booking-system";

/// Lifecycle tag of a booking.
///
/// Only `Pending` is ever written by the widget. Values written by other
/// tools are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for BookingStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for BookingStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One appointment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub service: String,
    pub name: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub notes: String,
    /// ISO 8601 creation instant.
    pub timestamp: String,
    /// Creation instant in milliseconds, see [`IdGenerator`].
    pub id: i64,
    pub status: BookingStatus,
}

impl BookingRecord {
    /// A new, pending booking from a validated request.
    pub fn new(request: BookingRequest, id: i64, timestamp: String) -> Self {
        Self {
            service: request.service,
            name: request.name,
            phone: request.phone,
            date: request.date,
            time: request.time,
            notes: request.notes,
            timestamp,
            id,
            status: BookingStatus::Pending,
        }
    }
}

/// Automatic feedback entry derived from a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: u8,
    pub text: String,
    /// `YYYY-MM-DD` of creation.
    pub date: String,
    pub status: String,
    pub source: String,
}

impl FeedbackRecord {
    pub fn for_booking(booking: &BookingRecord, id: i64, created_on: NaiveDate) -> Self {
        Self {
            id,
            name: booking.name.clone(),
            kind: FEEDBACK_TYPE.to_string(),
            rating: FEEDBACK_RATING,
            text: format!("Booked {} for {}", booking.service, booking.date),
            date: created_on.format("%Y-%m-%d").to_string(),
            status: FEEDBACK_STATUS.to_string(),
            source: FEEDBACK_SOURCE.to_string(),
        }
    }
}

/// Issues millisecond ids that never repeat or go backwards within a session.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Cell<i64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current instant, or one past the previous id if the clock has not
    /// moved on.
    pub fn next(&self, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last.get() + 1);
        self.last.set(id);
        id
    }
}

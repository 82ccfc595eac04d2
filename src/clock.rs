//! Time sources.

use std::cell::Cell;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, SecondsFormat, Utc};

/// Provides the current instant and the local calendar date.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date in the page's local time zone.
    fn today(&self) -> NaiveDate;
}

/// Wall clock of the host (the browser's `Date` under wasm).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
    offset: FixedOffset,
}

impl FixedClock {
    /// `offset` decides which calendar day counts as "today".
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: Cell::new(now),
            offset,
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().with_timezone(&self.offset).date_naive()
    }
}

/// `2026-10-16T09:30:00.000Z`
pub fn iso_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

//! The booking and feedback collections.
//!
//! Each collection is one JSON array under one storage key. Appending reads
//! the whole array, pushes one element and writes the whole array back. Two
//! tabs appending at the same moment can lose one of the writes; nothing here
//! detects that.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::admin::AdminSummary;
use crate::config::StorageConfig;
use crate::error::Result;
use crate::record::{BookingRecord, FeedbackRecord};
use crate::store::KeyValueStore;

pub struct BookingLedger {
    store: Rc<dyn KeyValueStore>,
    keys: StorageConfig,
}

impl BookingLedger {
    pub fn new(store: Rc<dyn KeyValueStore>, keys: StorageConfig) -> Self {
        Self { store, keys }
    }

    /// Save a booking, then mirror it into the feedback collection.
    ///
    /// Returns the number of bookings after the append. A failure to write the
    /// feedback entry is logged and otherwise ignored.
    pub fn persist(&self, booking: &BookingRecord, feedback: &FeedbackRecord) -> Result<usize> {
        let total = self.append(&self.keys.bookings_key, booking)?;
        info!(id = booking.id, total, "booking saved");

        match self.append(&self.keys.feedback_key, feedback) {
            Ok(count) => debug!(count, "added booking to feedback collection"),
            Err(err) => warn!(%err, "failed to update feedback collection"),
        }

        Ok(total)
    }

    /// Bookings in insertion order. Elements that do not look like a booking
    /// are skipped.
    pub fn bookings(&self) -> Result<Vec<BookingRecord>> {
        self.typed(&self.keys.bookings_key)
    }

    /// Feedback entries in insertion order.
    pub fn feedback(&self) -> Result<Vec<FeedbackRecord>> {
        self.typed(&self.keys.feedback_key)
    }

    /// Status counts over the raw booking collection.
    pub fn admin_summary(&self) -> Result<AdminSummary> {
        let raw = self.load(&self.keys.bookings_key)?;
        Ok(AdminSummary::tally(
            raw.iter().map(|v| v.get("status").and_then(Value::as_str)),
        ))
    }

    fn append<T: serde::Serialize>(&self, key: &str, item: &T) -> Result<usize> {
        let mut items = self.load(key)?;
        items.push(serde_json::to_value(item)?);
        let json = serde_json::to_string(&items)?;
        self.store.set_item(key, &json)?;
        Ok(items.len())
    }

    /// The raw array under `key`. Missing, `null` or non-array contents read
    /// as empty; backend failures are returned.
    fn load(&self, key: &str) -> Result<Vec<Value>> {
        let Some(raw) = self.store.get_item(key)? else {
            debug!(key, "collection absent, starting empty");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(Value::Null) => Ok(Vec::new()),
            Ok(other) => {
                warn!(key, kind = json_kind(&other), "collection is not an array, starting empty");
                Ok(Vec::new())
            }
            Err(err) => {
                warn!(key, %err, "collection is not valid JSON, starting empty");
                Ok(Vec::new())
            }
        }
    }

    fn typed<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let raw = self.load(key)?;
        let total = raw.len();
        let items: Vec<T> = raw
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        if items.len() != total {
            warn!(key, skipped = total - items.len(), "skipped malformed elements");
        }
        Ok(items)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use crate::record::BookingStatus;
    use crate::store::MemoryStore;
    use crate::validate::BookingRequest;
    use chrono::NaiveDate;

    fn booking(name: &str, id: i64) -> BookingRecord {
        let request = BookingRequest {
            service: "Haircut".into(),
            name: name.into(),
            phone: "+968 9234 5678".into(),
            date: "2026-10-17".into(),
            time: "14:00".into(),
            notes: String::new(),
        };
        BookingRecord::new(request, id, "2026-10-16T09:30:00.000Z".into())
    }

    fn feedback(b: &BookingRecord) -> FeedbackRecord {
        FeedbackRecord::for_booking(b, b.id + 1, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    fn ledger_over(store: Rc<dyn KeyValueStore>) -> BookingLedger {
        BookingLedger::new(store, StorageConfig::default())
    }

    /// Accepts reads, refuses writes to one key.
    struct ReadOnlyKey {
        inner: MemoryStore,
        locked: &'static str,
    }

    impl KeyValueStore for ReadOnlyKey {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.inner.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if key == self.locked {
                return Err(BookingError::storage("QuotaExceededError"));
            }
            self.inner.set_item(key, value)
        }
    }

    #[test]
    fn test_persist_appends_to_both_collections() {
        let store = Rc::new(MemoryStore::new());
        let ledger = ledger_over(store.clone());
        let b = booking("Aisha Said", 1);

        assert_eq!(ledger.persist(&b, &feedback(&b)).unwrap(), 1);

        assert_eq!(ledger.bookings().unwrap(), vec![b.clone()]);
        let fb = ledger.feedback().unwrap();
        assert_eq!(fb.len(), 1);
        assert_eq!(fb[0].source, "booking-system");
        assert!(store.get_item("shammaBookings").unwrap().unwrap().starts_with('['));
    }

    #[test]
    fn test_appends_keep_order_and_prior_elements() {
        let ledger = ledger_over(Rc::new(MemoryStore::new()));
        let names = ["Aisha", "Fatma", "Maryam", "Noor"];
        for (i, name) in names.iter().enumerate() {
            let b = booking(name, i as i64);
            assert_eq!(ledger.persist(&b, &feedback(&b)).unwrap(), i + 1);
        }
        let stored: Vec<String> = ledger.bookings().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(stored, names);
    }

    #[test]
    fn test_corrupt_collection_reads_as_empty() {
        for raw in ["{oops", "null", r#"{"a":1}"#, "7"] {
            let store = Rc::new(MemoryStore::new().with_item("shammaBookings", raw));
            let ledger = ledger_over(store);
            assert!(ledger.bookings().unwrap().is_empty(), "raw {raw}");
            let b = booking("Aisha", 1);
            assert_eq!(ledger.persist(&b, &feedback(&b)).unwrap(), 1);
        }
    }

    #[test]
    fn test_foreign_elements_are_preserved_on_append() {
        let seeded = r#"[{"legacy":true},{"service":"Nails","name":"Mona","phone":"1","date":"2026-01-01","time":"10:00","timestamp":"t","id":7,"status":"confirmed"}]"#;
        let store = Rc::new(MemoryStore::new().with_item("shammaBookings", seeded));
        let ledger = ledger_over(store.clone());

        let b = booking("Aisha", 8);
        assert_eq!(ledger.persist(&b, &feedback(&b)).unwrap(), 3);

        let raw: Vec<Value> =
            serde_json::from_str(&store.get_item("shammaBookings").unwrap().unwrap()).unwrap();
        assert_eq!(raw[0], serde_json::json!({"legacy": true}));

        let typed = ledger.bookings().unwrap();
        assert_eq!(typed.len(), 2);
        assert_eq!(typed[0].status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_booking_write_failure_is_reported() {
        let store = Rc::new(ReadOnlyKey {
            inner: MemoryStore::new(),
            locked: "shammaBookings",
        });
        let ledger = ledger_over(store.clone());
        let b = booking("Aisha", 1);

        let err = ledger.persist(&b, &feedback(&b)).unwrap_err();
        assert!(err.is_storage_error());
        assert!(store.inner.get_item("shammaFeedback").unwrap().is_none());
    }

    #[test]
    fn test_feedback_write_failure_is_swallowed() {
        let store = Rc::new(ReadOnlyKey {
            inner: MemoryStore::new(),
            locked: "shammaFeedback",
        });
        let ledger = ledger_over(store.clone());
        let b = booking("Aisha", 1);

        assert_eq!(ledger.persist(&b, &feedback(&b)).unwrap(), 1);
        assert_eq!(ledger.bookings().unwrap().len(), 1);
        assert!(ledger.feedback().unwrap().is_empty());
    }

    #[test]
    fn test_admin_summary_counts_raw_statuses() {
        let seeded = r#"[{"status":"pending"},{"status":"confirmed"},{"status":"cancelled"},{}]"#;
        let ledger = ledger_over(Rc::new(MemoryStore::new().with_item("shammaBookings", seeded)));
        let summary = ledger.admin_summary().unwrap();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.confirmed, 1);
    }
}

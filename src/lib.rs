//! Booking widget for the Shamma salon website.
//!
//! The widget validates the booking form, appends each accepted booking and a
//! matching feedback entry to browser storage, simulates a confirmation round
//! trip, and keeps the admin panel's counters current.
//!
//! The core is platform-agnostic: pages, storage, timers and banners are
//! traits, so the same controller runs against the DOM (feature `wasm`) and
//! against in-memory fakes.
//!
//! ```
//! use std::rc::Rc;
//! use shamma_booking::{BookingLedger, KeyValueStore, MemoryStore, StorageConfig};
//!
//! let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
//! let ledger = BookingLedger::new(store, StorageConfig::default());
//! assert_eq!(ledger.admin_summary().unwrap().total, 0);
//! ```

pub mod admin;
pub mod clock;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod notify;
pub mod page;
pub mod phone;
pub mod record;
pub mod scheduler;
pub mod store;
pub mod validate;

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(feature = "wasm")]
pub mod web;


pub use admin::{AdminSummary, refresh_admin_panel};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BookingConfig, FormConfig, StorageConfig, TimingConfig};
pub use confirm::{ConfirmationService, SimulatedConfirmation};
pub use controller::{BookingController, Environment, SubmitOutcome};
pub use error::{BookingError, Result};
pub use ledger::BookingLedger;
pub use logging::{Verbosity, init_logging};
pub use notify::{MemorySurface, NotificationSurface, Notifier, Severity};
pub use page::BookingPage;
pub use phone::format_phone;
pub use record::{BookingRecord, BookingStatus, FeedbackRecord};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle};
pub use store::{KeyValueStore, MemoryStore};
pub use validate::{BookingRequest, Field, ValidationError};

#[cfg(feature = "wasm")]
pub use web::BookingWidget;

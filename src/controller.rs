//! The booking form handler.
//!
//! A submission goes through validation, is saved to the ledger, and is then
//! handed to the confirmation service. The page is only touched through
//! [`BookingPage`], so the whole flow runs the same in a browser and in tests.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, error, info, warn};

use crate::clock::{Clock, iso_timestamp};
use crate::config::BookingConfig;
use crate::confirm::{ConfirmationService, SimulatedConfirmation};
use crate::error::{BookingError, Result};
use crate::ledger::BookingLedger;
use crate::notify::{NotificationSurface, Notifier};
use crate::page::BookingPage;
use crate::phone;
use crate::record::{BookingRecord, FeedbackRecord, IdGenerator};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::store::KeyValueStore;
use crate::validate::{self, BookingRequest, Field, ValidationError};

/// Shown when the booking could not be written to storage.
pub const SAVE_FAILED_MESSAGE: &str = "Error saving booking. Please try again.";

/// Shown when the confirmation service reports a failure.
pub const CONFIRMATION_FAILED_MESSAGE: &str =
    "We could not confirm your booking. Please try again.";

/// Everything the controller needs from its host.
pub struct Environment {
    pub page: Rc<dyn BookingPage>,
    pub store: Rc<dyn KeyValueStore>,
    pub surface: Rc<dyn NotificationSurface>,
    pub scheduler: Rc<dyn Scheduler>,
    pub clock: Rc<dyn Clock>,
    /// Defaults to [`SimulatedConfirmation`] with the configured delay.
    pub confirmation: Option<Rc<dyn ConfirmationService>>,
}

/// What happened to one submit event.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was saved.
    Rejected(ValidationError),
    /// Saved; confirmation is under way.
    Accepted(BookingRecord),
    /// Validation passed but the booking could not be saved.
    NotSaved(BookingError),
    /// A previous submission is still processing.
    Busy,
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// The dialog text shown once a booking is confirmed.
pub fn confirmation_message(booking: &BookingRecord) -> String {
    format!(
        "✅ BOOKING CONFIRMED!\n\nThank you {}!\n\n📋 Service: {}\n📅 Date: {}\n⏰ Time: {}\n📞 Phone: {}\n\nWe will contact you soon to confirm your appointment.",
        booking.name, booking.service, booking.date, booking.time, booking.phone
    )
}

/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct BookingController {
    inner: Rc<Inner>,
}

struct Inner {
    config: BookingConfig,
    page: Rc<dyn BookingPage>,
    ledger: BookingLedger,
    notifier: Notifier,
    confirmation: Rc<dyn ConfirmationService>,
    clock: Rc<dyn Clock>,
    ids: IdGenerator,
    processing: Cell<bool>,
    in_flight: RefCell<Option<TaskHandle>>,
}

impl BookingController {
    /// Set up the handler if the page has a booking form.
    ///
    /// Returns `None` on pages without one.
    pub fn setup(config: BookingConfig, env: Environment) -> Option<Self> {
        if !env.page.has_form() {
            info!("booking form not found");
            return None;
        }
        let controller = Self::new(config, env);
        info!("booking form setup complete");
        Some(controller)
    }

    pub fn new(config: BookingConfig, env: Environment) -> Self {
        let notifier = Notifier::new(env.surface, env.scheduler.clone(), &config.timing);
        let confirmation = env.confirmation.unwrap_or_else(|| {
            Rc::new(SimulatedConfirmation::new(
                env.scheduler.clone(),
                config.timing.confirmation_delay(),
            ))
        });
        let ledger = BookingLedger::new(env.store, config.storage.clone());

        Self {
            inner: Rc::new(Inner {
                config,
                page: env.page,
                ledger,
                notifier,
                confirmation,
                clock: env.clock,
                ids: IdGenerator::new(),
                processing: Cell::new(false),
                in_flight: RefCell::new(None),
            }),
        }
    }

    pub fn ledger(&self) -> &BookingLedger {
        &self.inner.ledger
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Whether a submission is waiting for confirmation.
    pub fn is_processing(&self) -> bool {
        self.inner.processing.get()
    }

    /// Handle the form's submit event.
    ///
    /// # Errors
    ///
    /// Returns an error when a required page element is missing. Validation
    /// and storage failures are reported through [`SubmitOutcome`] instead.
    pub fn submit(&self) -> Result<SubmitOutcome> {
        let inner = &self.inner;
        if inner.processing.get() {
            debug!("submission ignored while processing");
            return Ok(SubmitOutcome::Busy);
        }

        let request = self.read_request()?;
        debug!(?request, "form submitted");

        if let Err(rejection) = validate::validate(&request, inner.clock.today()) {
            warn!(field = rejection.field().element_id(), "booking rejected: {rejection}");
            inner.notifier.error(&rejection.to_string());
            inner.page.focus(rejection.field());
            return Ok(SubmitOutcome::Rejected(rejection));
        }

        let now = inner.clock.now();
        let id = inner.ids.next(now.timestamp_millis());
        let booking = BookingRecord::new(request, id, iso_timestamp(now));
        self.process(booking)
    }

    /// Handle an input event on the phone field.
    pub fn format_phone_input(&self) -> Result<()> {
        let page = &self.inner.page;
        let current = page.field_value(Field::Phone)?;
        let formatted = phone::format_phone(&current);
        if formatted != current {
            page.set_field_value(Field::Phone, &formatted)?;
        }
        Ok(())
    }

    /// Cancel a pending confirmation and give the submit control back.
    pub fn dispose(&self) {
        if let Some(handle) = self.inner.in_flight.borrow_mut().take() {
            handle.cancel();
        }
        if self.inner.processing.replace(false) {
            self.inner.page.end_processing();
        }
    }

    fn read_request(&self) -> Result<BookingRequest> {
        let page = &self.inner.page;
        BookingRequest::read_from(|field| page.field_value(field))
    }

    fn process(&self, booking: BookingRecord) -> Result<SubmitOutcome> {
        let inner = &self.inner;
        inner.page.begin_processing(&inner.config.form.processing_label)?;
        inner.processing.set(true);

        let now = inner.clock.now();
        let feedback =
            FeedbackRecord::for_booking(&booking, inner.ids.next(now.timestamp_millis()), now.date_naive());

        if let Err(err) = inner.ledger.persist(&booking, &feedback) {
            error!(%err, "error saving booking");
            inner.notifier.error(SAVE_FAILED_MESSAGE);
            inner.processing.set(false);
            inner.page.end_processing();
            return Ok(SubmitOutcome::NotSaved(err));
        }

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let confirmed = booking.clone();
        let handle = inner.confirmation.request(
            &booking,
            Box::new(move |result| {
                if let Some(inner) = weak.upgrade() {
                    inner.finish(&confirmed, result);
                }
            }),
        );

        // A service that settles synchronously has already finished.
        if inner.processing.get() {
            *inner.in_flight.borrow_mut() = Some(handle);
        }
        Ok(SubmitOutcome::Accepted(booking))
    }
}

impl Inner {
    fn finish(&self, booking: &BookingRecord, result: Result<()>) {
        drop(self.in_flight.borrow_mut().take());
        self.processing.set(false);

        match result {
            Ok(()) => {
                self.page.show_confirmation(&confirmation_message(booking));
                info!(id = booking.id, "booking completed");
                self.page.close_modal();
                self.page.reset_form();
            }
            Err(err) => {
                error!(id = booking.id, %err, "booking confirmation failed");
                self.notifier.error(CONFIRMATION_FAILED_MESSAGE);
            }
        }
        self.page.end_processing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BookingStatus;
    use crate::validate::BookingRequest;

    #[test]
    fn test_confirmation_message_text() {
        let request = BookingRequest {
            service: "Haircut".into(),
            name: "Aisha Said".into(),
            phone: "+968 9234 5678".into(),
            date: "2026-10-17".into(),
            time: "14:00".into(),
            notes: String::new(),
        };
        let booking = BookingRecord::new(request, 1, "t".into());
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(
            confirmation_message(&booking),
            "✅ BOOKING CONFIRMED!\n\nThank you Aisha Said!\n\n📋 Service: Haircut\n📅 Date: 2026-10-17\n⏰ Time: 14:00\n📞 Phone: +968 9234 5678\n\nWe will contact you soon to confirm your appointment."
        );
    }
}

//! Asynchronous confirmation of a saved booking.
//!
//! There is no backend yet. [`SimulatedConfirmation`] waits a fixed delay and
//! then always succeeds; a real service slots in behind the same trait.

use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::record::BookingRecord;
use crate::scheduler::{Scheduler, TaskHandle};

/// Called once when the confirmation settles.
pub type ConfirmationCallback = Box<dyn FnOnce(Result<()>)>;

pub trait ConfirmationService {
    /// Start confirming `booking`. Cancelling the handle means `done` is never
    /// called.
    fn request(&self, booking: &BookingRecord, done: ConfirmationCallback) -> TaskHandle;
}

pub struct SimulatedConfirmation {
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
}

impl SimulatedConfirmation {
    pub fn new(scheduler: Rc<dyn Scheduler>, delay: Duration) -> Self {
        Self { scheduler, delay }
    }
}

impl ConfirmationService for SimulatedConfirmation {
    fn request(&self, booking: &BookingRecord, done: ConfirmationCallback) -> TaskHandle {
        let delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX);
        debug!(id = booking.id, delay_ms, "simulating confirmation");
        self.scheduler.schedule(self.delay, Box::new(move || done(Ok(()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::validate::BookingRequest;
    use std::cell::Cell;

    fn booking() -> BookingRecord {
        BookingRecord::new(BookingRequest::default(), 1, "t".into())
    }

    #[test]
    fn test_confirms_after_delay() {
        let scheduler = ManualScheduler::new();
        let service = SimulatedConfirmation::new(Rc::new(scheduler.clone()), Duration::from_millis(1500));
        let confirmed = Rc::new(Cell::new(false));
        let flag = confirmed.clone();

        let _handle = service.request(&booking(), Box::new(move |result| flag.set(result.is_ok())));

        scheduler.advance(Duration::from_millis(1499));
        assert!(!confirmed.get());
        scheduler.advance(Duration::from_millis(1));
        assert!(confirmed.get());
    }

    #[test]
    fn test_cancelled_request_never_settles() {
        let scheduler = ManualScheduler::new();
        let service = SimulatedConfirmation::new(Rc::new(scheduler.clone()), Duration::from_millis(1500));
        let settled = Rc::new(Cell::new(false));
        let flag = settled.clone();

        service
            .request(&booking(), Box::new(move |_| flag.set(true)))
            .cancel();

        scheduler.advance(Duration::from_secs(5));
        assert!(!settled.get());
    }
}

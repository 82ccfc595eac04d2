//! The page elements the form handler talks to.

use crate::admin::AdminSummary;
use crate::error::Result;
use crate::validate::Field;

/// Id of the booking form.
pub const FORM_ID: &str = "bookingForm";

/// Id of the modal wrapping the form.
pub const MODAL_ID: &str = "bookingModal";

/// Selector of the submit control inside the form.
pub const SUBMIT_SELECTOR: &str = r#"button[type="submit"]"#;

/// Access to the booking form and the elements around it.
///
/// Element lookups that the handler cannot do without return
/// [`crate::BookingError::MissingElement`]; optional elements are skipped
/// silently.
pub trait BookingPage {
    /// Whether the page has a booking form at all.
    fn has_form(&self) -> bool;

    /// Current value of an input.
    fn field_value(&self, field: Field) -> Result<String>;

    fn set_field_value(&self, field: Field, value: &str) -> Result<()>;

    fn focus(&self, field: Field);

    /// Disable the submit control and swap its label, remembering the old one.
    fn begin_processing(&self, label: &str) -> Result<()>;

    /// Restore the submit control's label and enable it.
    fn end_processing(&self);

    /// Blocking message box.
    fn show_confirmation(&self, message: &str);

    /// Hide the booking modal if there is one.
    fn close_modal(&self);

    /// Clear every form input.
    fn reset_form(&self);

    /// Returns `false` when the page has no admin panel.
    fn render_admin_summary(&self, summary: &AdminSummary) -> bool;
}

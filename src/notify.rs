//! Transient notification banners.
//!
//! At most one banner is visible. Showing a new one removes whatever carries
//! the marker class first. Banners fade out on their own after a while and can
//! be closed by the user before that.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, error};

use crate::config::TimingConfig;
use crate::scheduler::Scheduler;

/// Class every banner element carries.
pub const MARKER_CLASS: &str = "alert-message";

/// Class of the banner's close button.
pub const CLOSE_CLASS: &str = "close-alert";

/// Id of the injected `<style>` element.
pub const STYLESHEET_ID: &str = "alert-message-styles";

/// Shown by the page-wide error handler.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please refresh the page and try again.";

/// Banner styles, shared by every severity.
pub const STYLESHEET: &str = r#"
.alert-message {
    position: fixed;
    top: 100px;
    right: 20px;
    padding: 15px 20px;
    border-radius: 8px;
    color: white;
    font-weight: 500;
    display: flex;
    align-items: center;
    justify-content: space-between;
    min-width: 300px;
    max-width: 400px;
    z-index: 9999;
    animation: slideIn 0.3s ease;
    box-shadow: 0 5px 15px rgba(0,0,0,0.2);
}

.alert-error {
    background: #e74c3c;
    border-left: 5px solid #c0392b;
}

.alert-success {
    background: #27ae60;
    border-left: 5px solid #219653;
}

.alert-info {
    background: #3498db;
    border-left: 5px solid #2980b9;
}

.close-alert {
    background: none;
    border: none;
    color: white;
    font-size: 1.5rem;
    cursor: pointer;
    margin-left: 15px;
    line-height: 1;
}

@keyframes slideIn {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}

@keyframes slideOut {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}
"#;

/// Animation applied when a banner starts to leave.
pub const FADE_OUT_ANIMATION: &str = "slideOut 0.3s ease";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Success,
    Info,
}

impl Severity {
    /// Variant class applied next to [`MARKER_CLASS`].
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Error => "alert-error",
            Self::Success => "alert-success",
            Self::Info => "alert-info",
        }
    }

    /// Full `class` attribute of a banner.
    pub fn class_name(self) -> String {
        format!("{MARKER_CLASS} {}", self.css_class())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(pub u64);

/// Where banners are drawn.
pub trait NotificationSurface {
    /// Make sure the shared stylesheet is present.
    fn ensure_stylesheet(&self);

    /// Remove every element carrying [`MARKER_CLASS`].
    fn remove_all(&self);

    /// Add a banner with a close affordance that removes it.
    fn mount(&self, id: NotificationId, message: &str, severity: Severity);

    fn is_mounted(&self, id: NotificationId) -> bool;

    /// Start the leaving animation.
    fn fade_out(&self, id: NotificationId);

    fn remove(&self, id: NotificationId);
}

/// Shows banners on a surface and takes them down again.
#[derive(Clone)]
pub struct Notifier {
    surface: Rc<dyn NotificationSurface>,
    scheduler: Rc<dyn Scheduler>,
    visible_for: Duration,
    fade_for: Duration,
    next_id: Rc<Cell<u64>>,
}

impl Notifier {
    pub fn new(
        surface: Rc<dyn NotificationSurface>,
        scheduler: Rc<dyn Scheduler>,
        timing: &TimingConfig,
    ) -> Self {
        Self {
            surface,
            scheduler,
            visible_for: timing.notification_visible(),
            fade_for: timing.notification_fade(),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    /// Replace any visible banner with a new one.
    pub fn show(&self, message: &str, severity: Severity) -> NotificationId {
        self.surface.remove_all();
        self.surface.ensure_stylesheet();

        let id = NotificationId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.surface.mount(id, message, severity);
        debug!(id = id.0, ?severity, text = message, "notification shown");

        let surface = self.surface.clone();
        let scheduler = self.scheduler.clone();
        let fade_for = self.fade_for;
        // Auto-dismissal is fire-and-forget; a banner closed early is skipped.
        let _ = self.scheduler.schedule(
            self.visible_for,
            Box::new(move || {
                if !surface.is_mounted(id) {
                    return;
                }
                surface.fade_out(id);
                let _ = scheduler.schedule(fade_for, Box::new(move || surface.remove(id)));
            }),
        );

        id
    }

    pub fn error(&self, message: &str) -> NotificationId {
        self.show(message, Severity::Error)
    }

    pub fn success(&self, message: &str) -> NotificationId {
        self.show(message, Severity::Success)
    }

    pub fn info(&self, message: &str) -> NotificationId {
        self.show(message, Severity::Info)
    }

    /// Close a banner immediately.
    pub fn dismiss(&self, id: NotificationId) {
        self.surface.remove(id);
    }

    /// Page-wide handler for errors nothing else caught.
    pub fn report_uncaught_error(&self, message: &str, file: &str, line: u32) -> NotificationId {
        error!(error_message = message, file, line, "uncaught error");
        self.error(GENERIC_ERROR_MESSAGE)
    }
}

/// A banner as [`MemorySurface`] holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub severity: Severity,
    pub fading: bool,
}

/// Surface that keeps banners in memory, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MemorySurface {
    banners: RefCell<BTreeMap<NotificationId, Banner>>,
    stylesheets: Cell<usize>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Banners currently displayed, oldest first.
    pub fn visible(&self) -> Vec<Banner> {
        self.banners.borrow().values().cloned().collect()
    }

    /// The single displayed banner, if any.
    pub fn current(&self) -> Option<Banner> {
        self.banners.borrow().values().next_back().cloned()
    }

    /// Number of stylesheets injected.
    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.get()
    }

    /// What the close affordance does.
    pub fn click_close(&self, id: NotificationId) {
        self.remove(id);
    }
}

impl NotificationSurface for MemorySurface {
    fn ensure_stylesheet(&self) {
        if self.stylesheets.get() == 0 {
            self.stylesheets.set(1);
        }
    }

    fn remove_all(&self) {
        self.banners.borrow_mut().clear();
    }

    fn mount(&self, id: NotificationId, message: &str, severity: Severity) {
        self.banners.borrow_mut().insert(
            id,
            Banner {
                message: message.to_string(),
                severity,
                fading: false,
            },
        );
    }

    fn is_mounted(&self, id: NotificationId) -> bool {
        self.banners.borrow().contains_key(&id)
    }

    fn fade_out(&self, id: NotificationId) {
        if let Some(banner) = self.banners.borrow_mut().get_mut(&id) {
            banner.fading = true;
        }
    }

    fn remove(&self, id: NotificationId) {
        self.banners.borrow_mut().remove(&id);
    }
}

//! Widget configuration.
//!
//! The hosting page may pass a partial JSON document; anything it leaves out
//! falls back to the defaults below.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::logging::Verbosity;

/// Storage key holding the booking collection.
pub const DEFAULT_BOOKINGS_KEY: &str = "shammaBookings";

/// Storage key holding the feedback collection.
pub const DEFAULT_FEEDBACK_KEY: &str = "shammaFeedback";

/// Label shown on the submit control while a booking is processing.
pub const DEFAULT_PROCESSING_LABEL: &str = r#"<i class="fas fa-spinner fa-spin"></i> Processing..."#;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Storage keys.
    pub storage: StorageConfig,
    /// Delays used by confirmation and notifications.
    pub timing: TimingConfig,
    /// Form presentation.
    pub form: FormConfig,
    /// Console diagnostics level.
    pub verbosity: Verbosity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub bookings_key: String,
    pub feedback_key: String,
}

/// All values in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before a booking is reported as confirmed.
    pub confirmation_delay_ms: u64,
    /// How long a notification stays before it starts fading out.
    pub notification_visible_ms: u64,
    /// Length of the fade-out animation.
    pub notification_fade_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Markup put into the submit control while processing.
    pub processing_label: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bookings_key: DEFAULT_BOOKINGS_KEY.to_string(),
            feedback_key: DEFAULT_FEEDBACK_KEY.to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            confirmation_delay_ms: 1500,
            notification_visible_ms: 5000,
            notification_fade_ms: 300,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            processing_label: DEFAULT_PROCESSING_LABEL.to_string(),
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }

    #[must_use]
    pub fn notification_visible(&self) -> Duration {
        Duration::from_millis(self.notification_visible_ms)
    }

    #[must_use]
    pub fn notification_fade(&self) -> Duration {
        Duration::from_millis(self.notification_fade_ms)
    }
}

impl BookingConfig {
    /// Parse a (possibly partial) JSON document over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this shape or
    /// the resulting configuration fails [`BookingConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = if json.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(json)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the widget cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::ConfigValidation`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.storage.bookings_key.is_empty() || self.storage.feedback_key.is_empty() {
            return Err(BookingError::config("storage keys must not be empty"));
        }
        if self.storage.bookings_key == self.storage.feedback_key {
            return Err(BookingError::config(
                "bookings and feedback must use different storage keys",
            ));
        }
        if self.timing.notification_visible_ms == 0 {
            return Err(BookingError::config(
                "notification_visible_ms must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Override both storage keys.
    pub fn with_storage_keys(mut self, bookings: &str, feedback: &str) -> Self {
        self.storage.bookings_key = bookings.to_string();
        self.storage.feedback_key = feedback.to_string();
        self
    }

    /// Override the confirmation delay.
    pub fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.timing.confirmation_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

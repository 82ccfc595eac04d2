//! Read-only status counts for the admin panel.

use std::fmt;

use tracing::{debug, info};

use crate::error::Result;
use crate::ledger::BookingLedger;
use crate::page::BookingPage;

/// Element that receives the counts, when the page has one.
pub const ADMIN_STATS_ID: &str = "adminStats";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminSummary {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
}

impl AdminSummary {
    /// Count statuses; `None` stands for an element without one.
    pub fn tally<'a>(statuses: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        statuses
            .into_iter()
            .fold(Self::default(), |mut summary, status| {
                summary.total += 1;
                match status {
                    Some("pending") => summary.pending += 1,
                    Some("confirmed") => summary.confirmed += 1,
                    _ => {}
                }
                summary
            })
    }

    /// Markup for the admin panel.
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="stat">Total: {}</div><div class="stat">Pending: {}</div><div class="stat">Confirmed: {}</div>"#,
            self.total, self.pending, self.confirmed
        )
    }
}

impl fmt::Display for AdminSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}, Pending: {}, Confirmed: {}",
            self.total, self.pending, self.confirmed
        )
    }
}

/// Render the current counts into the page's admin panel.
///
/// Nothing is rendered while the collection is empty. Returns the summary
/// when it was rendered.
pub fn refresh_admin_panel(
    ledger: &BookingLedger,
    page: &dyn BookingPage,
) -> Result<Option<AdminSummary>> {
    let summary = ledger.admin_summary()?;
    info!(total = summary.total, "found existing bookings");

    if summary.total == 0 {
        return Ok(None);
    }
    if !page.render_admin_summary(&summary) {
        debug!("no admin panel on this page");
        return Ok(None);
    }
    Ok(Some(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_bounds() {
        let summary = AdminSummary::tally([
            Some("pending"),
            Some("pending"),
            Some("confirmed"),
            Some("archived"),
            None,
        ]);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.confirmed, 1);
        assert!(summary.pending + summary.confirmed <= summary.total);
    }

    #[test]
    fn test_tally_only_known_statuses_is_exact() {
        let summary = AdminSummary::tally([Some("pending"), Some("confirmed"), Some("pending")]);
        assert_eq!(summary.pending + summary.confirmed, summary.total);
    }

    #[test]
    fn test_html_and_display() {
        let summary = AdminSummary {
            total: 3,
            pending: 2,
            confirmed: 1,
        };
        let html = summary.to_html();
        assert!(html.contains("Total: 3"));
        assert!(html.contains("Pending: 2"));
        assert!(html.contains("Confirmed: 1"));
        assert_eq!(summary.to_string(), "Total: 3, Pending: 2, Confirmed: 1");
    }
}

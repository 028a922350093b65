//! Application state.
//!
//! One immutable [`SiteContext`] per server generation, shared by all
//! request handlers. The reload supervisor replaces the whole state by
//! restarting the server rather than mutating it.

use ezserve_site::SiteContext;

/// State shared across all handlers.
pub(crate) struct AppState {
    /// Startup site state: config, template, not-found page.
    pub(crate) site: SiteContext,
}

//! Page qualification
//!
//! Whether a page keeps ambient playback alive is decided by a
//! [`PagePredicate`]. [`PageRouter`] turns the host's page lifecycle
//! notifications into tracker operations: a page that navigates to a
//! qualifying URL is qualified, one that navigates elsewhere or is removed
//! is closed. Closing an untracked page is a no-op downstream, so the
//! router keeps no state of its own.

use crate::types::PageId;
use url::Url;

/// Decides whether a URL qualifies
pub trait PagePredicate: Send + Sync {
    fn qualifies(&self, url: &str) -> bool;
}

/// Host-based site matcher
///
/// A pattern containing a dot (`amazon.com`) matches that host and its
/// subdomains. A bare label (`amazon`) matches any host containing that
/// label, so it covers every regional domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePattern {
    patterns: Vec<String>,
}

impl SitePattern {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.into().trim().trim_start_matches("*.").to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    fn host_matches(&self, host: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            if pattern.contains('.') {
                host == pattern || host.ends_with(&format!(".{}", pattern))
            } else {
                host.split('.').any(|label| label == pattern)
            }
        })
    }
}

impl PagePredicate for SitePattern {
    fn qualifies(&self, url: &str) -> bool {
        host_of(url)
            .map(|host| self.host_matches(&host))
            .unwrap_or(false)
    }
}

/// Extract the lowercase host from an http(s) URL
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.host_str().map(str::to_ascii_lowercase)
}

/// Page lifecycle notification from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// A page was created or finished navigating
    Navigated { page: PageId, url: String },
    /// A page was removed
    Removed { page: PageId },
}

/// Tracker operation derived from a page event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Qualified(PageId),
    Closed(PageId),
}

pub struct PageRouter {
    predicate: Box<dyn PagePredicate>,
}

impl PageRouter {
    pub fn new(predicate: Box<dyn PagePredicate>) -> Self {
        Self { predicate }
    }

    pub fn route(&self, event: &PageEvent) -> PageAction {
        match event {
            PageEvent::Navigated { page, url } if self.predicate.qualifies(url) => {
                PageAction::Qualified(*page)
            }
            PageEvent::Navigated { page, .. } | PageEvent::Removed { page } => {
                PageAction::Closed(*page)
            }
        }
    }
}

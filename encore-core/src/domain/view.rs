//! Downstream view keys
//!
//! Cached dashboard views that must refetch when collected metrics change.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewKey {
    /// `["metrics-summary"]`
    MetricsSummary,
    /// `["artists", "platform-status"]`
    ArtistsPlatformStatus,
}

impl ViewKey {
    /// Every view invalidated after a job completes or a poll fires
    pub const ALL: [ViewKey; 2] = [ViewKey::MetricsSummary, ViewKey::ArtistsPlatformStatus];

    /// Query-key segments
    pub fn segments(&self) -> &'static [&'static str] {
        match self {
            ViewKey::MetricsSummary => &["metrics-summary"],
            ViewKey::ArtistsPlatformStatus => &["artists", "platform-status"],
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.segments().join(","))
    }
}

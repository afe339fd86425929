//! Upstream labels for metrics and logs.
//!
//! A label is purely observational. It is derived from the configured
//! origin string through a small finite table and never affects routing.

use std::fmt;

/// Human-readable name of an upstream origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamLabel {
    Locations,
    Legacy,
    Custom,
}

impl UpstreamLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::Legacy => "legacy",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for UpstreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finite mapping from origin string to label; unknown origins are `Custom`.
#[derive(Debug, Clone, Default)]
pub struct UpstreamLabels {
    known: Vec<(String, UpstreamLabel)>,
}

impl UpstreamLabels {
    /// Build the table from the two well-known origins.
    ///
    /// The locations origin is registered first, so it wins when both
    /// origins are configured to the same value.
    pub fn new(locations_origin: &str, legacy_origin: &str) -> Self {
        let known = [
            (locations_origin, UpstreamLabel::Locations),
            (legacy_origin, UpstreamLabel::Legacy),
        ]
        .into_iter()
        .filter(|(origin, _)| !origin.is_empty())
        .map(|(origin, label)| (origin.to_string(), label))
        .collect();
        Self { known }
    }

    pub fn label_for(&self, origin: &str) -> UpstreamLabel {
        self.known
            .iter()
            .find(|(known, _)| known == origin)
            .map(|(_, label)| *label)
            .unwrap_or(UpstreamLabel::Custom)
    }
}

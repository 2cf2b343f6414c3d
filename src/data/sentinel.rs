//! Markers the dataset uses in place of a value.

/// Markers meaning "no data" in the progress report cards.
pub const DEFAULT_SENTINELS: [&str; 2] = ["NDA", "Not Enough Data"];

/// Set of markers that stand for a missing value.
///
/// Blank cells (empty or whitespace only) always count as missing. Other
/// markers are compared against the trimmed cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelSet {
    markers: Vec<String>,
}

impl Default for SentinelSet {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINELS)
    }
}

impl SentinelSet {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_missing(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.markers.iter().any(|m| m == trimmed)
    }

    /// `None` for missing cells, otherwise the cell itself.
    pub fn normalize<'a>(&self, value: Option<&'a str>) -> Option<&'a str> {
        value.filter(|v| !self.is_missing(v))
    }
}

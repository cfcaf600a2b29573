//! Risk level and filter types.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Categorical severity attached to a triage record.
///
/// The server stores levels lowercase (`"high"`) while the UI and the
/// filter query parameter use capitalized names (`"High"`). Parsing is
/// case-insensitive; anything unrecognized maps to [`RiskLevel::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl RiskLevel {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            "low" => RiskLevel::Low,
            _ => RiskLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
            RiskLevel::Unknown => "Unknown",
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RiskLevel::parse(&raw))
    }
}

/// Risk filter for the admin sessions listing.
///
/// [`RiskFilter::All`] means the `risk` query parameter is omitted entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl RiskFilter {
    /// Query parameter value, `None` for [`RiskFilter::All`].
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            RiskFilter::All => None,
            RiskFilter::High => Some("High"),
            RiskFilter::Medium => Some("Medium"),
            RiskFilter::Low => Some("Low"),
        }
    }

    /// Whether a record passes this filter.
    pub fn matches(&self, level: RiskLevel) -> bool {
        match self {
            RiskFilter::All => true,
            RiskFilter::High => level == RiskLevel::High,
            RiskFilter::Medium => level == RiskLevel::Medium,
            RiskFilter::Low => level == RiskLevel::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(RiskLevel::parse("high"), RiskLevel::High);
        assert_eq!(RiskLevel::parse("High"), RiskLevel::High);
        assert_eq!(RiskLevel::parse("MEDIUM"), RiskLevel::Medium);
        assert_eq!(RiskLevel::parse("low"), RiskLevel::Low);
    }

    #[test]
    fn test_parse_unrecognized_maps_to_unknown() {
        assert_eq!(RiskLevel::parse(""), RiskLevel::Unknown);
        assert_eq!(RiskLevel::parse("critical"), RiskLevel::Unknown);
    }

    #[test]
    fn test_deserialize_server_lowercase() {
        let level: RiskLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(level, RiskLevel::High);
    }

    #[test]
    fn test_filter_param_omitted_for_all() {
        assert_eq!(RiskFilter::All.as_param(), None);
        assert_eq!(RiskFilter::High.as_param(), Some("High"));
    }

    #[test]
    fn test_filter_matches() {
        assert!(RiskFilter::All.matches(RiskLevel::Unknown));
        assert!(RiskFilter::High.matches(RiskLevel::High));
        assert!(!RiskFilter::High.matches(RiskLevel::Low));
    }
}

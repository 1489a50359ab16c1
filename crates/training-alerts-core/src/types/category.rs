//! Percentile alert categories, threshold flags and category filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Percentile-derived alert category.
///
/// Scored categories are ordered by rank: SB < B < N < G < SG.
/// `NotScored` sits outside that ordering and is the sentinel for a missing
/// percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertCategory {
    #[serde(rename = "SB")]
    SignificantlyBelow,
    #[serde(rename = "B")]
    Below,
    #[serde(rename = "N")]
    Normal,
    #[serde(rename = "G")]
    Good,
    #[serde(rename = "SG")]
    SignificantlyGood,
    #[serde(rename = "NS")]
    NotScored,
}

impl AlertCategory {
    /// Scored categories in ascending rank order.
    pub const SCORED: [AlertCategory; 5] = [
        Self::SignificantlyBelow,
        Self::Below,
        Self::Normal,
        Self::Good,
        Self::SignificantlyGood,
    ];

    /// Standard categories counted during aggregation, NS first.
    pub const STANDARD: [AlertCategory; 6] = [
        Self::NotScored,
        Self::SignificantlyBelow,
        Self::Below,
        Self::Normal,
        Self::Good,
        Self::SignificantlyGood,
    ];

    /// Wire abbreviation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignificantlyBelow => "SB",
            Self::Below => "B",
            Self::Normal => "N",
            Self::Good => "G",
            Self::SignificantlyGood => "SG",
            Self::NotScored => "NS",
        }
    }

    /// Human-readable description shown next to feature percentiles.
    pub const fn description(self) -> &'static str {
        match self {
            Self::SignificantlyBelow => "Significantly Below Average",
            Self::Below => "Below Average",
            Self::Normal => "Average",
            Self::Good => "Above Average",
            Self::SignificantlyGood => "Significantly Above Average",
            Self::NotScored => "Not Scored",
        }
    }

    /// Rank among scored categories (0 = SB .. 4 = SG). `None` for NS.
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::SignificantlyBelow => Some(0),
            Self::Below => Some(1),
            Self::Normal => Some(2),
            Self::Good => Some(3),
            Self::SignificantlyGood => Some(4),
            Self::NotScored => None,
        }
    }

    #[inline]
    pub fn is_scored(self) -> bool {
        self != Self::NotScored
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SB" => Ok(Self::SignificantlyBelow),
            "B" => Ok(Self::Below),
            "N" => Ok(Self::Normal),
            "G" => Ok(Self::Good),
            "SG" => Ok(Self::SignificantlyGood),
            "NS" => Ok(Self::NotScored),
            other => Err(CoreError::validation(
                "alert_category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

/// Threshold alert flag: `T` (triggered) or `N` (normal).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertFlag {
    #[serde(rename = "T")]
    Triggered,
    #[default]
    #[serde(rename = "N")]
    Normal,
}

impl AlertFlag {
    #[inline]
    pub fn from_triggered(triggered: bool) -> Self {
        if triggered {
            Self::Triggered
        } else {
            Self::Normal
        }
    }

    #[inline]
    pub fn is_triggered(self) -> bool {
        self == Self::Triggered
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Triggered => "T",
            Self::Normal => "N",
        }
    }
}

impl fmt::Display for AlertFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard category filter selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// `"all"`: identity filter.
    All,
    /// `"T"`: raw threshold-annotation mask.
    Threshold,
    /// Equality against the resolved percentile category.
    Category(AlertCategory),
}

impl FromStr for CategoryFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "T" => Ok(Self::Threshold),
            other => other.parse().map(Self::Category).map_err(|_| {
                CoreError::validation("alert_category", format!("unknown filter '{}'", other))
            }),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Threshold => f.write_str("T"),
            Self::Category(category) => write!(f, "{}", category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_abbreviation() {
        let json = serde_json::to_string(&AlertCategory::SignificantlyGood).unwrap();
        assert_eq!(json, "\"SG\"");
        let parsed: AlertCategory = serde_json::from_str("\"NS\"").unwrap();
        assert_eq!(parsed, AlertCategory::NotScored);
    }

    #[test]
    fn test_category_from_str_round_trips_all() {
        for category in AlertCategory::STANDARD {
            assert_eq!(category.as_str().parse::<AlertCategory>().unwrap(), category);
        }
        assert!("Unknown".parse::<AlertCategory>().is_err());
    }

    #[test]
    fn test_rank_orders_scored_categories() {
        let ranks: Vec<u8> = AlertCategory::SCORED
            .iter()
            .filter_map(|c| c.rank())
            .collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
        assert_eq!(AlertCategory::NotScored.rank(), None);
    }

    #[test]
    fn test_flag_serialization() {
        assert_eq!(serde_json::to_string(&AlertFlag::Triggered).unwrap(), "\"T\"");
        assert_eq!(AlertFlag::default(), AlertFlag::Normal);
        assert!(AlertFlag::from_triggered(true).is_triggered());
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("T".parse::<CategoryFilter>().unwrap(), CategoryFilter::Threshold);
        assert_eq!(
            "G".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Category(AlertCategory::Good)
        );
        assert!("bogus".parse::<CategoryFilter>().is_err());
    }
}

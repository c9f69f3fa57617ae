//! GGA fix-quality classification.

use std::fmt;

use crate::core::{FIELD_DELIMITER, FIX_QUALITY_FIELD};

/// Category of a GGA fix-quality indicator.
///
/// The mapping is fixed; status displays key their colours off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixQuality {
    /// `0`: no valid fix.
    Invalid,
    /// `1`: autonomous GPS fix.
    Gps,
    /// `2`: differential GPS fix.
    Dgps,
    /// `4`: RTK fixed or float (best).
    RtkBest,
    /// `5`: RTK fixed or float (alternate).
    RtkAlt,
    /// Any other indicator, or none at all.
    Unknown,
}

impl FixQuality {
    /// Classify a single indicator character.
    pub fn from_indicator(indicator: char) -> Self {
        match indicator {
            '0' => Self::Invalid,
            '1' => Self::Gps,
            '2' => Self::Dgps,
            '4' => Self::RtkBest,
            '5' => Self::RtkAlt,
            _ => Self::Unknown,
        }
    }

    /// Classify a position sentence by its fix-quality field.
    pub fn from_sentence(sentence: &str) -> Self {
        Self::indicator(sentence).map_or(Self::Unknown, Self::from_indicator)
    }

    /// First character of the fix-quality field, if the field exists and is
    /// non-empty.
    pub fn indicator(sentence: &str) -> Option<char> {
        sentence
            .split(FIELD_DELIMITER)
            .nth(FIX_QUALITY_FIELD)
            .and_then(|field| field.chars().next())
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Gps => "GPS fix",
            Self::Dgps => "DGPS fix",
            Self::RtkBest => "RTK fixed/float",
            Self::RtkAlt => "RTK fixed/float (alt)",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FixQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_mapping() {
        assert_eq!(FixQuality::from_indicator('0'), FixQuality::Invalid);
        assert_eq!(FixQuality::from_indicator('1'), FixQuality::Gps);
        assert_eq!(FixQuality::from_indicator('2'), FixQuality::Dgps);
        assert_eq!(FixQuality::from_indicator('4'), FixQuality::RtkBest);
        assert_eq!(FixQuality::from_indicator('5'), FixQuality::RtkAlt);
    }

    #[test]
    fn test_other_indicators_unknown() {
        for c in ['3', '6', '7', '8', '9', 'A', ' ', '\0', '*'] {
            assert_eq!(FixQuality::from_indicator(c), FixQuality::Unknown, "{c:?}");
        }
    }

    #[test]
    fn test_rtk_sentence() {
        let gga = "$GPGGA,123519,4807.038,N,01131.000,E,4,08,0.9,545.4,M,46.9,M,,*47";
        assert_eq!(FixQuality::indicator(gga), Some('4'));
        assert_eq!(FixQuality::from_sentence(gga), FixQuality::RtkBest);
    }

    #[test]
    fn test_sparse_sentence() {
        assert_eq!(FixQuality::from_sentence("$GPGGA,,,,,,1,,,,"), FixQuality::Gps);
    }

    #[test]
    fn test_short_sentence_unknown() {
        assert_eq!(FixQuality::from_sentence(""), FixQuality::Unknown);
        assert_eq!(FixQuality::from_sentence("$GPGGA,1,2,3,4,5"), FixQuality::Unknown);
    }

    #[test]
    fn test_empty_field_unknown() {
        assert_eq!(FixQuality::from_sentence("$GPGGA,,,,,,,,"), FixQuality::Unknown);
    }

    #[test]
    fn test_labels() {
        assert_eq!(FixQuality::RtkBest.to_string(), "RTK fixed/float");
        assert_eq!(FixQuality::Unknown.to_string(), "Unknown");
    }
}

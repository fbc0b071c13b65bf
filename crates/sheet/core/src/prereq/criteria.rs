//! Comparison criteria used by prerequisite leaves and tech-level gates.

use core::fmt;

use crate::crc::{self, Fingerprint};
use crate::fxp::Fxp;

// ============================================================================
// Numeric Criteria
// ============================================================================

/// Numeric comparison operator.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NumericCompare {
    /// Matches every value.
    #[default]
    Any,
    Is,
    IsNot,
    AtLeast,
    AtMost,
}

impl NumericCompare {
    fn describe(self) -> &'static str {
        match self {
            Self::Any => "is anything",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::AtLeast => "is at least",
            Self::AtMost => "is at most",
        }
    }
}

/// A numeric comparison against a fixed qualifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericCriteria {
    pub compare: NumericCompare,
    #[cfg_attr(feature = "serde", serde(default))]
    pub qualifier: Fxp,
}

impl NumericCriteria {
    pub const ANY: Self = Self {
        compare: NumericCompare::Any,
        qualifier: Fxp::ZERO,
    };

    pub fn new(compare: NumericCompare, qualifier: Fxp) -> Self {
        Self { compare, qualifier }
    }

    pub fn at_least(qualifier: impl Into<Fxp>) -> Self {
        Self::new(NumericCompare::AtLeast, qualifier.into())
    }

    pub fn at_most(qualifier: impl Into<Fxp>) -> Self {
        Self::new(NumericCompare::AtMost, qualifier.into())
    }

    pub fn is(qualifier: impl Into<Fxp>) -> Self {
        Self::new(NumericCompare::Is, qualifier.into())
    }

    pub fn is_any(&self) -> bool {
        self.compare == NumericCompare::Any
    }

    pub fn matches(&self, value: Fxp) -> bool {
        match self.compare {
            NumericCompare::Any => true,
            NumericCompare::Is => value == self.qualifier,
            NumericCompare::IsNot => value != self.qualifier,
            NumericCompare::AtLeast => value >= self.qualifier,
            NumericCompare::AtMost => value <= self.qualifier,
        }
    }
}

impl fmt::Display for NumericCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            f.write_str(self.compare.describe())
        } else {
            write!(f, "{} {}", self.compare.describe(), self.qualifier)
        }
    }
}

// ============================================================================
// String Criteria
// ============================================================================

/// Text comparison operator. All comparisons ignore case.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StringCompare {
    #[default]
    Any,
    Is,
    IsNot,
    Contains,
    DoesNotContain,
    StartsWith,
    DoesNotStartWith,
    EndsWith,
    DoesNotEndWith,
}

impl StringCompare {
    fn describe(self) -> &'static str {
        match self {
            Self::Any => "is anything",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Contains => "contains",
            Self::DoesNotContain => "does not contain",
            Self::StartsWith => "starts with",
            Self::DoesNotStartWith => "does not start with",
            Self::EndsWith => "ends with",
            Self::DoesNotEndWith => "does not end with",
        }
    }
}

/// A text comparison against a fixed qualifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringCriteria {
    pub compare: StringCompare,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "String::is_empty")
    )]
    pub qualifier: String,
}

impl StringCriteria {
    pub fn new(compare: StringCompare, qualifier: impl Into<String>) -> Self {
        Self {
            compare,
            qualifier: qualifier.into(),
        }
    }

    pub fn is(qualifier: impl Into<String>) -> Self {
        Self::new(StringCompare::Is, qualifier)
    }

    pub fn is_any(&self) -> bool {
        self.compare == StringCompare::Any
    }

    pub fn matches(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        let q = self.qualifier.to_lowercase();
        match self.compare {
            StringCompare::Any => true,
            StringCompare::Is => value == q,
            StringCompare::IsNot => value != q,
            StringCompare::Contains => value.contains(&q),
            StringCompare::DoesNotContain => !value.contains(&q),
            StringCompare::StartsWith => value.starts_with(&q),
            StringCompare::DoesNotStartWith => !value.starts_with(&q),
            StringCompare::EndsWith => value.ends_with(&q),
            StringCompare::DoesNotEndWith => !value.ends_with(&q),
        }
    }
}

impl fmt::Display for StringCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            f.write_str(self.compare.describe())
        } else {
            write!(f, "{} \"{}\"", self.compare.describe(), self.qualifier)
        }
    }
}

impl Fingerprint for NumericCriteria {
    fn crc64(&self, crc: u64) -> u64 {
        crc::fxp(crc::number(crc, self.compare as i64), self.qualifier)
    }
}

impl Fingerprint for StringCriteria {
    fn crc64(&self, crc: u64) -> u64 {
        crc::string(crc::number(crc, self.compare as i64), &self.qualifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_comparisons() {
        let twelve = Fxp::from_int(12);
        assert!(NumericCriteria::ANY.matches(Fxp::MIN));
        assert!(NumericCriteria::at_least(12).matches(twelve));
        assert!(!NumericCriteria::at_least(13).matches(twelve));
        assert!(NumericCriteria::at_most(12).matches(twelve));
        assert!(NumericCriteria::is(12).matches(twelve));
        assert!(NumericCriteria::new(NumericCompare::IsNot, twelve).matches(Fxp::ONE));
        // the unresolved sentinel fails any lower bound
        assert!(!NumericCriteria::at_least(-1000).matches(Fxp::MIN));
    }

    #[test]
    fn string_comparisons_ignore_case() {
        let name = "Combat Reflexes";
        assert!(StringCriteria::is("combat reflexes").matches(name));
        assert!(StringCriteria::new(StringCompare::Contains, "REFLEX").matches(name));
        assert!(StringCriteria::new(StringCompare::StartsWith, "combat").matches(name));
        assert!(StringCriteria::new(StringCompare::EndsWith, "xes").matches(name));
        assert!(!StringCriteria::new(StringCompare::DoesNotContain, "reflex").matches(name));
        assert!(StringCriteria::new(StringCompare::DoesNotStartWith, "fast").matches(name));
        assert!(StringCriteria::new(StringCompare::DoesNotEndWith, "draw").matches(name));
        assert!(StringCriteria::new(StringCompare::IsNot, "luck").matches(name));
        assert!(StringCriteria::default().matches(""));
    }

    #[test]
    fn describes_itself() {
        assert_eq!(NumericCriteria::at_least(12).to_string(), "is at least 12");
        assert_eq!(NumericCriteria::ANY.to_string(), "is anything");
        assert_eq!(StringCriteria::is("Luck").to_string(), "is \"Luck\"");
        assert_eq!("at_most".parse::<NumericCompare>().unwrap(), NumericCompare::AtMost);
        assert_eq!(StringCompare::DoesNotEndWith.as_ref(), "does_not_end_with");
    }
}

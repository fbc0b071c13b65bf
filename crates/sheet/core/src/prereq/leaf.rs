//! Prerequisite leaves: the conditions a list combines.

use core::fmt::Write;

use super::criteria::{NumericCriteria, StringCriteria};
use super::PrereqSubject;
use crate::crc::{self, Fingerprint};
use crate::entity::TraitId;

fn has_text(has: bool) -> &'static str {
    if has { "Has" } else { "Does not have" }
}

/// Compares an attribute's current value (optionally summed with a second
/// attribute) against a numeric criteria.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributePrereq {
    pub has: bool,
    pub which: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub combined_with: Option<String>,
    pub qualifier: NumericCriteria,
}

impl AttributePrereq {
    pub fn new(which: impl Into<String>, qualifier: NumericCriteria) -> Self {
        Self {
            has: true,
            which: which.into(),
            combined_with: None,
            qualifier,
        }
    }

    /// Sums a second attribute into the compared value (builder pattern).
    #[must_use]
    pub fn combined_with(mut self, other: impl Into<String>) -> Self {
        self.combined_with = Some(other.into());
        self
    }

    /// Inverts the condition (builder pattern).
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.has = !self.has;
        self
    }

    pub fn satisfied<S>(&self, subject: &S, explain: Option<&mut String>, prefix: &str) -> bool
    where
        S: PrereqSubject + ?Sized,
    {
        let mut value = subject.attribute_current(&self.which);
        if let Some(other) = &self.combined_with {
            let other = subject.attribute_current(other);
            value = if value.is_unresolved() || other.is_unresolved() {
                crate::fxp::Fxp::MIN
            } else {
                value + other
            };
        }
        let satisfied = self.qualifier.matches(value) == self.has;
        if !satisfied && let Some(buf) = explain {
            let _ = write!(
                buf,
                "{prefix}{} {}",
                has_text(self.has),
                subject.attribute_name(&self.which)
            );
            if let Some(other) = &self.combined_with {
                let _ = write!(buf, " + {}", subject.attribute_name(other));
            }
            let _ = write!(buf, " which {}", self.qualifier);
        }
        satisfied
    }
}

impl Fingerprint for AttributePrereq {
    fn crc64(&self, crc: u64) -> u64 {
        let mut crc = crc::boolean(crc, self.has);
        crc = crc::string(crc, &self.which);
        crc = crc::boolean(crc, self.combined_with.is_some());
        if let Some(other) = &self.combined_with {
            crc = crc::string(crc, other);
        }
        self.qualifier.crc64(crc)
    }
}

/// Checks for the presence of a trait by name and, optionally, level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitPrereq {
    pub has: bool,
    pub name: StringCriteria,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "NumericCriteria::is_any")
    )]
    pub level: NumericCriteria,
}

impl TraitPrereq {
    pub fn new(name: StringCriteria) -> Self {
        Self {
            has: true,
            name,
            level: NumericCriteria::ANY,
        }
    }

    /// Requires a matching level too (builder pattern).
    #[must_use]
    pub fn with_level(mut self, level: NumericCriteria) -> Self {
        self.level = level;
        self
    }

    /// Inverts the condition (builder pattern).
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.has = !self.has;
        self
    }

    /// `exclude` is skipped while searching, so a trait never satisfies
    /// (or blocks) its own prerequisites.
    pub fn satisfied<S>(
        &self,
        subject: &S,
        exclude: Option<TraitId>,
        explain: Option<&mut String>,
        prefix: &str,
    ) -> bool
    where
        S: PrereqSubject + ?Sized,
    {
        let found = subject.traits().into_iter().any(|t| {
            Some(t.id) != exclude && self.name.matches(t.name) && self.level.matches(t.level)
        });
        let satisfied = found == self.has;
        if !satisfied && let Some(buf) = explain {
            let _ = write!(
                buf,
                "{prefix}{} a trait whose name {}",
                has_text(self.has),
                self.name
            );
            if !self.level.is_any() {
                let _ = write!(buf, " and level {}", self.level);
            }
        }
        satisfied
    }
}

impl Fingerprint for TraitPrereq {
    fn crc64(&self, crc: u64) -> u64 {
        let crc = crc::boolean(crc, self.has);
        let crc = self.name.crc64(crc);
        self.level.crc64(crc)
    }
}

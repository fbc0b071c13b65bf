//! Prerequisite domain - boolean-combinable conditions gating traits.
//!
//! A [`PrereqTree`] is evaluated against any [`PrereqSubject`] (normally an
//! [`Entity`](crate::entity::Entity)) and yields a verdict plus, on request,
//! an indented explanation of what is missing.
//!
//! # Module Structure
//!
//! - `criteria`: Numeric and string comparisons
//! - `leaf`: Attribute and trait conditions
//! - `tree`: Arena tree, list combinator and evaluator
//! - `record`: Nested storage form
//! - `error`: Structural errors (`PrereqError`)

pub mod criteria;
pub mod error;
pub mod leaf;
pub mod record;
pub mod tree;

pub use criteria::{NumericCompare, NumericCriteria, StringCompare, StringCriteria};
pub use error::PrereqError;
pub use leaf::{AttributePrereq, TraitPrereq};
pub use record::PrereqRecord;
pub use tree::{MAX_PREREQ_DEPTH, NodeId, PrereqList, PrereqNode, PrereqTree};

use crate::entity::TraitId;
use crate::fxp::Fxp;

/// A trait as seen by prerequisite checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraitRef<'a> {
    pub id: TraitId,
    pub name: &'a str,
    pub level: Fxp,
}

/// Character data prerequisite leaves read.
pub trait PrereqSubject {
    /// Raw tech level text from the profile, e.g. `"3"` or `"8^"`.
    fn tech_level(&self) -> &str;

    /// Current value of an attribute, or `Fxp::MIN` if unresolved.
    fn attribute_current(&self, id: &str) -> Fxp;

    /// Display name for explanations; the ID itself when unknown.
    fn attribute_name(&self, id: &str) -> String;

    fn traits(&self) -> Vec<TraitRef<'_>>;
}

/// Leading integer of a tech level string; 0 when there is none.
///
/// Tech levels carry suffixes (`"8^"`, `"3+1"`), so only the leading number
/// counts. The result is never negative.
pub fn extract_tech_level(text: &str) -> i32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse::<i32>().unwrap_or(0).max(0)
}

/// Applies the storage rule for empty prerequisite lists.
///
/// A non-empty tree is always kept. An empty tree is pruned when its owner is
/// an ordinary item, but kept as an explicit empty list when the owner is a
/// container, whose editor always shows the list.
pub fn resolve_empty(tree: Option<&PrereqTree>, owner_is_container: bool) -> Option<PrereqTree> {
    let tree = tree?;
    if tree.is_empty() && !owner_is_container {
        None
    } else {
        Some(tree.clone())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Stand-in character: ST 10, DX 11, TL 3, no traits.
    pub struct Subject {
        tech_level: String,
        traits: Vec<(TraitId, String, Fxp)>,
    }

    impl Default for Subject {
        fn default() -> Self {
            Self {
                tech_level: "3".into(),
                traits: Vec::new(),
            }
        }
    }

    impl Subject {
        pub fn with_tech_level(mut self, tl: &str) -> Self {
            self.tech_level = tl.into();
            self
        }

        pub fn with_trait(mut self, id: u32, name: &str, level: i32) -> Self {
            self.traits.push((TraitId(id), name.into(), Fxp::from(level)));
            self
        }
    }

    impl PrereqSubject for Subject {
        fn tech_level(&self) -> &str {
            &self.tech_level
        }

        fn attribute_current(&self, id: &str) -> Fxp {
            match id {
                "st" => Fxp::from_int(10),
                "dx" => Fxp::from_int(11),
                _ => Fxp::MIN,
            }
        }

        fn attribute_name(&self, id: &str) -> String {
            match id {
                "st" => "Strength".into(),
                "dx" => "Dexterity".into(),
                other => other.into(),
            }
        }

        fn traits(&self) -> Vec<TraitRef<'_>> {
            self.traits
                .iter()
                .map(|(id, name, level)| TraitRef {
                    id: *id,
                    name: name.as_str(),
                    level: *level,
                })
                .collect()
        }
    }
}

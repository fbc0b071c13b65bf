//! Nested storage form of a prerequisite tree.
//!
//! Stored trees use the nested shape character files have always used:
//!
//! ```json
//! {"type": "prereq_list", "all": true, "when_tl": {...}, "prereqs": [...]}
//! ```
//!
//! [`PrereqTree`] converts to and from it; the arena never appears in storage.

use super::criteria::NumericCriteria;
use super::error::PrereqError;
use super::leaf::{AttributePrereq, TraitPrereq};
use super::tree::{MAX_PREREQ_DEPTH, NodeId, PrereqList, PrereqNode, PrereqTree};

/// One node of the nested storage form.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum PrereqRecord {
    PrereqList {
        all: bool,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "NumericCriteria::is_any")
        )]
        when_tl: NumericCriteria,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Vec::is_empty")
        )]
        prereqs: Vec<PrereqRecord>,
    },
    AttributePrereq(AttributePrereq),
    TraitPrereq(TraitPrereq),
}

impl PrereqTree {
    /// Builds an arena tree from its nested form. The root must be a list.
    pub fn from_record(record: &PrereqRecord) -> Result<Self, PrereqError> {
        let PrereqRecord::PrereqList {
            all,
            when_tl,
            prereqs,
        } = record
        else {
            return Err(PrereqError::NotAList { node: NodeId::ROOT });
        };
        let mut tree = Self::new(*all);
        tree.list_mut(NodeId::ROOT)?.when_tl = *when_tl;
        for child in prereqs {
            tree.attach(NodeId::ROOT, child, 1)?;
        }
        Ok(tree)
    }

    fn attach(
        &mut self,
        parent: NodeId,
        record: &PrereqRecord,
        depth: usize,
    ) -> Result<(), PrereqError> {
        if depth >= MAX_PREREQ_DEPTH {
            return Err(PrereqError::TreeTooDeep {
                limit: MAX_PREREQ_DEPTH,
            });
        }
        match record {
            PrereqRecord::PrereqList {
                all,
                when_tl,
                prereqs,
            } => {
                let mut list = PrereqList::new(*all);
                list.when_tl = *when_tl;
                let id = self.push(parent, list)?;
                for child in prereqs {
                    self.attach(id, child, depth + 1)?;
                }
            }
            PrereqRecord::AttributePrereq(leaf) => {
                self.push(parent, leaf.clone())?;
            }
            PrereqRecord::TraitPrereq(leaf) => {
                self.push(parent, leaf.clone())?;
            }
        }
        Ok(())
    }

    /// Produces the nested form by walking the owning edges.
    pub fn to_record(&self) -> Result<PrereqRecord, PrereqError> {
        self.record_at(self.root(), 0)
    }

    fn record_at(&self, id: NodeId, depth: usize) -> Result<PrereqRecord, PrereqError> {
        if depth >= MAX_PREREQ_DEPTH {
            return Err(PrereqError::TreeTooDeep {
                limit: MAX_PREREQ_DEPTH,
            });
        }
        Ok(match self.node(id)? {
            PrereqNode::List(list) => PrereqRecord::PrereqList {
                all: list.all,
                when_tl: list.when_tl,
                prereqs: list
                    .children()
                    .iter()
                    .map(|&child| self.record_at(child, depth + 1))
                    .collect::<Result<_, _>>()?,
            },
            PrereqNode::Attribute(leaf) => PrereqRecord::AttributePrereq(leaf.clone()),
            PrereqNode::Trait(leaf) => PrereqRecord::TraitPrereq(leaf.clone()),
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PrereqTree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_record()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PrereqTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = PrereqRecord::deserialize(deserializer)?;
        Self::from_record(&record).map_err(serde::de::Error::custom)
    }
}

//! Arena-owned prerequisite tree.
//!
//! Nodes live in a flat vector owned by [`PrereqTree`]. Lists own their
//! children through [`NodeId`] edges; every node also records its parent as a
//! plain ID, so navigation upward never creates shared ownership. Cloning,
//! serialization and evaluation only walk the owning (downward) edges.

use core::fmt;

use super::criteria::NumericCriteria;
use super::error::PrereqError;
use super::leaf::{AttributePrereq, TraitPrereq};
use super::{PrereqSubject, extract_tech_level};
use crate::crc::{self, Fingerprint};
use crate::entity::TraitId;
use crate::fxp::Fxp;

/// Recursion ceiling for evaluation and conversion.
///
/// Rulebook content nests a handful of levels; anything deeper is treated as
/// a corrupted save file.
pub const MAX_PREREQ_DEPTH: usize = 64;

/// Indent inserted after every newline of a nested explanation.
const INDENT: &str = "\n\u{a0}\u{a0}";

/// Index of a node within its tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: Self = Self(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Boolean combinator over child nodes, with an optional tech-level gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrereqList {
    /// `true` for "all of", `false` for "at least one of".
    pub all: bool,
    /// The list only applies when the character's tech level matches.
    pub when_tl: NumericCriteria,
    children: Vec<NodeId>,
}

impl PrereqList {
    pub fn new(all: bool) -> Self {
        Self {
            all,
            when_tl: NumericCriteria::ANY,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn header(&self) -> &'static str {
        if self.all {
            "Requires all of:"
        } else {
            "Requires at least one of:"
        }
    }
}

/// The closed set of prerequisite node variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrereqNode {
    List(PrereqList),
    Attribute(AttributePrereq),
    Trait(TraitPrereq),
}

impl From<AttributePrereq> for PrereqNode {
    fn from(value: AttributePrereq) -> Self {
        Self::Attribute(value)
    }
}

impl From<TraitPrereq> for PrereqNode {
    fn from(value: TraitPrereq) -> Self {
        Self::Trait(value)
    }
}

impl From<PrereqList> for PrereqNode {
    fn from(mut value: PrereqList) -> Self {
        // children are attached through the tree, never carried in
        value.children.clear();
        Self::List(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Slot {
    parent: Option<NodeId>,
    node: PrereqNode,
}

/// A prerequisite tree whose root is always a list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrereqTree {
    slots: Vec<Option<Slot>>,
}

impl Default for PrereqTree {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PrereqTree {
    /// Creates a tree with an empty root list.
    pub fn new(all: bool) -> Self {
        Self {
            slots: vec![Some(Slot {
                parent: None,
                node: PrereqNode::List(PrereqList::new(all)),
            })],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// True when the root list has no children.
    pub fn is_empty(&self) -> bool {
        self.list(NodeId::ROOT)
            .is_ok_and(|list| list.children.is_empty())
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn node(&self, id: NodeId) -> Result<&PrereqNode, PrereqError> {
        self.slot(id).map(|slot| &slot.node)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut PrereqNode, PrereqError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .map(|slot| &mut slot.node)
            .ok_or(PrereqError::UnknownNode { node: id })
    }

    /// The list owning `id`; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, PrereqError> {
        self.slot(id).map(|slot| slot.parent)
    }

    pub fn list(&self, id: NodeId) -> Result<&PrereqList, PrereqError> {
        match self.node(id)? {
            PrereqNode::List(list) => Ok(list),
            _ => Err(PrereqError::NotAList { node: id }),
        }
    }

    pub fn list_mut(&mut self, id: NodeId) -> Result<&mut PrereqList, PrereqError> {
        match self.node_mut(id)? {
            PrereqNode::List(list) => Ok(list),
            _ => Err(PrereqError::NotAList { node: id }),
        }
    }

    /// Appends `node` as the last child of the list `parent`.
    pub fn push(
        &mut self,
        parent: NodeId,
        node: impl Into<PrereqNode>,
    ) -> Result<NodeId, PrereqError> {
        self.list(parent)?;
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(Slot {
            parent: Some(parent),
            node: node.into(),
        }));
        self.list_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Removes `id` and everything beneath it.
    ///
    /// Removing the root clears it instead, since a tree always has one.
    pub fn remove(&mut self, id: NodeId) -> Result<(), PrereqError> {
        let parent = self.parent(id)?;
        let Some(parent) = parent else {
            let children = std::mem::take(&mut self.list_mut(id)?.children);
            for child in children {
                self.drop_subtree(child);
            }
            return Ok(());
        };
        self.list_mut(parent)?.children.retain(|c| *c != id);
        self.drop_subtree(id);
        Ok(())
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(Some(slot)) = self.slots.get_mut(id.index()).map(Option::take)
                && let PrereqNode::List(list) = slot.node
            {
                pending.extend(list.children);
            }
        }
    }

    fn slot(&self, id: NodeId) -> Result<&Slot, PrereqError> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(PrereqError::UnknownNode { node: id })
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Evaluates the whole tree for `subject`.
    ///
    /// `exclude` names the trait that owns this tree; it is ignored by trait
    /// leaves. When `explain` is given and the tree is not satisfied,
    /// human-readable reasons are appended to it, each starting with
    /// `prefix`.
    pub fn satisfied<S>(
        &self,
        subject: &S,
        exclude: Option<TraitId>,
        explain: Option<&mut String>,
        prefix: &str,
    ) -> Result<bool, PrereqError>
    where
        S: PrereqSubject + ?Sized,
    {
        self.satisfied_at(NodeId::ROOT, subject, exclude, explain, prefix, 0)
    }

    fn satisfied_at<S>(
        &self,
        id: NodeId,
        subject: &S,
        exclude: Option<TraitId>,
        explain: Option<&mut String>,
        prefix: &str,
        depth: usize,
    ) -> Result<bool, PrereqError>
    where
        S: PrereqSubject + ?Sized,
    {
        if depth >= MAX_PREREQ_DEPTH {
            return Err(PrereqError::TreeTooDeep {
                limit: MAX_PREREQ_DEPTH,
            });
        }
        let list = match self.node(id)? {
            PrereqNode::List(list) => list,
            PrereqNode::Attribute(leaf) => return Ok(leaf.satisfied(subject, explain, prefix)),
            PrereqNode::Trait(leaf) => {
                return Ok(leaf.satisfied(subject, exclude, explain, prefix));
            }
        };

        if !list.when_tl.is_any() {
            let tl = extract_tech_level(subject.tech_level()).max(0);
            if !list.when_tl.matches(Fxp::from(tl)) {
                return Ok(true);
            }
        }

        let mut local = explain.is_some().then(String::new);
        let mut count = 0;
        for &child in &list.children {
            if self.satisfied_at(child, subject, exclude, local.as_mut(), prefix, depth + 1)? {
                count += 1;
            }
        }
        let satisfied = if list.all {
            count == list.children.len()
        } else {
            count > 0
        };

        if !satisfied
            && let Some(buf) = explain
            && let Some(local) = local.filter(|text| !text.is_empty())
        {
            buf.push_str(prefix);
            buf.push_str(list.header());
            buf.push_str(&local.replace('\n', INDENT));
        }
        Ok(satisfied)
    }
}

/// Folds nodes in pre-order along the owning edges; node IDs and parent
/// links are not part of the value.
impl Fingerprint for PrereqTree {
    fn crc64(&self, crc: u64) -> u64 {
        let mut crc = crc;
        let mut pending = vec![NodeId::ROOT];
        while let Some(id) = pending.pop() {
            let Ok(node) = self.node(id) else {
                continue;
            };
            crc = match node {
                PrereqNode::List(list) => {
                    let mut crc = crc::number(crc, 0);
                    crc = crc::boolean(crc, list.all);
                    crc = list.when_tl.crc64(crc);
                    pending.extend(list.children.iter().rev());
                    crc::number(crc, list.children.len() as i64)
                }
                PrereqNode::Attribute(leaf) => leaf.crc64(crc::number(crc, 1)),
                PrereqNode::Trait(leaf) => leaf.crc64(crc::number(crc, 2)),
            };
        }
        crc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prereq::criteria::{NumericCompare, StringCriteria};
    use crate::prereq::test_support::Subject;

    const PREFIX: &str = "\n\u{25cf} ";

    fn st_at_least(v: i32) -> AttributePrereq {
        AttributePrereq::new("st", NumericCriteria::at_least(v))
    }

    #[test]
    fn all_requires_every_child() {
        let subject = Subject::default();
        let mut tree = PrereqTree::new(true);
        tree.push(tree.root(), st_at_least(12)).unwrap();
        tree.push(tree.root(), st_at_least(8)).unwrap();

        let mut text = String::new();
        assert!(!tree.satisfied(&subject, None, Some(&mut text), PREFIX).unwrap());
        assert_eq!(
            text,
            "\n\u{25cf} Requires all of:\n\u{a0}\u{a0}\u{25cf} Has Strength which is at least 12"
        );
    }

    #[test]
    fn at_least_one_needs_a_single_child() {
        let subject = Subject::default();
        let mut tree = PrereqTree::new(false);
        tree.push(tree.root(), st_at_least(12)).unwrap();
        let mut text = String::new();
        assert!(!tree.satisfied(&subject, None, Some(&mut text), PREFIX).unwrap());
        assert!(text.contains("Requires at least one of:"));

        tree.push(tree.root(), st_at_least(8)).unwrap();
        let mut text = String::new();
        assert!(tree.satisfied(&subject, None, Some(&mut text), PREFIX).unwrap());
        assert!(text.is_empty());
    }

    #[test]
    fn empty_lists_follow_combinator_laws() {
        let subject = Subject::default();
        assert!(PrereqTree::new(true).satisfied(&subject, None, None, "").unwrap());
        assert!(!PrereqTree::new(false).satisfied(&subject, None, None, "").unwrap());

        // no child text, so no dangling header
        let mut text = String::new();
        let empty_any = PrereqTree::new(false);
        assert!(!empty_any.satisfied(&subject, None, Some(&mut text), PREFIX).unwrap());
        assert!(text.is_empty());
    }

    #[test]
    fn tech_level_gate_short_circuits() {
        let subject = Subject::default().with_tech_level("8^");
        let mut tree = PrereqTree::new(true);
        tree.list_mut(tree.root()).unwrap().when_tl = NumericCriteria::at_most(4);
        tree.push(tree.root(), st_at_least(99)).unwrap();
        assert!(tree.satisfied(&subject, None, None, "").unwrap());

        tree.list_mut(tree.root()).unwrap().when_tl = NumericCriteria::at_least(4);
        assert!(!tree.satisfied(&subject, None, None, "").unwrap());

        // malformed tech level counts as 0
        let subject = Subject::default().with_tech_level("unknown");
        tree.list_mut(tree.root()).unwrap().when_tl =
            NumericCriteria::new(NumericCompare::Is, Fxp::ZERO);
        assert!(!tree.satisfied(&subject, None, None, "").unwrap());
        tree.list_mut(tree.root()).unwrap().when_tl = NumericCriteria::at_least(1);
        assert!(tree.satisfied(&subject, None, None, "").unwrap());
    }

    #[test]
    fn nested_explanations_indent_per_level() {
        let subject = Subject::default();
        let mut tree = PrereqTree::new(true);
        let any = tree.push(tree.root(), PrereqList::new(false)).unwrap();
        tree.push(any, st_at_least(15)).unwrap();
        tree.push(any, TraitPrereq::new(StringCriteria::is("Luck"))).unwrap();
        tree.push(tree.root(), st_at_least(1)).unwrap();

        let mut text = String::new();
        assert!(!tree.satisfied(&subject, None, Some(&mut text), PREFIX).unwrap());
        let lines: Vec<&str> = text.split('\n').skip(1).collect();
        assert_eq!(
            lines,
            [
                "\u{25cf} Requires all of:",
                "\u{a0}\u{a0}\u{25cf} Requires at least one of:",
                "\u{a0}\u{a0}\u{a0}\u{a0}\u{25cf} Has Strength which is at least 15",
                "\u{a0}\u{a0}\u{a0}\u{a0}\u{25cf} Has a trait whose name is \"Luck\"",
            ]
        );
    }

    #[test]
    fn trait_leaf_skips_the_excluded_trait() {
        let subject = Subject::default().with_trait(7, "Luck", 1);
        let mut tree = PrereqTree::new(true);
        tree.push(tree.root(), TraitPrereq::new(StringCriteria::is("luck")))
            .unwrap();
        assert!(tree.satisfied(&subject, None, None, "").unwrap());
        assert!(!tree.satisfied(&subject, Some(TraitId(7)), None, "").unwrap());

        let mut tree = PrereqTree::new(true);
        tree.push(
            tree.root(),
            TraitPrereq::new(StringCriteria::is("luck")).with_level(NumericCriteria::at_least(2)),
        )
        .unwrap();
        let mut text = String::new();
        assert!(!tree.satisfied(&subject, None, Some(&mut text), "\n").unwrap());
        assert!(text.ends_with("Has a trait whose name is \"luck\" and level is at least 2"));
    }

    #[test]
    fn negated_and_combined_attribute_leaves() {
        let subject = Subject::default();
        let mut tree = PrereqTree::new(true);
        tree.push(tree.root(), st_at_least(12).negated()).unwrap();
        tree.push(
            tree.root(),
            AttributePrereq::new("st", NumericCriteria::at_least(20)).combined_with("dx"),
        )
        .unwrap();
        assert!(tree.satisfied(&subject, None, None, "").unwrap());

        let mut tree = PrereqTree::new(true);
        tree.push(tree.root(), st_at_least(8).negated()).unwrap();
        tree.push(tree.root(), st_at_least(1).combined_with("xyz")).unwrap();
        let mut text = String::new();
        assert!(!tree.satisfied(&subject, None, Some(&mut text), "\n").unwrap());
        assert!(text.contains("Does not have Strength which is at least 8"));
        assert!(text.contains("Has Strength + xyz which is at least 1"));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let subject = Subject::default();
        let mut tree = PrereqTree::new(true);
        let mut parent = tree.root();
        for _ in 0..MAX_PREREQ_DEPTH {
            parent = tree.push(parent, PrereqList::new(true)).unwrap();
        }
        assert_eq!(
            tree.satisfied(&subject, None, None, ""),
            Err(PrereqError::TreeTooDeep {
                limit: MAX_PREREQ_DEPTH
            })
        );
    }

    #[test]
    fn structure_navigation_and_removal() {
        let mut tree = PrereqTree::new(true);
        let leaf = tree.push(tree.root(), st_at_least(12)).unwrap();
        let list = tree.push(tree.root(), PrereqList::new(false)).unwrap();
        let inner = tree.push(list, st_at_least(3)).unwrap();

        assert_eq!(tree.parent(inner).unwrap(), Some(list));
        assert_eq!(tree.parent(tree.root()).unwrap(), None);
        assert_eq!(tree.push(leaf, st_at_least(1)), Err(PrereqError::NotAList { node: leaf }));

        tree.remove(list).unwrap();
        assert_eq!(tree.node(inner), Err(PrereqError::UnknownNode { node: inner }));
        assert_eq!(tree.list(tree.root()).unwrap().children(), [leaf]);
        assert_eq!(tree.len(), 2);

        tree.remove(tree.root()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = PrereqTree::new(true);
        tree.push(tree.root(), st_at_least(12)).unwrap();
        let mut copy = tree.clone();
        copy.list_mut(copy.root()).unwrap().all = false;
        assert!(tree.list(tree.root()).unwrap().all);
    }

    #[test]
    fn fingerprint_follows_tree_content() {
        let mut tree = PrereqTree::new(true);
        let leaf = tree.push(tree.root(), st_at_least(12)).unwrap();
        let before = tree.fingerprint();
        assert_eq!(before, tree.clone().fingerprint());

        let extra = tree.push(tree.root(), st_at_least(8)).unwrap();
        let added = tree.fingerprint();
        assert_ne!(before, added);

        tree.remove(extra).unwrap();
        assert_eq!(tree.fingerprint(), before);

        if let PrereqNode::Attribute(attr) = tree.node_mut(leaf).unwrap() {
            attr.qualifier = NumericCriteria::at_least(13);
        }
        assert_ne!(tree.fingerprint(), before);

        let mut gated = PrereqTree::new(true);
        gated.push(gated.root(), st_at_least(12)).unwrap();
        assert_eq!(gated.fingerprint(), before);
        gated.list_mut(gated.root()).unwrap().when_tl = NumericCriteria::at_least(3);
        assert_ne!(gated.fingerprint(), before);
        gated.list_mut(gated.root()).unwrap().when_tl = NumericCriteria::ANY;
        gated.list_mut(gated.root()).unwrap().all = false;
        assert_ne!(gated.fingerprint(), before);
    }

    #[test]
    fn fingerprint_ignores_node_ids() {
        let mut grown = PrereqTree::new(true);
        let scratch = grown.push(grown.root(), st_at_least(1)).unwrap();
        grown.push(grown.root(), st_at_least(12)).unwrap();
        grown.remove(scratch).unwrap();

        let mut fresh = PrereqTree::new(true);
        fresh.push(fresh.root(), st_at_least(12)).unwrap();
        assert_eq!(grown.fingerprint(), fresh.fingerprint());
    }
}

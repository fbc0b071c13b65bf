//! Prerequisite tree errors.

use crate::error::{ErrorSeverity, SheetError};

use super::tree::NodeId;

/// Errors raised while building or evaluating a prerequisite tree.
///
/// Evaluation itself never fails on partially-invalid data (a malformed tech
/// level degrades to 0); these cover structural problems only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PrereqError {
    /// Nesting exceeds the recursion ceiling. Treated as data corruption.
    #[error("prerequisite tree nested deeper than {limit} levels")]
    TreeTooDeep { limit: usize },

    /// A child was attached to (or list settings read from) a leaf node.
    #[error("prerequisite node {node} is not a list")]
    NotAList { node: NodeId },

    /// The node ID does not belong to this tree, or was removed.
    #[error("unknown prerequisite node {node}")]
    UnknownNode { node: NodeId },
}

impl SheetError for PrereqError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TreeTooDeep { .. } => ErrorSeverity::Fatal,
            Self::NotAList { .. } | Self::UnknownNode { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TreeTooDeep { .. } => "PREREQ_TREE_TOO_DEEP",
            Self::NotAList { .. } => "PREREQ_NOT_A_LIST",
            Self::UnknownNode { .. } => "PREREQ_UNKNOWN_NODE",
        }
    }
}

//! Deterministic rules engine for tabletop character sheets.
//!
//! `sheet-core` computes derived character state: attribute values and point
//! costs in fixed-point arithmetic, prerequisite satisfaction with readable
//! explanations, and change fingerprints for dependent views. It performs no
//! I/O; settings arrive through an explicit [`AppContext`].
pub mod attribute;
pub mod config;
pub mod crc;
pub mod entity;
pub mod error;
pub mod fxp;
pub mod prereq;

pub use attribute::{
    Attribute, AttributeDef, AttributeDefs, AttributeKind, AttributeView, Attributes, CostFormula,
    DefinitionError, Formula, FormulaResolver, PoolThreshold, ThresholdOp,
};
pub use config::{AppContext, GeneralSettings, SheetSettings};
pub use crc::Fingerprint;
pub use entity::{Entity, EntityRecord, Profile, Trait, TraitId, Unsatisfied};
pub use error::{ErrorSeverity, SheetError};
pub use fxp::{Fxp, FxpError};
pub use prereq::{
    AttributePrereq, NodeId, NumericCompare, NumericCriteria, PrereqError, PrereqList, PrereqNode,
    PrereqRecord, PrereqSubject, PrereqTree, StringCompare, StringCriteria, TraitPrereq,
};

//! Attribute domain - definitions, live instances and value resolution.
//!
//! # Module Structure
//!
//! - `formula`: Formula system for base values and threshold boundaries
//! - `threshold`: Pool states (Reeling, Collapse, ...) and their effect tags
//! - `def`: One attribute's definition (kind, base, cost schedule)
//! - `defs`: Definition registry owned by the sheet settings
//! - `instance`: One character's persisted attribute state
//! - `set`: The instance set and the view that computes derived values

pub mod def;
pub mod defs;
pub mod formula;
pub mod instance;
pub mod set;
pub mod threshold;

pub use def::{AttributeDef, AttributeKind, CostFormula, DefinitionError, RESERVED_IDS, sanitize_id};
pub use defs::AttributeDefs;
pub use formula::{Formula, FormulaResolver};
pub use instance::Attribute;
pub use set::{AttributeView, Attributes, MAX_FORMULA_DEPTH};
pub use threshold::{PoolThreshold, ThresholdOp};

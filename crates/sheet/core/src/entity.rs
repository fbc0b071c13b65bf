//! The character: profile, traits and attributes.
//!
//! An [`Entity`] holds its sheet settings through a shared pointer and its own
//! [`Attributes`] by value. Cloning an entity deep-copies every mutable part,
//! so edits to the clone never reach the original.

use core::fmt;
use std::sync::Arc;

use crate::attribute::{AttributeDefs, AttributeView, Attributes};
use crate::config::{AppContext, SheetSettings};
use crate::crc::{self, Fingerprint};
use crate::fxp::Fxp;
use crate::prereq::{PrereqError, PrereqSubject, PrereqTree, TraitRef, resolve_empty};

/// Bullet prefix for explanation lines.
pub const EXPLANATION_PREFIX: &str = "\n\u{25cf} ";

/// Identifies a trait within one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TraitId(pub u32);

impl fmt::Display for TraitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trait#{}", self.0)
    }
}

/// Descriptive character data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Profile {
    pub name: String,
    pub player_name: String,
    pub tech_level: String,
    #[cfg_attr(feature = "serde", serde(rename = "SM"))]
    pub size_modifier: i32,
}

/// An advantage, disadvantage or quirk with optional prerequisites.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trait {
    pub id: TraitId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: Fxp,
    #[cfg_attr(feature = "serde", serde(default))]
    pub points: Fxp,
    /// Containers group other traits and keep an explicit empty prereq list.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "core::ops::Not::not")
    )]
    pub container: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub prereqs: Option<PrereqTree>,
}

impl Trait {
    pub fn new(name: impl Into<String>, points: Fxp) -> Self {
        Self {
            id: TraitId::default(),
            name: name.into(),
            level: Fxp::ZERO,
            points,
            container: false,
            prereqs: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Fxp) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_prereqs(mut self, prereqs: PrereqTree) -> Self {
        self.prereqs = Some(prereqs);
        self
    }
}

/// Storage form of an entity, without the shared settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRecord {
    #[cfg_attr(feature = "serde", serde(default))]
    pub profile: Profile,
    pub total_points: Fxp,
    pub attributes: Attributes,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub traits: Vec<Trait>,
}

/// A trait whose prerequisites are not met, with the reasons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unsatisfied {
    pub id: TraitId,
    pub name: String,
    pub explanation: String,
}

/// One character sheet.
#[derive(Clone, Debug)]
pub struct Entity {
    pub profile: Profile,
    pub total_points: Fxp,
    traits: Vec<Trait>,
    attributes: Attributes,
    sheet: Arc<SheetSettings>,
}

impl Entity {
    /// Creates a blank character from the context's settings.
    pub fn new(ctx: &AppContext) -> Self {
        let mut profile = Profile::default();
        if ctx.general.auto_fill_profile {
            profile.player_name = ctx.general.default_player_name.clone();
            profile.tech_level = ctx.general.default_tech_level.clone();
        }
        Self {
            profile,
            total_points: ctx.general.initial_points,
            traits: Vec::new(),
            attributes: Attributes::new(ctx.defs()),
            sheet: Arc::clone(&ctx.sheet),
        }
    }

    /// Restores a character, reconciling its attributes with the current
    /// definitions.
    pub fn from_record(ctx: &AppContext, record: EntityRecord) -> Self {
        let mut entity = Self {
            profile: record.profile,
            total_points: record.total_points,
            traits: Vec::with_capacity(record.traits.len()),
            attributes: record.attributes,
            sheet: Arc::clone(&ctx.sheet),
        };
        if entity.attributes.reconcile(ctx.defs()) {
            tracing::debug!(
                "Reconciled attributes of '{}' with sheet settings",
                entity.profile.name
            );
        }
        for t in record.traits {
            entity.add_trait(t);
        }
        entity
    }

    /// Storage form; empty prerequisite lists are pruned unless the trait is
    /// a container.
    pub fn to_record(&self) -> EntityRecord {
        EntityRecord {
            profile: self.profile.clone(),
            total_points: self.total_points,
            attributes: self.attributes.clone(),
            traits: self
                .traits
                .iter()
                .map(|t| Trait {
                    prereqs: resolve_empty(t.prereqs.as_ref(), t.container),
                    ..t.clone()
                })
                .collect(),
        }
    }

    pub fn sheet(&self) -> &SheetSettings {
        &self.sheet
    }

    pub fn defs(&self) -> &AttributeDefs {
        &self.sheet.attributes
    }

    /// Switches to new sheet settings and reconciles the attribute set.
    pub fn set_sheet(&mut self, sheet: Arc<SheetSettings>) {
        self.sheet = sheet;
        self.attributes.reconcile(&self.sheet.attributes);
    }

    /// Resolving view over the attributes, sized by the profile.
    pub fn attributes(&self) -> AttributeView<'_> {
        self.attributes
            .view(&self.sheet.attributes)
            .with_size_modifier(self.profile.size_modifier)
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn set_attribute_maximum(&mut self, id: &str, value: Fxp) -> bool {
        self.attributes.set_maximum(&self.sheet.attributes, id, value)
    }

    pub fn set_attribute_current(&mut self, id: &str, value: Fxp) -> bool {
        self.attributes.set_current(&self.sheet.attributes, id, value)
    }

    /// Adds a trait, assigning it a fresh ID.
    pub fn add_trait(&mut self, mut t: Trait) -> TraitId {
        let next = self.traits.iter().map(|t| t.id.0 + 1).max().unwrap_or(1);
        t.id = TraitId(next);
        let id = t.id;
        self.traits.push(t);
        id
    }

    pub fn remove_trait(&mut self, id: TraitId) -> Option<Trait> {
        let pos = self.traits.iter().position(|t| t.id == id)?;
        Some(self.traits.remove(pos))
    }

    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    pub fn trait_mut(&mut self, id: TraitId) -> Option<&mut Trait> {
        self.traits.iter_mut().find(|t| t.id == id)
    }

    /// Traits whose prerequisites are not met, each checked with itself
    /// excluded.
    pub fn unsatisfied_traits(&self) -> Result<Vec<Unsatisfied>, PrereqError> {
        let mut out = Vec::new();
        for t in &self.traits {
            let Some(prereqs) = &t.prereqs else {
                continue;
            };
            let mut explanation = String::new();
            let met =
                prereqs.satisfied(self, Some(t.id), Some(&mut explanation), EXPLANATION_PREFIX)?;
            if !met {
                out.push(Unsatisfied {
                    id: t.id,
                    name: t.name.clone(),
                    explanation,
                });
            }
        }
        Ok(out)
    }

    pub fn attribute_points(&self) -> Fxp {
        self.attributes().total_cost()
    }

    pub fn trait_points(&self) -> Fxp {
        self.traits.iter().map(|t| t.points).sum()
    }

    pub fn spent_points(&self) -> Fxp {
        self.attribute_points() + self.trait_points()
    }

    pub fn unspent_points(&self) -> Fxp {
        self.total_points - self.spent_points()
    }
}

impl Fingerprint for Entity {
    /// Covers stored data only; derived values follow from it and the sheet
    /// settings, which carry their own fingerprint.
    fn crc64(&self, crc: u64) -> u64 {
        let mut crc = crc::string(crc, &self.profile.name);
        crc = crc::string(crc, &self.profile.player_name);
        crc = crc::string(crc, &self.profile.tech_level);
        crc = crc::number(crc, i64::from(self.profile.size_modifier));
        crc = crc::fxp(crc, self.total_points);
        crc = self.attributes.crc64(crc);
        crc = crc::number(crc, self.traits.len() as i64);
        for t in &self.traits {
            crc = crc::number(crc, i64::from(t.id.0));
            crc = crc::string(crc, &t.name);
            crc = crc::fxp(crc, t.level);
            crc = crc::fxp(crc, t.points);
            crc = crc::boolean(crc, t.container);
            crc = crc::boolean(crc, t.prereqs.is_some());
            if let Some(prereqs) = &t.prereqs {
                crc = prereqs.crc64(crc);
            }
        }
        crc
    }
}

impl PrereqSubject for Entity {
    fn tech_level(&self) -> &str {
        &self.profile.tech_level
    }

    fn attribute_current(&self, id: &str) -> Fxp {
        self.attributes().current(id)
    }

    fn attribute_name(&self, id: &str) -> String {
        self.defs()
            .lookup(id)
            .map_or_else(|| id.to_owned(), |def| def.name.clone())
    }

    fn traits(&self) -> Vec<TraitRef<'_>> {
        self.traits
            .iter()
            .map(|t| TraitRef {
                id: t.id,
                name: t.name.as_str(),
                level: t.level,
            })
            .collect()
    }
}

//! Attribute definition registry.
//!
//! Definitions are stored in a map for O(1) lookup by ID; a stable ordered
//! view is produced on demand by sorting on each definition's captured display
//! order. Map iteration order is never observable.

use std::collections::HashMap;

use super::def::{AttributeDef, DefinitionError};
use crate::crc::{self, Fingerprint};

/// The set of attributes a sheet configuration defines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeDefs {
    set: HashMap<String, AttributeDef>,
}

impl AttributeDefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from an ordered sequence.
    ///
    /// Sequence position becomes each definition's display order.
    pub fn from_list(list: Vec<AttributeDef>) -> Result<Self, DefinitionError> {
        let mut defs = Self {
            set: HashMap::with_capacity(list.len()),
        };
        for (i, mut def) in list.into_iter().enumerate() {
            def.normalize();
            defs.insert(def.with_order(i as i32))?;
        }
        Ok(defs)
    }

    /// Adds a definition, keeping its display order as given.
    pub fn insert(&mut self, def: AttributeDef) -> Result<(), DefinitionError> {
        def.validate()?;
        if self.set.contains_key(def.id()) {
            return Err(DefinitionError::DuplicateId {
                id: def.id().to_owned(),
            });
        }
        self.set.insert(def.id().to_owned(), def);
        Ok(())
    }

    /// Removes a definition.
    pub fn remove(&mut self, id: &str) -> Option<AttributeDef> {
        self.set.remove(id)
    }

    /// Looks up a definition.
    ///
    /// `None` is not an error: it tells the caller the ID is not an attribute,
    /// and callers then try the ID as a literal number.
    pub fn lookup(&self, id: &str) -> Option<&AttributeDef> {
        self.set.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.set.contains_key(id)
    }

    /// Definitions sorted by display order (ID breaks ties).
    pub fn list(&self) -> Vec<&AttributeDef> {
        let mut list: Vec<&AttributeDef> = self.set.values().collect();
        list.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id().cmp(b.id())));
        list
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl Fingerprint for AttributeDefs {
    fn crc64(&self, crc: u64) -> u64 {
        let crc = crc::number(crc, self.set.len() as i64);
        self.list().into_iter().fold(crc, |crc, def| def.crc64(crc))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AttributeDefs {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.list())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AttributeDefs {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let list = Vec::<AttributeDef>::deserialize(deserializer)?;
        Self::from_list(list).map_err(serde::de::Error::custom)
    }
}

//! # Attribute Pool
//!
//! Pads store attributes as `(key, value)` pairs interned to dense numeric
//! ids. The pool is owned by the host; codec functions receive it as an
//! injected capability and never cache ids across calls.

use crate::error::ChangesetResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Append-only `(key, value) <-> id` dictionary
pub trait AttributePool {
    /// Id of the pair, assigning the next free id on first sight
    fn get_or_create(&mut self, key: &str, value: &str) -> u32;

    fn lookup(&self, id: u32) -> Option<Attribute>;
}

/// In-memory pool, serializable in the pad's JSON shape:
/// `{"numToAttrib": {"0": ["bold", "true"]}, "nextNum": 1}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PoolSnapshot", into = "PoolSnapshot")]
pub struct MemoryAttributePool {
    num_to_attrib: BTreeMap<u32, Attribute>,
    attrib_to_num: HashMap<Attribute, u32>,
    next_num: u32,
}

/// Wire shape of [`MemoryAttributePool`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    num_to_attrib: BTreeMap<u32, (String, String)>,
    next_num: u32,
}

impl MemoryAttributePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.num_to_attrib.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_to_attrib.is_empty()
    }

    pub fn from_json(json: &str) -> ChangesetResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ChangesetResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl AttributePool for MemoryAttributePool {
    fn get_or_create(&mut self, key: &str, value: &str) -> u32 {
        let attribute = Attribute::new(key, value);
        if let Some(id) = self.attrib_to_num.get(&attribute) {
            return *id;
        }
        let id = self.next_num;
        self.next_num += 1;
        self.num_to_attrib.insert(id, attribute.clone());
        self.attrib_to_num.insert(attribute, id);
        id
    }

    fn lookup(&self, id: u32) -> Option<Attribute> {
        self.num_to_attrib.get(&id).cloned()
    }
}

impl From<PoolSnapshot> for MemoryAttributePool {
    fn from(snapshot: PoolSnapshot) -> Self {
        let num_to_attrib: BTreeMap<u32, Attribute> = snapshot
            .num_to_attrib
            .into_iter()
            .map(|(id, (key, value))| (id, Attribute { key, value }))
            .collect();
        let attrib_to_num = num_to_attrib
            .iter()
            .map(|(id, attribute)| (attribute.clone(), *id))
            .collect();
        // never hand out an id that is already taken
        let next_num = num_to_attrib
            .keys()
            .next_back()
            .map_or(0, |last| last + 1)
            .max(snapshot.next_num);

        Self {
            num_to_attrib,
            attrib_to_num,
            next_num,
        }
    }
}

impl From<MemoryAttributePool> for PoolSnapshot {
    fn from(pool: MemoryAttributePool) -> Self {
        PoolSnapshot {
            num_to_attrib: pool
                .num_to_attrib
                .into_iter()
                .map(|(id, attribute)| (id, (attribute.key, attribute.value)))
                .collect(),
            next_num: pool.next_num,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw field value as it appeared in the script source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    Multi(Vec<String>),
}

impl RawValue {
    /// The scalar value, or the last entry of a list.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Single(value) => Some(value),
            RawValue::Multi(values) => values.last().map(String::as_str),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        match self {
            RawValue::Single(value) => std::slice::from_ref(value),
            RawValue::Multi(values) => values,
        }
    }
}

/// Untyped field map recovered from marker calls.
///
/// Keys listed as multi-valued accumulate every value in encounter order;
/// all other keys keep the last value written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFieldMap(BTreeMap<String, RawValue>);

impl RawFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>, multi_valued: &[String]) {
        let key = key.into();
        let value = value.into();
        if multi_valued.iter().any(|k| *k == key) {
            match self.0.entry(key).or_insert_with(|| RawValue::Multi(Vec::new())) {
                RawValue::Multi(values) => values.push(value),
                slot => *slot = RawValue::Multi(vec![value]),
            }
        } else {
            self.0.insert(key, RawValue::Single(value));
        }
    }

    /// Fold `other` into `self`. Lists on both sides are concatenated with
    /// `other` last; anything else is overwritten by `other`.
    pub fn merge(&mut self, other: RawFieldMap) {
        for (key, incoming) in other.0 {
            match (self.0.get_mut(&key), incoming) {
                (Some(RawValue::Multi(existing)), RawValue::Multi(more)) => existing.extend(more),
                (_, incoming) => {
                    self.0.insert(key, incoming);
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(RawValue::as_str)
    }

    /// Every value recorded for `key`; a scalar yields a one-element slice.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(RawValue::as_slice).unwrap_or(&[])
    }

    pub fn raw(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//! Header keyword exchange.
//!
//! Grids and pixelizations serialize to flat FITS-style keyword sets so
//! callers can round-trip them through whatever header representation
//! their I/O layer uses.

use std::collections::BTreeMap;

use crate::error::{WcsError, WcsResult};

/// A single keyword value.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    String(String),
    Float(f64),
    Int(i64),
}

/// Read access to a keyword set. Implemented by [`KeywordMap`] and by
/// adapters over external header types.
pub trait KeywordProvider {
    fn get(&self, key: &str) -> Option<&KeywordValue>;

    fn get_string(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(KeywordValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Floats also accept integer-typed values, which headers written
    /// by other tools frequently use for whole-number scales.
    fn get_float(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(KeywordValue::Float(v)) => Some(*v),
            Some(KeywordValue::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(KeywordValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    fn require_float(&self, key: &str) -> WcsResult<f64> {
        self.get_float(key)
            .ok_or_else(|| WcsError::missing_keyword(key))
    }

    fn require_int(&self, key: &str) -> WcsResult<i64> {
        self.get_int(key)
            .ok_or_else(|| WcsError::missing_keyword(key))
    }

    fn require_string(&self, key: &str) -> WcsResult<String> {
        self.get_string(key)
            .map(str::to_owned)
            .ok_or_else(|| WcsError::missing_keyword(key))
    }
}

/// In-memory keyword set with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMap {
    entries: BTreeMap<String, KeywordValue>,
}

impl KeywordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries
            .insert(key.into(), KeywordValue::String(value.into()));
        self
    }

    pub fn set_float(&mut self, key: impl Into<String>, value: f64) -> &mut Self {
        self.entries.insert(key.into(), KeywordValue::Float(value));
        self
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.entries.insert(key.into(), KeywordValue::Int(value));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeywordProvider for KeywordMap {
    fn get(&self, key: &str) -> Option<&KeywordValue> {
        self.entries.get(key)
    }
}

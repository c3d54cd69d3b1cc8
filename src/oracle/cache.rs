//! Request-scoped oracle memoization.
//!
//! Oracle answers are referentially transparent for the duration of one
//! solve, so a wrapper created per question may cache them freely. The
//! extractor in particular re-probes the same keys while trying n-gram
//! permutations; against a remote service that adds up fast.
//!
//! Create one wrapper per question and drop it with the blackboard. Nothing
//! is shared across questions.

use dashmap::DashMap;

use crate::error::OracleError;

use super::{Oracle, RelationKind};

/// Memoizing wrapper around another oracle.
pub struct CachedOracle<'a> {
    inner: &'a dyn Oracle,
    exists: DashMap<String, bool>,
    degree: DashMap<String, u64>,
    linkword: DashMap<String, bool>,
    connected: DashMap<(String, String, RelationKind), bool>,
    path: DashMap<(String, String), Option<u32>>,
    related: DashMap<(String, String), Vec<String>>,
    definitions: DashMap<String, Option<String>>,
}

impl<'a> CachedOracle<'a> {
    pub fn new(inner: &'a dyn Oracle) -> Self {
        Self {
            inner,
            exists: DashMap::new(),
            degree: DashMap::new(),
            linkword: DashMap::new(),
            connected: DashMap::new(),
            path: DashMap::new(),
            related: DashMap::new(),
            definitions: DashMap::new(),
        }
    }
}

impl Oracle for CachedOracle<'_> {
    fn exists(&self, key: &str) -> Result<bool, OracleError> {
        if let Some(hit) = self.exists.get(key) {
            return Ok(*hit);
        }
        let value = self.inner.exists(key)?;
        self.exists.insert(key.to_string(), value);
        Ok(value)
    }

    fn degree(&self, key: &str) -> Result<u64, OracleError> {
        if let Some(hit) = self.degree.get(key) {
            return Ok(*hit);
        }
        let value = self.inner.degree(key)?;
        self.degree.insert(key.to_string(), value);
        Ok(value)
    }

    fn is_linkword(&self, key: &str) -> Result<bool, OracleError> {
        if let Some(hit) = self.linkword.get(key) {
            return Ok(*hit);
        }
        let value = self.inner.is_linkword(key)?;
        self.linkword.insert(key.to_string(), value);
        Ok(value)
    }

    fn connected(&self, a: &str, b: &str, relation: RelationKind) -> Result<bool, OracleError> {
        let cache_key = (a.to_string(), b.to_string(), relation);
        if let Some(hit) = self.connected.get(&cache_key) {
            return Ok(*hit);
        }
        let value = self.inner.connected(a, b, relation)?;
        self.connected.insert(cache_key, value);
        Ok(value)
    }

    fn shortest_path_len(&self, a: &str, b: &str) -> Result<Option<u32>, OracleError> {
        let cache_key = (a.to_string(), b.to_string());
        if let Some(hit) = self.path.get(&cache_key) {
            return Ok(*hit);
        }
        let value = self.inner.shortest_path_len(a, b)?;
        self.path.insert(cache_key, value);
        Ok(value)
    }

    fn related_by_property(
        &self,
        key: &str,
        property: &str,
    ) -> Result<Vec<String>, OracleError> {
        let cache_key = (key.to_string(), property.to_string());
        if let Some(hit) = self.related.get(&cache_key) {
            return Ok(hit.clone());
        }
        let value = self.inner.related_by_property(key, property)?;
        self.related.insert(cache_key, value.clone());
        Ok(value)
    }

    fn definitions(&self, key: &str) -> Result<Option<String>, OracleError> {
        if let Some(hit) = self.definitions.get(key) {
            return Ok(hit.clone());
        }
        let value = self.inner.definitions(key)?;
        self.definitions.insert(key.to_string(), value.clone());
        Ok(value)
    }
}

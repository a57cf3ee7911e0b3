// SPDX-FileCopyrightText: © 2025 kmesh authors
// SPDX-License-Identifier: Apache-2.0
//
// Copyright 2025 kmesh authors
//
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


use compact_str::CompactString;
use serde::Serialize;

/// Value attached to observations when the underlying datum is not available.
pub const NONE_VALUE: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct KeyValue {
    key: &'static str,
    value: CompactString,
}

impl KeyValue {
    pub fn new(key: &'static str, value: impl Into<CompactString>) -> Self {
        Self { key, value: value.into() }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Ordered set of key values, unique by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyValues(Vec<KeyValue>);

impl KeyValues {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds `kv`, replacing in place any value already recorded under the same key.
    #[must_use]
    pub fn and(mut self, kv: KeyValue) -> Self {
        self.insert(kv);
        self
    }

    pub fn insert(&mut self, kv: KeyValue) {
        match self.0.iter_mut().find(|existing| existing.key == kv.key) {
            Some(existing) => existing.value = kv.value,
            None => self.0.push(kv),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|kv| kv.key == key).map(KeyValue::value)
    }

    pub fn retain_keys<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.0.retain(|kv| f(kv.key));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyValue> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(KeyValue::key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<KeyValue> for KeyValues {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        let mut kvs = KeyValues::new();
        for kv in iter {
            kvs.insert(kv);
        }
        kvs
    }
}

impl IntoIterator for KeyValues {
    type Item = KeyValue;
    type IntoIter = std::vec::IntoIter<KeyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a KeyValues {
    type Item = &'a KeyValue;
    type IntoIter = std::slice::Iter<'a, KeyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_replaces_value_in_place() {
        let kvs = KeyValues::new()
            .and(KeyValue::new("method", "GET"))
            .and(KeyValue::new("uri", "/users"))
            .and(KeyValue::new("method", "POST"));

        assert_eq!(kvs.len(), 2);
        assert_eq!(kvs.get("method"), Some("POST"));
        assert_eq!(kvs.keys().collect::<Vec<_>>(), vec!["method", "uri"]);
    }

    #[test]
    fn collect_dedups_keys() {
        let kvs: KeyValues =
            [KeyValue::new("status", "200"), KeyValue::new("status", "404")].into_iter().collect();
        assert_eq!(kvs.len(), 1);
        assert_eq!(kvs.get("status"), Some("404"));
    }

    #[test]
    fn retain_drops_keys() {
        let mut kvs = KeyValues::new().and(KeyValue::new("uri", "/")).and(KeyValue::new("exception", NONE_VALUE));
        kvs.retain_keys(|key| key != "exception");
        assert_eq!(kvs.get("exception"), None);
        assert_eq!(kvs.get("uri"), Some("/"));
    }

    #[test]
    fn missing_key() {
        let kvs = KeyValues::new();
        assert!(kvs.is_empty());
        assert_eq!(kvs.get("method"), None);
    }
}

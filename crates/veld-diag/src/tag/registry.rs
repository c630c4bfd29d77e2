// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Registry for per-tag routing configuration.

use std::collections::HashMap;
use std::sync::RwLock;
use veld_core::diag::{LogColor, SinkFlags, TagConfig};

/// Thread-safe mapping from tag name to routing configuration.
///
/// A single `RwLock` guards the whole registry: lookups on every log call
/// take a read lock, configuration changes take the write lock. A poisoned
/// lock degrades to "registry unavailable" rather than propagating the
/// panic into logging calls.
#[derive(Debug, Default)]
pub struct TagRegistry {
    storage: RwLock<HashMap<String, TagConfig>>,
}

impl TagRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or replaces the configuration for `tag`.
    ///
    /// An empty flag set removes the tag instead: a tag that reaches no
    /// sink is never retained. Takes effect for subsequent calls only.
    pub fn set(&self, tag: &str, flags: SinkFlags, color: LogColor) {
        if let Ok(mut storage) = self.storage.write() {
            if flags.is_empty() {
                storage.remove(tag);
            } else {
                storage.insert(tag.to_string(), TagConfig::new(flags, color));
            }
        }
    }

    /// Returns the configuration for `tag`, if registered.
    pub fn lookup(&self, tag: &str) -> Option<TagConfig> {
        self.storage.read().ok()?.get(tag).copied()
    }

    /// Returns `true` if `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        if let Ok(storage) = self.storage.read() {
            storage.contains_key(tag)
        } else {
            false
        }
    }

    /// Returns the number of registered tags.
    pub fn len(&self) -> usize {
        self.storage.read().map(|storage| storage.len()).unwrap_or(0)
    }

    /// Returns `true` if no tag is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

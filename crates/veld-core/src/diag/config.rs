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

//! Construction-time configuration for the logging facility.

use crate::diag::log::{LogColor, SinkFlags};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Routing configuration for a single tag, applied on top of the seeded
/// defaults at logger construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSetting {
    /// Tag name (case-sensitive).
    pub tag: String,
    /// Append messages with this tag to the log file.
    #[serde(default)]
    pub file: bool,
    /// Forward messages with this tag to the debugger channel.
    #[serde(default)]
    pub debugger: bool,
    /// Print messages with this tag to the console.
    #[serde(default)]
    pub console: bool,
    /// Console display color.
    #[serde(default)]
    pub color: LogColor,
}

impl TagSetting {
    /// Assembles the sink flag set described by the per-sink switches.
    ///
    /// All switches off yields an empty set, which removes the tag when
    /// applied to the registry.
    pub fn flags(&self) -> SinkFlags {
        let mut flags = SinkFlags::EMPTY;
        if self.file {
            flags |= SinkFlags::FILE;
        }
        if self.debugger {
            flags |= SinkFlags::DEBUGGER;
        }
        if self.console {
            flags |= SinkFlags::CONSOLE;
        }
        flags
    }
}

/// Complete facility configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagConfig {
    /// Directory under which the `Log/` output directory is created.
    pub base_path: PathBuf,
    /// Master switch. When `false` the facility holds no file and no
    /// registry state, and every call is a cheap no-op.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Extra tag routing applied after the seeded defaults.
    #[serde(default)]
    pub tags: Vec<TagSetting>,
}

fn default_enabled() -> bool {
    true
}

impl DiagConfig {
    /// Creates an enabled configuration with no extra tags.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            enabled: true,
            tags: Vec::new(),
        }
    }

    /// Deserializes a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

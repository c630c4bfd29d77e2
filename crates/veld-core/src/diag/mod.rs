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

//! Provides the foundational types and contracts for engine diagnostics.
//!
//! This module defines the "common language" for diagnostic logging within
//! Veld: sink routing flags, display colors, per-tag configuration, call-site
//! identity, and the blocking operator-decision protocol. It defines the
//! abstract "what" of diagnostics, while `veld-diag` provides the central
//! service that routes messages and owns the error-reporting state.

pub mod config;
pub mod decision;
pub mod log;

pub use self::config::{DiagConfig, TagSetting};
pub use self::decision::{Decision, DecisionProvider};
pub use self::log::{CallSite, DiagError, DiagResult, LogColor, SinkFlags, TagConfig};

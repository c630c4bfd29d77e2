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

//! # Veld Diag
//!
//! Diagnostics, logging, and error reporting for the engine.
//!
//! The [`Logger`] facade routes tagged messages to a per-run log file, the
//! debugger channel, and a colored console according to per-tag
//! configuration, and drives the blocking Abort/Retry/Ignore protocol for
//! error-class reports. Once the operator chooses Ignore for a report, that
//! specific call site is silenced for the rest of the process.
//!
//! Callers normally go through the macros ([`veld_log!`], [`veld_info!`],
//! [`veld_warn!`], [`veld_error!`], [`veld_fatal!`], [`veld_assert!`]),
//! passing the `Logger` context explicitly; there is no global instance.

#![warn(missing_docs)]

pub mod decision;
pub mod format;
pub mod manager;
pub mod messenger;
pub mod sink;
pub mod tag;

mod macros;

pub use manager::Logger;
pub use veld_core::diag::{
    CallSite, Decision, DecisionProvider, DiagConfig, DiagError, DiagResult, LogColor, SinkFlags,
    TagConfig, TagSetting,
};

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

//! The blocking operator-decision protocol for error reports.

use std::fmt::Debug;

/// Outcome of presenting an error report to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Terminate the process. Acted on inside the log manager; callers
    /// never observe this value.
    Abort,
    /// Return control to the caller; the call site keeps reporting.
    Retry,
    /// Return control to the caller and permanently silence the call site.
    Ignore,
}

/// The contract for presenting a blocking three-way decision.
///
/// A `DecisionProvider` is owned by the log manager and invoked once per
/// surfaced error report. The call blocks the reporting thread until the
/// operator answers; there is no cancellation or timeout. Keeping the
/// protocol behind this trait isolates the manager from any specific UI
/// mechanism and lets tests drive it with a scripted provider.
pub trait DecisionProvider: Send + Sync + Debug + 'static {
    /// Presents the rendered report and returns the operator's choice.
    fn present(&self, message: &str, is_fatal: bool) -> Decision;
}

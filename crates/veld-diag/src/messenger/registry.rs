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

//! Registry for per-call-site error messengers.

use std::collections::HashMap;
use std::sync::Mutex;
use veld_core::diag::CallSite;

/// Deduplication gate for one error-reporting call site.
///
/// Two states: enabled (initial) and disabled. Disabled is terminal for
/// the call site's process lifetime; only the registry teardown at
/// shutdown destroys the messenger.
#[derive(Debug)]
pub struct ErrorMessenger {
    enabled: bool,
}

impl ErrorMessenger {
    fn new() -> Self {
        Self { enabled: true }
    }

    /// Returns `true` while reports from this call site should be shown.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Permanently disables reports from this call site.
    pub fn disable(&mut self) {
        self.enabled = false;
    }
}

/// Registry owning every error messenger, keyed by call site.
///
/// Messengers are registered lazily the first time a call site reports.
/// A single `Mutex` guards the registry; the lock is released before the
/// caller blocks on the decision dialog.
#[derive(Debug, Default)]
pub struct MessengerRegistry {
    messengers: Mutex<HashMap<CallSite, ErrorMessenger>>,
}

impl MessengerRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            messengers: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `site` on first sight and reports whether its messenger
    /// is still enabled.
    pub fn begin_report(&self, site: CallSite) -> bool {
        if let Ok(mut messengers) = self.messengers.lock() {
            messengers
                .entry(site)
                .or_insert_with(|| {
                    log::trace!("registered error messenger for {site}");
                    ErrorMessenger::new()
                })
                .is_enabled()
        } else {
            false
        }
    }

    /// Permanently disables the messenger for `site`.
    pub fn disable(&self, site: CallSite) {
        if let Ok(mut messengers) = self.messengers.lock() {
            if let Some(messenger) = messengers.get_mut(&site) {
                messenger.disable();
            }
        }
    }

    /// Returns the number of registered messengers.
    pub fn len(&self) -> usize {
        self.messengers
            .lock()
            .map(|messengers| messengers.len())
            .unwrap_or(0)
    }

    /// Returns `true` if no messenger is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destroys every registered messenger. Shutdown path only.
    pub fn clear(&self) {
        if let Ok(mut messengers) = self.messengers.lock() {
            messengers.clear();
        }
    }
}

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

//! The log manager: the facade coordinating tag routing, sink output,
//! and the error-reporting decision protocol.

use crate::decision::ConsoleDecisionProvider;
use crate::format;
use crate::messenger::MessengerRegistry;
use crate::sink::SinkWriter;
use crate::tag::TagRegistry;
use chrono::Local;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use veld_core::diag::{
    CallSite, Decision, DecisionProvider, DiagConfig, DiagError, DiagResult, LogColor, SinkFlags,
};

/// Default flags for the seeded tags: every sink in debug builds, none in
/// release builds.
const SEEDED_FLAGS: SinkFlags = if cfg!(debug_assertions) {
    SinkFlags::ALL
} else {
    SinkFlags::EMPTY
};

/// Tags seeded at construction, with their display colors.
const SEEDED_TAGS: [(&str, LogColor); 4] = [
    ("ERROR", LogColor::Red),
    ("WARNING", LogColor::Yellow),
    ("INFO", LogColor::LightGray),
    ("EXTERN", LogColor::Green),
];

// Guard enforcing the documented single-instance lifetime.
static LOGGER_ALIVE: AtomicBool = AtomicBool::new(false);

/// The diagnostic logging facade.
///
/// Owns the tag registry, the error messenger registry, the sink writer,
/// and the decision provider. Exactly one instance may be alive per
/// process; construction fails with [`DiagError::AlreadyCreated`] while
/// another exists, without disturbing it. Dropping the logger destroys
/// every registered messenger and closes the log file.
#[derive(Debug)]
pub struct Logger {
    tags: TagRegistry,
    messengers: MessengerRegistry,
    sinks: SinkWriter,
    decisions: Box<dyn DecisionProvider>,
    enabled: bool,
}

impl Logger {
    /// Creates the facility with the default console decision provider.
    ///
    /// The per-run log file is opened under `<base_path>/Log/`.
    pub fn create(base_path: impl Into<PathBuf>) -> DiagResult<Self> {
        Self::with_config(
            DiagConfig::new(base_path),
            Box::new(ConsoleDecisionProvider::new()),
        )
    }

    /// Creates the facility from an explicit configuration and decision
    /// provider.
    ///
    /// Seeds the `ERROR`, `WARNING`, `INFO`, and `EXTERN` tags (every sink
    /// in debug builds, none in release builds), then applies
    /// `config.tags` on top. With `config.enabled == false` no file is
    /// opened, no tag is seeded, and every subsequent call is a no-op.
    pub fn with_config(
        config: DiagConfig,
        decisions: Box<dyn DecisionProvider>,
    ) -> DiagResult<Self> {
        if LOGGER_ALIVE.swap(true, Ordering::SeqCst) {
            return Err(DiagError::AlreadyCreated);
        }

        if !config.enabled {
            return Ok(Self {
                tags: TagRegistry::new(),
                messengers: MessengerRegistry::new(),
                sinks: SinkWriter::detached(),
                decisions,
                enabled: false,
            });
        }

        let sinks = match SinkWriter::create(&config.base_path) {
            Ok(sinks) => sinks,
            Err(err) => {
                LOGGER_ALIVE.store(false, Ordering::SeqCst);
                return Err(err);
            }
        };

        let logger = Self {
            tags: TagRegistry::new(),
            messengers: MessengerRegistry::new(),
            sinks,
            decisions,
            enabled: true,
        };

        for (tag, color) in SEEDED_TAGS {
            logger.tags.set(tag, SEEDED_FLAGS, color);
        }
        for setting in &config.tags {
            logger.tags.set(&setting.tag, setting.flags(), setting.color);
        }

        Ok(logger)
    }

    /// Routes `message` under `tag`.
    ///
    /// An unregistered tag is a silent no-op: a deliberate routing miss,
    /// not an error. This call never fails for the caller; sink failures
    /// are swallowed by the writer.
    pub fn log(
        &self,
        tag: &str,
        message: &str,
        args: &[&dyn Display],
        call_site: Option<CallSite>,
    ) {
        if !self.enabled {
            return;
        }
        if let Some(config) = self.tags.lookup(tag) {
            let buffer = output_buffer(tag, message, args, call_site);
            self.sinks.dispatch(&buffer, config.flags, config.color);
        }
    }

    /// Reports an error and blocks on the operator's decision.
    ///
    /// The tag is `FATAL` if `is_fatal`, else `ERROR`. The buffer is
    /// rendered regardless of tag registration; routing to sinks happens
    /// only for a registered tag, but the decision dialog always occurs.
    /// Log output and the decision protocol are independent.
    ///
    /// `Abort` terminates the process and never returns; `Retry` and
    /// `Ignore` are returned to the caller.
    pub fn error(
        &self,
        message: &str,
        args: &[&dyn Display],
        is_fatal: bool,
        call_site: Option<CallSite>,
    ) -> Decision {
        if !self.enabled {
            return Decision::Retry;
        }

        let tag = if is_fatal { "FATAL" } else { "ERROR" };
        let buffer = output_buffer(tag, message, args, call_site);
        if let Some(config) = self.tags.lookup(tag) {
            self.sinks.dispatch(&buffer, config.flags, config.color);
        }

        match self.decisions.present(&buffer, is_fatal) {
            Decision::Abort => std::process::abort(),
            decision => decision,
        }
    }

    /// Messenger-gated error report for one call site.
    ///
    /// The first report from `site` registers its messenger; a site whose
    /// messenger was disabled by an earlier `Ignore` is a complete no-op.
    /// `Abort` and `Retry` leave the messenger enabled, so subsequent
    /// occurrences at the same site still report.
    pub fn show_error(
        &self,
        message: &str,
        args: &[&dyn Display],
        is_fatal: bool,
        site: CallSite,
    ) {
        if !self.enabled {
            return;
        }
        if !self.messengers.begin_report(site) {
            return;
        }
        if self.error(message, args, is_fatal, Some(site)) == Decision::Ignore {
            self.messengers.disable(site);
        }
    }

    /// Inserts, replaces, or (with empty flags) removes a tag.
    ///
    /// Takes effect for subsequent calls; already-dispatched output is
    /// unaffected.
    pub fn set_tag_config(&self, tag: &str, flags: SinkFlags, color: LogColor) {
        if !self.enabled {
            return;
        }
        self.tags.set(tag, flags, color);
    }

    /// Returns a reference to the tag registry.
    pub fn tag_registry(&self) -> &TagRegistry {
        &self.tags
    }

    /// Returns the number of error messengers registered so far.
    pub fn messenger_count(&self) -> usize {
        self.messengers.len()
    }

    /// Path of the per-run log file, when the file sink is open.
    pub fn log_file_path(&self) -> Option<&Path> {
        self.sinks.path()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.messengers.clear();
        // The file handle closes when the writer drops; appends are
        // unbuffered and already durable at this point.
        LOGGER_ALIVE.store(false, Ordering::SeqCst);
    }
}

/// Builds the rendered buffer for one event: `[TAG][timestamp] message`,
/// the optional call-site lines, and a trailing newline.
fn output_buffer(
    tag: &str,
    message: &str,
    args: &[&dyn Display],
    call_site: Option<CallSite>,
) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let rendered = format::render(message, args);
    let mut buffer = if tag.is_empty() {
        rendered
    } else {
        format!("[{tag}][{timestamp}] {rendered}")
    };

    if let Some(site) = call_site {
        buffer.push_str("\nFunction: ");
        buffer.push_str(site.function);
        buffer.push('\n');
        buffer.push_str(site.file);
        buffer.push_str("\nLine: ");
        buffer.push_str(&site.line.to_string());
    }

    buffer.push('\n');
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    // The single-instance guard is process-wide, so every test that
    // constructs a Logger serializes on this lock.
    static CREATE_LOCK: Mutex<()> = Mutex::new(());

    fn serialize() -> MutexGuard<'static, ()> {
        CREATE_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Scripted provider in place of the interactive console dialog.
    #[derive(Debug, Clone, Default)]
    struct ScriptedDecisions {
        inner: Arc<ScriptState>,
    }

    #[derive(Debug, Default)]
    struct ScriptState {
        responses: Mutex<VecDeque<Decision>>,
        presented: AtomicUsize,
    }

    impl ScriptedDecisions {
        fn with_responses(responses: &[Decision]) -> Self {
            let script = Self::default();
            script
                .inner
                .responses
                .lock()
                .unwrap()
                .extend(responses.iter().copied());
            script
        }

        fn presented(&self) -> usize {
            self.inner.presented.load(Ordering::SeqCst)
        }
    }

    impl DecisionProvider for ScriptedDecisions {
        fn present(&self, _message: &str, _is_fatal: bool) -> Decision {
            self.inner.presented.fetch_add(1, Ordering::SeqCst);
            self.inner
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Decision::Retry)
        }
    }

    fn scripted_logger(
        base: &Path,
        responses: &[Decision],
    ) -> (Logger, ScriptedDecisions) {
        let script = ScriptedDecisions::with_responses(responses);
        let logger =
            Logger::with_config(DiagConfig::new(base), Box::new(script.clone())).unwrap();
        (logger, script)
    }

    fn read_log(logger: &Logger) -> String {
        fs::read_to_string(logger.log_file_path().unwrap()).unwrap()
    }

    fn site(line: u32) -> CallSite {
        CallSite::new("veld_diag::manager::tests", "src/manager.rs", line)
    }

    #[test]
    fn test_create_opens_timestamped_log_file() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::create(dir.path()).unwrap();

        let path = logger.log_file_path().unwrap();
        assert!(path.exists());
        assert_eq!(path.parent().unwrap(), dir.path().join("Log"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("stdout_") && name.ends_with(".log"));
    }

    #[test]
    fn test_second_create_fails_without_disturbing_first() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::create(dir.path()).unwrap();

        let second = Logger::create(dir.path());
        assert!(matches!(second, Err(DiagError::AlreadyCreated)));

        // The first instance keeps working.
        logger.set_tag_config("DEBUGTAG", SinkFlags::FILE, LogColor::default());
        logger.log("DEBUGTAG", "still alive", &[], None);
        assert!(read_log(&logger).contains("] still alive\n"));

        drop(logger);
        // And the guard is released on drop.
        let third = Logger::create(dir.path()).unwrap();
        assert!(third.log_file_path().is_some());
    }

    #[test]
    fn test_log_appends_formatted_line_for_registered_tag() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, _script) = scripted_logger(dir.path(), &[]);

        logger.set_tag_config("DEBUGTAG", SinkFlags::FILE, LogColor::default());
        logger.log("DEBUGTAG", "value={}", &[&42], None);

        let contents = read_log(&logger);
        assert!(contents.starts_with("[DEBUGTAG]["));
        assert!(contents.ends_with("] value=42\n"));
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_unregistered_tag_is_silent_noop() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, _script) = scripted_logger(dir.path(), &[]);

        logger.log("NOSUCHTAG", "never seen", &[], None);
        assert!(read_log(&logger).is_empty());
    }

    #[test]
    fn test_zero_flags_removes_tag_and_silences_it() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, _script) = scripted_logger(dir.path(), &[]);

        logger.set_tag_config("DEBUGTAG", SinkFlags::FILE, LogColor::default());
        logger.set_tag_config("DEBUGTAG", SinkFlags::EMPTY, LogColor::default());

        assert!(!logger.tag_registry().contains("DEBUGTAG"));
        logger.log("DEBUGTAG", "dropped", &[], None);
        assert!(read_log(&logger).is_empty());
    }

    #[test]
    fn test_seeded_tags_follow_build_mode() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, _script) = scripted_logger(dir.path(), &[]);

        if cfg!(debug_assertions) {
            assert_eq!(logger.tag_registry().len(), 4);
            for (tag, _) in SEEDED_TAGS {
                let config = logger.tag_registry().lookup(tag).unwrap();
                assert_eq!(config.flags, SinkFlags::ALL);
            }
        } else {
            // Release defaults are all-zero, so the seeded tags are never
            // retained and seeded-tag logs produce no output anywhere.
            assert!(logger.tag_registry().is_empty());
        }
    }

    #[test]
    fn test_config_tags_are_applied_over_seeds() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let mut config = DiagConfig::new(dir.path());
        config.tags.push(veld_core::diag::TagSetting {
            tag: "NET".to_string(),
            file: true,
            debugger: false,
            console: false,
            color: LogColor::Cyan,
        });

        let logger = Logger::with_config(
            config,
            Box::new(ScriptedDecisions::default()),
        )
        .unwrap();

        let net = logger.tag_registry().lookup("NET").unwrap();
        assert_eq!(net.flags, SinkFlags::FILE);
        assert_eq!(net.color, LogColor::Cyan);
    }

    #[test]
    fn test_error_presents_dialog_and_returns_decision() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, script) = scripted_logger(dir.path(), &[Decision::Retry]);

        let decision = logger.error("subsystem failed", &[], false, None);
        assert_eq!(decision, Decision::Retry);
        assert_eq!(script.presented(), 1);

        if cfg!(debug_assertions) {
            // ERROR is seeded with the file sink enabled in debug builds.
            assert!(read_log(&logger).contains("[ERROR]["));
        } else {
            assert!(read_log(&logger).is_empty());
        }
    }

    #[test]
    fn test_fatal_dialog_occurs_even_without_registered_tag() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, script) = scripted_logger(dir.path(), &[Decision::Retry]);

        // FATAL is never seeded; routing is skipped but the decision
        // protocol still runs.
        let decision = logger.error("fatal failure", &[], true, None);
        assert_eq!(decision, Decision::Retry);
        assert_eq!(script.presented(), 1);
        assert!(!read_log(&logger).contains("[FATAL]["));
    }

    #[test]
    fn test_show_error_ignore_silences_call_site() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, script) = scripted_logger(dir.path(), &[Decision::Ignore]);

        logger.show_error("bad state", &[], false, site(100));
        logger.show_error("bad state", &[], false, site(100));

        // Exactly one dialog; the second show is a complete no-op.
        assert_eq!(script.presented(), 1);
        assert_eq!(logger.messenger_count(), 1);
        if cfg!(debug_assertions) {
            let contents = read_log(&logger);
            assert_eq!(contents.matches("bad state").count(), 1);
        }
    }

    #[test]
    fn test_show_error_retry_keeps_reporting() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, script) =
            scripted_logger(dir.path(), &[Decision::Retry, Decision::Retry]);

        logger.show_error("flaky state", &[], false, site(200));
        logger.show_error("flaky state", &[], false, site(200));

        assert_eq!(script.presented(), 2);
        assert_eq!(logger.messenger_count(), 1);
        if cfg!(debug_assertions) {
            let contents = read_log(&logger);
            assert_eq!(contents.matches("flaky state").count(), 2);
        }
    }

    #[test]
    fn test_call_sites_are_silenced_independently() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let (logger, script) = scripted_logger(
            dir.path(),
            &[Decision::Ignore, Decision::Retry, Decision::Retry],
        );

        logger.show_error("first", &[], false, site(300));
        logger.show_error("second", &[], false, site(301));
        logger.show_error("first again", &[], false, site(300));
        logger.show_error("second again", &[], false, site(301));

        // Site 300 was ignored after its first dialog; site 301 keeps
        // reporting.
        assert_eq!(script.presented(), 3);
        assert_eq!(logger.messenger_count(), 2);
    }

    #[test]
    fn test_disabled_facility_is_inert() {
        let _guard = serialize();
        let dir = tempfile::tempdir().unwrap();
        let mut config = DiagConfig::new(dir.path());
        config.enabled = false;

        let script = ScriptedDecisions::default();
        let logger = Logger::with_config(config, Box::new(script.clone())).unwrap();

        assert!(logger.log_file_path().is_none());
        assert!(!dir.path().join("Log").exists());
        assert!(logger.tag_registry().is_empty());

        logger.set_tag_config("DEBUGTAG", SinkFlags::FILE, LogColor::default());
        assert!(logger.tag_registry().is_empty());

        logger.log("INFO", "dropped", &[], None);
        assert_eq!(logger.error("dropped", &[], false, None), Decision::Retry);
        logger.show_error("dropped", &[], false, site(400));

        assert_eq!(script.presented(), 0);
        assert_eq!(logger.messenger_count(), 0);
    }

    #[test]
    fn test_output_buffer_without_call_site() {
        let buffer = output_buffer("INFO", "hello", &[], None);
        assert!(buffer.starts_with("[INFO]["));
        assert!(buffer.ends_with("] hello\n"));
        // Exactly one line; no call-site suffix.
        assert_eq!(buffer.lines().count(), 1);

        // Timestamp is the fixed-width `YYYY-MM-DD HH:MM:SS.mmm`.
        let start = buffer.find("][").unwrap() + 2;
        let end = buffer.find("] ").unwrap();
        let timestamp = &buffer[start..end];
        assert_eq!(timestamp.len(), 23);
        assert_eq!(&timestamp[4..5], "-");
        assert_eq!(&timestamp[10..11], " ");
        assert_eq!(&timestamp[19..20], ".");
    }

    #[test]
    fn test_output_buffer_with_call_site() {
        let buffer = output_buffer(
            "WARNING",
            "low memory: {} MB",
            &[&64],
            Some(CallSite::new("game::world", "src/world.rs", 77)),
        );

        let lines: Vec<&str> = buffer.split('\n').collect();
        assert_eq!(lines.len(), 5, "four content lines plus trailing newline");
        assert!(lines[0].starts_with("[WARNING]["));
        assert!(lines[0].ends_with("] low memory: 64 MB"));
        assert_eq!(lines[1], "Function: game::world");
        assert_eq!(lines[2], "src/world.rs");
        assert_eq!(lines[3], "Line: 77");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_output_buffer_without_tag_has_no_prefix() {
        let buffer = output_buffer("", "raw text", &[], None);
        assert_eq!(buffer, "raw text\n");
    }
}

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

//! Writes rendered buffers to the enabled sink destinations.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use veld_core::diag::{DiagError, DiagResult, LogColor, SinkFlags};

/// `log` facade target used by the debugger sink.
const DEBUGGER_TARGET: &str = "veld::diag";

/// Base name of the per-run log file.
const LOG_FILE_STEM: &str = "stdout";

/// Owns the per-run log file and fans rendered buffers out to sinks.
///
/// Sink failures never surface to callers: an unavailable file sink is
/// skipped, the debugger sink is inherently a no-op when no `log` frontend
/// is installed, and console write errors are swallowed.
#[derive(Debug)]
pub struct SinkWriter {
    file: Option<File>,
    path: Option<PathBuf>,
}

impl SinkWriter {
    /// Opens `<base_path>/Log/stdout_<YYYYMMDD-HHMMSS>.log` for append,
    /// creating missing parent directories.
    pub fn create(base_path: &Path) -> DiagResult<Self> {
        let dir = base_path.join("Log");
        fs::create_dir_all(&dir).map_err(|source| DiagError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;

        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let path = dir.join(format!("{LOG_FILE_STEM}_{stamp}.log"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| DiagError::OpenLogFile {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            file: Some(file),
            path: Some(path),
        })
    }

    /// Creates a writer with no backing file; file-flag dispatches are
    /// silently dropped.
    pub fn detached() -> Self {
        Self {
            file: None,
            path: None,
        }
    }

    /// Path of the log file this writer appends to, when one is open.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes `buffer` verbatim to every destination in `flags`.
    pub fn dispatch(&self, buffer: &str, flags: SinkFlags, color: LogColor) {
        if flags.contains(SinkFlags::FILE) {
            self.write_to_log_file(buffer);
        }
        if flags.contains(SinkFlags::DEBUGGER) {
            // No-op unless the host has installed a `log` frontend.
            log::debug!(target: DEBUGGER_TARGET, "{}", buffer.trim_end_matches('\n'));
        }
        if flags.contains(SinkFlags::CONSOLE) {
            self.write_to_console(buffer, color);
        }
    }

    fn write_to_log_file(&self, buffer: &str) {
        if let Some(mut file) = self.file.as_ref() {
            // Unbuffered append; content is durable once written.
            let _ = file.write_all(buffer.as_bytes());
        }
    }

    fn write_to_console(&self, buffer: &str, color: LogColor) {
        let mut stdout = io::stdout().lock();
        let result = if stdout.is_terminal() {
            let style = console_style(color);
            write!(stdout, "{}{buffer}{}", style.render(), style.render_reset())
        } else {
            stdout.write_all(buffer.as_bytes())
        };
        let _ = result.and_then(|()| stdout.flush());
    }
}

/// Maps a display color onto its ANSI console style.
fn console_style(color: LogColor) -> anstyle::Style {
    use anstyle::{AnsiColor, Color, Style};

    let ansi = match color {
        LogColor::Red => AnsiColor::Red,
        LogColor::Yellow => AnsiColor::Yellow,
        LogColor::Green => AnsiColor::Green,
        LogColor::Cyan => AnsiColor::Cyan,
        LogColor::Blue => AnsiColor::Blue,
        LogColor::Magenta => AnsiColor::Magenta,
        LogColor::LightGray => AnsiColor::White,
        LogColor::White => AnsiColor::BrightWhite,
    };
    Style::new().fg_color(Some(Color::Ansi(ansi)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_builds_timestamped_path() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SinkWriter::create(dir.path()).unwrap();

        let path = writer.path().unwrap();
        assert!(path.exists());
        assert_eq!(path.parent().unwrap(), dir.path().join("Log"));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("stdout_"));
        assert!(name.ends_with(".log"));
        // stdout_YYYYMMDD-HHMMSS.log
        assert_eq!(name.len(), "stdout_".len() + 15 + ".log".len());
    }

    #[test]
    fn test_file_dispatch_appends_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SinkWriter::create(dir.path()).unwrap();

        writer.dispatch("[INFO][ts] one\n", SinkFlags::FILE, LogColor::default());
        writer.dispatch("[INFO][ts] two\n", SinkFlags::FILE, LogColor::default());

        let contents = fs::read_to_string(writer.path().unwrap()).unwrap();
        assert_eq!(contents, "[INFO][ts] one\n[INFO][ts] two\n");
    }

    #[test]
    fn test_empty_flags_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SinkWriter::create(dir.path()).unwrap();

        writer.dispatch("dropped\n", SinkFlags::EMPTY, LogColor::default());

        let contents = fs::read_to_string(writer.path().unwrap()).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn test_non_file_flags_leave_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SinkWriter::create(dir.path()).unwrap();

        writer.dispatch(
            "debugger only\n",
            SinkFlags::DEBUGGER,
            LogColor::default(),
        );

        let contents = fs::read_to_string(writer.path().unwrap()).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn test_detached_writer_degrades_silently() {
        let writer = SinkWriter::detached();
        assert!(writer.path().is_none());
        // Must not panic even though there is no file to append to.
        writer.dispatch("lost\n", SinkFlags::FILE, LogColor::default());
    }
}

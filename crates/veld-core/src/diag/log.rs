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

//! Core types for diagnostic log routing.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Routing flags selecting which sinks a rendered log buffer reaches.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SinkFlags {
    bits: u8,
}

impl SinkFlags {
    /// An empty set of flags.
    pub const EMPTY: Self = Self { bits: 0 };

    /// Append to the persistent per-run log file.
    pub const FILE: Self = Self { bits: 1 << 0 };

    /// Forward to the debugger channel (the `log` facade).
    pub const DEBUGGER: Self = Self { bits: 1 << 1 };

    /// Print to the console using the tag's display color.
    pub const CONSOLE: Self = Self { bits: 1 << 2 };

    /// Every sink enabled.
    pub const ALL: Self = Self {
        bits: (1 << 0) | (1 << 1) | (1 << 2),
    };

    /// Creates a flag set from the given raw bits.
    /// Bits not corresponding to any defined flag are kept.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self { bits }
    }

    /// Returns the raw value of the flag set.
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns `true` if no flag is set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if all flags in `other` are contained within `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Returns `true` if any flag in `other` is contained within `self`.
    pub const fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    /// Returns a new `Self` with `other` flags inserted.
    #[must_use]
    pub const fn with(mut self, other: Self) -> Self {
        self.bits |= other.bits;
        self
    }
}

impl core::ops::BitOr for SinkFlags {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }
}

impl core::ops::BitOrAssign for SinkFlags {
    fn bitor_assign(&mut self, other: Self) {
        self.bits |= other.bits;
    }
}

impl core::ops::BitAnd for SinkFlags {
    type Output = Self;
    fn bitand(self, other: Self) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }
}

impl fmt::Debug for SinkFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMED: [(&str, u8); 3] = [
            ("FILE", 1 << 0),
            ("DEBUGGER", 1 << 1),
            ("CONSOLE", 1 << 2),
        ];

        let mut bits = self.bits;
        let mut first_flag = true;

        write!(f, "SinkFlags {{ ")?;
        for (name, value) in NAMED {
            if (bits & value) == value {
                if !first_flag {
                    write!(f, " | ")?;
                }
                write!(f, "{name}")?;
                bits &= !value;
                first_flag = false;
            }
        }
        if bits != 0 {
            if !first_flag {
                write!(f, " | ")?;
            }
            write!(f, "UNKNOWN({bits:#x})")?;
            first_flag = false;
        }
        if first_flag {
            write!(f, "EMPTY")?;
        }
        write!(f, " }}")
    }
}

/// Display color used by the console sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogColor {
    /// Errors.
    Red,
    /// Warnings.
    Yellow,
    /// Messages relayed from external libraries.
    Green,
    /// Cyan accent for user tags.
    Cyan,
    /// Blue accent for user tags.
    Blue,
    /// Magenta accent for user tags.
    Magenta,
    /// The neutral default.
    #[default]
    LightGray,
    /// Bright white accent for user tags.
    White,
}

/// Per-tag routing configuration held by the tag registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagConfig {
    /// Sinks a message with this tag is dispatched to.
    pub flags: SinkFlags,
    /// Console display color.
    pub color: LogColor,
}

impl TagConfig {
    /// Creates a new tag configuration.
    pub const fn new(flags: SinkFlags, color: LogColor) -> Self {
        Self { flags, color }
    }
}

/// Identity of the code location that produced a report.
///
/// Doubles as the deduplication key for error messengers: one messenger
/// exists per distinct call site for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Module path of the calling code (`module_path!`).
    pub function: &'static str,
    /// Source file of the call (`file!`).
    pub file: &'static str,
    /// 1-based source line of the call (`line!`).
    pub line: u32,
}

impl CallSite {
    /// Creates a new call-site identity.
    pub const fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function,
            file,
            line,
        }
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A specialized `Result` type for diagnostics operations.
pub type DiagResult<T> = Result<T, DiagError>;

/// An error that can occur while constructing the logging facility.
#[derive(Debug)]
pub enum DiagError {
    /// A logger instance is already alive in this process.
    AlreadyCreated,
    /// The log output directory could not be created.
    CreateDirectory {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The log file could not be opened for append.
    OpenLogFile {
        /// The file that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

impl Display for DiagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagError::AlreadyCreated => {
                write!(f, "a logger instance is already alive in this process")
            }
            DiagError::CreateDirectory { path, source } => {
                write!(
                    f,
                    "failed to create log directory {}: {source}",
                    path.display()
                )
            }
            DiagError::OpenLogFile { path, source } => {
                write!(f, "failed to open log file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiagError::AlreadyCreated => None,
            DiagError::CreateDirectory { source, .. } | DiagError::OpenLogFile { source, .. } => {
                Some(source)
            }
        }
    }
}

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

//! Interactive console decision provider.

use std::io::{self, BufRead, Write};
use veld_core::diag::{Decision, DecisionProvider};

/// Presents error reports on stderr and reads the decision from stdin.
///
/// This is the portable default provider. It blocks the reporting thread
/// until a full line is read, re-prompting on unrecognized input; there is
/// no timeout. EOF or a read failure yields [`Decision::Retry`] so a host
/// without an operator channel keeps running.
#[derive(Debug, Default)]
pub struct ConsoleDecisionProvider;

impl ConsoleDecisionProvider {
    /// Creates the provider.
    pub fn new() -> Self {
        Self
    }
}

impl DecisionProvider for ConsoleDecisionProvider {
    fn present(&self, message: &str, is_fatal: bool) -> Decision {
        let title = if is_fatal { "FATAL" } else { "ERROR" };
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{title}: {message}[a]bort / [r]etry / [i]gnore? ");
        let _ = stderr.flush();

        let mut line = String::new();
        loop {
            line.clear();
            match io::stdin().lock().read_line(&mut line) {
                Ok(0) | Err(_) => return Decision::Retry,
                Ok(_) => match parse_choice(&line) {
                    Some(decision) => return decision,
                    None => {
                        let _ = write!(stderr, "[a]bort / [r]etry / [i]gnore? ");
                        let _ = stderr.flush();
                    }
                },
            }
        }
    }
}

/// Maps an operator's input line onto a decision.
fn parse_choice(line: &str) -> Option<Decision> {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "abort" => Some(Decision::Abort),
        "r" | "retry" => Some(Decision::Retry),
        "i" | "ignore" => Some(Decision::Ignore),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_short_and_long_forms() {
        assert_eq!(parse_choice("a\n"), Some(Decision::Abort));
        assert_eq!(parse_choice("abort\n"), Some(Decision::Abort));
        assert_eq!(parse_choice("r\n"), Some(Decision::Retry));
        assert_eq!(parse_choice("retry\n"), Some(Decision::Retry));
        assert_eq!(parse_choice("i\n"), Some(Decision::Ignore));
        assert_eq!(parse_choice("ignore\n"), Some(Decision::Ignore));
    }

    #[test]
    fn test_parse_is_case_and_whitespace_insensitive() {
        assert_eq!(parse_choice("  IGNORE  \n"), Some(Decision::Ignore));
        assert_eq!(parse_choice("R"), Some(Decision::Retry));
    }

    #[test]
    fn test_parse_rejects_unknown_input() {
        assert_eq!(parse_choice("\n"), None);
        assert_eq!(parse_choice("quit\n"), None);
        assert_eq!(parse_choice("ab\n"), None);
    }
}

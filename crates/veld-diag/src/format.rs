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

//! Rendering of message templates with positional arguments.

use std::fmt::{Display, Write};

/// Renders `template` by substituting `args` into its placeholders.
///
/// Pure: no I/O, no shared state. Supported placeholders are `{}` (next
/// argument in order) and `{N}` (argument by index); `{{` and `}}` escape
/// literal braces. With no `args` the template is passed through unmodified.
///
/// A placeholder with no matching argument is a caller contract violation:
/// debug builds assert, release builds emit the placeholder verbatim.
pub fn render(template: &str, args: &[&dyn Display]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len() + 16 * args.len());
    let mut next_index = 0usize;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut spec = String::new();
                let mut closed = false;
                for d in chars.by_ref() {
                    if d == '}' {
                        closed = true;
                        break;
                    }
                    spec.push(d);
                }
                if !closed {
                    debug_assert!(false, "unterminated placeholder in log template");
                    out.push('{');
                    out.push_str(&spec);
                    break;
                }

                let index = if spec.is_empty() {
                    let index = next_index;
                    next_index += 1;
                    Some(index)
                } else {
                    spec.parse::<usize>().ok()
                };

                match index {
                    Some(i) if i < args.len() => {
                        let _ = write!(out, "{}", args[i]);
                    }
                    _ => {
                        debug_assert!(
                            false,
                            "unmatched placeholder `{{{spec}}}` with {} argument(s)",
                            args.len()
                        );
                        out.push('{');
                        out.push_str(&spec);
                        out.push('}');
                    }
                }
            }
            c => out.push(c),
        }
    }

    out
}

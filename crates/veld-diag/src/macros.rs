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

//! Caller-facing logging macros.
//!
//! Every macro takes the [`Logger`](crate::Logger) context as its first
//! argument; there is no implicit global instance. Arguments are captured
//! as `&dyn Display` and substituted into the template's `{}` / `{N}`
//! placeholders.

/// Logs `fmt` under an arbitrary tag.
///
/// The preferred method of "printf debugging": use any tag string and
/// enable it via `set_tag_config` somewhere in initialization. No
/// call-site information is attached.
#[macro_export]
macro_rules! veld_log {
    ($logger:expr, $tag:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.log(
            $tag,
            $fmt,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
            ::core::option::Option::None,
        )
    };
}

/// Logs `fmt` under the `INFO` tag.
#[macro_export]
macro_rules! veld_info {
    ($logger:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.log(
            "INFO",
            $fmt,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
            ::core::option::Option::None,
        )
    };
}

/// Logs `fmt` under the `WARNING` tag, with call-site information.
///
/// Warnings are recoverable; they are plain logs that display calling
/// information.
#[macro_export]
macro_rules! veld_warn {
    ($logger:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.log(
            "WARNING",
            $fmt,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
            ::core::option::Option::Some($crate::CallSite::new(
                module_path!(),
                file!(),
                line!(),
            )),
        )
    };
}

/// Reports a potentially fatal error with the Abort/Retry/Ignore dialog.
///
/// Abort breaks out of the process, Retry continues, and Ignore continues
/// while suppressing every subsequent report from this specific call site.
#[macro_export]
macro_rules! veld_error {
    ($logger:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.show_error(
            $fmt,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
            false,
            $crate::CallSite::new(module_path!(), file!(), line!()),
        )
    };
}

/// Reports a fatal error with the Abort/Retry/Ignore dialog.
#[macro_export]
macro_rules! veld_fatal {
    ($logger:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.show_error(
            $fmt,
            &[$(&$arg as &dyn ::std::fmt::Display),*],
            true,
            $crate::CallSite::new(module_path!(), file!(), line!()),
        )
    };
}

/// Reports the stringified condition through the error dialog when it is
/// false.
#[macro_export]
macro_rules! veld_assert {
    ($logger:expr, $cond:expr $(,)?) => {
        if !$cond {
            $logger.show_error(
                stringify!($cond),
                &[],
                false,
                $crate::CallSite::new(module_path!(), file!(), line!()),
            );
        }
    };
}

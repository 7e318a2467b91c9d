// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Command flag parsing.
//!
//! Commands take flags of the form `--key=value` or bare `--key`. Flags are
//! collected into a [`Flags`] mapping keyed by the full flag name, marker
//! included. Anything that is not a flag is dropped, so callers must pull out
//! positional arguments first. Which flags mean something is up to each
//! command.

use std::collections::HashMap;

/// Flag marker.
pub const FLAG_MARKER: &str = "--";

/// Parsed command flags.
///
/// # Invariant
///
/// - Later occurrences of a flag overwrite earlier ones.
/// - A flag without `=` maps to the empty string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Flags {
    values: HashMap<String, String>,
}

impl Flags {
    /// Parse flags out of a list of arguments.
    pub fn parse(args: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let mut values = HashMap::new();
        for arg in args {
            let arg = arg.as_ref();
            if !arg.starts_with(FLAG_MARKER) {
                continue;
            }

            let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
            values.insert(key.to_string(), value.to_string());
        }

        Self { values }
    }

    /// Raw value of flag, empty string included.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.values.get(key.as_ref()).map(String::as_str)
    }

    /// Value of flag if it was given a non-empty value.
    pub fn value(&self, key: impl AsRef<str>) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }
}

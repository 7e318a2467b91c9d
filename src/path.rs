// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine where the files boil reads and writes live: the user settings
//! file in the home directory, and the declarations file at the top-level of
//! a project.

use std::path::{Path, PathBuf};

/// File name of user settings file placed in home directory.
pub const SETTINGS_FILE_NAME: &str = ".boil.json";

/// File name of declarations file placed at project root.
pub const ATTRIBUTES_FILE_NAME: &str = ".gitattributes";

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Determine absolute path to user settings file.
///
/// Uses `$HOME/.boil.json`. Does not check if the path returned actually
/// exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn settings_file() -> Result<PathBuf> {
    home_dir().map(|home| home.join(SETTINGS_FILE_NAME))
}

/// Path to declarations file of project at `root`.
pub fn attributes_file(root: impl AsRef<Path>) -> PathBuf {
    root.as_ref().join(ATTRIBUTES_FILE_NAME)
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;

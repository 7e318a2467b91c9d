// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Locked path handling.
//!
//! Utilities to manage the paths that boilerplate updates must never
//! overwrite.
//!
//! # How Locking Works
//!
//! Git lets a repository name custom merge drivers through its configuration,
//! and pick the merge driver of a path through the gitattributes file at the
//! top-level of the working tree. Boil registers a driver named "ours" whose
//! command is simply `true`, which always resolves a conflicting merge by
//! keeping the current side untouched. Locking a path then amounts to
//! declaring `<path> merge=ours` in `.gitattributes`.
//!
//! # Declaration File Rules
//!
//! The gitattributes file belongs to the project, and usually holds more than
//! boil's declarations: comments, blank lines, line ending rules, LFS
//! filters, etc. Thus, boil treats it as append-only:
//!
//! - Existing content is never reordered, rewritten, or removed.
//! - Declarations already present, compared line by line after trimming, are
//!   never appended a second time.
//! - After an append the file ends with exactly one trailing newline.
//! - Nothing to append means nothing gets written.
//!
//! # See Also
//!
//! - [Man page gitattributes](https://git-scm.com/docs/gitattributes)

use std::{
    collections::HashSet,
    fs::{read_to_string, OpenOptions},
    io::{ErrorKind, Write},
    path::PathBuf,
};
use tracing::{debug, instrument};

/// Attribute marking a path as locked.
pub const LOCK_MARKER: &str = "merge=ours";

/// Git configuration key of the merge driver command.
pub const MERGE_DRIVER_KEY: &str = "merge.ours.driver";

/// Command of the merge driver. Exits successfully without touching anything.
pub const MERGE_DRIVER_COMMAND: &str = "true";

/// Build declaration line locking target path.
pub fn declaration(path: impl AsRef<str>) -> String {
    format!("{} {LOCK_MARKER}", path.as_ref())
}

/// Manage lock declarations in gitattributes file.
#[derive(Clone, Debug)]
pub struct LockDrafter {
    attributes_path: PathBuf,
}

impl LockDrafter {
    /// Construct new lock declaration drafter.
    ///
    /// Does not create the gitattributes file.
    pub fn new(attributes_path: impl Into<PathBuf>) -> Self {
        Self {
            attributes_path: attributes_path.into(),
        }
    }

    /// Edit lock declarations.
    ///
    /// Read current content into [`LockEdit`] instance, let the editor queue
    /// new declarations, then append whatever was queued to the file.
    ///
    /// # Errors
    ///
    /// - Return [`Error::ReadAttributesFile`] if gitattributes file exists
    ///   but cannot be read.
    /// - Return [`Error::WriteAttributesFile`] if new declarations cannot be
    ///   appended.
    pub fn edit<E>(&self, editor: E) -> Result<LockEdit>
    where
        E: FnOnce(&mut LockEdit),
    {
        let mut edit = LockEdit::from(self.current_content()?);
        editor(&mut edit);

        if !edit.changed() {
            return Ok(edit);
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.attributes_path)
            .and_then(|mut file| file.write_all(edit.appendix().as_bytes()))
            .map_err(|err| Error::WriteAttributesFile {
                source: err,
                attributes_path: self.attributes_path.clone(),
            })?;

        Ok(edit)
    }

    /// Lock listing of paths.
    ///
    /// Returns the paths that were not locked before.
    ///
    /// # Errors
    ///
    /// - Return [`Error::ReadAttributesFile`] if gitattributes file exists
    ///   but cannot be read.
    /// - Return [`Error::WriteAttributesFile`] if new declarations cannot be
    ///   appended.
    #[instrument(skip(self, paths), level = "debug")]
    pub fn lock_paths(&self, paths: impl IntoIterator<Item = impl AsRef<str>>) -> Result<Vec<String>> {
        let mut locked = Vec::new();
        self.edit(|edit| {
            for path in paths {
                if edit.lock(path.as_ref()) {
                    locked.push(path.as_ref().to_string());
                }
            }
        })?;
        debug!("locked {} new paths in {}", locked.len(), self.attributes_path.display());

        Ok(locked)
    }

    fn current_content(&self) -> Result<String> {
        match read_to_string(&self.attributes_path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(Error::ReadAttributesFile {
                source: err,
                attributes_path: self.attributes_path.clone(),
            }),
        }
    }
}

/// Lock declaration editor.
///
/// # Invariant
///
/// - Original content is kept verbatim.
/// - No duplicate declarations, against original content or earlier queued
///   declarations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LockEdit {
    original: String,
    seen: HashSet<String>,
    appended: Vec<String>,
}

impl LockEdit {
    /// Queue declaration locking target path.
    ///
    /// Returns false if an identical declaration already exists.
    pub fn lock(&mut self, path: impl AsRef<str>) -> bool {
        let line = declaration(path);
        let line = line.trim();
        if !self.seen.insert(line.to_string()) {
            return false;
        }

        self.appended.push(line.to_string());
        true
    }

    /// Check if any declaration was queued.
    pub fn changed(&self) -> bool {
        !self.appended.is_empty()
    }

    /// Text to append to the original content.
    ///
    /// Starts with a newline if original content is missing its trailing
    /// newline. Every queued declaration ends with a newline.
    pub fn appendix(&self) -> String {
        let mut out = String::new();
        if self.appended.is_empty() {
            return out;
        }

        if !self.original.is_empty() && !self.original.ends_with('\n') {
            out.push('\n');
        }

        for line in &self.appended {
            out.push_str(line);
            out.push('\n');
        }

        out
    }
}

impl From<String> for LockEdit {
    fn from(content: String) -> Self {
        let seen = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect::<HashSet<_>>();

        Self {
            original: content,
            seen,
            appended: Vec::new(),
        }
    }
}

/// Lock declaration management error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Gitattributes file exists but cannot be read from.
    #[error("failed to read from attributes file at {:?}", attributes_path.display())]
    ReadAttributesFile {
        #[source]
        source: std::io::Error,
        attributes_path: PathBuf,
    },

    /// Gitattributes file cannot be appended to.
    #[error("failed to write to attributes file at {:?}", attributes_path.display())]
    WriteAttributesFile {
        #[source]
        source: std::io::Error,
        attributes_path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = Error> = std::result::Result<T, E>;

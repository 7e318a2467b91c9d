// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Keep local versions of files across boilerplate updates.

use crate::{
    command::{Context, Result},
    git::GitRunner,
    lock::{LockDrafter, MERGE_DRIVER_COMMAND, MERGE_DRIVER_KEY},
    path::attributes_file,
};

use std::{
    collections::HashSet,
    fmt::{Display, Formatter, Result as FmtResult},
};
use tracing::{debug, info, instrument};

/// Usage guide printed when no paths are given.
pub const LOCK_USAGE: &str = "\
Usage: boil lock <path>...

Mark files to keep their local version whenever boilerplate updates are
merged in. Each path is declared in .gitattributes with merge=ours.";

/// Outcome of locking a listing of paths.
///
/// Paths are relative to the top-level of the working tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LockSummary {
    /// Paths declared by this call.
    pub locked: Vec<String>,

    /// Paths that were declared already.
    pub already_locked: Vec<String>,
}

impl Display for LockSummary {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let lines = self
            .locked
            .iter()
            .map(|path| format!("locked {path}"))
            .chain(
                self.already_locked
                    .iter()
                    .map(|path| format!("{path} already locked")),
            )
            .collect::<Vec<_>>();

        write!(fmt, "{}", lines.join("\n"))
    }
}

/// Lock paths against boilerplate updates, and print what happened.
///
/// Prints usage guide and touches nothing when no paths are given.
///
/// # Errors
///
/// - Return errors of [`apply`].
pub fn run<R>(ctx: &Context<R>, paths: &[String]) -> Result<()>
where
    R: GitRunner,
{
    if paths.is_empty() {
        println!("{LOCK_USAGE}");
        return Ok(());
    }

    println!("{}", apply(ctx, paths)?);
    Ok(())
}

/// Lock paths against boilerplate updates.
///
/// Configures the merge driver backing lock declarations, then appends a
/// declaration for every path not yet locked to the gitattributes file at the
/// top-level of the working tree. Paths are taken relative to the project
/// root, and declared relative to the top-level.
///
/// # Errors
///
/// - Return [`CommandError::NotWorkTree`] if not inside a working tree.
/// - Return [`CommandError::Git`] if merge driver cannot be configured, or
///   top-level cannot be determined.
/// - Return [`CommandError::Lock`] if gitattributes file cannot be read or
///   appended to.
///
/// [`CommandError::NotWorkTree`]: crate::command::CommandError::NotWorkTree
/// [`CommandError::Git`]: crate::command::CommandError::Git
/// [`CommandError::Lock`]: crate::command::CommandError::Lock
#[instrument(skip(ctx, paths), level = "debug")]
pub fn apply<R>(ctx: &Context<R>, paths: &[String]) -> Result<LockSummary>
where
    R: GitRunner,
{
    ctx.ensure_work_tree()?;

    info!("configuring merge driver {MERGE_DRIVER_KEY}");
    ctx.git
        .stream(&ctx.step(["config", MERGE_DRIVER_KEY, MERGE_DRIVER_COMMAND]))?;

    let top_level = ctx.git.top_level(&ctx.root)?;
    let prefix = ctx.git.prefix(&ctx.root)?;
    debug!("top-level {}, prefix {prefix:?}", top_level.display());

    let requested = paths
        .iter()
        .map(|path| declared_path(&prefix, path))
        .collect::<Vec<_>>();
    let drafter = LockDrafter::new(attributes_file(&top_level));
    let locked = drafter.lock_paths(&requested)?;

    // INVARIANT: A path requested twice counts as locked once.
    let mut claimed = HashSet::new();
    let already_locked = requested
        .iter()
        .filter(|path| !(locked.contains(*path) && claimed.insert(path.to_string())))
        .cloned()
        .collect::<Vec<_>>();

    Ok(LockSummary {
        locked,
        already_locked,
    })
}

/// Resolve path given below `prefix` into path relative to top-level.
///
/// Resolution is lexical. Absolute paths are kept as is.
fn declared_path(prefix: &str, path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }

    let mut parts = prefix
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            part => parts.push(part),
        }
    }

    if parts.is_empty() {
        return path.to_string();
    }

    parts.join("/")
}

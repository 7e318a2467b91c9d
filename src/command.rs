// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Command handlers.
//!
//! One submodule per user-facing command. Every handler receives a
//! [`Context`] holding the user settings, the Git front end, and the project
//! root, plus the raw arguments that followed the command word. Handlers
//! narrate progress through tracing, and print reports to standard output.
//!
//! # Remotes
//!
//! A project seeded or linked by boil has two remotes. The __origin__ remote
//! is the project's own repository. The __upstream__ remote is the
//! boilerplate repository that the project keeps pulling updates from.

pub mod diff;
pub mod link;
pub mod lock;
pub mod new;
pub mod status;
pub mod update;

use crate::{
    config::{Settings, StrategyError},
    git::{Git, GitError, GitRunner, Step, SystemGit},
};

use std::path::PathBuf;
use tracing::debug;

/// Name of remote pointing at the project's own repository.
pub const ORIGIN: &str = "origin";

/// Name of remote pointing at the boilerplate repository.
pub const UPSTREAM: &str = "upstream";

/// Everything a command handler needs.
#[derive(Debug)]
pub struct Context<R = SystemGit>
where
    R: GitRunner,
{
    pub settings: Settings,
    pub git: Git<R>,
    pub root: PathBuf,
}

impl Context<SystemGit> {
    /// Construct context for current directory using real Git binary, and
    /// user settings from home directory.
    pub fn from_env() -> Self {
        Self::new(Settings::load(), Git::default(), ".")
    }
}

impl<R> Context<R>
where
    R: GitRunner,
{
    /// Construct new context.
    pub fn new(settings: Settings, git: Git<R>, root: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            git,
            root: root.into(),
        }
    }

    /// Step that runs at project root.
    pub fn step(&self, args: impl IntoIterator<Item = impl Into<String>>) -> Step {
        Step::new(args).in_dir(&self.root)
    }

    /// Require project root to be inside a Git working tree.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError::NotWorkTree`] if it is not.
    /// - Return [`CommandError::Git`] if Git cannot be spawned.
    pub fn ensure_work_tree(&self) -> Result<()> {
        if !self.git.is_work_tree(&self.root)? {
            return Err(CommandError::NotWorkTree {
                path: self.root.clone(),
            });
        }

        Ok(())
    }

    /// Check if project has upstream remote.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError::Git`] if Git cannot be spawned.
    pub fn has_upstream(&self) -> Result<bool> {
        let found = self.git.has_remote(&self.root, UPSTREAM)?;
        debug!("upstream remote present: {found}");
        Ok(found)
    }

    /// Require project to have upstream remote.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError::NoUpstream`] if it does not.
    /// - Return [`CommandError::Git`] if Git cannot be spawned.
    pub fn ensure_upstream(&self) -> Result<()> {
        if !self.has_upstream()? {
            return Err(CommandError::NoUpstream);
        }

        Ok(())
    }
}

/// Remote tracking ref of upstream branch or tag.
pub fn upstream_ref(reference: impl AsRef<str>) -> String {
    format!("{UPSTREAM}/{}", reference.as_ref())
}

/// All possible error types for command handling.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Project name positional argument missing.
    #[error("boil new requires a <project-name>")]
    MissingProjectName,

    /// Boilerplate repository neither given nor configured.
    #[error(
        "no boilerplate repo provided, use --boilerplate or set boilerplate_repo in ~/.boil.json"
    )]
    MissingBoilerplate,

    /// Origin repository not given.
    #[error("no origin repo provided, use --origin=<git-url>")]
    MissingOrigin,

    /// Update strategy is not recognized.
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// Project root is not inside a working tree.
    #[error("{} is not a git repository", path.display())]
    NotWorkTree { path: PathBuf },

    /// Project lacks upstream remote.
    #[error("no 'upstream' remote found, run `boil link` first")]
    NoUpstream,

    /// Merge or rebase against upstream failed.
    #[error(
        "update from {target} using {strategy} failed, resolve conflicts in git and continue as usual"
    )]
    Update {
        strategy: String,
        target: String,
        #[source]
        source: GitError,
    },

    /// Required Git step failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// Lock declarations could not be managed.
    #[error(transparent)]
    Lock(#[from] crate::lock::Error),
}

/// Friendly result alias :3
pub type Result<T, E = CommandError> = std::result::Result<T, E>;

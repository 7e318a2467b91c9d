// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Attach an existing project to the boilerplate repository.

use crate::{
    command::{CommandError, Context, Result, UPSTREAM},
    flags::Flags,
    git::GitRunner,
};

use tracing::{info, instrument};

/// What linking did to the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linked {
    /// Upstream remote was added.
    Added,

    /// Upstream remote was already there.
    AlreadyLinked,
}

/// Add upstream remote pointing at boilerplate repository.
///
/// Does nothing if an upstream remote already exists, no matter where it
/// points to.
///
/// # Errors
///
/// - Return [`CommandError::MissingBoilerplate`] if boilerplate repository is
///   neither given nor configured.
/// - Return [`CommandError::NotWorkTree`] if not inside a working tree.
/// - Return [`CommandError::Git`] if upstream remote cannot be added.
#[instrument(skip(ctx, args), level = "debug")]
pub fn attach<R>(ctx: &Context<R>, args: &[String]) -> Result<Linked>
where
    R: GitRunner,
{
    let flags = Flags::parse(args);
    let boilerplate = flags
        .value("--boilerplate")
        .or(ctx.settings.boilerplate_repo())
        .ok_or(CommandError::MissingBoilerplate)?;

    ctx.ensure_work_tree()?;

    if ctx.has_upstream()? {
        return Ok(Linked::AlreadyLinked);
    }

    info!("adding upstream {boilerplate}");
    ctx.git.stream(&ctx.step(["remote", "add", UPSTREAM, boilerplate]))?;

    Ok(Linked::Added)
}

/// Link project to boilerplate, and report what happened.
///
/// # Errors
///
/// - Return errors of [`attach`].
pub fn run<R>(ctx: &Context<R>, args: &[String]) -> Result<()>
where
    R: GitRunner,
{
    match attach(ctx, args)? {
        Linked::Added => info!("done, '{UPSTREAM}' remote added"),
        Linked::AlreadyLinked => info!("remote '{UPSTREAM}' already exists, nothing to do"),
    }

    Ok(())
}

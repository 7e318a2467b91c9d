// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Pull boilerplate updates into the project.
//!
//! Fetches the upstream remote, then merges or rebases onto the requested
//! upstream branch or tag. Conflicts are left for the user to resolve through
//! Git directly. Boil never tries to roll anything back.

use crate::{
    command::{upstream_ref, CommandError, Context, Result, UPSTREAM},
    config::Strategy,
    flags::Flags,
    git::GitRunner,
};

use tracing::{info, instrument};

/// Upstream ref to update from when none is given or configured.
pub const DEFAULT_UPDATE_REF: &str = "master";

/// Resolved input of the update command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
    pub strategy: Strategy,
    pub reference: String,
}

impl UpdateOptions {
    /// Resolve options from raw arguments and user settings.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError::Strategy`] if the strategy in effect is
    ///   neither "merge" nor "rebase".
    pub fn resolve<R>(ctx: &Context<R>, args: &[String]) -> Result<Self>
    where
        R: GitRunner,
    {
        let flags = Flags::parse(args);
        let strategy = match flags
            .value("--strategy")
            .or(ctx.settings.default_update_strategy())
        {
            Some(strategy) => strategy.parse::<Strategy>()?,
            None => Strategy::default(),
        };

        let reference = flags
            .value("--ref")
            .or(ctx.settings.boilerplate_branch())
            .unwrap_or(DEFAULT_UPDATE_REF)
            .to_string();

        Ok(Self {
            strategy,
            reference,
        })
    }
}

/// Merge or rebase upstream changes into current branch.
///
/// # Errors
///
/// - Return [`CommandError::Strategy`] before Git is touched if the strategy
///   is invalid.
/// - Return [`CommandError::NotWorkTree`] if not inside a working tree.
/// - Return [`CommandError::NoUpstream`] if project was never linked.
/// - Return [`CommandError::Git`] if fetching upstream fails.
/// - Return [`CommandError::Update`] if merge or rebase fails.
#[instrument(skip(ctx, args), level = "debug")]
pub fn run<R>(ctx: &Context<R>, args: &[String]) -> Result<()>
where
    R: GitRunner,
{
    let opts = UpdateOptions::resolve(ctx, args)?;

    ctx.ensure_work_tree()?;
    ctx.ensure_upstream()?;

    info!("fetching upstream (including tags)");
    ctx.git.stream(&ctx.step(["fetch", UPSTREAM, "--tags"]))?;

    let target = upstream_ref(&opts.reference);
    info!("updating from {target} using strategy {}", opts.strategy);
    ctx.git
        .stream(&ctx.step([opts.strategy.subcommand(), target.as_str()]))
        .map_err(|source| CommandError::Update {
            strategy: opts.strategy.to_string(),
            target: target.clone(),
            source,
        })?;

    info!("update completed successfully");

    Ok(())
}

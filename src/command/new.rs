// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Seed a new project from the boilerplate repository.

use crate::{
    command::{CommandError, Context, Result, ORIGIN, UPSTREAM},
    flags::{Flags, FLAG_MARKER},
    git::{GitRunner, Step},
};

use tracing::{info, instrument};

/// Branch pushed to origin when none is given or configured.
pub const DEFAULT_BRANCH: &str = "master";

/// Resolved input of the new command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOptions {
    pub project_name: String,
    pub boilerplate: String,
    pub origin: String,
    pub branch: String,
}

impl NewOptions {
    /// Resolve options from raw arguments and user settings.
    ///
    /// The first argument that is not a flag names the project.
    ///
    /// # Errors
    ///
    /// - Return [`CommandError::MissingProjectName`] if no project name given.
    /// - Return [`CommandError::MissingBoilerplate`] if boilerplate repository
    ///   is neither given nor configured.
    /// - Return [`CommandError::MissingOrigin`] if origin is not given.
    pub fn resolve<R>(ctx: &Context<R>, args: &[String]) -> Result<Self>
    where
        R: GitRunner,
    {
        let project_name = args
            .iter()
            .find(|arg| !arg.starts_with(FLAG_MARKER))
            .ok_or(CommandError::MissingProjectName)?;
        let flags = Flags::parse(args);

        let boilerplate = flags
            .value("--boilerplate")
            .or(ctx.settings.boilerplate_repo())
            .ok_or(CommandError::MissingBoilerplate)?;

        let origin = flags
            .value("--origin")
            .ok_or(CommandError::MissingOrigin)?;

        let branch = flags
            .value("--branch")
            .or(ctx.settings.boilerplate_branch())
            .unwrap_or(DEFAULT_BRANCH);

        Ok(Self {
            project_name: project_name.clone(),
            boilerplate: boilerplate.into(),
            origin: origin.into(),
            branch: branch.into(),
        })
    }
}

/// Clone boilerplate into new project directory, and rewire its remotes.
///
/// # Errors
///
/// - Return usage errors from [`NewOptions::resolve`] before Git is touched.
/// - Return [`CommandError::Git`] if clone or remote setup fails.
#[instrument(skip(ctx, args), level = "debug")]
pub fn run<R>(ctx: &Context<R>, args: &[String]) -> Result<()>
where
    R: GitRunner,
{
    let opts = NewOptions::resolve(ctx, args)?;
    let project = ctx.root.join(&opts.project_name);

    info!("cloning boilerplate {} into {}", opts.boilerplate, opts.project_name);
    ctx.git.stream(&ctx.step([
        "clone",
        opts.boilerplate.as_str(),
        opts.project_name.as_str(),
    ]))?;

    // INVARIANT: A fresh clone may lack origin in unusual setups.
    info!("removing original origin remote");
    ctx.git.stream(
        &Step::new(["remote", "remove", ORIGIN])
            .in_dir(&project)
            .ignore_failure(),
    )?;

    info!("adding origin {}", opts.origin);
    ctx.git.stream(
        &Step::new(["remote", "add", ORIGIN, opts.origin.as_str()]).in_dir(&project),
    )?;

    info!("adding upstream {}", opts.boilerplate);
    ctx.git.stream(
        &Step::new(["remote", "add", UPSTREAM, opts.boilerplate.as_str()]).in_dir(&project),
    )?;

    // INVARIANT: Local clone stays usable even if the push is rejected.
    info!("pushing initial state to origin ({})", opts.branch);
    ctx.git.stream(
        &Step::new(["push", "-u", ORIGIN, opts.branch.as_str()])
            .in_dir(&project)
            .warn_on_failure(),
    )?;

    info!("done, project initialized from boilerplate");

    Ok(())
}

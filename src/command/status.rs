// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Report how the project relates to its boilerplate.

use crate::{
    command::{upstream_ref, Context, Result, ORIGIN, UPSTREAM},
    git::GitRunner,
};

use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{debug, instrument};

/// Upstream ref to compare against when none is configured.
pub const DEFAULT_STATUS_REF: &str = "master";

/// Placeholder printed for missing values.
pub const NONE: &str = "(none)";

const LABEL_WIDTH: usize = 21;

/// How the current branch compares to the upstream ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Project has no upstream remote to compare against.
    NoUpstream,

    /// Commit counts could not be determined.
    Unavailable,

    /// Commit counts in both directions.
    ///
    /// Field names follow the commit ranges, not the wording of the report:
    /// `ahead` counts `HEAD..upstream/<ref>`, i.e., commits the boilerplate
    /// has that the current branch lacks, and `behind` counts
    /// `upstream/<ref>..HEAD`.
    Counts { ahead: u64, behind: u64 },
}

impl Comparison {
    /// Build comparison from captured `rev-list --count` output.
    pub fn from_counts(ahead: impl AsRef<str>, behind: impl AsRef<str>) -> Self {
        match (ahead.as_ref().trim().parse(), behind.as_ref().trim().parse()) {
            (Ok(ahead), Ok(behind)) => Self::Counts { ahead, behind },
            _ => Self::Unavailable,
        }
    }
}

/// Status report of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub branch: String,
    pub origin: Option<String>,
    pub upstream: Option<String>,
    pub target: String,
    pub comparison: Comparison,
}

impl Display for StatusReport {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let target = upstream_ref(&self.target);
        writeln!(fmt, "Project status")?;
        writeln!(fmt, "──────────────")?;
        writeln!(fmt, "{:<LABEL_WIDTH$}{}", "Current branch:", self.branch)?;
        writeln!(fmt)?;
        writeln!(
            fmt,
            "{:<LABEL_WIDTH$}{}",
            "Origin remote:",
            self.origin.as_deref().unwrap_or(NONE)
        )?;
        writeln!(
            fmt,
            "{:<LABEL_WIDTH$}{}",
            "Upstream remote:",
            self.upstream.as_deref().unwrap_or(NONE)
        )?;
        writeln!(fmt)?;
        writeln!(fmt, "{:<LABEL_WIDTH$}{}", "Upstream ref target:", self.target)?;

        let mut lines = Vec::new();
        match self.comparison {
            Comparison::NoUpstream => lines.push("(no upstream remote set)".to_string()),
            Comparison::Unavailable => {
                lines.push(format!("(could not count commits against {target})"))
            }
            Comparison::Counts { ahead: 0, behind: 0 } => {
                lines.push(format!("Up to date with {target}"))
            }
            Comparison::Counts { ahead, behind } => {
                if ahead != 0 {
                    lines.push(format!("Your branch is {ahead} commits behind {target}"));
                }
                if behind != 0 {
                    lines.push(format!("Your branch is {behind} commits ahead of {target}"));
                }
            }
        }

        for (index, line) in lines.iter().enumerate() {
            let label = if index == 0 { "Comparison:" } else { "" };
            if index > 0 {
                writeln!(fmt)?;
            }
            write!(fmt, "{label:<LABEL_WIDTH$}{line}")?;
        }

        Ok(())
    }
}

/// Gather status report of project.
///
/// Fetches upstream first when there is one. Fetch failure is ignored, the
/// comparison just works off whatever was fetched before.
///
/// # Errors
///
/// - Return [`CommandError::NotWorkTree`] if not inside a working tree.
/// - Return [`CommandError::Git`] if Git cannot be spawned.
///
/// [`CommandError::NotWorkTree`]: crate::command::CommandError::NotWorkTree
/// [`CommandError::Git`]: crate::command::CommandError::Git
#[instrument(skip(ctx), level = "debug")]
pub fn gather<R>(ctx: &Context<R>) -> Result<StatusReport>
where
    R: GitRunner,
{
    ctx.ensure_work_tree()?;

    let branch = ctx
        .git
        .capture(&ctx.step(["rev-parse", "--abbrev-ref", "HEAD"]).ignore_failure())?;
    let branch = if branch.success {
        branch.trimmed().to_string()
    } else {
        NONE.to_string()
    };

    let origin = remote_url(ctx, ORIGIN)?;
    let upstream = remote_url(ctx, UPSTREAM)?;
    let target = ctx
        .settings
        .boilerplate_branch()
        .unwrap_or(DEFAULT_STATUS_REF)
        .to_string();

    let comparison = if upstream.is_none() {
        Comparison::NoUpstream
    } else {
        ctx.git
            .capture(&ctx.step(["fetch", UPSTREAM, "--tags"]).ignore_failure())?;

        let upstream_target = upstream_ref(&target);
        let ahead = ctx.git.capture(
            &ctx.step(["rev-list", "--count", format!("HEAD..{upstream_target}").as_str()])
                .ignore_failure(),
        )?;
        let behind = ctx.git.capture(
            &ctx.step(["rev-list", "--count", format!("{upstream_target}..HEAD").as_str()])
                .ignore_failure(),
        )?;
        debug!("ahead {:?}, behind {:?}", ahead.trimmed(), behind.trimmed());

        Comparison::from_counts(ahead.trimmed(), behind.trimmed())
    };

    Ok(StatusReport {
        branch,
        origin,
        upstream,
        target,
        comparison,
    })
}

/// Print status report of project.
///
/// # Errors
///
/// - Return errors of [`gather`].
pub fn run<R>(ctx: &Context<R>) -> Result<()>
where
    R: GitRunner,
{
    println!("{}", gather(ctx)?);
    Ok(())
}

fn remote_url<R>(ctx: &Context<R>, name: &str) -> Result<Option<String>>
where
    R: GitRunner,
{
    let captured = ctx
        .git
        .capture(&ctx.step(["remote", "get-url", name]).ignore_failure())?;
    let url = captured.trimmed();
    if !captured.success || url.is_empty() {
        return Ok(None);
    }

    Ok(Some(url.to_string()))
}

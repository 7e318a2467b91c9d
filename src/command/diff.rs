// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! List files that differ between the boilerplate and the project.

use crate::{
    command::{upstream_ref, Context, Result, UPSTREAM},
    flags::Flags,
    git::GitRunner,
};

use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{debug, info, instrument};

/// Upstream ref to diff against when none is given or configured.
///
/// Differs from the update default.
pub const DEFAULT_DIFF_REF: &str = "main";

/// Kind of change reported by `git diff --name-status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added,
    Modified,
    Deleted,
    Renamed,

    /// Any other status code, kept verbatim.
    Other(String),
}

impl Change {
    /// Interpret status code by its first letter.
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('A') => Self::Added,
            Some('M') => Self::Modified,
            Some('D') => Self::Deleted,
            Some('R') => Self::Renamed,
            _ => Self::Other(code.to_string()),
        }
    }
}

impl Display for Change {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            Self::Added => "[Added]".to_string(),
            Self::Modified => "[Modified]".to_string(),
            Self::Deleted => "[Deleted]".to_string(),
            Self::Renamed => "[Renamed]".to_string(),
            Self::Other(code) => format!("[{code}]"),
        };

        // INVARIANT: Honor width and alignment of caller.
        fmt.pad(label.as_str())
    }
}

/// Single changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub change: Change,
    pub path: String,

    /// New path of a renamed file.
    pub renamed_to: Option<String>,
}

impl DiffEntry {
    /// Parse one line of `git diff --name-status` output.
    ///
    /// Returns `None` for lines with less than two whitespace separated
    /// fields.
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return None;
        }

        let change = Change::from_code(fields[0]);
        let renamed_to = match (&change, fields.get(2)) {
            (Change::Renamed, Some(new_path)) => Some(new_path.to_string()),
            _ => None,
        };

        Some(Self {
            change,
            path: fields[1].to_string(),
            renamed_to,
        })
    }
}

impl Display for DiffEntry {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match &self.renamed_to {
            Some(new_path) => write!(fmt, "  {:<10} {} -> {}", self.change, self.path, new_path),
            None => write!(fmt, "  {:<10} {}", self.change, self.path),
        }
    }
}

/// Listing of files differing from upstream ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub target: String,

    /// Changed files, or `None` if Git could not diff against target.
    pub entries: Option<Vec<DiffEntry>>,
}

impl DiffReport {
    /// Build report from captured `git diff --name-status` output.
    pub fn parse(target: impl Into<String>, output: impl AsRef<str>) -> Self {
        let entries = output
            .as_ref()
            .trim()
            .lines()
            .filter_map(DiffEntry::parse)
            .collect();

        Self {
            target: target.into(),
            entries: Some(entries),
        }
    }

    /// Report that target could not be diffed against.
    pub fn unavailable(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            entries: None,
        }
    }
}

impl Display for DiffReport {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        let target = upstream_ref(&self.target);
        writeln!(fmt, "Differences between {target} and your current HEAD:")?;
        writeln!(fmt)?;

        let entries = match &self.entries {
            Some(entries) => entries,
            None => return write!(fmt, "(could not diff against {target})"),
        };

        if entries.is_empty() {
            return write!(fmt, "No files differ from {target}.");
        }

        let lines: Vec<String> = entries.iter().map(ToString::to_string).collect();
        write!(fmt, "{}", lines.join("\n"))
    }
}

/// Gather listing of files that differ from upstream ref.
///
/// # Errors
///
/// - Return [`CommandError::NotWorkTree`] if not inside a working tree.
/// - Return [`CommandError::NoUpstream`] if project was never linked.
/// - Return [`CommandError::Git`] if fetching upstream fails.
///
/// [`CommandError::NotWorkTree`]: crate::command::CommandError::NotWorkTree
/// [`CommandError::NoUpstream`]: crate::command::CommandError::NoUpstream
/// [`CommandError::Git`]: crate::command::CommandError::Git
#[instrument(skip(ctx, args), level = "debug")]
pub fn gather<R>(ctx: &Context<R>, args: &[String]) -> Result<DiffReport>
where
    R: GitRunner,
{
    let flags = Flags::parse(args);
    let reference = flags
        .value("--ref")
        .or(ctx.settings.boilerplate_branch())
        .unwrap_or(DEFAULT_DIFF_REF)
        .to_string();

    ctx.ensure_work_tree()?;
    ctx.ensure_upstream()?;

    info!("fetching upstream (including tags)");
    ctx.git.stream(&ctx.step(["fetch", UPSTREAM, "--tags"]))?;

    // INVARIANT: Non-zero exit of git-diff means differences, not failure.
    let range = format!("{}..HEAD", upstream_ref(&reference));
    let output = ctx.git.capture(
        &ctx.step(["--no-pager", "diff", "--name-status", "-M", range.as_str()])
            .ignore_failure(),
    )?;

    // INVARIANT: Git error text is never listed as changed files.
    if !output.success && output.trimmed().starts_with("fatal:") {
        debug!("cannot diff against {}: {}", upstream_ref(&reference), output.trimmed());
        return Ok(DiffReport::unavailable(reference));
    }

    Ok(DiffReport::parse(reference, output.text))
}

/// Print listing of files that differ from upstream ref.
///
/// # Errors
///
/// - Return errors of [`gather`].
pub fn run<R>(ctx: &Context<R>, args: &[String]) -> Result<()>
where
    R: GitRunner,
{
    println!("{}", gather(ctx, args)?);
    Ok(())
}

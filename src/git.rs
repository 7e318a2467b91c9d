// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Git invocation.
//!
//! Boil never touches repository internals itself. Every meaningful action is
//! a call to the Git binary. Each call is modeled as a [`Step`]: the arguments
//! to pass, the directory to run in, and what a failure of that call means for
//! the command issuing it.
//!
//! # Execution Modes
//!
//! A step can be __streamed__ or __captured__. Streamed steps share the
//! terminal of the current process, so Git's own output shows up interleaved
//! with boil's narration, and only success or failure comes back. Captured
//! steps collect standard output and standard error together as text, which
//! is how boil inspects things like remote listings or commit counts.
//!
//! # Failure Classification
//!
//! See [`OnFailure`]. Classification is applied in exactly one place,
//! [`Git`], so commands never branch on raw exit statuses.
//!
//! The actual process spawning sits behind [`GitRunner`], so the commands can
//! be exercised against a recording fake.

#[cfg(test)]
pub(crate) mod fake;

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, instrument, warn};

/// Name of the Git binary to invoke.
pub const GIT_BIN: &str = "git";

/// What a failed step means to the command issuing it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Failure stops the command.
    #[default]
    Abort,

    /// Failure is reported as a warning, and the command carries on.
    Warn,

    /// Failure is silently ignored, and the command carries on.
    Ignore,
}

/// Single invocation of the Git binary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Step {
    /// Arguments passed to Git.
    pub args: Vec<String>,

    /// Directory to run in. Current directory if unset.
    pub dir: Option<PathBuf>,

    /// Failure classification.
    pub on_failure: OnFailure,
}

impl Step {
    /// Construct new step that aborts on failure.
    pub fn new(args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            dir: None,
            on_failure: OnFailure::Abort,
        }
    }

    /// Run step in target directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Warn about failure instead of aborting.
    pub fn warn_on_failure(mut self) -> Self {
        self.on_failure = OnFailure::Warn;
        self
    }

    /// Ignore failure instead of aborting.
    pub fn ignore_failure(mut self) -> Self {
        self.on_failure = OnFailure::Ignore;
        self
    }
}

impl Display for Step {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{GIT_BIN} {}", self.args.join(" "))
    }
}

/// Text collected from a captured step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Captured {
    /// Standard output followed by standard error.
    pub text: String,

    /// Whether Git exited successfully.
    pub success: bool,
}

impl Captured {
    /// Captured text without surrounding whitespace.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Whether Git reported the outcome of a step as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Step succeeded.
    Success,

    /// Step failed, and its classification allowed the command to continue.
    Tolerated,
}

/// Layer of indirection for spawning Git.
pub trait GitRunner {
    /// Run step with inherited standard streams.
    ///
    /// Return whether Git exited successfully.
    fn stream(&self, step: &Step) -> std::io::Result<bool>;

    /// Run step collecting its combined output regardless of exit status.
    fn capture(&self, step: &Step) -> std::io::Result<Captured>;
}

/// Spawn the Git binary found on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl SystemGit {
    fn command(step: &Step) -> Command {
        let mut command = Command::new(GIT_BIN);
        command.args(&step.args);
        if let Some(dir) = &step.dir {
            command.current_dir(dir);
        }
        command
    }
}

impl GitRunner for SystemGit {
    fn stream(&self, step: &Step) -> std::io::Result<bool> {
        let status = Self::command(step).spawn()?.wait()?;
        Ok(status.success())
    }

    fn capture(&self, step: &Step) -> std::io::Result<Captured> {
        let output = Self::command(step).output()?;
        let mut text = String::from_utf8_lossy(output.stdout.as_slice()).into_owned();
        text.push_str(String::from_utf8_lossy(output.stderr.as_slice()).as_ref());

        Ok(Captured {
            text,
            success: output.status.success(),
        })
    }
}

/// Git front end applying failure classification to each step.
#[derive(Debug, Default, Clone)]
pub struct Git<R = SystemGit>
where
    R: GitRunner,
{
    runner: R,
}

impl<R> Git<R>
where
    R: GitRunner,
{
    /// Construct new Git front end.
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    /// Run step with output going straight to the terminal.
    ///
    /// # Errors
    ///
    /// - Return [`GitError::Launch`] if Git cannot be spawned, and the step
    ///   aborts on failure.
    /// - Return [`GitError::Exit`] if Git exits unsuccessfully, and the step
    ///   aborts on failure.
    #[instrument(skip(self, step), fields(step = %step), level = "debug")]
    pub fn stream(&self, step: &Step) -> Result<Outcome> {
        debug!("stream {step}");
        let error = match self.runner.stream(step) {
            Ok(true) => return Ok(Outcome::Success),
            Ok(false) => GitError::Exit {
                step: step.to_string(),
                output: String::new(),
            },
            Err(source) => GitError::Launch {
                step: step.to_string(),
                source,
            },
        };

        tolerate(step, error).map(|_| Outcome::Tolerated)
    }

    /// Run step collecting its combined output.
    ///
    /// Tolerated failures still hand back whatever Git printed. A tolerated
    /// launch failure hands back empty text.
    ///
    /// # Errors
    ///
    /// - Return [`GitError::Launch`] if Git cannot be spawned, and the step
    ///   aborts on failure.
    /// - Return [`GitError::Exit`] if Git exits unsuccessfully, and the step
    ///   aborts on failure.
    #[instrument(skip(self, step), fields(step = %step), level = "debug")]
    pub fn capture(&self, step: &Step) -> Result<Captured> {
        debug!("capture {step}");
        match self.runner.capture(step) {
            Ok(captured) if captured.success => Ok(captured),
            Ok(captured) => {
                let error = GitError::Exit {
                    step: step.to_string(),
                    output: captured.trimmed().to_string(),
                };
                tolerate(step, error).map(|_| captured)
            }
            Err(source) => {
                let error = GitError::Launch {
                    step: step.to_string(),
                    source,
                };
                tolerate(step, error).map(|_| Captured::default())
            }
        }
    }

    /// Check if target directory is inside a Git working tree.
    ///
    /// # Errors
    ///
    /// - Return [`GitError::Launch`] if Git cannot be spawned.
    pub fn is_work_tree(&self, dir: impl AsRef<Path>) -> Result<bool> {
        let step = Step::new(["rev-parse", "--is-inside-work-tree"])
            .in_dir(dir.as_ref())
            .ignore_failure();
        let captured = self.runner.capture(&step).map_err(|source| GitError::Launch {
            step: step.to_string(),
            source,
        })?;

        Ok(captured.success && captured.trimmed() == "true")
    }

    /// Check if remote exists in repository at target directory.
    ///
    /// Failure to list remotes counts as remote not existing.
    ///
    /// # Errors
    ///
    /// - Return [`GitError::Launch`] if Git cannot be spawned.
    pub fn has_remote(&self, dir: impl AsRef<Path>, name: impl AsRef<str>) -> Result<bool> {
        let step = Step::new(["remote"]).in_dir(dir.as_ref()).ignore_failure();
        let captured = self.runner.capture(&step).map_err(|source| GitError::Launch {
            step: step.to_string(),
            source,
        })?;

        Ok(remote_listed(&captured.text, name))
    }

    /// Determine top-level directory of working tree containing target
    /// directory.
    ///
    /// Empty output counts as the target directory itself.
    ///
    /// # Errors
    ///
    /// - Return [`GitError`] if Git cannot be spawned or fails.
    pub fn top_level(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let step = Step::new(["rev-parse", "--show-toplevel"]).in_dir(dir.as_ref());
        let captured = self.capture(&step)?;
        match captured.trimmed() {
            "" => Ok(dir.as_ref().to_path_buf()),
            top_level => Ok(PathBuf::from(top_level)),
        }
    }

    /// Determine path of target directory relative to top-level directory.
    ///
    /// Empty at the top-level itself, otherwise ends with a slash.
    ///
    /// # Errors
    ///
    /// - Return [`GitError`] if Git cannot be spawned or fails.
    pub fn prefix(&self, dir: impl AsRef<Path>) -> Result<String> {
        let step = Step::new(["rev-parse", "--show-prefix"]).in_dir(dir.as_ref());
        Ok(self.capture(&step)?.trimmed().to_string())
    }
}

/// Check if remote name shows up in remote listing output.
///
/// This is a plain substring search over free text, so "upstream" is also
/// reported present when only "upstream-old" exists.
pub fn remote_listed(listing: impl AsRef<str>, name: impl AsRef<str>) -> bool {
    listing.as_ref().contains(name.as_ref())
}

fn tolerate(step: &Step, error: GitError) -> Result<()> {
    match step.on_failure {
        OnFailure::Abort => Err(error),
        OnFailure::Warn => {
            warn!("{error}");
            Ok(())
        }
        OnFailure::Ignore => {
            debug!("ignore failure: {error}");
            Ok(())
        }
    }
}

/// Git invocation error types.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    /// Git binary could not be spawned.
    #[error("failed to launch `{step}`")]
    Launch {
        step: String,
        #[source]
        source: std::io::Error,
    },

    /// Git exited unsuccessfully.
    #[error("`{step}` failed{}", exit_detail(.output))]
    Exit { step: String, output: String },
}

fn exit_detail(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(": {output}")
    }
}

/// Friendly result alias :3
pub type Result<T, E = GitError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeGit;
    use pretty_assertions::assert_eq;
    use simple_test_case::test_case;

    #[test]
    fn step_display() {
        let step = Step::new(["fetch", "upstream", "--tags"]).in_dir(".");
        assert_eq!(step.to_string(), "git fetch upstream --tags");
        assert_eq!(step.on_failure, OnFailure::Abort);
        assert_eq!(step.dir, Some(PathBuf::from(".")));
    }

    #[test]
    fn stream_failure_classification() {
        let git = Git::new(FakeGit::new().fail("push -u origin master"));

        let step = Step::new(["push", "-u", "origin", "master"]);
        let error = git.stream(&step).unwrap_err();
        assert_eq!(error.to_string(), "`git push -u origin master` failed");

        let outcome = git.stream(&step.clone().warn_on_failure()).unwrap();
        assert_eq!(outcome, Outcome::Tolerated);

        let outcome = git.stream(&step.ignore_failure()).unwrap();
        assert_eq!(outcome, Outcome::Tolerated);

        let outcome = git.stream(&Step::new(["status"])).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn capture_keeps_output_of_tolerated_failure() {
        let git = Git::new(FakeGit::new().fail_with("remote get-url upstream", "error: No such remote"));

        let step = Step::new(["remote", "get-url", "upstream"]);
        let error = git.capture(&step).unwrap_err();
        assert_eq!(
            error.to_string(),
            "`git remote get-url upstream` failed: error: No such remote"
        );

        let captured = git.capture(&step.ignore_failure()).unwrap();
        assert!(!captured.success);
        assert_eq!(captured.trimmed(), "error: No such remote");
    }

    #[test]
    fn launch_failure_is_reported() {
        let git = Git::new(FakeGit::new().unlaunchable());
        let error = git.stream(&Step::new(["status"])).unwrap_err();
        assert!(matches!(error, GitError::Launch { .. }));

        let captured = git.capture(&Step::new(["status"]).ignore_failure()).unwrap();
        assert_eq!(captured, Captured::default());

        assert!(git.has_remote(".", "upstream").is_err());
    }

    #[test_case("origin\nupstream\n", "upstream", true; "listed")]
    #[test_case("origin\n", "upstream", false; "missing")]
    #[test_case("", "origin", false; "no remotes")]
    #[test_case("upstream-old\n", "upstream", true; "substring match")]
    #[test]
    fn remote_listing_predicate(listing: &str, name: &str, expect: bool) {
        self::assert_eq!(remote_listed(listing, name), expect);
    }

    #[test]
    fn work_tree_check() {
        let git = Git::new(FakeGit::new().respond("rev-parse --is-inside-work-tree", "true\n"));
        assert!(git.is_work_tree(".").unwrap());

        let git = Git::new(FakeGit::new().fail_with(
            "rev-parse --is-inside-work-tree",
            "fatal: not a git repository",
        ));
        assert!(!git.is_work_tree(".").unwrap());
    }

    #[test]
    fn locate_top_level_and_prefix() -> anyhow::Result<()> {
        let git = Git::new(
            FakeGit::new()
                .respond("rev-parse --show-toplevel", "/srv/app\n")
                .respond("rev-parse --show-prefix", "src/lib/\n"),
        );
        assert_eq!(git.top_level("src/lib")?, PathBuf::from("/srv/app"));
        assert_eq!(git.prefix("src/lib")?, "src/lib/");

        let git = Git::new(FakeGit::new());
        assert_eq!(git.top_level(".")?, PathBuf::from("."));
        assert_eq!(git.prefix(".")?, "");

        let git = Git::new(FakeGit::new().fail("rev-parse --show-toplevel"));
        assert!(git.top_level(".").is_err());

        Ok(())
    }
}

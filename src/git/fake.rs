// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Recording stand-in for the Git binary.

use crate::git::{Captured, GitRunner, Step};

use std::{cell::RefCell, collections::HashMap, path::PathBuf};

/// How a recorded step was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Stream,
    Capture,
}

/// Step as seen by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub(crate) args: String,
    pub(crate) dir: Option<PathBuf>,
    pub(crate) mode: Mode,
}

/// Fake Git runner.
///
/// Steps are keyed by their space-joined arguments. Unscripted steps succeed
/// with empty output.
#[derive(Debug, Default)]
pub(crate) struct FakeGit {
    responses: HashMap<String, Captured>,
    unlaunchable: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Succeed with given output.
    pub(crate) fn respond(mut self, args: &str, text: &str) -> Self {
        self.responses.insert(
            args.into(),
            Captured {
                text: text.into(),
                success: true,
            },
        );
        self
    }

    /// Fail with no output.
    pub(crate) fn fail(self, args: &str) -> Self {
        self.fail_with(args, "")
    }

    /// Fail with given output.
    pub(crate) fn fail_with(mut self, args: &str, text: &str) -> Self {
        self.responses.insert(
            args.into(),
            Captured {
                text: text.into(),
                success: false,
            },
        );
        self
    }

    /// Act like Git is not on `PATH`.
    pub(crate) fn unlaunchable(mut self) -> Self {
        self.unlaunchable = true;
        self
    }

    /// A work tree with the given remotes already configured.
    pub(crate) fn work_tree(remotes: &str) -> Self {
        Self::new()
            .respond("rev-parse --is-inside-work-tree", "true\n")
            .respond("remote", remotes)
    }

    /// Arguments of every step run so far, in order.
    pub(crate) fn args(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|call| call.args.clone()).collect()
    }

    /// Every step run so far, in order.
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, step: &Step, mode: Mode) -> std::io::Result<Captured> {
        let args = step.args.join(" ");
        self.calls.borrow_mut().push(Call {
            args: args.clone(),
            dir: step.dir.clone(),
            mode,
        });

        if self.unlaunchable {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            ));
        }

        Ok(self.responses.get(&args).cloned().unwrap_or(Captured {
            text: String::new(),
            success: true,
        }))
    }
}

impl GitRunner for FakeGit {
    fn stream(&self, step: &Step) -> std::io::Result<bool> {
        self.record(step, Mode::Stream).map(|captured| captured.success)
    }

    fn capture(&self, step: &Step) -> std::io::Result<Captured> {
        self.record(step, Mode::Capture)
    }
}

// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Keep projects in sync with the boilerplate they were seeded from.
//!
//! Boil maintains a living link between a project and a __boilerplate__
//! repository, i.e., a template repository that projects are seeded from.
//! New projects are cloned from the boilerplate, existing projects can be
//! linked to it, and later template changes are pulled in through plain Git
//! merges or rebases.
//!
//! # Locked Paths
//!
//! Some files are meant to diverge from the boilerplate for good. Boil lets
//! the user __lock__ such paths through gitattributes merge declarations, so
//! Git always keeps the local version of them when boilerplate updates are
//! merged in.
//!
//! # Git Only
//!
//! Boil never re-implements version control. Every operation is a sequence
//! of calls to the Git binary, see [`git`].

pub mod command;
pub mod config;
pub mod flags;
pub mod git;
pub mod lock;
pub mod path;

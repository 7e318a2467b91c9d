// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Boil reads an optional user settings file at `$HOME/.boil.json` that
//! provides defaults for the boilerplate repository to seed projects from, the
//! branch of that repository to follow, and the preferred update strategy.
//!
//! Settings are best-effort. A missing file is the common case and yields
//! empty settings without complaint. A file that cannot be parsed yields a
//! single warning and empty settings. Nothing in here is ever fatal.
//!
//! # Layout
//!
//! ```json
//! {
//!   "boilerplate_repo": "git@github.com:acme/boilerplate.git",
//!   "boilerplate_branch": "master",
//!   "default_update_strategy": "merge"
//! }
//! ```

use crate::path::settings_file;

use serde::Deserialize;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, warn};

/// User settings.
///
/// All fields are optional. Empty strings are treated the same as absent
/// fields.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct Settings {
    /// Location of boilerplate repository to seed and update from.
    #[serde(default)]
    pub boilerplate_repo: Option<String>,

    /// Branch of boilerplate repository to follow.
    #[serde(default)]
    pub boilerplate_branch: Option<String>,

    /// Update strategy to use when none is given on the command line.
    ///
    /// Not validated at load time. The update command rejects bad values.
    #[serde(default)]
    pub default_update_strategy: Option<String>,
}

impl Settings {
    /// Load user settings from `$HOME/.boil.json`.
    ///
    /// Returns empty settings if the home directory cannot be determined, or
    /// the settings file is missing or unreadable. Emits one warning and
    /// returns empty settings if the file cannot be parsed.
    pub fn load() -> Self {
        match settings_file() {
            Ok(path) => Self::load_from(path),
            Err(error) => {
                debug!("skip user settings: {error}");
                Self::default()
            }
        }
    }

    /// Load settings from target path with the same leniency as [`load`].
    ///
    /// [`load`]: Settings::load
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        match Self::read(path.as_ref()) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(error) => {
                warn!("{error}");
                Self::default()
            }
        }
    }

    /// Read settings from target path.
    ///
    /// Returns `Ok(None)` if there is nothing to read at the path.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Parse`] if file content is not valid.
    pub fn read(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let content = match read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!("no user settings at {}", path.display());
                return Ok(None);
            }
            Err(error) => {
                debug!("cannot read user settings at {}: {error}", path.display());
                return Ok(None);
            }
        };

        content
            .parse()
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                source: Box::new(source),
                path: path.to_path_buf(),
            })
    }

    /// Boilerplate repository location, if set.
    pub fn boilerplate_repo(&self) -> Option<&str> {
        non_empty(&self.boilerplate_repo)
    }

    /// Boilerplate branch, if set.
    pub fn boilerplate_branch(&self) -> Option<&str> {
        non_empty(&self.boilerplate_branch)
    }

    /// Default update strategy, if set.
    pub fn default_update_strategy(&self) -> Option<&str> {
        non_empty(&self.default_update_strategy)
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut settings: Settings = serde_json::from_str(data)?;

        // INVARIANT: Perform shell expansion on boilerplate repository field.
        if let Some(repo) = settings.boilerplate_repo.take() {
            settings.boilerplate_repo = Some(shellexpand::full(&repo)?.into_owned());
        }

        Ok(settings)
    }
}

/// Strategy used to pull boilerplate updates into a project.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Create a merge commit combining both histories.
    #[default]
    Merge,

    /// Replay local commits on top of the boilerplate.
    Rebase,
}

impl Strategy {
    /// Git subcommand that applies this strategy.
    pub fn subcommand(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Rebase => "rebase",
        }
    }
}

impl FromStr for Strategy {
    type Err = StrategyError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            "merge" => Ok(Self::Merge),
            "rebase" => Ok(Self::Rebase),
            other => Err(StrategyError(other.to_string())),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.subcommand())
    }
}

/// Update strategy is neither "merge" nor "rebase".
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid strategy {0:?}, use --strategy=merge or --strategy=rebase")]
pub struct StrategyError(pub String);

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize settings.
    #[error(transparent)]
    Deserialize(#[from] serde_json::Error),

    /// Failed to perform shell expansion on settings.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// Settings file exists but its content is invalid.
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        #[source]
        source: Box<ConfigError>,
        path: PathBuf,
    },
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;

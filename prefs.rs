/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Shell preferences: a TOML file under the platform config dir, merged
//! with command-line overrides. A missing file is not an error; an
//! unreadable or malformed one is logged and defaulted.

use std::fs;
use std::path::{Path, PathBuf};

use bpaf::Bpaf;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_HOMEPAGE: &str = "https://www.google.com";
pub const DEFAULT_SEARCH_PAGE: &str = "https://www.google.com/search?q=%s";
const DEFAULT_WINDOW_WIDTH: i32 = 1024;
const DEFAULT_WINDOW_HEIGHT: i32 = 728;

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
pub struct CliArgs {
    /// URL to open in the initial tab (defaults to the homepage).
    #[bpaf(long("url"), argument("URL"))]
    pub url: Option<String>,
    /// Homepage URL for new tabs.
    #[bpaf(long("homepage"), argument("URL"))]
    pub homepage: Option<String>,
    /// Search page template; `%s` is replaced with the encoded query.
    #[bpaf(long("search-page"), argument("URL"))]
    pub search_page: Option<String>,
    /// Path to a preferences TOML file.
    #[bpaf(long("prefs"), argument("PATH"))]
    pub prefs: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct PrefsFile {
    homepage: Option<String>,
    search_page: Option<String>,
    window_width: Option<i32>,
    window_height: Option<i32>,
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Effective preferences after file load and CLI merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub homepage: String,
    pub search_page: String,
    pub window_width: i32,
    pub window_height: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            homepage: DEFAULT_HOMEPAGE.to_string(),
            search_page: DEFAULT_SEARCH_PAGE.to_string(),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Load preferences for the given arguments. File problems are logged
/// and fall back to defaults so startup never fails on a bad prefs file.
pub fn load(args: &CliArgs) -> Preferences {
    let path = args.prefs.clone().or_else(default_prefs_path);
    let file = match path {
        Some(path) => match read_prefs_file(&path) {
            Ok(file) => file,
            Err(error) => {
                log::warn!("{error}; using default preferences");
                PrefsFile::default()
            }
        },
        None => PrefsFile::default(),
    };

    let defaults = Preferences::default();
    Preferences {
        homepage: args
            .homepage
            .clone()
            .or(file.homepage)
            .unwrap_or(defaults.homepage),
        search_page: args
            .search_page
            .clone()
            .or(file.search_page)
            .unwrap_or(defaults.search_page),
        window_width: file.window_width.unwrap_or(defaults.window_width),
        window_height: file.window_height.unwrap_or(defaults.window_height),
    }
}

fn default_prefs_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tabshell").join("prefs.toml"))
}

fn read_prefs_file(path: &Path) -> Result<PrefsFile, PrefsError> {
    if !path.exists() {
        return Ok(PrefsFile::default());
    }
    let text = fs::read_to_string(path).map_err(|source| PrefsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| PrefsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

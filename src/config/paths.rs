//! Profile directory resolution
//!
//! Priority: explicit override > `$XDG_CONFIG_HOME` > `$HOME/.config`.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::config;
use crate::error::{DisplayError, DisplayResult};

/// Where the profile store reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl StoreConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve from the process environment unless a directory was given
    pub fn resolve(override_dir: Option<PathBuf>) -> DisplayResult<Self> {
        if let Some(dir) = override_dir {
            debug!(dir = %dir.display(), "using configuration directory from command line");
            return Ok(Self::new(dir));
        }
        config_root(env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
            .map(|root| Self::new(root.join(config::APP_DIR)))
            .ok_or(DisplayError::ConfigDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// XDG base directory rules: a relative or empty XDG_CONFIG_HOME is ignored
fn config_root(xdg_config_home: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    xdg_config_home
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| home.map(|h| h.join(".config")))
}

//! Named profile files
//!
//! One JSON document per profile: `<dir>/monitors_config_<name>.json`.
//! Saving overwrites; loading never fails the caller.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::constants::config;
use crate::error::{DisplayError, DisplayResult};
use crate::types::Layout;

pub struct ProfileStore {
    config: StoreConfig,
}

impl ProfileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// File backing `profile_name`; names that could escape the profile
    /// directory are rejected
    pub fn path_for(&self, profile_name: &str) -> DisplayResult<PathBuf> {
        if !is_valid_profile_name(profile_name) {
            return Err(DisplayError::InvalidProfileName {
                name: profile_name.to_string(),
            });
        }
        Ok(self.config.dir().join(format!(
            "{}{profile_name}{}",
            config::PROFILE_PREFIX,
            config::PROFILE_EXTENSION
        )))
    }

    /// Write the layout, creating the profile directory if needed
    pub fn save(&self, layout: &Layout, profile_name: &str) -> DisplayResult<PathBuf> {
        let path = self.path_for(profile_name)?;
        let dir = self.config.dir();
        fs::create_dir_all(dir).map_err(|source| DisplayError::ProfileIo {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(config::JSON_INDENT));
        layout
            .serialize(&mut serializer)
            .map_err(|source| DisplayError::ProfileIo {
                path: path.clone(),
                source: source.into(),
            })?;
        buf.push(b'\n');

        fs::write(&path, buf).map_err(|source| DisplayError::ProfileIo {
            path: path.clone(),
            source,
        })?;
        info!(profile = profile_name, path = %path.display(), monitors = layout.len(), "saved profile");
        Ok(path)
    }

    /// Read a profile, keeping the reason it could not be read
    pub fn try_load(&self, profile_name: &str) -> DisplayResult<Layout> {
        let path = self.path_for(profile_name)?;
        let contents = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => DisplayError::ProfileMissing {
                name: profile_name.to_string(),
                path: path.clone(),
            },
            _ => DisplayError::ProfileIo {
                path: path.clone(),
                source,
            },
        })?;
        let layout: Layout = serde_json::from_str(&contents)
            .map_err(|source| DisplayError::ProfileMalformed { path, source })?;
        info!(profile = profile_name, monitors = layout.len(), "loaded profile");
        Ok(layout)
    }

    /// Read a profile; any failure is reported and yields an empty layout
    pub fn load(&self, profile_name: &str) -> Layout {
        self.try_load(profile_name).unwrap_or_else(|e| {
            warn!(profile = profile_name, error = %e, "could not load profile");
            println!("{e}");
            Layout::new()
        })
    }

    /// Names of every stored profile, sorted
    pub fn list(&self) -> DisplayResult<Vec<String>> {
        let dir = self.config.dir();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(DisplayError::ProfileIo {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                file_name
                    .strip_prefix(config::PROFILE_PREFIX)?
                    .strip_suffix(config::PROFILE_EXTENSION)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

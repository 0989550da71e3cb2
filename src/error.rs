//! Error kinds for tool invocation and profile storage
//!
//! Nothing here is fatal on its own: callers decide whether a kind degrades
//! to an empty result (capture, load) or is reported per monitor (apply).

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to run {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {}: {stderr}", exit_label(.code))]
    ToolStatus {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("invalid profile name '{name}': must be non-empty and contain no path separators")]
    InvalidProfileName { name: String },

    #[error("no configuration file found for profile '{name}' at {}", .path.display())]
    ProfileMissing { name: String, path: PathBuf },

    #[error("error decoding JSON in the configuration file {}: {source}", .path.display())]
    ProfileMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    ProfileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not determine a configuration directory (no XDG_CONFIG_HOME or HOME)")]
    ConfigDir,
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "signal".to_string(),
    }
}

pub type DisplayResult<T> = Result<T, DisplayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_status_message_includes_code_and_stderr() {
        let err = DisplayError::ToolStatus {
            tool: "xrandr".to_string(),
            code: Some(1),
            stderr: "warning: output HDMI-9 not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "xrandr exited with exit status 1: warning: output HDMI-9 not found"
        );
    }

    #[test]
    fn test_tool_status_without_code_reports_signal() {
        let err = DisplayError::ToolStatus {
            tool: "xrandr".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_invalid_profile_name_message() {
        let err = DisplayError::InvalidProfileName {
            name: "../x".to_string(),
        };
        assert!(err.to_string().starts_with("invalid profile name '../x'"));
    }

    #[test]
    fn test_missing_profile_message_names_profile() {
        let err = DisplayError::ProfileMissing {
            name: "work".to_string(),
            path: PathBuf::from("/tmp/monitors_config_work.json"),
        };
        assert_eq!(
            err.to_string(),
            "no configuration file found for profile 'work' at /tmp/monitors_config_work.json"
        );
    }
}

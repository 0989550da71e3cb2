//! Child-process boundary to the `xrandr` tool
//!
//! The parser and the apply step only see the two traits below; tests swap
//! in canned text and recording sinks instead of a live display server.

use std::process::{Command, Stdio};
use tracing::debug;

use crate::constants::xrandr;
use crate::error::{DisplayError, DisplayResult};

/// Something that can produce the full status report of all outputs
pub trait StatusSource {
    fn query_status(&self) -> DisplayResult<String>;
}

/// Something that can execute one configuration invocation
pub trait CommandSink {
    /// `args` excludes the program name
    fn run(&mut self, args: &[String]) -> DisplayResult<()>;

    /// Program the invocations are meant for, used when echoing them
    fn program(&self) -> &str {
        xrandr::PROGRAM
    }
}

/// The real tool, run as a blocking child process
#[derive(Debug, Clone)]
pub struct Xrandr {
    program: String,
}

impl Default for Xrandr {
    fn default() -> Self {
        Self::new(xrandr::PROGRAM)
    }
}

impl Xrandr {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn execute<S: AsRef<std::ffi::OsStr>>(&self, args: &[S]) -> DisplayResult<String> {
        debug!(program = %self.program, "running display tool");
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DisplayError::ToolLaunch {
                tool: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DisplayError::ToolStatus {
                tool: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl StatusSource for Xrandr {
    fn query_status(&self) -> DisplayResult<String> {
        self.execute(&[xrandr::PROPERTIES_FLAG])
    }
}

impl CommandSink for Xrandr {
    fn run(&mut self, args: &[String]) -> DisplayResult<()> {
        self.execute(args).map(|_| ())
    }

    fn program(&self) -> &str {
        &self.program
    }
}

/// Sink that only records what would have been run
#[derive(Debug, Default)]
pub struct DryRun {
    pub invocations: Vec<Vec<String>>,
}

impl CommandSink for DryRun {
    fn run(&mut self, args: &[String]) -> DisplayResult<()> {
        self.invocations.push(args.to_vec());
        Ok(())
    }
}

/// Render an invocation the way a shell user would type it
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_launch_error() {
        let tool = Xrandr::new("/nonexistent/setdisplay-xrandr");
        let err = tool.query_status().unwrap_err();
        assert!(matches!(err, DisplayError::ToolLaunch { .. }), "got {err:?}");
    }

    #[test]
    fn test_non_zero_exit_is_status_error() {
        let mut tool = Xrandr::new("false");
        let err = tool.run(&["--output".to_string(), "DP-1".to_string()]).unwrap_err();
        assert!(matches!(err, DisplayError::ToolStatus { code: Some(1), .. }), "got {err:?}");
    }

    #[test]
    fn test_successful_run_returns_stdout() {
        let tool = Xrandr::new("echo");
        assert_eq!(tool.query_status().unwrap(), "--prop\n");
    }

    #[test]
    fn test_dry_run_records_invocations() {
        let mut sink = DryRun::default();
        sink.run(&["--output".to_string(), "HDMI-1".to_string(), "--off".to_string()]).unwrap();
        assert_eq!(sink.invocations, vec![vec!["--output", "HDMI-1", "--off"]]);
    }

    #[test]
    fn test_command_line_prefixes_program() {
        let args = vec!["--output".to_string(), "DP-1".to_string(), "--off".to_string()];
        assert_eq!(command_line(DryRun::default().program(), &args), "xrandr --output DP-1 --off");
    }

    #[test]
    fn test_command_line_uses_configured_program() {
        let sink = Xrandr::new("/opt/xorg/bin/xrandr");
        let args = vec!["--output".to_string(), "DP-1".to_string(), "--off".to_string()];
        assert_eq!(command_line(sink.program(), &args), "/opt/xorg/bin/xrandr --output DP-1 --off");
    }
}

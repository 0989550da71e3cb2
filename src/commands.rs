//! Turns a stored layout back into `xrandr` invocations

use tracing::{error, info};

use crate::constants::xrandr;
use crate::error::DisplayError;
use crate::types::{Layout, Rotation};
use crate::xrandr::{command_line, CommandSink};

/// One invocation for one connected output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCommand {
    Enable {
        output: String,
        mode: String,
        position: String,
        rotation: Rotation,
        primary: bool,
    },
    Disable {
        output: String,
    },
}

impl OutputCommand {
    pub fn output(&self) -> &str {
        match self {
            OutputCommand::Enable { output, .. } | OutputCommand::Disable { output } => output,
        }
    }

    /// Arguments passed to the tool, program name excluded
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![xrandr::OUTPUT_FLAG.to_string(), self.output().to_string()];
        match self {
            OutputCommand::Enable {
                mode,
                position,
                rotation,
                primary,
                ..
            } => {
                args.extend([
                    xrandr::MODE_FLAG.to_string(),
                    mode.clone(),
                    xrandr::POSITION_FLAG.to_string(),
                    position.clone(),
                    xrandr::ROTATE_FLAG.to_string(),
                    rotation.to_string(),
                ]);
                if *primary {
                    args.push(xrandr::PRIMARY_FLAG.to_string());
                }
            }
            OutputCommand::Disable { .. } => args.push(xrandr::OFF_FLAG.to_string()),
        }
        args
    }
}

/// One command per connected output, in layout order
pub fn synthesize(layout: &Layout) -> Vec<OutputCommand> {
    layout
        .iter()
        .filter_map(|(name, record)| {
            let state = record.state()?;
            Some(if state.active {
                OutputCommand::Enable {
                    output: name.to_string(),
                    mode: state.mode.clone(),
                    position: state.position.clone(),
                    rotation: state.rotation,
                    primary: state.primary,
                }
            } else {
                OutputCommand::Disable {
                    output: name.to_string(),
                }
            })
        })
        .collect()
}

/// Outcome of applying a layout
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub failed: Vec<(String, DisplayError)>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every command; a failing output does not stop the rest
pub fn apply_layout(layout: &Layout, sink: &mut dyn CommandSink) -> ApplyReport {
    let mut report = ApplyReport::default();
    for command in synthesize(layout) {
        let args = command.args();
        let output = command.output().to_string();
        println!("Applying configuration for {output}: {}", command_line(sink.program(), &args));
        match sink.run(&args) {
            Ok(()) => {
                info!(output = %output, "applied output configuration");
                report.applied.push(output);
            }
            Err(e) => {
                error!(output = %output, error = %e, "failed to apply configuration");
                println!("Failed to apply configuration for {output}: {e}");
                report.failed.push((output, e));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DisplayResult;
    use crate::types::{MonitorRecord, OutputState};

    fn lit(mode: &str, position: &str, primary: bool) -> MonitorRecord {
        MonitorRecord::Connected(OutputState {
            active: true,
            primary,
            mode: mode.to_string(),
            position: position.to_string(),
            ..OutputState::default()
        })
    }

    fn blanked() -> MonitorRecord {
        MonitorRecord::Connected(OutputState::default())
    }

    /// Records invocations and fails for one chosen output
    #[derive(Default)]
    struct RecordingSink {
        seen: Vec<Vec<String>>,
        fail_output: Option<&'static str>,
    }

    impl CommandSink for RecordingSink {
        fn run(&mut self, args: &[String]) -> DisplayResult<()> {
            self.seen.push(args.to_vec());
            if self.fail_output.is_some_and(|name| args.iter().any(|a| a == name)) {
                return Err(DisplayError::ToolStatus {
                    tool: "xrandr".to_string(),
                    code: Some(1),
                    stderr: "Configure crtc 1 failed".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_active_primary_output_args() {
        let mut layout = Layout::new();
        layout.insert("DP-1", lit("2560x1440", "1920x0", true));
        let args = synthesize(&layout)[0].args();
        assert_eq!(
            args,
            vec!["--output", "DP-1", "--mode", "2560x1440", "--pos", "1920x0", "--rotate", "normal", "--primary"]
        );
    }

    #[test]
    fn test_active_secondary_output_has_no_primary_flag() {
        let mut layout = Layout::new();
        layout.insert("eDP-1", lit("1920x1080", "0x0", false));
        let args = synthesize(&layout)[0].args();
        assert!(!args.contains(&"--primary".to_string()));
        assert_eq!(args.len(), 8);
    }

    #[test]
    fn test_inactive_output_is_turned_off() {
        let mut layout = Layout::new();
        layout.insert("HDMI-1", blanked());
        let commands = synthesize(&layout);
        assert_eq!(commands, vec![OutputCommand::Disable { output: "HDMI-1".to_string() }]);
        let args = commands[0].args();
        assert_eq!(args, vec!["--output", "HDMI-1", "--off"]);
        assert!(!args.contains(&"--mode".to_string()));
        assert!(!args.contains(&"--pos".to_string()));
    }

    #[test]
    fn test_disconnected_outputs_are_skipped() {
        let mut layout = Layout::new();
        layout.insert("DP-1", lit("1920x1080", "0x0", true));
        layout.insert("DP-2", MonitorRecord::Disconnected);
        layout.insert("HDMI-1", blanked());
        let outputs: Vec<String> = synthesize(&layout).iter().map(|c| c.output().to_string()).collect();
        assert_eq!(outputs, vec!["DP-1", "HDMI-1"]);
    }

    #[test]
    fn test_failure_does_not_stop_remaining_outputs() {
        let mut layout = Layout::new();
        layout.insert("DP-1", lit("1920x1080", "0x0", true));
        layout.insert("DP-2", lit("1920x1080", "1920x0", false));
        layout.insert("HDMI-1", blanked());
        let mut sink = RecordingSink {
            fail_output: Some("DP-2"),
            ..RecordingSink::default()
        };

        let report = apply_layout(&layout, &mut sink);
        assert_eq!(sink.seen.len(), 3);
        assert_eq!(report.applied, vec!["DP-1", "HDMI-1"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "DP-2");
        assert!(!report.is_success());
    }

    #[test]
    fn test_empty_layout_is_a_no_op() {
        let mut sink = RecordingSink::default();
        let report = apply_layout(&Layout::new(), &mut sink);
        assert!(sink.seen.is_empty());
        assert!(report.is_success());
    }
}

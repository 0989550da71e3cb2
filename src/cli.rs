use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::constants::config;

#[derive(Parser, Debug)]
#[command(name = "setdisplay")]
#[command(about = "SetDisplay: Manage monitor configurations")]
#[command(version)]
#[command(group(ArgGroup::new("action").args(["save", "apply", "list"])))]
pub struct Cli {
    /// Save the current monitor configuration
    #[arg(long)]
    pub save: bool,

    /// Apply a saved monitor configuration
    #[arg(long)]
    pub apply: bool,

    /// List saved profiles
    #[arg(long)]
    pub list: bool,

    /// Profile name
    #[arg(long, default_value = config::DEFAULT_PROFILE)]
    pub profile: String,

    /// Print the xrandr commands instead of running them
    #[arg(long, conflicts_with_all = ["save", "list"])]
    pub dry_run: bool,

    /// Directory holding profile files (defaults to $XDG_CONFIG_HOME/SetDisplay)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    Apply,
    List,
}

impl Cli {
    /// The requested action; `None` means usage should be printed
    pub fn action(&self) -> Option<Action> {
        if self.save {
            Some(Action::Save)
        } else if self.apply {
            Some(Action::Apply)
        } else if self.list {
            Some(Action::List)
        } else {
            None
        }
    }
}

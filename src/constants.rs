//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// External display-configuration tool
pub mod xrandr {
    /// Program invoked for both the status query and apply commands
    pub const PROGRAM: &str = "xrandr";

    /// Flag that makes the status report include output properties and EDID
    pub const PROPERTIES_FLAG: &str = "--prop";

    pub const OUTPUT_FLAG: &str = "--output";
    pub const MODE_FLAG: &str = "--mode";
    pub const POSITION_FLAG: &str = "--pos";
    pub const ROTATE_FLAG: &str = "--rotate";
    pub const PRIMARY_FLAG: &str = "--primary";
    pub const OFF_FLAG: &str = "--off";
}

/// Profile storage layout
pub mod config {
    /// Directory created under the per-user configuration root
    pub const APP_DIR: &str = "SetDisplay";

    /// Profile files are named `<prefix><profile><extension>`
    pub const PROFILE_PREFIX: &str = "monitors_config_";
    pub const PROFILE_EXTENSION: &str = ".json";

    /// Profile used when none is given on the command line
    pub const DEFAULT_PROFILE: &str = "default";

    /// Indentation of saved profile documents
    pub const JSON_INDENT: &[u8] = b"    ";
}

/// Values filled in for properties missing from a connected output block
pub mod defaults {
    /// Sentinel mode for a connected output with no mode driving it
    pub const UNKNOWN_MODE: &str = "Unknown";

    /// Mode reported for a blanked output; treated as inactive
    pub const ZERO_MODE: &str = "0x0";

    pub const POSITION: &str = "0x0";
    pub const TEAR_FREE: &str = "auto";
    pub const COLORSPACE: &str = "Default";
    pub const BPC: u32 = 8;
    pub const SCALING_MODE: &str = "None";
    pub const REFRESH_RATE: f64 = 60.0;
}

//! `xrandr --prop` status report parser
//!
//! The report is a flat list of lines. Each output starts with an unindented
//! header (`DP-1 connected primary 1920x1080+0+0 ...`); everything indented
//! below it belongs to that output until the next header. The parser walks
//! the lines once through a `StatusAccumulator`, which flushes a finished
//! record every time a new header (or the end of input) is reached.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::types::{is_active_mode, Layout, MonitorRecord, OutputState, Rotation};
use crate::xrandr::StatusSource;

/// `<name> connected|disconnected|unknown connection` at the start of a line
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(connected|disconnected|unknown connection)\b").expect("header pattern")
});

static PRIMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+primary\b").expect("primary pattern"));

/// First `WIDTHxHEIGHT` followed by a position, whitespace or end of line.
/// Excludes mode ids such as `(0x4a)`.
static MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+x\d+)(?:[+\s]|$)").expect("mode pattern"));

static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+(\d+)\+(\d+)").expect("position pattern"));

/// Current rotation, printed between the geometry and the capability list.
/// xrandr omits it when the rotation is normal.
static ROTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+x\d+\+\d+\+\d+\s+(?:\(0x[0-9a-fA-F]+\)\s+)?(normal|left|inverted|right)\b")
        .expect("rotation pattern")
});

/// Rate of the mode currently in use, e.g. `60.00*+`
static REFRESH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+)\*").expect("refresh pattern"));

/// Indented `label: value` property line
static PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+([A-Za-z][A-Za-z0-9 _-]*?):\s*(.*?)\s*$").expect("property pattern")
});

const IDENTIFIER_LABEL: &str = "EDID";

/// Connection line fields, before default filling
#[derive(Debug, Default, PartialEq)]
struct HeaderFields {
    primary: bool,
    mode: Option<String>,
    position: Option<(u32, u32)>,
    rotation: Option<String>,
}

fn parse_header(rest: &str) -> HeaderFields {
    HeaderFields {
        primary: PRIMARY.is_match(rest),
        mode: MODE.captures(rest).map(|c| c[1].to_string()),
        position: POSITION.captures(rest).and_then(|c| Some((c[1].parse().ok()?, c[2].parse().ok()?))),
        rotation: ROTATION.captures(rest).map(|c| c[1].to_string()),
    }
}

impl HeaderFields {
    fn into_state(self) -> OutputState {
        let mut state = OutputState {
            primary: self.primary,
            ..OutputState::default()
        };
        if let Some(rotation) = self.rotation.and_then(|r| r.parse().ok()) {
            state.rotation = rotation;
        }
        if let Some(mode) = self.mode {
            state.mode = match state.rotation {
                // Header geometry is post-rotation; `--mode` wants the panel's own size
                Rotation::Left | Rotation::Right => unrotated_mode(&mode),
                Rotation::Normal | Rotation::Inverted => mode,
            };
        }
        if let Some((x, y)) = self.position {
            state.position = format!("{x}x{y}");
        }
        state.active = is_active_mode(&state.mode);
        state
    }
}

/// `WxH` → `HxW`
fn unrotated_mode(mode: &str) -> String {
    match mode.split_once('x') {
        Some((width, height)) => format!("{height}x{width}"),
        None => mode.to_string(),
    }
}

/// Trimmed content of an indented line made only of hex digits
fn hex_run(line: &str) -> Option<&str> {
    if !line.starts_with([' ', '\t']) {
        return None;
    }
    let trimmed = line.trim();
    (!trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_hexdigit())).then_some(trimmed)
}

/// Block currently being read
#[derive(Debug)]
enum Pending {
    Connected {
        name: String,
        state: OutputState,
        identifier: String,
        collecting_identifier: bool,
    },
    Disconnected {
        name: String,
    },
    /// `unknown connection` outputs (virtual heads) are not recorded
    Skipped,
}

/// Line-by-line state machine building a `Layout`
#[derive(Debug, Default)]
pub struct StatusAccumulator {
    layout: Layout,
    current: Option<Pending>,
}

impl StatusAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of the report
    pub fn feed(&mut self, line: &str) {
        if let Some(caps) = HEADER.captures(line) {
            self.flush();
            let name = caps[1].to_string();
            let rest = &line[caps.get(0).map_or(0, |m| m.end())..];
            self.current = Some(match &caps[2] {
                "connected" => Pending::Connected {
                    name,
                    state: parse_header(rest).into_state(),
                    identifier: String::new(),
                    collecting_identifier: false,
                },
                "disconnected" => Pending::Disconnected { name },
                _ => {
                    debug!(output = %name, "skipping output with unknown connection state");
                    Pending::Skipped
                }
            });
            return;
        }

        // Lines before the first header ("Screen 0: ...") and inside
        // disconnected blocks carry nothing we keep.
        let Some(Pending::Connected {
            state,
            identifier,
            collecting_identifier,
            ..
        }) = self.current.as_mut()
        else {
            return;
        };

        if *collecting_identifier {
            if let Some(hex) = hex_run(line) {
                identifier.push_str(hex);
                return;
            }
            *collecting_identifier = false;
        }

        if let Some(caps) = REFRESH.captures(line) {
            if let Ok(rate) = caps[1].parse() {
                state.refresh_rate = rate;
            }
        }

        if let Some(caps) = PROPERTY.captures(line) {
            let label = &caps[1];
            if label == IDENTIFIER_LABEL {
                identifier.clear();
                *collecting_identifier = true;
                return;
            }
            apply_property(state, label, &caps[2]);
        }
    }

    /// Move the in-progress block into the layout
    fn flush(&mut self) {
        match self.current.take() {
            Some(Pending::Connected {
                name,
                mut state,
                identifier,
                ..
            }) => {
                state.edid = identifier;
                debug!(output = %name, mode = %state.mode, position = %state.position, active = state.active, "parsed connected output");
                self.layout.insert(name, MonitorRecord::Connected(state));
            }
            Some(Pending::Disconnected { name }) => {
                debug!(output = %name, "parsed disconnected output");
                self.layout.insert(name, MonitorRecord::Disconnected);
            }
            Some(Pending::Skipped) | None => {}
        }
    }

    /// Flush the last block and return the collected layout
    pub fn finish(mut self) -> Layout {
        self.flush();
        self.layout
    }
}

/// Single-line properties of a connected output
fn apply_property(state: &mut OutputState, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    match label {
        "Colorspace" => state.colorspace = value.to_string(),
        "max bpc" => match value.parse() {
            Ok(bpc) => state.bpc = bpc,
            Err(_) => debug!(value, "ignoring unparsable max bpc"),
        },
        "non-desktop" => match value.parse::<u8>() {
            Ok(flag) => state.non_desktop = flag != 0,
            Err(_) => debug!(value, "ignoring unparsable non-desktop flag"),
        },
        "scaling mode" => state.scaling_mode = value.to_string(),
        "TearFree" => state.tear_free = value.to_string(),
        _ => {}
    }
}

/// Parse a complete status report
pub fn parse_status(text: &str) -> Layout {
    let mut accumulator = StatusAccumulator::new();
    for line in text.lines() {
        accumulator.feed(line);
    }
    accumulator.finish()
}

/// Query the status source and parse its report.
/// A failed query degrades to an empty layout.
pub fn capture_layout(source: &dyn StatusSource) -> Layout {
    match source.query_status() {
        Ok(text) => parse_status(&text),
        Err(e) => {
            warn!(error = %e, "could not read display status, continuing with no monitors");
            Layout::new()
        }
    }
}

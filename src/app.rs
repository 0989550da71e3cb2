//! The two end-to-end flows: capture-and-save, load-and-apply

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::commands::{apply_layout, ApplyReport};
use crate::persistence::ProfileStore;
use crate::status::capture_layout;
use crate::xrandr::{CommandSink, StatusSource};

/// Query the current layout and store it under `profile`
pub fn capture_and_save(source: &dyn StatusSource, store: &ProfileStore, profile: &str) -> Result<PathBuf> {
    let layout = capture_layout(source);
    if layout.is_empty() {
        warn!(profile, "no outputs captured, saving an empty profile");
    } else {
        info!(
            profile,
            outputs = ?layout.names().collect::<Vec<_>>(),
            connected = layout.connected_count(),
            "captured layout"
        );
    }
    let path = store
        .save(&layout, profile)
        .with_context(|| format!("Failed to save profile '{profile}'"))?;
    println!("Configuration saved to {}", path.display());
    Ok(path)
}

/// Replay a stored profile through `sink`
pub fn load_and_apply(store: &ProfileStore, profile: &str, sink: &mut dyn CommandSink) -> ApplyReport {
    let layout = store.load(profile);
    let report = apply_layout(&layout, sink);
    if report.is_success() {
        info!(profile, outputs = report.applied.len(), "profile applied");
    } else {
        warn!(
            profile,
            applied = report.applied.len(),
            failed = report.failed.len(),
            "profile applied partially"
        );
    }
    report
}

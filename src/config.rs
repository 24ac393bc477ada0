//! Editor tuning parsed from environment variables.
//!
//! Every knob has a default in [`crate::consts`]; unset or unparsable
//! variables fall back to it.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{
    COMPACT_TOP_MARGIN_PX, HISTORY_LIMIT, MIN_STRUCTURE_PX, PASTE_OFFSET_PX, SEAT_SIZE_PX, SNAP_THRESHOLD_PX,
};

/// Tuning knobs for the layout editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Per-axis snapping distance for the alignment engine.
    pub snap_threshold_px: f64,
    /// Translation applied on paste.
    pub paste_offset_px: f64,
    /// Minimum width and height of a drag-created structure.
    pub min_structure_px: f64,
    /// Top margin used by compact fit-and-center.
    pub compact_top_margin_px: f64,
    /// Edge length of a newly added seat.
    pub seat_size_px: f64,
    /// Maximum retained undo snapshots.
    pub history_limit: usize,
    /// Snap dirty elements onto clean anchors after every move or create.
    pub auto_align: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold_px: SNAP_THRESHOLD_PX,
            paste_offset_px: PASTE_OFFSET_PX,
            min_structure_px: MIN_STRUCTURE_PX,
            compact_top_margin_px: COMPACT_TOP_MARGIN_PX,
            seat_size_px: SEAT_SIZE_PX,
            history_limit: HISTORY_LIMIT,
            auto_align: true,
        }
    }
}

impl EditorConfig {
    /// Build the config from environment variables.
    ///
    /// - `LAYOUT_SNAP_THRESHOLD_PX` (default 30)
    /// - `LAYOUT_PASTE_OFFSET_PX` (default 20)
    /// - `LAYOUT_MIN_STRUCTURE_PX` (default 20)
    /// - `LAYOUT_COMPACT_TOP_MARGIN_PX` (default 30)
    /// - `LAYOUT_SEAT_SIZE_PX` (default 72)
    /// - `LAYOUT_HISTORY_LIMIT` (default 100)
    /// - `LAYOUT_AUTO_ALIGN` (default true)
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            snap_threshold_px: positive(
                env_parse("LAYOUT_SNAP_THRESHOLD_PX", defaults.snap_threshold_px),
                defaults.snap_threshold_px,
            ),
            paste_offset_px: env_parse("LAYOUT_PASTE_OFFSET_PX", defaults.paste_offset_px),
            min_structure_px: positive(
                env_parse("LAYOUT_MIN_STRUCTURE_PX", defaults.min_structure_px),
                defaults.min_structure_px,
            ),
            compact_top_margin_px: env_parse("LAYOUT_COMPACT_TOP_MARGIN_PX", defaults.compact_top_margin_px),
            seat_size_px: positive(
                env_parse("LAYOUT_SEAT_SIZE_PX", defaults.seat_size_px),
                defaults.seat_size_px,
            ),
            history_limit: env_parse("LAYOUT_HISTORY_LIMIT", defaults.history_limit),
            auto_align: env_parse("LAYOUT_AUTO_ALIGN", defaults.auto_align),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(v) => v.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

fn positive(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { default }
}

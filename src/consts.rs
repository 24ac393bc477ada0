//! Shared numeric constants for the layout editor.

// ── Alignment ───────────────────────────────────────────────────

/// Maximum per-axis distance, in scene pixels, at which a dirty element
/// snaps onto a clean anchor.
pub const SNAP_THRESHOLD_PX: f64 = 30.0;

// ── Clipboard ───────────────────────────────────────────────────

/// Translation applied to pasted elements relative to the copied ones.
pub const PASTE_OFFSET_PX: f64 = 20.0;

// ── Creation ────────────────────────────────────────────────────

/// A drag-created structure must exceed this size on both axes.
pub const MIN_STRUCTURE_PX: f64 = 20.0;

/// Default edge length of a newly added seat.
pub const SEAT_SIZE_PX: f64 = 72.0;

/// Prefix for synthesized structure labels (`STR_` + 8 hex chars).
pub const STRUCTURE_LABEL_PREFIX: &str = "STR_";

/// Prefix for locally generated, not-yet-persisted element ids.
pub const LOCAL_ID_PREFIX: &str = "tmp-";

// ── Viewport ────────────────────────────────────────────────────

/// Top margin used when fitting content in compact (mobile) mode.
pub const COMPACT_TOP_MARGIN_PX: f64 = 30.0;

// ── Labels ──────────────────────────────────────────────────────

/// Padding between a seat's top-left corner and its number label.
pub const SEAT_LABEL_PADDING_PX: f64 = 6.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the selection box top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Rotation step applied while Shift is held during a rotate gesture.
pub const ROTATION_STEP_DEG: f64 = 15.0;

// ── History ─────────────────────────────────────────────────────

/// Default number of undo snapshots retained.
pub const HISTORY_LIMIT: usize = 100;

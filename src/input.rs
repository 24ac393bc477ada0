//! Input model: modifier keys, mouse buttons, keys, and the gesture state
//! machine.
//!
//! `InputState` is the active gesture between pointer-down and pointer-up (or,
//! for label editing, between double-click and commit). Each variant carries
//! the context needed to compute deltas and to finalize the edit on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::element::{ElementId, Geometry};
use crate::geometry::{Bounds, Point};
use crate::hit::{ResizeAnchor, SelectionFrame};

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Case-insensitive comparison against a key name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// What a pointer-down on empty canvas does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Select and manipulate elements; empty-canvas drags pan.
    #[default]
    Select,
    /// The next drag draws a new structure.
    CreateStructure,
}

/// Geometry of one element at the start of a gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Original {
    pub id: ElementId,
    pub geometry: Geometry,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging empty canvas to pan the view.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// Shift-dragging on empty canvas to select everything the box touches.
    RubberBand {
        /// Scene-space corner where the drag started.
        start_scene: Point,
        /// Scene-space pointer position.
        current_scene: Point,
    },
    /// Drawing a new structure while creation mode is armed.
    CreatingStructure {
        /// Scene-space corner where the drag started.
        start_scene: Point,
        /// Scene-space pointer position.
        current_scene: Point,
    },
    /// Moving the selection.
    Moving {
        /// Scene-space pointer position at pointer-down.
        start_scene: Point,
        /// Member geometry at pointer-down.
        originals: Vec<Original>,
        /// Whether the pre-move history snapshot has been taken.
        snapshotted: bool,
    },
    /// Resizing the selection from one of its handles.
    Resizing {
        /// Which handle is being dragged.
        anchor: ResizeAnchor,
        /// Selection frame at pointer-down.
        frame: SelectionFrame,
        /// Member geometry at pointer-down.
        originals: Vec<Original>,
        /// Applied scale along the frame's width.
        scale_x: f64,
        /// Applied scale along the frame's height.
        scale_y: f64,
        /// Whether the pre-resize history snapshot has been taken.
        snapshotted: bool,
    },
    /// Rotating a single element around its center.
    Rotating {
        id: ElementId,
        /// Rotation pivot in scene space.
        center: Point,
        /// Pointer angle (degrees) at pointer-down.
        start_angle: f64,
        /// Element rotation at pointer-down.
        orig_rotation: f64,
        /// Whether the pre-rotate history snapshot has been taken.
        snapshotted: bool,
    },
    /// Typing directly into an element's label.
    EditingLabel {
        id: ElementId,
        /// Text typed so far.
        draft: String,
    },
}

impl InputState {
    /// Whether a text field currently owns the keyboard.
    #[must_use]
    pub fn is_editing_text(&self) -> bool {
        matches!(self, Self::EditingLabel { .. })
    }

    /// Drag rectangle for rubber-band selection or structure creation.
    #[must_use]
    pub fn drag_rect(&self) -> Option<Bounds> {
        match self {
            Self::RubberBand { start_scene, current_scene }
            | Self::CreatingStructure { start_scene, current_scene } => {
                Some(Bounds::from_corners(*start_scene, *current_scene))
            }
            _ => None,
        }
    }
}

//! Spatial layout editor for study-hall seat plans.
//!
//! This crate owns the editing core of the seat-plan designer: placing,
//! resizing, rotating and labelling seats and structural blocks on a pannable
//! canvas, with undo, clipboard, auto-alignment, and diff-based persistence
//! against a remote store. The host UI layer is responsible only for wiring
//! pointer and keyboard events to [`engine::EditorCore`], drawing the scene,
//! and answering the [`engine::Action`]s it returns (label prompts, cursor
//! changes, redraws).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level editor core and the pointer/keyboard state machine |
//! | [`element`] | Seat/structure model, ids, and transform baking |
//! | [`scene`] | In-memory scene store and pending-deletion set |
//! | [`viewport`] | Pan transform, coordinate conversion, fit-and-center |
//! | [`input`] | Input event types and gesture states |
//! | [`hit`] | Hit-testing against elements and selection handles |
//! | [`history`] | Snapshot-based undo stack |
//! | [`clipboard`] | Copy/paste with identity regeneration |
//! | [`align`] | Nearest-anchor snapping of dirty elements |
//! | [`geometry`] | Pure bounding-box and transform helpers |
//! | [`store`] | Remote store collaborator trait, wire type, in-memory store |
//! | [`persistence`] | Load and diffing save against a [`store::LayoutStore`] |
//! | [`config`] | Environment-driven editor tuning |
//! | [`consts`] | Shared numeric defaults |

pub mod align;
pub mod clipboard;
pub mod config;
pub mod consts;
pub mod element;
pub mod engine;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod persistence;
pub mod scene;
pub mod store;
pub mod viewport;

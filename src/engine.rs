//! Editor core: the pointer/keyboard state machine and every editing
//! operation, wired over the scene, viewport, history, clipboard and
//! alignment engine.
//!
//! Each handler returns a list of [`Action`]s for the host: redraw, cursor
//! changes, and label prompts. Every handler that is about to change element
//! geometry or labels snapshots the scene first; panning and pure selection
//! never do.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;

use crate::align::align_scene;
use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::consts::ROTATION_STEP_DEG;
use crate::element::{ElementId, ElementKind, Geometry, LayoutElement, synth_structure_label, try_bake_transform};
use crate::geometry::{Bounds, Point, Size};
use crate::history::History;
use crate::hit::{
    Hit, ResizeAnchor, SelectionFrame, elements_in_rect, hit_test, rotate_handle_point, selection_frame,
};
use crate::input::{Button, InputState, Key, Mode, Modifiers, Original};
use crate::scene::{ElementPatch, SceneStore};
use crate::viewport::Viewport;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The scene or overlay changed; redraw.
    RenderNeeded,
    /// Show this CSS cursor.
    SetCursor(String),
    /// Ask the user for a label; answer with [`EditorCore::set_label`].
    LabelRequested { id: ElementId, current: String },
    /// Inline label editing began; show a text caret on the element.
    LabelEditStarted { id: ElementId, text: String },
    /// Inline label editing ended (committed or cancelled).
    LabelEditEnded { id: ElementId },
    /// The selection changed.
    SelectionChanged(Vec<ElementId>),
}

/// All editor state. Free of any rendering or browser dependency.
pub struct EditorCore {
    pub scene: SceneStore,
    pub viewport: Viewport,
    pub history: History,
    pub clipboard: Clipboard,
    pub input: InputState,
    pub mode: Mode,
    pub selection: Vec<ElementId>,
    pub config: EditorConfig,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        let viewport = Viewport { top_margin: config.compact_top_margin_px, ..Viewport::default() };
        Self {
            scene: SceneStore::new(),
            viewport,
            history: History::new(config.history_limit),
            clipboard: Clipboard::new(),
            input: InputState::Idle,
            mode: Mode::Select,
            selection: Vec::new(),
            config,
        }
    }

    // --- Data inputs ---

    /// Replace the scene with freshly loaded (clean) elements and recenter.
    ///
    /// Undo history is dropped: its snapshots refer to ids the store may
    /// have just replaced.
    pub fn load_elements(&mut self, elements: Vec<LayoutElement>) {
        self.scene.load(elements);
        self.history.clear();
        self.selection.clear();
        self.input = InputState::Idle;
        self.viewport.fit(self.scene.all());
        debug!(elements = self.scene.len(), "scene loaded");
    }

    // --- Viewport ---

    /// Host viewport resized: store the size and refit the content.
    pub fn set_viewport_size(&mut self, size: Size) -> Vec<Action> {
        self.viewport.size = size;
        self.viewport.fit(self.scene.all());
        vec![Action::RenderNeeded]
    }

    /// Switch compact (top-aligned) rendering and refit.
    pub fn set_compact(&mut self, compact: bool) -> Vec<Action> {
        self.viewport.compact = compact;
        self.viewport.fit(self.scene.all());
        vec![Action::RenderNeeded]
    }

    // --- Modes / commands ---

    /// Arm or disarm structure creation.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Add a seat with the next sequential number. Defaults to the center of
    /// the visible area. Returns the new seat's id.
    pub fn add_seat(&mut self, at: Option<Point>) -> ElementId {
        let size = self.config.seat_size_px;
        let origin = at.unwrap_or_else(|| {
            let c = self
                .viewport
                .screen_to_scene(Point::new(self.viewport.size.width / 2.0, self.viewport.size.height / 2.0));
            Point::new(c.x - size / 2.0, c.y - size / 2.0)
        });
        let geometry = Geometry::new(origin.x, origin.y, size, size);
        let seat = LayoutElement::new_seat(geometry, self.scene.next_seat_number());
        let id = seat.id.clone();

        self.history.snapshot(&self.scene);
        self.scene.add(seat);
        self.auto_align(&[id.clone()]);
        self.selection = vec![id.clone()];
        debug!(%id, "seat added");
        id
    }

    /// Apply a label answered from a [`Action::LabelRequested`] prompt.
    /// Blank labels and unknown ids are ignored.
    pub fn set_label(&mut self, id: &ElementId, text: &str) -> Vec<Action> {
        let Some(element) = self.scene.get(id) else {
            return Vec::new();
        };
        let text = text.trim();
        if text.is_empty() || element.label() == text {
            return Vec::new();
        }
        self.history.snapshot(&self.scene);
        self.scene.update(id, &ElementPatch::label(text));
        vec![Action::RenderNeeded]
    }

    /// Switch an element between seat and structure.
    pub fn convert_kind(&mut self, id: &ElementId, kind: ElementKind) -> Vec<Action> {
        if self.scene.get(id).is_none_or(|e| e.kind() == kind) {
            return Vec::new();
        }
        self.history.snapshot(&self.scene);
        self.scene.convert_kind(id, kind);
        let mut actions = vec![Action::RenderNeeded];
        if kind == ElementKind::Structure {
            actions.extend(self.label_request(id));
        }
        actions
    }

    /// Delete the selection. Persisted elements are queued for deletion on save.
    pub fn delete_selection(&mut self) -> Vec<Action> {
        self.prune_selection();
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.history.snapshot(&self.scene);
        let removed = self.scene.remove(&self.selection);
        self.selection.clear();
        debug!(removed, pending = self.scene.deleted().len(), "selection deleted");
        vec![Action::SelectionChanged(Vec::new()), Action::RenderNeeded]
    }

    /// Restore the scene to the last snapshot.
    pub fn undo(&mut self) -> Vec<Action> {
        if !self.history.undo(&mut self.scene) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        self.prune_selection();
        vec![Action::SelectionChanged(self.selection.clone()), Action::RenderNeeded]
    }

    /// Copy the selection to the clipboard.
    pub fn copy(&mut self) -> usize {
        self.clipboard.copy(&self.scene, &self.selection)
    }

    /// Paste the clipboard as new elements and select them.
    pub fn paste(&mut self) -> Vec<Action> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        self.history.snapshot(&self.scene);
        let pasted = self.clipboard.paste(&self.scene, self.config.paste_offset_px);

        let mut actions = Vec::new();
        let mut ids = Vec::with_capacity(pasted.len());
        for element in pasted {
            let id = element.id.clone();
            let kind = element.kind();
            if !self.scene.add(element) {
                continue;
            }
            if kind == ElementKind::Structure {
                actions.extend(self.label_request(&id));
            }
            ids.push(id);
        }
        debug!(count = ids.len(), "pasted");
        self.selection.clone_from(&ids);
        actions.insert(0, Action::SelectionChanged(ids));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Snap every dirty element onto its nearest clean anchors.
    pub fn align_dirty(&mut self) -> usize {
        let before = self.scene.clone();
        let moved = align_scene(&mut self.scene, None, self.config.snap_threshold_px);
        if moved > 0 {
            self.history.snapshot(&before);
        }
        moved
    }

    /// Renumber seats in reading order.
    pub fn reorder_seats(&mut self) -> usize {
        let before = self.scene.clone();
        let changed = self.scene.reorder_seats();
        if changed > 0 {
            self.history.snapshot(&before);
        }
        changed
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.is_editing_text() {
            actions.extend(self.commit_label_edit());
        }
        let world = self.viewport.screen_to_scene(screen_pt);

        match button {
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen_pt };
                actions.push(Action::SetCursor("grabbing".into()));
                return actions;
            }
            Button::Secondary => return actions,
            Button::Primary => {}
        }

        if self.mode == Mode::CreateStructure {
            self.input = InputState::CreatingStructure { start_scene: world, current_scene: world };
            actions.push(Action::RenderNeeded);
            return actions;
        }

        self.prune_selection();
        match hit_test(world, &self.scene, &self.viewport, &self.selection) {
            Some(Hit::ResizeHandle(anchor)) => {
                if let Some(frame) = selection_frame(&self.scene, &self.selection) {
                    self.input = InputState::Resizing {
                        anchor,
                        frame,
                        originals: self.originals(),
                        scale_x: 1.0,
                        scale_y: 1.0,
                        snapshotted: false,
                    };
                    actions.push(Action::SetCursor(anchor.turned(frame.rotation_degrees).cursor().into()));
                }
            }
            Some(Hit::RotateHandle) => {
                if let Some(element) = self.selection.first().and_then(|id| self.scene.get(id)) {
                    let center = element.geometry.center();
                    self.input = InputState::Rotating {
                        id: element.id.clone(),
                        center,
                        start_angle: angle_deg(center, world),
                        orig_rotation: element.geometry.rotation_degrees,
                        snapshotted: false,
                    };
                    actions.push(Action::SetCursor("grabbing".into()));
                }
            }
            Some(Hit::Element(id)) => {
                if modifiers.shift {
                    if let Some(pos) = self.selection.iter().position(|s| s == &id) {
                        self.selection.remove(pos);
                    } else {
                        self.selection.push(id);
                    }
                    actions.push(Action::SelectionChanged(self.selection.clone()));
                    actions.push(Action::RenderNeeded);
                    return actions;
                }
                if !self.selection.contains(&id) {
                    self.selection = vec![id];
                    actions.push(Action::SelectionChanged(self.selection.clone()));
                }
                self.input = InputState::Moving { start_scene: world, originals: self.originals(), snapshotted: false };
                actions.push(Action::SetCursor("move".into()));
                actions.push(Action::RenderNeeded);
            }
            None => {
                if modifiers.shift {
                    self.input = InputState::RubberBand { start_scene: world, current_scene: world };
                } else {
                    if !self.selection.is_empty() {
                        self.selection.clear();
                        actions.push(Action::SelectionChanged(Vec::new()));
                    }
                    self.input = InputState::Panning { last_screen: screen_pt };
                    actions.push(Action::SetCursor("grabbing".into()));
                }
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.viewport.screen_to_scene(screen_pt);
        let mut state = std::mem::take(&mut self.input);

        let actions = match &mut state {
            InputState::Idle => vec![Action::SetCursor(self.hover_cursor(world).into())],
            InputState::EditingLabel { .. } => Vec::new(),
            InputState::Panning { last_screen } => {
                self.viewport.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                vec![Action::RenderNeeded]
            }
            InputState::RubberBand { current_scene, .. } | InputState::CreatingStructure { current_scene, .. } => {
                *current_scene = world;
                vec![Action::RenderNeeded]
            }
            InputState::Moving { start_scene, originals, snapshotted } => {
                let dx = world.x - start_scene.x;
                let dy = world.y - start_scene.y;
                if dx.abs() < f64::EPSILON && dy.abs() < f64::EPSILON {
                    Vec::new()
                } else {
                    self.snapshot_once(snapshotted);
                    for o in originals.iter() {
                        self.scene.update(&o.id, &ElementPatch::position(o.geometry.x + dx, o.geometry.y + dy));
                    }
                    vec![Action::RenderNeeded]
                }
            }
            InputState::Resizing { anchor, frame, originals, scale_x, scale_y, snapshotted } => {
                let local = frame.to_local(world);
                let handle = anchor.handle_point(&frame.rect);
                let fixed = anchor.opposite_point(&frame.rect);
                let sx = if anchor.scales_x() { (local.x - fixed.x) / (handle.x - fixed.x) } else { 1.0 };
                let sy = if anchor.scales_y() { (local.y - fixed.y) / (handle.y - fixed.y) } else { 1.0 };
                if sx.is_finite() && sy.is_finite() && sx > 0.0 && sy > 0.0 {
                    self.snapshot_once(snapshotted);
                    *scale_x = sx;
                    *scale_y = sy;
                    self.apply_resize(originals.as_slice(), frame, *anchor, sx, sy);
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            InputState::Rotating { id, center, start_angle, orig_rotation, snapshotted } => {
                let mut rotation = *orig_rotation + angle_deg(*center, world) - *start_angle;
                if modifiers.shift {
                    rotation = (rotation / ROTATION_STEP_DEG).round() * ROTATION_STEP_DEG;
                }
                let rotation = rotation.rem_euclid(360.0);
                let current = self.scene.get(id).map(|e| e.geometry.rotation_degrees);
                if current.is_none_or(|r| (r - rotation).abs() < f64::EPSILON) {
                    Vec::new()
                } else {
                    self.snapshot_once(snapshotted);
                    let patch = ElementPatch { rotation_degrees: Some(rotation), ..Default::default() };
                    self.scene.update(id, &patch);
                    vec![Action::RenderNeeded]
                }
            }
        };

        self.input = state;
        actions
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.viewport.screen_to_scene(screen_pt);
        let state = std::mem::take(&mut self.input);

        match state {
            InputState::Idle | InputState::Panning { .. } | InputState::Rotating { .. } => {
                vec![Action::SetCursor("default".into())]
            }
            InputState::EditingLabel { .. } => {
                self.input = state;
                Vec::new()
            }
            InputState::RubberBand { start_scene, .. } => {
                let rect = Bounds::from_corners(start_scene, world);
                for id in elements_in_rect(&self.scene, &rect) {
                    if !self.selection.contains(&id) {
                        self.selection.push(id);
                    }
                }
                vec![Action::SelectionChanged(self.selection.clone()), Action::RenderNeeded]
            }
            InputState::CreatingStructure { start_scene, .. } => {
                let rect = Bounds::from_corners(start_scene, world);
                let mut actions = self.finish_structure(&rect);
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::Moving { originals, snapshotted, .. } => {
                if snapshotted {
                    let ids: Vec<ElementId> = originals.into_iter().map(|o| o.id).collect();
                    self.auto_align(&ids);
                }
                vec![Action::SetCursor("default".into()), Action::RenderNeeded]
            }
            InputState::Resizing { anchor, frame, originals, scale_x, scale_y, snapshotted } => {
                if snapshotted {
                    self.apply_resize(&originals, &frame, anchor, scale_x, scale_y);
                }
                vec![Action::SetCursor("default".into()), Action::RenderNeeded]
            }
        }
    }

    /// Double-click: start inline label editing on the element under the pointer.
    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.is_editing_text() {
            actions.extend(self.commit_label_edit());
        }
        let world = self.viewport.screen_to_scene(screen_pt);
        let Some(element) = self.scene.all().iter().rev().find(|e| e.geometry.contains(world)) else {
            return actions;
        };
        let id = element.id.clone();
        let text = element.label().to_string();
        self.input = InputState::EditingLabel { id: id.clone(), draft: text.clone() };
        self.selection = vec![id.clone()];
        actions.push(Action::SelectionChanged(self.selection.clone()));
        actions.push(Action::LabelEditStarted { id, text });
        actions
    }

    /// Typed text while a label is being edited.
    pub fn on_text_input(&mut self, text: &str) -> Vec<Action> {
        let InputState::EditingLabel { draft, .. } = &mut self.input else {
            return Vec::new();
        };
        draft.push_str(text);
        vec![Action::RenderNeeded]
    }

    /// Keyboard shortcuts. `text_focus` is true while a host text field owns
    /// the keyboard; shortcuts are suppressed then.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers, text_focus: bool) -> Vec<Action> {
        if self.input.is_editing_text() {
            return self.on_label_key(&key);
        }
        if text_focus {
            return Vec::new();
        }

        if modifiers.command() {
            if key.is("z") {
                return self.undo();
            }
            if key.is("c") {
                self.copy();
                return Vec::new();
            }
            if key.is("v") {
                return self.paste();
            }
            return Vec::new();
        }

        if key.is("Delete") || key.is("Backspace") {
            return self.delete_selection();
        }
        if key.is("Escape") {
            self.input = InputState::Idle;
            self.mode = Mode::Select;
            if !self.selection.is_empty() {
                self.selection.clear();
                return vec![Action::SelectionChanged(Vec::new()), Action::RenderNeeded];
            }
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    fn on_label_key(&mut self, key: &Key) -> Vec<Action> {
        if key.is("Enter") {
            return self.commit_label_edit();
        }
        if key.is("Escape") {
            return self.cancel_label_edit();
        }
        if key.is("Backspace") {
            if let InputState::EditingLabel { draft, .. } = &mut self.input {
                draft.pop();
            }
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    /// Leave inline editing, writing the draft back to the element.
    pub fn commit_label_edit(&mut self) -> Vec<Action> {
        if !self.input.is_editing_text() {
            return Vec::new();
        }
        let InputState::EditingLabel { id, draft } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        let mut actions = self.set_label(&id, &draft);
        actions.insert(0, Action::LabelEditEnded { id });
        actions
    }

    /// Leave inline editing without changing the element.
    pub fn cancel_label_edit(&mut self) -> Vec<Action> {
        if !self.input.is_editing_text() {
            return Vec::new();
        }
        let InputState::EditingLabel { id, .. } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        vec![Action::LabelEditEnded { id }, Action::RenderNeeded]
    }

    // --- Queries ---

    /// Currently selected ids.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// All elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[LayoutElement] {
        self.scene.all()
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&LayoutElement> {
        self.scene.get(id)
    }

    /// Temporary rectangle to draw during rubber-band or structure creation.
    #[must_use]
    pub fn drag_rect(&self) -> Option<Bounds> {
        self.input.drag_rect()
    }

    /// Scene position of the rotate handle, shown for single selections.
    #[must_use]
    pub fn rotate_handle(&self) -> Option<Point> {
        if self.selection.len() != 1 {
            return None;
        }
        selection_frame(&self.scene, &self.selection).map(|f| rotate_handle_point(&f, &self.viewport))
    }

    /// Text currently being typed into a label, if editing.
    #[must_use]
    pub fn label_draft(&self) -> Option<&str> {
        match &self.input {
            InputState::EditingLabel { draft, .. } => Some(draft),
            _ => None,
        }
    }

    // --- Internals ---

    fn finish_structure(&mut self, rect: &Bounds) -> Vec<Action> {
        self.mode = Mode::Select;
        let min = self.config.min_structure_px;
        if rect.width() <= min || rect.height() <= min {
            return Vec::new();
        }
        let geometry =
            Geometry::new(rect.min_x.round(), rect.min_y.round(), rect.width().round(), rect.height().round());
        let structure = LayoutElement::new_structure(geometry, synth_structure_label());
        let id = structure.id.clone();

        self.history.snapshot(&self.scene);
        if !self.scene.add(structure) {
            return Vec::new();
        }
        self.auto_align(&[id.clone()]);
        self.selection = vec![id.clone()];
        debug!(%id, "structure created");

        let mut actions = vec![Action::SelectionChanged(self.selection.clone())];
        actions.extend(self.label_request(&id));
        actions
    }

    /// Scale `originals` inside the frame's unrotated space, around the edge
    /// or corner opposite `anchor`. Members drawn at another angle than the
    /// frame (up to a half turn) keep their size and only move.
    fn apply_resize(&mut self, originals: &[Original], frame: &SelectionFrame, anchor: ResizeAnchor, sx: f64, sy: f64) {
        let fixed = anchor.opposite_point(&frame.rect);
        for o in originals {
            let skew = (o.geometry.rotation_degrees - frame.rotation_degrees).rem_euclid(180.0);
            let sized = if skew < f64::EPSILON || 180.0 - skew < f64::EPSILON {
                try_bake_transform(&o.geometry, sx, sy)
            } else {
                Some(o.geometry)
            };
            let Some(sized) = sized else {
                continue;
            };
            let c = frame.to_local(o.geometry.center());
            let center = frame.to_scene(Point::new(fixed.x + (c.x - fixed.x) * sx, fixed.y + (c.y - fixed.y) * sy));
            let next = Geometry { x: center.x - sized.width / 2.0, y: center.y - sized.height / 2.0, ..sized };
            self.scene.update(&o.id, &ElementPatch::geometry(next));
        }
    }

    fn originals(&self) -> Vec<Original> {
        self.selection
            .iter()
            .filter_map(|id| self.scene.get(id))
            .map(|e| Original { id: e.id.clone(), geometry: e.geometry })
            .collect()
    }

    fn snapshot_once(&mut self, snapshotted: &mut bool) {
        if !*snapshotted {
            self.history.snapshot(&self.scene);
            *snapshotted = true;
        }
    }

    fn auto_align(&mut self, ids: &[ElementId]) {
        if self.config.auto_align {
            align_scene(&mut self.scene, Some(ids), self.config.snap_threshold_px);
        }
    }

    fn label_request(&self, id: &ElementId) -> Option<Action> {
        self.scene
            .get(id)
            .map(|e| Action::LabelRequested { id: id.clone(), current: e.label().to_string() })
    }

    fn prune_selection(&mut self) {
        let scene = &self.scene;
        self.selection.retain(|id| scene.contains(id));
    }

    fn hover_cursor(&self, world: Point) -> &'static str {
        if self.mode == Mode::CreateStructure {
            return "crosshair";
        }
        match hit_test(world, &self.scene, &self.viewport, &self.selection) {
            Some(Hit::ResizeHandle(anchor)) => selection_frame(&self.scene, &self.selection)
                .map_or(anchor, |f| anchor.turned(f.rotation_degrees))
                .cursor(),
            Some(Hit::RotateHandle) => "grab",
            Some(Hit::Element(_)) => "move",
            None => "default",
        }
    }
}

/// Pointer angle around `center`, in degrees (clockwise, y down).
fn angle_deg(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x).to_degrees()
}


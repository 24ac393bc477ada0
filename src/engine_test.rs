#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::element::{Attributes, SeatAttributes};
use crate::store::SerializedElement;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn shift() -> Modifiers {
    Modifiers { shift: true, ..Default::default() }
}

fn ctrl() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

fn seat(x: f64, y: f64, number: &str) -> LayoutElement {
    LayoutElement::new_seat(Geometry::new(x, y, 72.0, 72.0), number)
}

fn clean(mut element: LayoutElement) -> LayoutElement {
    element.id = ElementId::new(Uuid::new_v4().to_string());
    element.dirty = false;
    element
}

fn geometry(core: &EditorCore, id: &ElementId) -> Geometry {
    core.element(id).unwrap().geometry
}

fn drag(core: &mut EditorCore, from: Point, to: Point) -> Vec<Action> {
    let mut actions = core.on_pointer_down(from, Button::Primary, no_modifiers());
    actions.extend(core.on_pointer_move(to, no_modifiers()));
    actions.extend(core.on_pointer_up(to, Button::Primary, no_modifiers()));
    actions
}

fn has_label_request(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::LabelRequested { .. }))
}

fn no_align() -> EditorCore {
    EditorCore::with_config(EditorConfig { auto_align: false, ..EditorConfig::default() })
}

// =============================================================
// Construction
// =============================================================

#[test]
fn core_new_is_empty_and_idle() {
    let core = EditorCore::new();
    assert!(core.elements().is_empty());
    assert!(core.selection().is_empty());
    assert_eq!(core.mode, Mode::Select);
    assert!(matches!(core.input, InputState::Idle));
    assert!(core.history.is_empty());
}

// =============================================================
// add_seat
// =============================================================

#[test]
fn add_seat_numbers_sequentially_and_selects() {
    let mut core = EditorCore::new();
    let a = core.add_seat(Some(pt(0.0, 0.0)));
    let b = core.add_seat(Some(pt(500.0, 500.0)));
    assert_eq!(core.element(&a).unwrap().label(), "1");
    assert_eq!(core.element(&b).unwrap().label(), "2");
    assert_eq!(core.selection(), &[b.clone()]);
    assert!(core.element(&b).unwrap().dirty);
    assert_eq!(core.history.len(), 2);
}

#[test]
fn add_seat_after_largest_possible_number_starts_over() {
    let mut core = no_align();
    core.scene.load(vec![clean(seat(0.0, 0.0, &u64::MAX.to_string()))]);
    let id = core.add_seat(Some(pt(200.0, 0.0)));
    assert_eq!(core.element(&id).unwrap().label(), "1");
}

#[test]
fn add_seat_snaps_to_clean_anchor() {
    let mut core = EditorCore::new();
    core.scene.load(vec![clean(seat(100.0, 100.0, "1"))]);
    let id = core.add_seat(Some(pt(120.0, 85.0)));
    let g = geometry(&core, &id);
    assert_eq!((g.x, g.y), (100.0, 100.0));
}

#[test]
fn created_then_moved_seat_snaps_each_axis_within_threshold() {
    let mut core = no_align();
    core.scene.load(vec![clean(seat(128.0, 100.0, "1"))]);
    let id = core.add_seat(Some(pt(100.0, 100.0)));
    assert_eq!(geometry(&core, &id).x, 100.0);

    // Grab the new seat away from the anchor's overlap and move it by (+30, -2).
    drag(&mut core, pt(110.0, 170.0), pt(140.0, 168.0));
    let g = geometry(&core, &id);
    assert_eq!((g.x, g.y), (130.0, 98.0));

    assert_eq!(core.align_dirty(), 1);
    let g = geometry(&core, &id);
    assert_eq!(g.x, 128.0);
    assert_eq!(g.y, 100.0);
}

// =============================================================
// Moving / selection
// =============================================================

#[test]
fn click_without_move_selects_without_snapshot() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);

    let actions = core.on_pointer_down(pt(30.0, 30.0), Button::Primary, no_modifiers());
    core.on_pointer_up(pt(30.0, 30.0), Button::Primary, no_modifiers());
    assert!(actions.contains(&Action::SelectionChanged(vec![id.clone()])));
    assert!(core.history.is_empty());
    assert!(!core.element(&id).unwrap().dirty);
}

#[test]
fn drag_moves_selection_and_snapshots_once() {
    let mut core = no_align();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);

    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(20.0, 10.0), no_modifiers());
    core.on_pointer_move(pt(60.0, 50.0), no_modifiers());
    core.on_pointer_up(pt(60.0, 50.0), Button::Primary, no_modifiers());

    let g = geometry(&core, &id);
    assert_eq!((g.x, g.y), (50.0, 40.0));
    assert!(core.element(&id).unwrap().dirty);
    assert_eq!(core.history.len(), 1);
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn drag_moves_whole_group() {
    let mut core = no_align();
    let a = clean(seat(0.0, 0.0, "1"));
    let b = clean(seat(200.0, 0.0, "2"));
    let (ia, ib) = (a.id.clone(), b.id.clone());
    core.scene.load(vec![a, b]);
    core.selection = vec![ia.clone(), ib.clone()];

    drag(&mut core, pt(10.0, 10.0), pt(20.0, 30.0));
    assert_eq!((geometry(&core, &ia).x, geometry(&core, &ia).y), (10.0, 20.0));
    assert_eq!((geometry(&core, &ib).x, geometry(&core, &ib).y), (210.0, 20.0));
}

#[test]
fn move_release_auto_aligns_moved_elements() {
    let mut core = EditorCore::new();
    let anchor = clean(seat(0.0, 0.0, "1"));
    let mover = clean(seat(300.0, 300.0, "2"));
    let id = mover.id.clone();
    core.scene.load(vec![anchor, mover]);

    drag(&mut core, pt(310.0, 310.0), pt(20.0, 320.0));
    let g = geometry(&core, &id);
    assert_eq!((g.x, g.y), (0.0, 310.0));
}

#[test]
fn shift_click_toggles_membership() {
    let mut core = EditorCore::new();
    let a = clean(seat(0.0, 0.0, "1"));
    let b = clean(seat(200.0, 0.0, "2"));
    let (ia, ib) = (a.id.clone(), b.id.clone());
    core.scene.load(vec![a, b]);

    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, no_modifiers());
    core.on_pointer_up(pt(10.0, 10.0), Button::Primary, no_modifiers());
    core.on_pointer_down(pt(210.0, 10.0), Button::Primary, shift());
    core.on_pointer_up(pt(210.0, 10.0), Button::Primary, shift());
    assert_eq!(core.selection(), &[ia.clone(), ib]);

    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, shift());
    assert_eq!(core.selection().len(), 1);
    assert!(!core.selection().contains(&ia));
    assert!(core.history.is_empty());
}

#[test]
fn rubber_band_selects_touched_elements() {
    let mut core = EditorCore::new();
    let a = clean(seat(0.0, 0.0, "1"));
    let b = clean(seat(100.0, 0.0, "2"));
    let c = clean(seat(0.0, 400.0, "3"));
    let (ia, ib) = (a.id.clone(), b.id.clone());
    core.scene.load(vec![a, b, c]);

    core.on_pointer_down(pt(-20.0, -20.0), Button::Primary, shift());
    core.on_pointer_move(pt(120.0, 20.0), shift());
    assert!(core.drag_rect().is_some());
    core.on_pointer_up(pt(120.0, 20.0), Button::Primary, shift());

    assert_eq!(core.selection(), &[ia, ib]);
    assert!(core.drag_rect().is_none());
    assert!(core.history.is_empty());
}

// =============================================================
// Panning
// =============================================================

#[test]
fn empty_canvas_drag_pans_without_snapshot() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id];

    let actions = drag(&mut core, pt(500.0, 500.0), pt(510.0, 495.0));
    assert_eq!((core.viewport.translate_x, core.viewport.translate_y), (10.0, -5.0));
    assert!(core.selection().is_empty());
    assert!(actions.contains(&Action::SelectionChanged(Vec::new())));
    assert!(core.history.is_empty());
}

#[test]
fn middle_button_pans_even_over_elements() {
    let mut core = EditorCore::new();
    core.scene.load(vec![clean(seat(0.0, 0.0, "1"))]);
    core.on_pointer_down(pt(10.0, 10.0), Button::Middle, no_modifiers());
    core.on_pointer_move(pt(30.0, 10.0), no_modifiers());
    core.on_pointer_up(pt(30.0, 10.0), Button::Middle, no_modifiers());
    assert_eq!(core.viewport.translate_x, 20.0);
}

// =============================================================
// Structure creation
// =============================================================

#[test]
fn drag_create_structure_prompts_for_label() {
    let mut core = EditorCore::new();
    core.set_mode(Mode::CreateStructure);
    let actions = drag(&mut core, pt(0.0, 0.0), pt(100.0, 50.0));

    assert_eq!(core.elements().len(), 1);
    let structure = &core.elements()[0];
    assert_eq!(structure.kind(), ElementKind::Structure);
    assert_eq!(structure.geometry, Geometry::new(0.0, 0.0, 100.0, 50.0));
    assert!(structure.label().starts_with("STR_"));
    assert!(structure.dirty);
    assert!(has_label_request(&actions));
    assert_eq!(core.mode, Mode::Select);
    assert_eq!(core.history.len(), 1);
    assert!(core.drag_rect().is_none());
}

#[test]
fn small_structure_drag_is_discarded() {
    let mut core = EditorCore::new();
    core.set_mode(Mode::CreateStructure);
    let actions = drag(&mut core, pt(0.0, 0.0), pt(20.0, 100.0));
    assert!(core.elements().is_empty());
    assert!(!has_label_request(&actions));
    assert!(core.history.is_empty());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn set_label_answers_prompt() {
    let mut core = EditorCore::new();
    core.set_mode(Mode::CreateStructure);
    drag(&mut core, pt(0.0, 0.0), pt(100.0, 50.0));
    let id = core.elements()[0].id.clone();

    assert!(core.set_label(&id, "   ").is_empty());
    core.set_label(&id, "Door");
    assert_eq!(core.element(&id).unwrap().label(), "Door");
}

#[test]
fn set_label_on_unknown_id_is_noop() {
    let mut core = EditorCore::new();
    assert!(core.set_label(&ElementId::local(), "Door").is_empty());
    assert!(core.history.is_empty());
}

// =============================================================
// Resizing / rotating
// =============================================================

#[test]
fn corner_resize_bakes_scale_into_size() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id.clone()];

    drag(&mut core, pt(72.0, 72.0), pt(144.0, 108.0));
    let g = geometry(&core, &id);
    assert_eq!(g, Geometry::new(0.0, 0.0, 144.0, 108.0));
    assert!(core.element(&id).unwrap().dirty);
    assert_eq!(core.history.len(), 1);
}

#[test]
fn resize_results_are_whole_pixels() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id.clone()];

    drag(&mut core, pt(72.0, 72.0), pt(100.3, 81.7));
    let g = geometry(&core, &id);
    assert_eq!(g.width.fract(), 0.0);
    assert_eq!(g.height.fract(), 0.0);
    assert!(g.width >= 1.0 && g.height >= 1.0);
}

#[test]
fn group_resize_scales_members_around_fixed_edge() {
    let mut core = EditorCore::new();
    let a = clean(seat(0.0, 0.0, "1"));
    let b = clean(seat(100.0, 0.0, "2"));
    let (ia, ib) = (a.id.clone(), b.id.clone());
    core.scene.load(vec![a, b]);
    core.selection = vec![ia.clone(), ib.clone()];

    // East handle of the 172x72 group box.
    drag(&mut core, pt(172.0, 36.0), pt(344.0, 36.0));
    assert_eq!(geometry(&core, &ia), Geometry::new(0.0, 0.0, 144.0, 72.0));
    assert_eq!(geometry(&core, &ib), Geometry::new(200.0, 0.0, 144.0, 72.0));
}

#[test]
fn resize_past_fixed_edge_is_ignored() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id.clone()];

    drag(&mut core, pt(72.0, 72.0), pt(-10.0, -10.0));
    assert_eq!(geometry(&core, &id), Geometry::new(0.0, 0.0, 72.0, 72.0));
    assert!(core.history.is_empty());
}

#[test]
fn rotated_seat_resizes_along_its_own_axes() {
    let mut core = EditorCore::new();
    let geometry_90 = Geometry { rotation_degrees: 90.0, ..Geometry::new(0.0, 0.0, 100.0, 20.0) };
    let el = clean(LayoutElement::new_seat(geometry_90, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id.clone()];

    // Drawn 20 wide and 100 tall around (50, 10); its top edge faces east.
    let actions = drag(&mut core, pt(60.0, 10.0), pt(80.0, 10.0));
    assert!(actions.contains(&Action::SetCursor("ew-resize".into())));
    let g = geometry(&core, &id);
    assert_eq!((g.width, g.height, g.rotation_degrees), (100.0, 40.0, 90.0));
    let b = g.bounds();
    for (got, want) in [(b.min_x, 40.0), (b.max_x, 80.0), (b.min_y, -40.0), (b.max_y, 60.0)] {
        assert!((got - want).abs() < 1e-9, "bounds {b:?}");
    }
    assert_eq!(core.history.len(), 1);
}

#[test]
fn group_resize_moves_rotated_members_without_resizing_them() {
    let mut core = EditorCore::new();
    let geometry_90 = Geometry { rotation_degrees: 90.0, ..Geometry::new(0.0, 0.0, 100.0, 20.0) };
    let a = clean(LayoutElement::new_seat(geometry_90, "1"));
    let b = clean(seat(100.0, 0.0, "2"));
    let (ia, ib) = (a.id.clone(), b.id.clone());
    core.scene.load(vec![a, b]);
    core.selection = vec![ia.clone(), ib.clone()];

    // Group box spans x 40..172, y -40..72; drag its east handle to double the width.
    drag(&mut core, pt(172.0, 16.0), pt(304.0, 16.0));
    assert_eq!(geometry(&core, &ia), Geometry { x: 10.0, ..geometry_90 });
    assert_eq!(geometry(&core, &ib), Geometry::new(160.0, 0.0, 144.0, 72.0));
}

#[test]
fn rotate_handle_rotates_around_center() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id.clone()];

    let handle = core.rotate_handle().unwrap();
    assert_eq!(handle, pt(36.0, -24.0));
    drag(&mut core, handle, pt(96.0, 36.0));
    let g = geometry(&core, &id);
    assert!((g.rotation_degrees - 90.0).abs() < 1e-9);
    assert_eq!((g.width, g.height), (72.0, 72.0));
}

#[test]
fn rotate_jitter_along_handle_ray_leaves_no_undo_entry() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id.clone()];

    let handle = core.rotate_handle().unwrap();
    let actions = drag(&mut core, handle, pt(36.0, -30.0));
    assert!(!actions.contains(&Action::RenderNeeded));
    assert!(core.history.is_empty());
    assert!(!core.element(&id).unwrap().dirty);
    assert_eq!(geometry(&core, &id).rotation_degrees, 0.0);
}

// =============================================================
// Inline label editing
// =============================================================

#[test]
fn double_click_edit_commits_on_enter() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);

    let actions = core.on_double_click(pt(30.0, 30.0));
    assert!(actions.contains(&Action::LabelEditStarted { id: id.clone(), text: "1".into() }));
    assert!(core.input.is_editing_text());

    core.on_key_down(Key::new("Backspace"), no_modifiers(), true);
    core.on_text_input("A5");
    assert_eq!(core.label_draft(), Some("A5"));
    let actions = core.on_key_down(Key::new("Enter"), no_modifiers(), true);

    assert!(actions.contains(&Action::LabelEditEnded { id: id.clone() }));
    let element = core.element(&id).unwrap();
    assert_eq!(element.label(), "A5");
    assert_eq!(element.id, id);
    assert!(element.dirty);
    assert_eq!(core.history.len(), 1);
}

#[test]
fn escape_cancels_label_edit() {
    let mut core = EditorCore::new();
    let el = clean(LayoutElement::new_structure(Geometry::new(0.0, 0.0, 100.0, 40.0), "Door"));
    let id = el.id.clone();
    core.scene.load(vec![el]);

    core.on_double_click(pt(50.0, 20.0));
    core.on_text_input("way");
    core.on_key_down(Key::new("Escape"), no_modifiers(), false);
    assert_eq!(core.element(&id).unwrap().label(), "Door");
    assert!(!core.input.is_editing_text());
    assert!(core.history.is_empty());
}

#[test]
fn blank_label_commit_keeps_previous() {
    let mut core = EditorCore::new();
    let el = clean(LayoutElement::new_structure(Geometry::new(0.0, 0.0, 100.0, 40.0), "Door"));
    let id = el.id.clone();
    core.scene.load(vec![el]);

    core.on_double_click(pt(50.0, 20.0));
    for _ in 0..4 {
        core.on_key_down(Key::new("Backspace"), no_modifiers(), false);
    }
    core.commit_label_edit();
    assert_eq!(core.element(&id).unwrap().label(), "Door");
    assert!(!core.element(&id).unwrap().dirty);
}

#[test]
fn clicking_elsewhere_commits_label_edit() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);

    core.on_double_click(pt(30.0, 30.0));
    core.on_text_input("b");
    core.on_pointer_down(pt(500.0, 500.0), Button::Primary, no_modifiers());
    assert_eq!(core.element(&id).unwrap().label(), "1b");
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn ctrl_z_undoes_last_mutation() {
    let mut core = EditorCore::new();
    let id = core.add_seat(Some(pt(0.0, 0.0)));
    core.on_key_down(Key::new("z"), ctrl(), false);
    assert!(core.element(&id).is_none());
    assert!(core.selection().is_empty());
}

#[test]
fn undo_with_empty_history_is_noop() {
    let mut core = EditorCore::new();
    core.scene.load(vec![clean(seat(0.0, 0.0, "1"))]);
    assert!(core.undo().is_empty());
    assert_eq!(core.elements().len(), 1);
}

#[test]
fn undo_walks_back_through_mutations() {
    let mut core = no_align();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);

    let mut states = vec![core.elements().to_vec()];
    for step in 1..=3 {
        let x = f64::from(step) * 100.0;
        let from = pt(geometry(&core, &id).x + 10.0, 10.0);
        drag(&mut core, from, pt(x + 10.0, 10.0));
        states.push(core.elements().to_vec());
    }
    for expected in states.iter().rev().skip(1) {
        core.undo();
        assert_eq!(core.elements(), expected.as_slice());
    }
}

#[test]
fn shortcuts_suppressed_while_text_field_focused() {
    let mut core = EditorCore::new();
    let id = core.add_seat(Some(pt(0.0, 0.0)));
    assert!(core.on_key_down(Key::new("z"), ctrl(), true).is_empty());
    assert!(core.element(&id).is_some());
}

#[test]
fn copy_paste_via_keyboard_offsets_and_selects() {
    let mut core = no_align();
    let id = core.add_seat(Some(pt(100.0, 100.0)));
    core.on_key_down(Key::new("c"), ctrl(), false);
    let actions = core.on_key_down(Key::new("v"), Modifiers { meta: true, ..Default::default() }, false);

    assert_eq!(core.elements().len(), 2);
    let pasted = core.selection()[0].clone();
    assert_ne!(pasted, id);
    let g = geometry(&core, &pasted);
    assert_eq!((g.x, g.y), (120.0, 120.0));
    assert!(actions.contains(&Action::SelectionChanged(vec![pasted])));
}

#[test]
fn delete_key_removes_selection() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id.clone()];

    core.on_key_down(Key::new("Delete"), no_modifiers(), false);
    assert!(core.element(&id).is_none());
    assert!(core.scene.deleted().contains(&id));
    assert_eq!(core.history.len(), 1);
}

#[test]
fn escape_disarms_creation_and_clears_selection() {
    let mut core = EditorCore::new();
    let id = core.add_seat(None);
    core.set_mode(Mode::CreateStructure);
    core.on_key_down(Key::new("Escape"), no_modifiers(), false);
    assert_eq!(core.mode, Mode::Select);
    assert!(core.selection().is_empty());
    assert!(core.element(&id).is_some());
}

// =============================================================
// Clipboard
// =============================================================

#[test]
fn group_paste_reselects_new_group_with_fresh_ids() {
    let mut core = no_align();
    let a = clean(seat(0.0, 0.0, "1"));
    let b = clean(LayoutElement::new_structure(Geometry::new(200.0, 0.0, 100.0, 40.0), "Desk"));
    let originals = vec![a.id.clone(), b.id.clone()];
    core.scene.load(vec![a, b]);
    core.selection.clone_from(&originals);

    assert_eq!(core.copy(), 2);
    let actions = core.paste();
    assert_eq!(core.selection().len(), 2);
    assert!(core.selection().iter().all(|id| !originals.contains(id)));
    assert_eq!(core.elements().len(), 4);
    assert!(has_label_request(&actions));
}

#[test]
fn pasted_converted_structure_carries_no_seat_fields() {
    let mut core = no_align();
    let mut el = clean(seat(0.0, 0.0, "1"));
    el.attributes = Attributes::Seat(SeatAttributes {
        seat_number: "1".into(),
        display_number: Some("A1".into()),
        section_name: Some("Silent".into()),
        section_color: Some("#00aa00".into()),
        global_order: Some(1),
    });
    let id = el.id.clone();
    core.scene.load(vec![el]);

    core.convert_kind(&id, ElementKind::Structure);
    core.set_label(&id, "Door");
    core.selection = vec![id];
    core.copy();
    let actions = core.paste();

    let pasted = core.selection()[0].clone();
    let element = core.element(&pasted).unwrap();
    assert_ne!(element.label(), "Door");
    assert!(actions.contains(&Action::LabelRequested { id: pasted.clone(), current: element.label().to_string() }));

    let wire = serde_json::to_value(SerializedElement::from_element(element, "hall")).unwrap();
    for key in ["sectionName", "sectionColor", "displayNumber", "globalOrder", "seatNumber"] {
        assert!(wire.get(key).is_none(), "stale {key}");
    }
}

#[test]
fn paste_with_empty_clipboard_does_nothing() {
    let mut core = EditorCore::new();
    assert!(core.paste().is_empty());
    assert!(core.history.is_empty());
}

// =============================================================
// Undo and the deletion set
// =============================================================

#[test]
fn undo_after_delete_restores_element_and_unqueues_deletion() {
    let mut core = EditorCore::new();
    let el = clean(seat(0.0, 0.0, "1"));
    let id = el.id.clone();
    core.scene.load(vec![el]);
    core.selection = vec![id.clone()];

    core.delete_selection();
    assert!(core.scene.deleted().contains(&id));
    core.undo();
    assert!(core.element(&id).is_some());
    assert!(!core.scene.deleted().contains(&id));
}

#[test]
fn stale_selection_is_ignored() {
    let mut core = EditorCore::new();
    core.selection = vec![ElementId::local()];
    assert!(core.delete_selection().is_empty());
    assert!(core.history.is_empty());
    assert!(core.selection().is_empty());
}

// =============================================================
// Viewport
// =============================================================

#[test]
fn viewport_resize_refits_content() {
    let mut core = EditorCore::new();
    core.scene.load(vec![clean(seat(0.0, 0.0, "1"))]);
    core.set_viewport_size(Size::new(172.0, 172.0));
    assert_eq!((core.viewport.translate_x, core.viewport.translate_y), (50.0, 50.0));
    core.set_compact(true);
    assert_eq!(core.viewport.translate_y, 30.0);
}

#[test]
fn load_elements_resets_history_and_fits() {
    let mut core = EditorCore::new();
    core.add_seat(Some(pt(0.0, 0.0)));
    core.viewport.size = Size::new(200.0, 200.0);
    core.load_elements(vec![clean(seat(0.0, 0.0, "1"))]);
    assert!(core.history.is_empty());
    assert!(core.elements().iter().all(|e| !e.dirty));
    assert_eq!(core.viewport.translate_x, 64.0);
}

// =============================================================
// Reorder / align commands
// =============================================================

#[test]
fn reorder_seats_snapshots_only_when_changed() {
    let mut core = EditorCore::new();
    core.scene.load(vec![clean(seat(100.0, 0.0, "2")), clean(seat(0.0, 0.0, "1"))]);
    assert_eq!(core.reorder_seats(), 2);
    assert_eq!(core.history.len(), 1);
    assert_eq!(core.reorder_seats(), 0);
    assert_eq!(core.history.len(), 1);
}

#[test]
fn align_dirty_without_candidates_takes_no_snapshot() {
    let mut core = EditorCore::new();
    core.scene.load(vec![clean(seat(0.0, 0.0, "1"))]);
    assert_eq!(core.align_dirty(), 0);
    assert!(core.history.is_empty());
}

//! Scene store: the in-memory element collection and the set of persisted ids
//! pending deletion.
//!
//! The store is the single owner of every [`LayoutElement`]. Elements keep
//! insertion order, which is also draw order. An id is never present twice,
//! and never in both the scene and the deletion set.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::BTreeSet;

use crate::element::{Attributes, ElementId, ElementKind, Geometry, LayoutElement, synth_structure_label};

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation_degrees: Option<f64>,
    /// New seat number or structure label.
    pub label: Option<String>,
}

impl ElementPatch {
    /// Patch replacing the whole geometry.
    #[must_use]
    pub fn geometry(g: Geometry) -> Self {
        Self {
            x: Some(g.x),
            y: Some(g.y),
            width: Some(g.width),
            height: Some(g.height),
            rotation_degrees: Some(g.rotation_degrees),
            label: None,
        }
    }

    /// Patch moving the element to `(x, y)`.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Patch replacing the label.
    #[must_use]
    pub fn label(text: impl Into<String>) -> Self {
        Self { label: Some(text.into()), ..Default::default() }
    }
}

/// In-memory store of layout elements plus pending deletions.
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    elements: Vec<LayoutElement>,
    deleted: BTreeSet<ElementId>,
}

impl SceneStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element and mark it dirty.
    ///
    /// Returns false (and changes nothing) when the id is already present or
    /// the geometry is invalid. A blank seat number or label is synthesized.
    pub fn add(&mut self, mut element: LayoutElement) -> bool {
        if self.contains(&element.id) || !element.geometry.is_valid() {
            return false;
        }
        self.fill_required_label(&mut element);
        element.dirty = true;
        self.deleted.remove(&element.id);
        self.elements.push(element);
        true
    }

    /// Remove elements by id.
    ///
    /// Persisted ids move into the deletion set; local-only ids are simply
    /// discarded. Unknown ids are ignored. Returns the number removed.
    pub fn remove(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        for id in ids {
            let Some(index) = self.index_of(id) else {
                continue;
            };
            let element = self.elements.remove(index);
            if element.id.is_persisted() {
                self.deleted.insert(element.id);
            }
        }
        before - self.elements.len()
    }

    /// Record persisted ids as pending deletion, dropping them from the scene
    /// if present. Local-only ids are not recorded.
    pub fn mark_deleted(&mut self, ids: &[ElementId]) {
        for id in ids {
            if let Some(index) = self.index_of(id) {
                self.elements.remove(index);
            }
            if id.is_persisted() {
                self.deleted.insert(id.clone());
            }
        }
    }

    /// Apply a sparse update and mark the element dirty.
    ///
    /// Returns false when the id is unknown or the patched element would be
    /// invalid (non-positive size, non-finite numbers, blank label).
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) else {
            return false;
        };

        let mut geometry = element.geometry;
        if let Some(x) = patch.x {
            geometry.x = x;
        }
        if let Some(y) = patch.y {
            geometry.y = y;
        }
        if let Some(w) = patch.width {
            geometry.width = w;
        }
        if let Some(h) = patch.height {
            geometry.height = h;
        }
        if let Some(r) = patch.rotation_degrees {
            geometry.rotation_degrees = r;
        }
        if !geometry.is_valid() {
            return false;
        }

        let mut next = element.clone();
        next.geometry = geometry;
        if let Some(ref label) = patch.label {
            if !next.set_label(label) {
                return false;
            }
        }
        next.dirty = true;
        *element = next;
        true
    }

    /// Switch an element between seat and structure, synthesizing the
    /// required number or label for the new kind.
    pub fn convert_kind(&mut self, id: &ElementId, kind: ElementKind) -> bool {
        let required = match kind {
            ElementKind::Seat => self.next_seat_number(),
            ElementKind::Structure => synth_structure_label(),
        };
        let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) else {
            return false;
        };
        if element.kind() == kind {
            return false;
        }
        element.convert(kind, required);
        element.dirty = true;
        true
    }

    /// Assign dense `global_order` 1..n to seats in reading order.
    ///
    /// Seats whose order changes are marked dirty. Returns how many changed.
    pub fn reorder_seats(&mut self) -> usize {
        let order: Vec<ElementId> = reading_order(self.elements.iter().filter(|e| e.kind() == ElementKind::Seat))
            .into_iter()
            .map(|e| e.id.clone())
            .collect();

        let mut changed = 0;
        for (rank, id) in order.iter().enumerate() {
            let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) else {
                continue;
            };
            let Attributes::Seat(seat) = &mut element.attributes else {
                continue;
            };
            let next = i64::try_from(rank + 1).unwrap_or(i64::MAX);
            if seat.global_order != Some(next) {
                seat.global_order = Some(next);
                element.dirty = true;
                changed += 1;
            }
        }
        changed
    }

    /// Replace the whole scene, keeping each element's dirty flag.
    ///
    /// Used by undo. Duplicate ids keep the first occurrence. Restored ids are
    /// dropped from the deletion set so the two stay disjoint.
    pub fn replace_all(&mut self, elements: Vec<LayoutElement>) {
        self.elements.clear();
        for element in elements {
            if self.contains(&element.id) {
                continue;
            }
            self.deleted.remove(&element.id);
            self.elements.push(element);
        }
    }

    /// Replace the scene with freshly loaded elements: all clean, no pending
    /// deletions. Invalid geometry is skipped and blank labels synthesized.
    pub fn load(&mut self, elements: Vec<LayoutElement>) {
        self.elements.clear();
        self.deleted.clear();
        for mut element in elements {
            if self.contains(&element.id) || !element.geometry.is_valid() {
                continue;
            }
            self.fill_required_label(&mut element);
            element.dirty = false;
            self.elements.push(element);
        }
    }

    /// Clear the dirty flag on every element.
    pub fn clear_dirty(&mut self) {
        for element in &mut self.elements {
            element.dirty = false;
        }
    }

    /// Forget the given ids from the deletion set (after the store deleted them).
    pub fn clear_deleted(&mut self, ids: &[ElementId]) {
        for id in ids {
            self.deleted.remove(id);
        }
    }

    /// The next sequential seat number: one past the highest numeric seat number.
    ///
    /// Numbers with no successor in `u64` are ignored.
    #[must_use]
    pub fn next_seat_number(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| e.seat())
            .flat_map(|s| s.seat_number.trim().parse::<u64>())
            .filter_map(|n| n.checked_add(1))
            .max()
            .unwrap_or(1)
            .to_string()
    }

    fn fill_required_label(&self, element: &mut LayoutElement) {
        if !element.label().trim().is_empty() {
            return;
        }
        let text = match element.kind() {
            ElementKind::Seat => self.next_seat_number(),
            ElementKind::Structure => synth_structure_label(),
        };
        element.set_label(&text);
    }

    fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    // --- Queries ---

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&LayoutElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.iter().any(|e| &e.id == id)
    }

    /// All elements in draw order.
    #[must_use]
    pub fn all(&self) -> &[LayoutElement] {
        &self.elements
    }

    /// Persisted ids awaiting deletion on the next save.
    #[must_use]
    pub fn deleted(&self) -> &BTreeSet<ElementId> {
        &self.deleted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Sort elements into reading order: rows top to bottom, then left to right.
///
/// An element joins the current row while its top edge is within half its
/// height of the row's first element.
pub(crate) fn reading_order<'a, I>(elements: I) -> Vec<&'a LayoutElement>
where
    I: IntoIterator<Item = &'a LayoutElement>,
{
    let mut sorted: Vec<&LayoutElement> = elements.into_iter().collect();
    sorted.sort_by(|a, b| a.geometry.y.total_cmp(&b.geometry.y).then(a.geometry.x.total_cmp(&b.geometry.x)));

    let mut rows: Vec<Vec<&LayoutElement>> = Vec::new();
    for element in sorted {
        let joins = rows
            .last()
            .and_then(|row| row.first())
            .is_some_and(|first| element.geometry.y - first.geometry.y <= element.geometry.height / 2.0);
        match rows.last_mut() {
            Some(row) if joins => row.push(element),
            _ => rows.push(vec![element]),
        }
    }

    rows.into_iter()
        .flat_map(|mut row| {
            row.sort_by(|a, b| a.geometry.x.total_cmp(&b.geometry.x));
            row
        })
        .collect()
}

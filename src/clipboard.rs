//! Clipboard: deep copies of the selection, pasted back with fresh identities.

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

use crate::element::{Attributes, ElementId, LayoutElement, StructureAttributes, synth_structure_label};
use crate::scene::SceneStore;

/// Holds a deep clone of the last copied selection.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    items: Vec<LayoutElement>,
}

impl Clipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the selected elements still present in the scene. An empty or
    /// fully stale selection leaves the clipboard untouched.
    pub fn copy(&mut self, scene: &SceneStore, selection: &[ElementId]) -> usize {
        let items: Vec<LayoutElement> = selection.iter().filter_map(|id| scene.get(id)).cloned().collect();
        if items.is_empty() {
            return 0;
        }
        self.items = items;
        self.items.len()
    }

    /// Produce clones of the clipboard contents ready to add to `scene`.
    ///
    /// Every clone gets a fresh local id not present in the scene, is moved by
    /// `(offset, offset)`, and is dirty. Kind is preserved. Structures get a
    /// fresh placeholder label; seats get the next sequential seat numbers and
    /// lose their display number and ordering. The clipboard advances by the
    /// same offset so repeated pastes cascade.
    pub fn paste(&mut self, scene: &SceneStore, offset: f64) -> Vec<LayoutElement> {
        let mut next_seat = scene.next_seat_number().parse::<u64>().unwrap_or(1);
        let mut pasted = Vec::with_capacity(self.items.len());

        for item in &mut self.items {
            item.geometry.x += offset;
            item.geometry.y += offset;

            let mut id = ElementId::local();
            while scene.contains(&id) || pasted.iter().any(|p: &LayoutElement| p.id == id) {
                id = ElementId::local();
            }

            let attributes = match &item.attributes {
                Attributes::Seat(seat) => {
                    let mut seat = seat.clone();
                    seat.seat_number = next_seat.to_string();
                    seat.display_number = None;
                    seat.global_order = None;
                    next_seat = next_seat.saturating_add(1);
                    Attributes::Seat(seat)
                }
                Attributes::Structure(_) => {
                    Attributes::Structure(StructureAttributes { label: synth_structure_label() })
                }
            };

            pasted.push(LayoutElement { id, geometry: item.geometry, attributes, dirty: true });
        }
        pasted
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

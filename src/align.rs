//! Alignment engine: snaps dirty elements onto the positions of clean
//! (persisted, unchanged) anchors, one axis at a time.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use tracing::debug;

use crate::element::{ElementId, LayoutElement};
use crate::geometry::{Point, nearest_anchor};
use crate::scene::{ElementPatch, SceneStore};

/// A position change proposed by [`snap`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapped {
    pub id: ElementId,
    pub position: Point,
}

/// For each dirty element, replace `x` with the closest clean `x` within
/// `threshold`, and independently `y` with the closest clean `y`.
///
/// Only elements whose position actually changes are returned.
#[must_use]
pub fn snap(dirty: &[&LayoutElement], clean: &[&LayoutElement], threshold: f64) -> Vec<Snapped> {
    dirty
        .iter()
        .filter_map(|element| {
            let g = element.geometry;
            let x = nearest_anchor(g.x, clean.iter().map(|a| a.geometry.x), threshold).unwrap_or(g.x);
            let y = nearest_anchor(g.y, clean.iter().map(|a| a.geometry.y), threshold).unwrap_or(g.y);
            #[allow(clippy::float_cmp)]
            let unchanged = x == g.x && y == g.y;
            (!unchanged).then(|| Snapped { id: element.id.clone(), position: Point::new(x, y) })
        })
        .collect()
}

/// Snap dirty elements of `scene` onto its clean elements.
///
/// With `only` set, just those dirty elements are candidates. Returns the
/// number of elements moved.
pub fn align_scene(scene: &mut SceneStore, only: Option<&[ElementId]>, threshold: f64) -> usize {
    let moves = {
        let dirty: Vec<&LayoutElement> = scene
            .all()
            .iter()
            .filter(|e| e.dirty && only.is_none_or(|ids| ids.contains(&e.id)))
            .collect();
        let clean: Vec<&LayoutElement> = scene.all().iter().filter(|e| !e.dirty).collect();
        snap(&dirty, &clean, threshold)
    };

    let mut moved = 0;
    for m in &moves {
        if scene.update(&m.id, &ElementPatch::position(m.position.x, m.position.y)) {
            moved += 1;
        }
    }
    if moved > 0 {
        debug!(moved, threshold, "aligned dirty elements");
    }
    moved
}

//! Viewport controller: the pan transform between screen and scene space,
//! plus fit-and-center of the layout within the host viewport.
//!
//! Scale is fixed at 1; only translation changes. The same [`fit_and_center`]
//! function serves the editor and read-only viewers so both center identically.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::element::LayoutElement;
use crate::geometry::{Point, Size, VerticalFit, fit_translation, union_bounds};

/// Pan state for the layout canvas.
///
/// `translate_x` / `translate_y` are in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Host viewport size, updated from resize notifications.
    pub size: Size,
    /// Compact (mobile) rendering: fit top-aligned instead of centered.
    pub compact: bool,
    /// Top margin used in compact mode.
    pub top_margin: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            size: Size::default(),
            compact: false,
            top_margin: crate::consts::COMPACT_TOP_MARGIN_PX,
        }
    }
}

impl Viewport {
    /// A viewport of the given size already fitted to `elements`.
    #[must_use]
    pub fn fitted(elements: &[LayoutElement], size: Size, compact: bool) -> Self {
        let mut viewport = Self { size, compact, ..Self::default() };
        viewport.fit(elements);
        viewport
    }

    /// Convert a screen-space point (CSS pixels) to scene coordinates.
    #[must_use]
    pub fn screen_to_scene(&self, screen: Point) -> Point {
        Point { x: (screen.x - self.translate_x) / self.scale, y: (screen.y - self.translate_y) / self.scale }
    }

    /// Convert a scene point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn scene_to_screen(&self, scene: Point) -> Point {
        Point { x: scene.x * self.scale + self.translate_x, y: scene.y * self.scale + self.translate_y }
    }

    /// Convert a screen-space distance (pixels) to scene-space distance.
    #[must_use]
    pub fn screen_dist_to_scene(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Recenter the view on `elements`. Leaves the transform alone when the
    /// scene is empty.
    pub fn fit(&mut self, elements: &[LayoutElement]) -> bool {
        let top = self.compact.then_some(self.top_margin);
        let Some(t) = fit_and_center(elements, self.size, top) else {
            return false;
        };
        self.translate_x = t.x;
        self.translate_y = t.y;
        true
    }
}

/// Translation that centers the union bounds of `elements` in `viewport`.
///
/// With `top_margin` set the content is top-aligned at that margin instead of
/// vertically centered. Returns `None` for an empty element list.
#[must_use]
pub fn fit_and_center(elements: &[LayoutElement], viewport: Size, top_margin: Option<f64>) -> Option<Point> {
    let content = union_bounds(elements.iter().map(|e| e.geometry.bounds()))?;
    let vertical = top_margin.map_or(VerticalFit::Center, VerticalFit::Top);
    Some(fit_translation(content, viewport, vertical))
}

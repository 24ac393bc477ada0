#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::element::ElementId;
use crate::geometry::{Bounds, Point, rotate_point, union_bounds};
use crate::scene::SceneStore;
use crate::viewport::Viewport;

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    /// One of the eight resize handles on the selection frame.
    ResizeHandle(ResizeAnchor),
    /// The rotate handle above a single selected element.
    RotateHandle,
    /// The body of an element.
    Element(ElementId),
}

/// Anchor position for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// Where this handle sits on `bounds`.
    #[must_use]
    pub fn handle_point(self, bounds: &Bounds) -> Point {
        let c = bounds.center();
        match self {
            Self::N => Point::new(c.x, bounds.min_y),
            Self::Ne => Point::new(bounds.max_x, bounds.min_y),
            Self::E => Point::new(bounds.max_x, c.y),
            Self::Se => Point::new(bounds.max_x, bounds.max_y),
            Self::S => Point::new(c.x, bounds.max_y),
            Self::Sw => Point::new(bounds.min_x, bounds.max_y),
            Self::W => Point::new(bounds.min_x, c.y),
            Self::Nw => Point::new(bounds.min_x, bounds.min_y),
        }
    }

    /// The fixed point a resize from this handle scales around.
    #[must_use]
    pub fn opposite_point(self, bounds: &Bounds) -> Point {
        self.opposite().handle_point(bounds)
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::N => Self::S,
            Self::Ne => Self::Sw,
            Self::E => Self::W,
            Self::Se => Self::Nw,
            Self::S => Self::N,
            Self::Sw => Self::Ne,
            Self::W => Self::E,
            Self::Nw => Self::Se,
        }
    }

    /// Whether dragging this handle changes the width.
    #[must_use]
    pub fn scales_x(self) -> bool {
        !matches!(self, Self::N | Self::S)
    }

    /// Whether dragging this handle changes the height.
    #[must_use]
    pub fn scales_y(self) -> bool {
        !matches!(self, Self::E | Self::W)
    }

    /// The anchor this one appears as once its box is rotated by `degrees`,
    /// to the nearest eighth turn.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn turned(self, degrees: f64) -> Self {
        let steps = (degrees / 45.0).round().rem_euclid(8.0) as usize;
        let index = Self::ALL.iter().position(|a| *a == self).unwrap_or(0);
        Self::ALL[(index + steps) % Self::ALL.len()]
    }

    /// CSS cursor shown while hovering or dragging this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Se | Self::Nw => "nwse-resize",
        }
    }
}

/// Union bounds of the selected elements still present in the scene.
#[must_use]
pub fn selection_bounds(scene: &SceneStore, selection: &[ElementId]) -> Option<Bounds> {
    union_bounds(selection.iter().filter_map(|id| scene.get(id)).map(|e| e.geometry.bounds()))
}

/// The box resize handles sit on.
///
/// A single element is framed by its own rectangle at its own rotation, so
/// handles follow its edges. A group is framed by the axis-aligned union of
/// its members' bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionFrame {
    /// The box before rotation.
    pub rect: Bounds,
    /// Clockwise rotation of the box about its center, in degrees.
    pub rotation_degrees: f64,
}

impl SelectionFrame {
    #[must_use]
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    /// Scene position of a point given in the unrotated frame.
    #[must_use]
    pub fn to_scene(&self, local: Point) -> Point {
        rotate_point(local, self.center(), self.rotation_degrees)
    }

    /// Position of a scene point in the unrotated frame.
    #[must_use]
    pub fn to_local(&self, scene_pt: Point) -> Point {
        rotate_point(scene_pt, self.center(), -self.rotation_degrees)
    }

    /// Scene position of a resize handle.
    #[must_use]
    pub fn handle(&self, anchor: ResizeAnchor) -> Point {
        self.to_scene(anchor.handle_point(&self.rect))
    }
}

/// Resize frame of the current selection.
#[must_use]
pub fn selection_frame(scene: &SceneStore, selection: &[ElementId]) -> Option<SelectionFrame> {
    if let [id] = selection {
        if let Some(element) = scene.get(id) {
            let g = &element.geometry;
            return Some(SelectionFrame {
                rect: Bounds::from_rect(g.x, g.y, g.width, g.height),
                rotation_degrees: g.rotation_degrees,
            });
        }
    }
    selection_bounds(scene, selection).map(|rect| SelectionFrame { rect, rotation_degrees: 0.0 })
}

/// Scene position of the rotate handle, above the top edge of the frame.
#[must_use]
pub fn rotate_handle_point(frame: &SelectionFrame, viewport: &Viewport) -> Point {
    let offset = viewport.screen_dist_to_scene(ROTATE_HANDLE_OFFSET_PX);
    frame.to_scene(Point::new(frame.rect.center().x, frame.rect.min_y - offset))
}

/// Test what is under `scene_pt`: selection handles first, then element
/// bodies from topmost (last drawn) down.
#[must_use]
pub fn hit_test(scene_pt: Point, scene: &SceneStore, viewport: &Viewport, selection: &[ElementId]) -> Option<Hit> {
    if let Some(frame) = selection_frame(scene, selection) {
        let slop = viewport.screen_dist_to_scene(HANDLE_RADIUS_PX);
        if selection.len() == 1 && within(scene_pt, rotate_handle_point(&frame, viewport), slop) {
            return Some(Hit::RotateHandle);
        }
        if let Some(anchor) = ResizeAnchor::ALL.into_iter().find(|a| within(scene_pt, frame.handle(*a), slop)) {
            return Some(Hit::ResizeHandle(anchor));
        }
    }

    scene
        .all()
        .iter()
        .rev()
        .find(|e| e.geometry.contains(scene_pt))
        .map(|e| Hit::Element(e.id.clone()))
}

/// Ids of elements whose bounds intersect `rect`, in draw order.
#[must_use]
pub fn elements_in_rect(scene: &SceneStore, rect: &Bounds) -> Vec<ElementId> {
    scene
        .all()
        .iter()
        .filter(|e| e.geometry.bounds().intersects(rect))
        .map(|e| e.id.clone())
        .collect()
}

fn within(a: Point, b: Point, radius: f64) -> bool {
    (a.x - b.x).hypot(a.y - b.y) <= radius
}

//! Element model: seats and structural blocks, their identities, and the
//! canonical (unscaled) geometry every consumer reads.
//!
//! Direct manipulation produces a transient scale factor; [`bake_transform`]
//! folds it into `width`/`height` so nothing outside the active gesture ever
//! observes a scale other than 1.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{LOCAL_ID_PREFIX, SEAT_LABEL_PADDING_PX, STRUCTURE_LABEL_PREFIX};
use crate::geometry::{Bounds, Point, rotate_point, rotated_bounds};

// =============================================================================
// IDENTITY
// =============================================================================

/// Stable element identifier.
///
/// Locally created elements get a `tmp-` prefixed id immediately. Ids assigned
/// by the store are canonical UUIDs; that format alone marks an id as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an id received from the store or the host.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh local (not yet persisted) id.
    #[must_use]
    pub fn local() -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    /// Whether this id has round-tripped through the store.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.0.len() == 36 && Uuid::parse_str(&self.0).is_ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// KIND + ATTRIBUTES
// =============================================================================

/// The kind of a layout element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A bookable seat.
    Seat,
    /// A structural block (wall, door, desk row, pillar...).
    Structure,
}

/// Seat-only attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeatAttributes {
    /// Seat number shown on the seat; never empty once in a scene.
    pub seat_number: String,
    /// Optional alternate number for display and print.
    pub display_number: Option<String>,
    /// Section (zone) this seat belongs to.
    pub section_name: Option<String>,
    /// CSS color of the section.
    pub section_color: Option<String>,
    /// Dense display/print ordering, assigned per save generation.
    pub global_order: Option<i64>,
}

/// Structure-only attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureAttributes {
    /// Free-text label drawn at the center of the block.
    pub label: String,
}

/// Kind-specific attributes. The variant is the element's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Attributes {
    Seat(SeatAttributes),
    Structure(StructureAttributes),
}

impl Attributes {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Seat(_) => ElementKind::Seat,
            Self::Structure(_) => ElementKind::Structure,
        }
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Canonical element geometry in scene pixels. Scale is always 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Left edge of the unrotated box.
    pub x: f64,
    /// Top edge of the unrotated box.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the box center.
    pub rotation_degrees: f64,
}

impl Geometry {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotation_degrees: 0.0 }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Axis-aligned bounds including rotation.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        rotated_bounds(self.x, self.y, self.width, self.height, self.rotation_degrees)
    }

    /// Whether the scene point lies inside the (rotated) box.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let local = rotate_point(p, self.center(), -self.rotation_degrees);
        Bounds::from_rect(self.x, self.y, self.width, self.height).contains(local)
    }

    /// Whether every field is a finite number and the size is positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height, self.rotation_degrees]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Fold an applied scale into the geometry's size.
///
/// Width and height are multiplied by the scale factors and rounded to whole
/// pixels; position and rotation are untouched. A result that is not finite
/// or not at least one pixel on both axes is rejected and the input geometry
/// is returned unchanged.
#[must_use]
pub fn bake_transform(geometry: &Geometry, scale_x: f64, scale_y: f64) -> Geometry {
    try_bake_transform(geometry, scale_x, scale_y).unwrap_or(*geometry)
}

/// Like [`bake_transform`], but reports a rejected scale as `None`.
#[must_use]
pub fn try_bake_transform(geometry: &Geometry, scale_x: f64, scale_y: f64) -> Option<Geometry> {
    let width = (geometry.width * scale_x).round();
    let height = (geometry.height * scale_y).round();
    if !width.is_finite() || !height.is_finite() || width < 1.0 || height < 1.0 {
        return None;
    }
    Some(Geometry { width, height, ..*geometry })
}

/// Label anchor relative to the element center.
///
/// Structure labels sit at the center. Seat labels keep a fixed padding from
/// the top-left corner of the current box.
#[must_use]
pub fn label_offset(kind: ElementKind, geometry: &Geometry) -> Point {
    match kind {
        ElementKind::Structure => Point::new(0.0, 0.0),
        ElementKind::Seat => Point::new(
            -geometry.width / 2.0 + SEAT_LABEL_PADDING_PX,
            -geometry.height / 2.0 + SEAT_LABEL_PADDING_PX,
        ),
    }
}

/// Synthesize a structure label: `STR_` followed by 8 hex chars.
#[must_use]
pub fn synth_structure_label() -> String {
    format!("{STRUCTURE_LABEL_PREFIX}{:08x}", rand::random::<u32>())
}

// =============================================================================
// ELEMENT
// =============================================================================

/// A seat or structure placed on the layout canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutElement {
    pub id: ElementId,
    pub geometry: Geometry,
    pub attributes: Attributes,
    /// Created or changed locally since the last successful save.
    #[serde(default)]
    pub dirty: bool,
}

impl LayoutElement {
    /// A new, dirty seat with a local id.
    #[must_use]
    pub fn new_seat(geometry: Geometry, seat_number: impl Into<String>) -> Self {
        Self {
            id: ElementId::local(),
            geometry,
            attributes: Attributes::Seat(SeatAttributes { seat_number: seat_number.into(), ..Default::default() }),
            dirty: true,
        }
    }

    /// A new, dirty structure with a local id.
    #[must_use]
    pub fn new_structure(geometry: Geometry, label: impl Into<String>) -> Self {
        Self {
            id: ElementId::local(),
            geometry,
            attributes: Attributes::Structure(StructureAttributes { label: label.into() }),
            dirty: true,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.attributes.kind()
    }

    /// The text drawn on the element: seat number or structure label.
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.attributes {
            Attributes::Seat(seat) => &seat.seat_number,
            Attributes::Structure(structure) => &structure.label,
        }
    }

    #[must_use]
    pub fn seat(&self) -> Option<&SeatAttributes> {
        match &self.attributes {
            Attributes::Seat(seat) => Some(seat),
            Attributes::Structure(_) => None,
        }
    }

    /// Replace the drawn text. Blank text is rejected.
    pub fn set_label(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        match &mut self.attributes {
            Attributes::Seat(seat) => seat.seat_number = text.to_string(),
            Attributes::Structure(structure) => structure.label = text.to_string(),
        }
        true
    }

    /// Switch kind, dropping every attribute of the previous kind.
    ///
    /// `required` becomes the new seat number or structure label.
    pub fn convert(&mut self, kind: ElementKind, required: String) {
        if self.kind() == kind {
            return;
        }
        self.attributes = match kind {
            ElementKind::Seat => Attributes::Seat(SeatAttributes { seat_number: required, ..Default::default() }),
            ElementKind::Structure => Attributes::Structure(StructureAttributes { label: required }),
        };
    }
}

//! Pure geometry helpers: points, axis-aligned bounds, rotation, viewport
//! fitting, and nearest-anchor search. Nothing here holds state.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

/// A point in either screen or scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a host viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Bounds of the rectangle at `(x, y)` with the given size.
    #[must_use]
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { min_x: x.min(x + width), min_y: y.min(y + height), max_x: x.max(x + width), max_y: y.max(y + height) }
    }

    /// Bounds spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { min_x: a.x.min(b.x), min_y: a.y.min(b.y), max_x: a.x.max(b.x), max_y: a.y.max(b.y) }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Whether the two boxes overlap (touching edges count).
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x && other.min_x <= self.max_x && self.min_y <= other.max_y && other.min_y <= self.max_y
    }

    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Union of all bounds, or `None` for an empty iterator.
pub fn union_bounds<I>(bounds: I) -> Option<Bounds>
where
    I: IntoIterator<Item = Bounds>,
{
    bounds.into_iter().reduce(|acc, b| acc.union(&b))
}

/// Rotate `p` clockwise by `degrees` around `center` (screen convention, y down).
#[must_use]
pub fn rotate_point(p: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Axis-aligned bounds of a rectangle rotated around its center.
#[must_use]
pub fn rotated_bounds(x: f64, y: f64, width: f64, height: f64, rotation_degrees: f64) -> Bounds {
    let base = Bounds::from_rect(x, y, width, height);
    if rotation_degrees.rem_euclid(360.0) == 0.0 {
        return base;
    }
    let center = base.center();
    let corners = [
        Point::new(base.min_x, base.min_y),
        Point::new(base.max_x, base.min_y),
        Point::new(base.max_x, base.max_y),
        Point::new(base.min_x, base.max_y),
    ];
    let mut out = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for corner in corners {
        let r = rotate_point(corner, center, rotation_degrees);
        out.min_x = out.min_x.min(r.x);
        out.min_y = out.min_y.min(r.y);
        out.max_x = out.max_x.max(r.x);
        out.max_y = out.max_y.max(r.y);
    }
    out
}

/// Vertical placement used when fitting content into a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalFit {
    /// Center the content vertically.
    Center,
    /// Pin the content's top edge at the given margin (compact/mobile mode).
    Top(f64),
}

/// Translation that centers `content` horizontally within `viewport`, and
/// either centers it vertically or pins it to a top margin.
#[must_use]
pub fn fit_translation(content: Bounds, viewport: Size, vertical: VerticalFit) -> Point {
    let tx = (viewport.width - content.width()) / 2.0 - content.min_x;
    let ty = match vertical {
        VerticalFit::Center => (viewport.height - content.height()) / 2.0 - content.min_y,
        VerticalFit::Top(margin) => margin - content.min_y,
    };
    Point::new(tx, ty)
}

/// The candidate closest to `value` whose distance is at most `threshold`.
///
/// Ties keep the first candidate encountered.
pub fn nearest_anchor<I>(value: f64, candidates: I, threshold: f64) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(f64, f64)> = None;
    for candidate in candidates {
        let dist = (candidate - value).abs();
        if dist > threshold || !dist.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((candidate, dist));
        }
    }
    best.map(|(c, _)| c)
}

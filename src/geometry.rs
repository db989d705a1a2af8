//! Rectangles and the relative-geometry transform.
//!
//! A window's placement is normalised as a fraction of the monitor it
//! currently sits on ([`build_relative`]) and then projected onto another
//! monitor ([`build_absolute`]).  A window covering the left half of a
//! 1920×1080 monitor therefore covers the left half of a 2560×1440 monitor
//! after the move, regardless of the difference in resolution.

use std::fmt;

/// An integer rectangle in display-space pixels.
///
/// Used both for window geometry (including decorations) and for monitor
/// bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Whether the X intervals of `self` and `other` intersect with a
    /// strictly positive length.  Touching edges do not count.
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        other.x < self.right() && other.right() > self.x
    }

    /// Whether the Y intervals of `self` and `other` intersect with a
    /// strictly positive length.  Touching edges do not count.
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        other.y < self.bottom() && other.bottom() > self.y
    }

    /// Area of the intersection with `other`, or `0` if they don't overlap.
    pub fn intersect_area(&self, other: &Rect) -> i64 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            (right - left) as i64 * (bottom - top) as i64
        } else {
            0
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A rectangle expressed as fractions of a containing rectangle.
///
/// Components are not clamped: a window hanging off the edge of its monitor
/// yields values outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Project `geometry` onto `container`.
///
/// `container` must have a nonzero width and height.
pub fn build_relative(geometry: Rect, container: Rect) -> RelativeGeometry {
    let cw = container.width as f64;
    let ch = container.height as f64;
    RelativeGeometry {
        x: (geometry.x - container.x) as f64 / cw,
        y: (geometry.y - container.y) as f64 / ch,
        width: geometry.width as f64 / cw,
        height: geometry.height as f64 / ch,
    }
}

/// Inverse of [`build_relative`]: place `rel` inside `container`.
///
/// Every product is truncated toward zero.
pub fn build_absolute(rel: RelativeGeometry, container: Rect) -> Rect {
    let cw = container.width as f64;
    let ch = container.height as f64;
    Rect {
        x: container.x + (rel.x * cw) as i32,
        y: container.y + (rel.y * ch) as i32,
        width: (rel.width * cw) as i32,
        height: (rel.height * ch) as i32,
    }
}

/// Index of the rectangle in `haystack` sharing the largest area with
/// `needle`.
///
/// The first rectangle wins on ties.  Returns `None` if nothing overlaps.
pub fn largest_overlap_index(needle: &Rect, haystack: &[Rect]) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (i, r) in haystack.iter().enumerate() {
        let area = needle.intersect_area(r);
        if area > best.map_or(0, |(_, a)| a) {
            best = Some((i, area));
        }
    }
    best.map(|(i, _)| i)
}

/// Translate a requested *frame* size into the client size a reparenting
/// window manager expects.
///
/// Window managers interpret move/resize requests as client-area sizes and
/// add their decorations on top.  Subtracting the overhead
/// (`frame - client`) makes the final decorated frame match the request.
/// Each result is clamped to at least 1.
pub fn client_size_for_frame(width: i32, height: i32, frame: Rect, client: Rect) -> (i32, i32) {
    let w = width - (frame.width - client.width);
    let h = height - (frame.height - client.height);
    (w.max(1), h.max(1))
}

//! Directional monitor selection.
//!
//! [`find_next`] picks the nearest monitor strictly past the current one in
//! a compass direction, considering only monitors that share some extent
//! with the current one on the orthogonal axis.  A monitor diagonally
//! below-right is never "east".

use crate::command::Direction;
use crate::geometry::Rect;

/// How to compare monitors for one direction: which coordinate to look at,
/// which axis has to overlap, and which way is "forward".
struct Search {
    position: fn(&Rect) -> i32,
    overlaps: fn(&Rect, &Rect) -> bool,
    sign: i64,
}

impl Search {
    fn for_direction(direction: Direction) -> Self {
        if direction.is_horizontal() {
            Self {
                position: |r| r.x,
                overlaps: Rect::overlaps_y,
                sign: direction.sign(),
            }
        } else {
            Self {
                position: |r| r.y,
                overlaps: Rect::overlaps_x,
                sign: direction.sign(),
            }
        }
    }

    /// Position scaled by the search sign, so "further in the direction" is
    /// always "larger".
    fn key(&self, r: &Rect) -> i64 {
        self.sign * (self.position)(r) as i64
    }
}

/// Find the next monitor from `current` in `direction`.
///
/// Ties between monitors at the same position go to whichever appears first
/// in `monitors`.  When nothing lies further and `wrap` is set, the monitor
/// at the far opposite end is chosen instead.  If there is still no
/// candidate, `current` itself is returned, meaning "nothing to do".
///
/// `current` is excluded by value, so callers must pass the exact rectangle
/// taken from `monitors`.
pub fn find_next(current: Rect, monitors: &[Rect], direction: Direction, wrap: bool) -> Rect {
    let search = Search::for_direction(direction);
    let current_key = search.key(&current);

    let mut next: Option<Rect> = None;
    let mut far_end: Option<Rect> = None;

    for r in monitors {
        if *r == current || !(search.overlaps)(r, &current) {
            continue;
        }
        let key = search.key(r);

        if key > current_key && next.map_or(true, |n| key < search.key(&n)) {
            next = Some(*r);
        }

        if wrap && far_end.map_or(true, |m| key < search.key(&m)) {
            far_end = Some(*r);
        }
    }

    next.or(far_end).unwrap_or(current)
}

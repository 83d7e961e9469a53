//! Integer 2D vectors and half-open rectangles shared by every subsystem.
//!
//! Coordinates are zero-origined and grow right/down, matching the order a
//! [`Map`](crate::map::Map) is laid out in. A [`Rect`] is always half-open:
//! `[px, kx) x [py, ky)`, so `width()`/`height()` are always non-negative and
//! an empty rectangle has `px == kx` or `py == ky`.

use crate::rng::Rng;
use bevy_math::IVec2;

/// Build an [`IVec2`] from components; re-exported for call-site brevity.
#[inline]
#[must_use]
pub fn vec2(x: i32, y: i32) -> IVec2 {
    IVec2::new(x, y)
}

/// A half-open integer rectangle `[px, kx) x [py, ky)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    px: i32,
    py: i32,
    kx: i32,
    ky: i32,
}

impl Rect {
    /// Create a rectangle from a top-left point and a size.
    #[inline]
    #[must_use]
    pub fn new(top_left: IVec2, size: IVec2) -> Self {
        Self {
            px: top_left.x,
            py: top_left.y,
            kx: top_left.x + size.x,
            ky: top_left.y + size.y,
        }
    }

    /// Create a rectangle spanning `[0, width) x [0, height)`.
    #[inline]
    #[must_use]
    pub fn sized(width: i32, height: i32) -> Self {
        Self {
            px: 0,
            py: 0,
            kx: width,
            ky: height,
        }
    }

    /// Create a rectangle from its top-left and bottom-right corners.
    #[inline]
    #[must_use]
    pub fn from_corners(top_left: IVec2, bottom_right: IVec2) -> Self {
        Self {
            px: top_left.x,
            py: top_left.y,
            kx: bottom_right.x,
            ky: bottom_right.y,
        }
    }

    #[inline]
    #[must_use]
    pub fn left(&self) -> i32 {
        self.px
    }

    #[inline]
    #[must_use]
    pub fn top(&self) -> i32 {
        self.py
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> i32 {
        self.kx
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.ky
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> i32 {
        self.kx - self.px
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> i32 {
        self.ky - self.py
    }

    #[inline]
    #[must_use]
    pub fn top_left(&self) -> IVec2 {
        vec2(self.px, self.py)
    }

    #[inline]
    #[must_use]
    pub fn bottom_right(&self) -> IVec2 {
        vec2(self.kx, self.ky)
    }

    #[inline]
    #[must_use]
    pub fn empty(&self) -> bool {
        self.px >= self.kx || self.py >= self.ky
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.px && p.x < self.kx && p.y >= self.py && p.y < self.ky
    }

    #[inline]
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.px >= self.px && other.py >= self.py && other.kx <= self.kx && other.ky <= self.ky
    }

    /// Shrink this rectangle by `margin` on every side.
    #[inline]
    #[must_use]
    pub fn minus_margin(&self, margin: i32) -> Rect {
        Rect {
            px: self.px + margin,
            py: self.py + margin,
            kx: self.kx - margin,
            ky: self.ky - margin,
        }
    }

    /// The center point, rounding toward the top-left on odd dimensions.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> IVec2 {
        vec2(self.px + self.width() / 2, self.py + self.height() / 2)
    }

    /// A uniformly random point within this rectangle.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle is empty.
    #[must_use]
    pub fn random(&self, rng: &mut Rng) -> IVec2 {
        crate::rng::random_point(rng, self.px, self.py, self.kx, self.ky)
    }

    /// Iterate every cell in this rectangle in column-major order: `x` varies
    /// in the outer loop, `y` in the inner loop. Every paint generator relies
    /// on this order for determinism.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> RectIter {
        RectIter {
            rect: *self,
            x: self.px,
            y: self.py,
        }
    }
}

/// Column-major iterator over a [`Rect`]'s cells.
#[derive(Debug, Clone)]
pub struct RectIter {
    rect: Rect,
    x: i32,
    y: i32,
}

impl Iterator for RectIter {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        if self.rect.empty() || self.x >= self.rect.kx {
            return None;
        }
        let v = vec2(self.x, self.y);
        self.y += 1;
        if self.y >= self.rect.ky {
            self.y = self.rect.py;
            self.x += 1;
        }
        Some(v)
    }
}

impl IntoIterator for Rect {
    type Item = IVec2;
    type IntoIter = RectIter;

    fn into_iter(self) -> RectIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rng::Rng;

    #[test]
    fn test_column_major_order() {
        let r = Rect::sized(2, 3);
        let cells: Vec<IVec2> = r.iter().collect();
        assert_eq!(
            cells,
            vec![
                vec2(0, 0),
                vec2(0, 1),
                vec2(0, 2),
                vec2(1, 0),
                vec2(1, 1),
                vec2(1, 2),
            ]
        );
    }

    #[test]
    fn test_minus_margin() {
        let r = Rect::sized(5, 5).minus_margin(1);
        assert_eq!(r.top_left(), vec2(1, 1));
        assert_eq!(r.bottom_right(), vec2(4, 4));
    }

    #[test]
    fn test_empty() {
        assert!(Rect::sized(0, 4).empty());
        assert!(Rect::sized(4, 0).empty());
        assert!(!Rect::sized(1, 1).empty());
    }

    #[test]
    fn test_random_within_bounds() {
        let mut rng = Rng::seed_from_u64(1);
        let r = Rect::sized(10, 10);
        for _ in 0..100 {
            assert!(r.contains(r.random(&mut rng)));
        }
    }

    #[test]
    fn test_middle() {
        let r = Rect::sized(4, 4);
        assert_eq!(r.middle(), vec2(2, 2));
    }
}

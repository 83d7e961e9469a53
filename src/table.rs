//! A dense, bounds-checked 2D array indexed by `(x, y)`.

use crate::geom::Rect;
use bevy_math::IVec2;

/// A dense `width x height` grid of `T`, laid out column-major (`x * height
/// + y`) to match [`Rect::iter`]'s iteration order.
#[derive(Debug, Clone)]
pub struct Table<T> {
    bounds: Rect,
    cells: Vec<T>,
}

impl<T: Clone> Table<T> {
    /// Create a table over `[0, width) x [0, height)`, filled with `value`.
    #[inline]
    #[must_use]
    pub fn filled(width: i32, height: i32, value: T) -> Self {
        Self::filled_over(Rect::sized(width, height), value)
    }

    /// Create a table over an arbitrary (possibly non-zero-origined) `bounds`,
    /// filled with `value`. Lets a table be indexed directly by the absolute
    /// coordinates of the rectangle it covers, rather than requiring callers
    /// to translate to a local zero-origined space themselves.
    #[inline]
    #[must_use]
    pub fn filled_over(bounds: Rect, value: T) -> Self {
        let len = (bounds.width() * bounds.height()).max(0);
        Self {
            bounds,
            cells: vec![value; len as usize],
        }
    }
}

impl<T: Default + Clone> Table<T> {
    /// Create a table over `[0, width) x [0, height)`, default-initialized.
    #[inline]
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Create a table over an arbitrary `bounds`, default-initialized. See
    /// [`Table::filled_over`].
    #[inline]
    #[must_use]
    pub fn new_over(bounds: Rect) -> Self {
        Self::filled_over(bounds, T::default())
    }
}

impl<T> Table<T> {
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    fn index(&self, v: IVec2) -> usize {
        debug_assert!(
            self.bounds.contains(v),
            "index {:?} out of bounds {:?}",
            v,
            self.bounds
        );
        ((v.x - self.bounds.left()) * self.bounds.height() + (v.y - self.bounds.top())) as usize
    }

    #[inline]
    #[must_use]
    pub fn get(&self, v: IVec2) -> &T {
        let i = self.index(v);
        &self.cells[i]
    }

    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, v: IVec2) -> &mut T {
        let i = self.index(v);
        &mut self.cells[i]
    }

    #[inline]
    pub fn set(&mut self, v: IVec2, value: T) {
        let i = self.index(v);
        self.cells[i] = value;
    }

    /// Iterate `((x, y), &value)` pairs in the table's storage order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &T)> {
        self.bounds.iter().map(move |v| (v, self.get(v)))
    }
}

impl<T> std::ops::Index<IVec2> for Table<T> {
    type Output = T;

    #[inline]
    fn index(&self, v: IVec2) -> &T {
        self.get(v)
    }
}

impl<T> std::ops::IndexMut<IVec2> for Table<T> {
    #[inline]
    fn index_mut(&mut self, v: IVec2) -> &mut T {
        self.get_mut(v)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::vec2;

    #[test]
    fn test_get_set() {
        let mut t = Table::new(3, 3);
        t.set(vec2(1, 2), 7i32);
        assert_eq!(*t.get(vec2(1, 2)), 7);
        assert_eq!(*t.get(vec2(0, 0)), 0);
    }

    #[test]
    fn test_index_operators() {
        let mut t = Table::filled(2, 2, 0u8);
        t[vec2(1, 1)] = 9;
        assert_eq!(t[vec2(1, 1)], 9);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics_in_debug() {
        let t: Table<i32> = Table::new(2, 2);
        let _ = t.get(vec2(5, 5));
    }

    #[test]
    fn test_iter_covers_all_cells() {
        let t = Table::filled(2, 3, 1i32);
        let count = t.iter().count();
        assert_eq!(count, 6);
    }

    #[test]
    fn test_new_over_addresses_by_absolute_coordinates() {
        let bounds = Rect::new(vec2(5, 5), vec2(2, 2));
        let mut t: Table<i32> = Table::new_over(bounds);
        t.set(vec2(6, 6), 42);
        assert_eq!(*t.get(vec2(6, 6)), 42);
        assert_eq!(*t.get(vec2(5, 5)), 0);
    }

    #[test]
    #[should_panic]
    fn test_new_over_rejects_coordinates_outside_its_offset_bounds() {
        let bounds = Rect::new(vec2(5, 5), vec2(2, 2));
        let t: Table<i32> = Table::new_over(bounds);
        let _ = t.get(vec2(0, 0));
    }
}

//! The map (the engine's sole output) and the canvas view generators see.

use crate::geom::Rect;
use crate::table::Table;
use crate::token::Token;
use bevy_math::IVec2;
use fxhash::FxHashSet;

/// A rectangular, zero-origined grid of fixed dimensions. Each cell holds a
/// set of tokens; duplicates are not observable. Initially every cell is
/// empty. The map is the sole accumulator of engine output.
#[derive(Debug, Clone)]
pub struct Map {
    cells: Table<FxHashSet<Token>>,
}

impl Map {
    /// Create an empty `width x height` map.
    #[inline]
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            cells: Table::new(width, height),
        }
    }

    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.cells.bounds()
    }

    #[inline]
    #[must_use]
    pub fn tokens(&self, cell: IVec2) -> &FxHashSet<Token> {
        self.cells.get(cell)
    }

    #[inline]
    pub fn insert(&mut self, cell: IVec2, token: Token) {
        self.cells.get_mut(cell).insert(token);
    }

    #[inline]
    pub fn remove(&mut self, cell: IVec2, token: &Token) {
        self.cells.get_mut(cell).remove(token);
    }

    #[inline]
    pub fn clear_cell(&mut self, cell: IVec2) {
        self.cells.get_mut(cell).clear();
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, cell: IVec2, token: &Token) -> bool {
        self.cells.get(cell).contains(token)
    }
}

/// A view restriction over a shared [`Map`]: a sub-rectangle of interest plus
/// a mutable borrow of the map itself. A canvas does not own its map; it is
/// cheap to reborrow when recursing into a sub-generator with a narrower
/// area. Invariant: `area` is always a subset of `map.bounds()`.
pub struct Canvas<'m> {
    area: Rect,
    map: &'m mut Map,
}

impl<'m> Canvas<'m> {
    /// Create a canvas covering the map's full bounds.
    #[inline]
    #[must_use]
    pub fn whole(map: &'m mut Map) -> Self {
        let area = map.bounds();
        Self { area, map }
    }

    #[inline]
    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    #[inline]
    #[must_use]
    pub fn map(&self) -> &Map {
        self.map
    }

    #[inline]
    #[must_use]
    pub fn map_mut(&mut self) -> &mut Map {
        self.map
    }

    /// Reborrow this canvas over a narrower sub-rectangle of the same map.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `area` is not contained within the
    /// current map's bounds, which would violate the canvas invariant.
    #[inline]
    #[must_use]
    pub fn with(&mut self, area: Rect) -> Canvas<'_> {
        debug_assert!(
            self.map.bounds().contains_rect(&area),
            "canvas area {:?} escapes map bounds {:?}",
            area,
            self.map.bounds()
        );
        Canvas {
            area,
            map: self.map,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::vec2;

    #[test]
    fn test_insert_and_contains() {
        let mut map = Map::new(3, 3);
        let t = Token::new("x");
        map.insert(vec2(1, 1), t.clone());
        assert!(map.contains(vec2(1, 1), &t));
        assert!(!map.contains(vec2(0, 0), &t));
    }

    #[test]
    fn test_clear_cell() {
        let mut map = Map::new(2, 2);
        map.insert(vec2(0, 0), Token::new("a"));
        map.insert(vec2(0, 0), Token::new("b"));
        map.clear_cell(vec2(0, 0));
        assert!(map.tokens(vec2(0, 0)).is_empty());
    }

    #[test]
    fn test_canvas_with_narrows_area() {
        let mut map = Map::new(10, 10);
        let mut canvas = Canvas::whole(&mut map);
        let sub = canvas.with(Rect::new(vec2(2, 2), vec2(3, 3)));
        assert_eq!(sub.area().width(), 3);
        assert_eq!(sub.area().height(), 3);
    }

    #[test]
    #[should_panic]
    fn test_canvas_with_rejects_escaping_area() {
        let mut map = Map::new(4, 4);
        let mut canvas = Canvas::whole(&mut map);
        let _ = canvas.with(Rect::new(vec2(2, 2), vec2(10, 10)));
    }
}

//! Grid-based shortest-path router used by the `Connect` generator.
//!
//! An A* search over a 4-connected grid, plus the `Dijkstra` (multi-source
//! distance map) and `BfSearch` (reachability) variants that share its
//! generation-counted distance table. The search runs from the destination
//! back to the source so that the reconstructed path, read front to back,
//! is already in source-to-target order and a caller can advance a cursor
//! toward the target one step at a time.
//!
//! Adapted from the binary-heap, index-cached A* in
//! [`crate`]'s teacher (`pathfinding.rs`'s `SmallestCostHolder`), but keyed
//! on a dense generation-counted distance table rather than an `IndexMap`,
//! since this router's grid is bounded by the map and not unbounded like a
//! quadtree's cell space.

use crate::geom::{vec2, Rect};
use crate::table::Table;
use bevy_math::IVec2;
use fxhash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

pub const INFINITY: f64 = 1e9;

/// A dense `f64` scratch table invalidated in O(1) by bumping a monotonic
/// generation counter, rather than by rewriting every cell. Shared by
/// [`Router`], [`Dijkstra`], and [`BfSearch`], and reused by `Connect` as its
/// per-invocation entry-cost memo.
#[derive(Debug, Clone)]
struct GenCache {
    values: Table<f64>,
    stamps: Table<u32>,
    generation: u32,
}

impl GenCache {
    fn new(bounds: Rect) -> Self {
        Self {
            values: Table::new_over(bounds),
            stamps: Table::new_over(bounds),
            generation: 1,
        }
    }

    #[inline]
    fn get(&self, v: IVec2) -> Option<f64> {
        if self.stamps[v] == self.generation {
            Some(self.values[v])
        } else {
            None
        }
    }

    #[inline]
    fn set(&mut self, v: IVec2, value: f64) {
        self.values[v] = value;
        self.stamps[v] = self.generation;
    }

    /// Invalidate every cell in O(1).
    #[inline]
    fn clear(&mut self) {
        self.generation += 1;
    }
}

/// The distance table shared by a search run. Reading an unvisited cell
/// returns [`INFINITY`]; clearing is O(1).
#[derive(Debug, Clone)]
pub struct DistanceTable {
    cache: GenCache,
}

impl DistanceTable {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            cache: GenCache::new(bounds),
        }
    }

    #[inline]
    #[must_use]
    pub fn distance(&self, v: IVec2) -> f64 {
        self.cache.get(v).unwrap_or(INFINITY)
    }

    #[inline]
    pub fn set_distance(&mut self, v: IVec2, d: f64) {
        self.cache.set(v, d);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

/// Memoizes a per-cell cost function for the lifetime of one `Connect`
/// generator call, so a cost function that evaluates RNG-advancing
/// predicates draws from the RNG exactly once per cell regardless of how
/// many times the search relaxes an edge into it.
#[derive(Debug, Clone)]
pub struct CostCache {
    cache: GenCache,
}

impl CostCache {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            cache: GenCache::new(bounds),
        }
    }

    /// Return the cached cost for `v`, computing and storing it via `f` on
    /// first access since the last [`clear`](CostCache::clear).
    pub fn get_or_insert_with(&mut self, v: IVec2, f: impl FnOnce(IVec2) -> f64) -> f64 {
        if let Some(cost) = self.cache.get(v) {
            return cost;
        }
        let cost = f(v);
        self.cache.set(v, cost);
        cost
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

/// The four cardinal unit steps, in a fixed declaration order.
#[must_use]
pub fn directions4() -> [IVec2; 4] {
    [vec2(0, -1), vec2(1, 0), vec2(0, 1), vec2(-1, 0)]
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueElem {
    pos: IVec2,
    priority: f64,
}

impl Eq for QueueElem {}

impl Ord for QueueElem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest priority
        // first; ties broken by lexicographic cell order, also reversed.
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                (other.pos.x, other.pos.y)
                    .cmp(&(self.pos.x, self.pos.y))
                    .reverse()
            })
    }
}

impl PartialOrd for QueueElem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single A* search on a 4-connected grid, reconstructed into a
/// source-to-target path. Searches from `to` back toward `from`, so the
/// distance table it builds is relative to `to` and a cursor can walk the
/// stored path toward the target one [`next_move`](Router::next_move) at a
/// time.
#[derive(Debug, Clone)]
pub struct Router {
    path: Vec<IVec2>,
    target: IVec2,
}

impl Router {
    /// Run the search. `entry_cost(cell)` must be strictly positive wherever
    /// reachable (use [`INFINITY`] for impassable cells). `heuristic(cell)`
    /// must be admissible (never overestimate the remaining distance to
    /// `to`). `directions(cell)` returns the candidate moves out of `cell`.
    pub fn new(
        area: Rect,
        distances: &mut DistanceTable,
        mut entry_cost: impl FnMut(IVec2) -> f64,
        heuristic: impl Fn(IVec2) -> f64,
        directions: impl Fn(IVec2) -> Vec<IVec2>,
        from: IVec2,
        to: IVec2,
    ) -> Self {
        distances.clear();
        distances.set_distance(to, 0.0);

        let mut heap = BinaryHeap::new();
        heap.push(QueueElem {
            pos: to,
            priority: 0.0,
        });

        while let Some(QueueElem { pos, .. }) = heap.pop() {
            let pos_dist = distances.distance(pos);
            if pos == from {
                break;
            }
            for dir in directions(pos) {
                let next = pos + dir;
                if !area.contains(next) {
                    continue;
                }
                let next_dist = distances.distance(next);
                if pos_dist >= next_dist {
                    continue;
                }
                let cost = entry_cost(next);
                let dist = pos_dist + cost;
                debug_assert!(dist > pos_dist, "entry cost must be strictly positive");
                if dist < next_dist {
                    distances.set_distance(next, dist);
                    heap.push(QueueElem {
                        pos: next,
                        priority: dist + heuristic(next),
                    });
                }
            }
        }

        let path = reconstruct_path(area, distances, &directions, from, to);
        Self { path, target: to }
    }

    /// The reconstructed path in source ( `from` ) to target ( `to` ) order.
    /// Empty only if `from == to` is not the case and no search was run;
    /// otherwise always contains at least the two (possibly equal)
    /// endpoints.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &[IVec2] {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> IVec2 {
        self.target
    }

    /// `true` if `pos` is the current walking cursor: either the remaining
    /// path's first element, or the one right after it.
    #[must_use]
    pub fn is_reachable(&self, pos: IVec2) -> bool {
        (!self.path.is_empty() && self.path[0] == pos)
            || (self.path.len() >= 2 && self.path[1] == pos)
    }

    /// Advance the walking cursor from `pos` one step toward the target.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not [`is_reachable`](Router::is_reachable).
    pub fn next_move(&mut self, pos: IVec2) -> IVec2 {
        assert!(self.is_reachable(pos), "{:?} is not on the live path", pos);
        if pos != self.path[0] {
            self.path.remove(0);
        }
        self.path[1]
    }
}

fn reconstruct_path(
    area: Rect,
    distances: &DistanceTable,
    directions: &impl Fn(IVec2) -> Vec<IVec2>,
    from: IVec2,
    to: IVec2,
) -> Vec<IVec2> {
    let mut forward = vec![from];
    let mut pos = from;
    while pos != to {
        let mut lowest = distances.distance(pos);
        let mut next = None;
        for dir in directions(pos) {
            let cand = pos + dir;
            if area.contains(cand) {
                let d = distances.distance(cand);
                if d < lowest {
                    lowest = d;
                    next = Some(cand);
                }
            }
        }
        match next {
            Some(n) => {
                pos = n;
                forward.push(pos);
            }
            // No strictly closer neighbour: the target is unreachable from
            // here. Return the best partial walk rather than panicking.
            None => break,
        }
    }
    forward
}

/// Multi-source distance map up to `max_dist`, sharing a [`DistanceTable`].
#[derive(Debug, Clone)]
pub struct Dijkstra {
    reachable: FxHashMap<IVec2, f64>,
}

impl Dijkstra {
    pub fn new(
        area: Rect,
        distances: &mut DistanceTable,
        from: &[IVec2],
        max_dist: f64,
        mut entry_cost: impl FnMut(IVec2) -> f64,
        directions: impl Fn(IVec2) -> Vec<IVec2>,
    ) -> Self {
        distances.clear();
        let mut heap = BinaryHeap::new();
        for &v in from {
            distances.set_distance(v, 0.0);
            heap.push(QueueElem {
                pos: v,
                priority: 0.0,
            });
        }

        let mut reachable = FxHashMap::default();
        while let Some(QueueElem { pos, .. }) = heap.pop() {
            let cdist = distances.distance(pos);
            if cdist > max_dist || reachable.contains_key(&pos) {
                continue;
            }
            reachable.insert(pos, cdist);
            for dir in directions(pos) {
                let next = pos + dir;
                if !area.contains(next) {
                    continue;
                }
                let next_dist = distances.distance(next);
                if cdist >= next_dist {
                    continue;
                }
                let cost = entry_cost(next);
                let dist = cdist + cost;
                debug_assert!(dist > cdist, "entry cost must be strictly positive");
                if dist < next_dist && dist <= max_dist {
                    distances.set_distance(next, dist);
                    heap.push(QueueElem {
                        pos: next,
                        priority: dist,
                    });
                }
            }
        }
        Self { reachable }
    }

    #[inline]
    #[must_use]
    pub fn is_reachable(&self, pos: IVec2) -> bool {
        self.reachable.contains_key(&pos)
    }

    #[inline]
    #[must_use]
    pub fn distance(&self, pos: IVec2) -> Option<f64> {
        self.reachable.get(&pos).copied()
    }

    #[inline]
    #[must_use]
    pub fn all_reachable(&self) -> &FxHashMap<IVec2, f64> {
        &self.reachable
    }
}

/// Breadth-first reachability flood from a single source.
#[derive(Debug, Clone)]
pub struct BfSearch {
    reachable: FxHashSet<IVec2>,
}

impl BfSearch {
    pub fn new(
        area: Rect,
        from: IVec2,
        mut passable: impl FnMut(IVec2) -> bool,
        directions: impl Fn(IVec2) -> Vec<IVec2>,
    ) -> Self {
        let mut reachable = FxHashSet::default();
        reachable.insert(from);
        let mut frontier = VecDeque::new();
        frontier.push_back(from);
        while let Some(pos) = frontier.pop_front() {
            for dir in directions(pos) {
                let next = pos + dir;
                if area.contains(next) && !reachable.contains(&next) && passable(next) {
                    reachable.insert(next);
                    frontier.push_back(next);
                }
            }
        }
        Self { reachable }
    }

    #[inline]
    #[must_use]
    pub fn is_reachable(&self, pos: IVec2) -> bool {
        self.reachable.contains(&pos)
    }

    #[inline]
    #[must_use]
    pub fn all_reachable(&self) -> &FxHashSet<IVec2> {
        &self.reachable
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dirs4(_: IVec2) -> Vec<IVec2> {
        directions4().to_vec()
    }

    #[test]
    fn test_straight_line_path() {
        let area = Rect::sized(5, 1);
        let mut distances = DistanceTable::new(area);
        let router = Router::new(
            area,
            &mut distances,
            |_| 1.0,
            |v| (v.x - 4).unsigned_abs() as f64,
            dirs4,
            vec2(0, 0),
            vec2(4, 0),
        );
        assert_eq!(
            router.path(),
            &[vec2(0, 0), vec2(1, 0), vec2(2, 0), vec2(3, 0), vec2(4, 0)]
        );
    }

    #[test]
    fn test_impassable_wall_is_routed_around() {
        let area = Rect::sized(3, 3);
        let mut distances = DistanceTable::new(area);
        // Wall across the middle row except one gap at x=2.
        let cost = |v: IVec2| -> f64 {
            if v.y == 1 && v.x != 2 {
                INFINITY
            } else {
                1.0
            }
        };
        let router = Router::new(
            area,
            &mut distances,
            cost,
            |v| (v.x - 0).unsigned_abs() as f64 + (v.y - 2).unsigned_abs() as f64,
            dirs4,
            vec2(0, 0),
            vec2(0, 2),
        );
        assert_eq!(router.path().first(), Some(&vec2(0, 0)));
        assert_eq!(router.path().last(), Some(&vec2(0, 2)));
        assert!(router.path().contains(&vec2(2, 1)));
    }

    #[test]
    fn test_cursor_walks_to_target() {
        let area = Rect::sized(3, 1);
        let mut distances = DistanceTable::new(area);
        let mut router = Router::new(
            area,
            &mut distances,
            |_| 1.0,
            |_| 0.0,
            dirs4,
            vec2(0, 0),
            vec2(2, 0),
        );
        let mut pos = vec2(0, 0);
        let mut visited = vec![pos];
        while pos != vec2(2, 0) {
            pos = router.next_move(pos);
            visited.push(pos);
        }
        assert_eq!(visited, vec![vec2(0, 0), vec2(1, 0), vec2(2, 0)]);
    }

    #[test]
    fn test_bf_search_reachability() {
        let area = Rect::sized(3, 3);
        let search = BfSearch::new(area, vec2(0, 0), |_| true, dirs4);
        assert!(search.is_reachable(vec2(2, 2)));
        assert_eq!(search.all_reachable().len(), 9);
    }

    #[test]
    fn test_bf_search_blocked() {
        let area = Rect::sized(3, 1);
        let search = BfSearch::new(area, vec2(0, 0), |v| v.x != 1, dirs4);
        assert!(!search.is_reachable(vec2(2, 0)));
    }

    #[test]
    fn test_dijkstra_distance_grows_with_steps() {
        let area = Rect::sized(5, 1);
        let mut distances = DistanceTable::new(area);
        let d = Dijkstra::new(area, &mut distances, &[vec2(0, 0)], 10.0, |_| 1.0, dirs4);
        assert_eq!(d.distance(vec2(0, 0)), Some(0.0));
        assert_eq!(d.distance(vec2(3, 0)), Some(3.0));
    }

    #[test]
    fn test_distance_table_clear_is_o1_invalidation() {
        let area = Rect::sized(2, 2);
        let mut table = DistanceTable::new(area);
        table.set_distance(vec2(0, 0), 5.0);
        assert_eq!(table.distance(vec2(0, 0)), 5.0);
        table.clear();
        assert_eq!(table.distance(vec2(0, 0)), INFINITY);
    }

    #[test]
    fn test_cost_cache_memoizes() {
        let area = Rect::sized(2, 2);
        let mut cache = CostCache::new(area);
        let mut calls = 0;
        let mut query = |v: IVec2| {
            cache.get_or_insert_with(v, |_| {
                calls += 1;
                3.0
            })
        };
        assert_eq!(query(vec2(0, 0)), 3.0);
        assert_eq!(query(vec2(0, 0)), 3.0);
        assert_eq!(calls, 1);
    }
}

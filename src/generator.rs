//! The recursive generator variant tree and its single dispatch operation,
//! [`Generator::make`].
//!
//! A generator is a pure function of `(map, rng) -> (map', rng', bool)`: it
//! paints tokens onto cells reachable through its canvas and returns whether
//! it satisfied its own constraints. `false` is a first-class outcome, never
//! an exception, and there is no rollback — a failed generator's partial
//! writes to the map stay.

use crate::geom::{vec2, Rect};
use crate::map::{Canvas, Map};
use crate::noise::{self, midpoint_displacement};
use crate::predicate::Predicate;
use crate::rng::Rng;
use crate::router::{directions4, CostCache, DistanceTable, Router, INFINITY};
use crate::table::Table;
use crate::token::Token;
use bevy_math::IVec2;
use serde::{Deserialize, Serialize};

/// How many random endpoint pairs `Connect` draws, regardless of whether the
/// graph is already fully connected. Kept as a named constant rather than a
/// literal so a future caller can make it configurable; the source always
/// used 30.
pub const CONNECT_ATTEMPTS: u32 = 30;

/// Soft-infinite retry budget for a single `Place` attempt.
pub const PLACE_MAX_TRIES: u32 = 100_000;

/// Which edge a [`Generator::Margin`] strip is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginType {
    Top,
    Bottom,
    Left,
    Right,
}

/// Fixed placement positions `Place` understands besides uniform-random.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementPos {
    Middle,
}

fn default_count() -> i32 {
    1
}

/// One entry of a [`Generator::Place`] node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceElem {
    pub size: IVec2,
    #[serde(default = "default_count")]
    pub count: i32,
    #[serde(default)]
    pub predicate: Predicate,
    #[serde(default)]
    pub position: Option<PlacementPos>,
    pub generator: Box<Generator>,
}

/// One entry of a [`Generator::NoiseMap`] node: a half-open quantile band
/// `[lower, upper)` and the generator invoked on every cell that falls in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseMapElem {
    pub lower: f64,
    pub upper: f64,
    pub generator: Box<Generator>,
}

/// One entry of a [`Generator::Connect`] node. A cell matches `predicate`
/// contributes `cost` to the router if set; an unset `cost` makes matching
/// cells impassable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectElem {
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub predicate: Predicate,
    pub generator: Box<Generator>,
}

/// The recursive, compositional tree of spatial generators. Every
/// sub-generator slot is boxed to break the otherwise-infinite type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Generator {
    /// No-op; always succeeds.
    None,
    /// Inserts every token into every cell of the canvas.
    Set(Vec<Token>),
    /// Clears each cell's token set, then inserts `tokens`.
    Reset(Vec<Token>),
    /// Per cell, inserts `token` if `predicate` holds (RNG-advancing).
    SetMaybe(Predicate, Token),
    /// Removes each listed token from every cell.
    Remove(Vec<Token>),
    /// Splits the canvas into a `width`-thick edge strip and the remainder.
    Margin {
        kind: MarginType,
        width: i32,
        border: Box<Generator>,
        inside: Box<Generator>,
    },
    /// A four-sided frame: an interior shrunk by `width` on every side, plus
    /// edge strips on all four sides.
    Margins {
        width: i32,
        border: Box<Generator>,
        inside: Box<Generator>,
    },
    /// Horizontal split at `left() + floor(width * ratio)`.
    HRatio {
        ratio: f64,
        left: Box<Generator>,
        right: Box<Generator>,
    },
    /// Vertical split at `top() + floor(height * ratio)`.
    VRatio {
        ratio: f64,
        top: Box<Generator>,
        bottom: Box<Generator>,
    },
    /// Random non-overlapping placement of rectangular sub-generators.
    Place(Vec<PlaceElem>),
    /// Fractal-noise quantile banding.
    NoiseMap(Vec<NoiseMapElem>),
    /// Sequential composition; fails on the first failing child.
    Chain(Vec<Generator>),
    /// Routes paths between random cells matching `to_connect`, painting
    /// per-cell generators along each route.
    Connect {
        to_connect: Predicate,
        elems: Vec<ConnectElem>,
    },
}

impl Generator {
    /// Evaluate this generator against `canvas`, possibly advancing `rng`
    /// and mutating the underlying map. Returns whether the generator
    /// satisfied its own constraints; a `false` result leaves any partial
    /// writes in place.
    pub fn make(&self, canvas: &mut Canvas, rng: &mut Rng) -> bool {
        match self {
            Generator::None => true,
            Generator::Set(tokens) => {
                let area = canvas.area();
                for v in area.iter() {
                    for t in tokens {
                        canvas.map_mut().insert(v, t.clone());
                    }
                }
                true
            }
            Generator::Reset(tokens) => {
                let area = canvas.area();
                for v in area.iter() {
                    canvas.map_mut().clear_cell(v);
                    for t in tokens {
                        canvas.map_mut().insert(v, t.clone());
                    }
                }
                true
            }
            Generator::SetMaybe(predicate, token) => {
                let area = canvas.area();
                for v in area.iter() {
                    let hit = predicate.eval(canvas.map(), v, rng);
                    if hit {
                        canvas.map_mut().insert(v, token.clone());
                    }
                }
                true
            }
            Generator::Remove(tokens) => {
                let area = canvas.area();
                for v in area.iter() {
                    for t in tokens {
                        canvas.map_mut().remove(v, t);
                    }
                }
                true
            }
            Generator::Margin {
                kind,
                width,
                border,
                inside,
            } => {
                let (border_rect, inside_rect) = margin_rects(canvas.area(), *kind, *width);
                border.make(&mut canvas.with(border_rect), rng)
                    && inside.make(&mut canvas.with(inside_rect), rng)
            }
            Generator::Margins {
                width,
                border,
                inside,
            } => {
                let area = canvas.area();
                let w = *width;
                let inside_rect = area.minus_margin(w);
                let top = Rect::from_corners(area.top_left(), vec2(area.right(), area.top() + w));
                let bottom =
                    Rect::from_corners(vec2(area.left(), area.bottom() - w), area.bottom_right());
                let right = Rect::from_corners(
                    vec2(area.right() - w, area.top() + w),
                    vec2(area.right(), area.bottom() - w),
                );
                let left = Rect::from_corners(
                    vec2(area.left(), area.top() + w),
                    vec2(area.left() + w, area.bottom() - w),
                );
                inside.make(&mut canvas.with(inside_rect), rng)
                    && border.make(&mut canvas.with(top), rng)
                    && border.make(&mut canvas.with(right), rng)
                    && border.make(&mut canvas.with(bottom), rng)
                    && border.make(&mut canvas.with(left), rng)
            }
            Generator::HRatio { ratio, left, right } => {
                let area = canvas.area();
                let split = area.left() + (area.width() as f64 * ratio) as i32;
                let left_rect = Rect::from_corners(area.top_left(), vec2(split, area.bottom()));
                let right_rect = Rect::from_corners(vec2(split, area.top()), area.bottom_right());
                left.make(&mut canvas.with(left_rect), rng)
                    && right.make(&mut canvas.with(right_rect), rng)
            }
            Generator::VRatio { ratio, top, bottom } => {
                let area = canvas.area();
                let split = area.top() + (area.height() as f64 * ratio) as i32;
                let top_rect = Rect::from_corners(area.top_left(), vec2(area.right(), split));
                let bottom_rect = Rect::from_corners(vec2(area.left(), split), area.bottom_right());
                top.make(&mut canvas.with(top_rect), rng)
                    && bottom.make(&mut canvas.with(bottom_rect), rng)
            }
            Generator::Place(elems) => make_place(elems, canvas, rng),
            Generator::NoiseMap(elems) => make_noise_map(elems, canvas, rng),
            Generator::Chain(gens) => {
                for g in gens {
                    if !g.make(canvas, rng) {
                        return false;
                    }
                }
                true
            }
            Generator::Connect { to_connect, elems } => make_connect(to_connect, elems, canvas, rng),
        }
    }
}

fn margin_rects(area: Rect, kind: MarginType, width: i32) -> (Rect, Rect) {
    match kind {
        MarginType::Top => (
            Rect::from_corners(area.top_left(), vec2(area.right(), area.top() + width)),
            Rect::from_corners(vec2(area.left(), area.top() + width), area.bottom_right()),
        ),
        MarginType::Bottom => (
            Rect::from_corners(vec2(area.left(), area.bottom() - width), area.bottom_right()),
            Rect::from_corners(area.top_left(), vec2(area.right(), area.bottom() - width)),
        ),
        MarginType::Left => (
            Rect::from_corners(area.top_left(), vec2(area.left() + width, area.bottom())),
            Rect::from_corners(vec2(area.left() + width, area.top()), area.bottom_right()),
        ),
        MarginType::Right => (
            Rect::from_corners(vec2(area.right() - width, area.top()), area.bottom_right()),
            Rect::from_corners(area.top_left(), vec2(area.right() - width, area.bottom())),
        ),
    }
}

fn make_place(elems: &[PlaceElem], canvas: &mut Canvas, rng: &mut Rng) -> bool {
    let area = canvas.area();
    let mut occupied: Table<bool> = Table::new_over(area);
    for elem in elems {
        for _ in 0..elem.count {
            if !place_one(elem, area, &mut occupied, canvas, rng) {
                log::warn!(
                    "place: exhausted try budget for a {}x{} element",
                    elem.size.x,
                    elem.size.y
                );
                return false;
            }
        }
    }
    true
}

fn place_one(
    elem: &PlaceElem,
    area: Rect,
    occupied: &mut Table<bool>,
    canvas: &mut Canvas,
    rng: &mut Rng,
) -> bool {
    let tries = if elem.position.is_some() {
        1
    } else {
        PLACE_MAX_TRIES
    };
    for _ in 0..tries {
        let pos = match elem.position {
            Some(PlacementPos::Middle) => area.middle() - elem.size / 2,
            None => Rect::from_corners(area.top_left(), area.bottom_right() - elem.size).random(rng),
        };
        let gen_area = Rect::new(pos, elem.size);
        if check_and_mark(gen_area, &elem.predicate, occupied, area, canvas.map(), rng) {
            return elem.generator.make(&mut canvas.with(gen_area), rng);
        }
    }
    false
}

fn check_and_mark(
    gen_area: Rect,
    predicate: &Predicate,
    occupied: &mut Table<bool>,
    area: Rect,
    map: &Map,
    rng: &mut Rng,
) -> bool {
    if !area.contains_rect(&gen_area) {
        return false;
    }
    for v in gen_area.iter() {
        if !predicate.eval(map, v, rng) || *occupied.get(v) {
            return false;
        }
    }
    for v in gen_area.iter() {
        occupied.set(v, true);
    }
    true
}

fn make_noise_map(elems: &[NoiseMapElem], canvas: &mut Canvas, rng: &mut Rng) -> bool {
    let area = canvas.area();
    if area.empty() {
        return true;
    }
    let table = midpoint_displacement(rng, area, noise::default_init(), noise::DEFAULT_VARIANCE_MULT);
    let mut all: Vec<f64> = area.iter().map(|v| table[v]).collect();
    all.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let quantile = |q: f64| -> f64 {
        let idx = ((q * all.len() as f64) as i64).max(0) as usize;
        if idx >= all.len() {
            all[all.len() - 1] + 1.0
        } else {
            all[idx]
        }
    };

    for elem in elems {
        let lower = quantile(elem.lower);
        let upper = quantile(elem.upper);
        for v in area.iter() {
            let val = table[v];
            if val >= lower && val < upper {
                let cell_area = Rect::new(v, vec2(1, 1));
                if !elem.generator.make(&mut canvas.with(cell_area), rng) {
                    return false;
                }
            }
        }
    }
    true
}

fn manhattan(a: IVec2, b: IVec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Among the elements whose predicate holds at `pos`, the one with the
/// smallest defined cost; an element with no cost wins over no element at
/// all but loses to any costed element found afterward.
fn select_connect_elem<'a>(
    elems: &'a [ConnectElem],
    map: &Map,
    pos: IVec2,
    rng: &mut Rng,
) -> Option<&'a ConnectElem> {
    let mut best: Option<&ConnectElem> = None;
    for elem in elems {
        if elem.predicate.eval(map, pos, rng) {
            let replace = match best {
                None => true,
                Some(b) => {
                    b.cost.is_none() || elem.cost.map_or(false, |c| b.cost.map_or(false, |bc| bc > c))
                }
            };
            if replace {
                best = Some(elem);
            }
        }
    }
    best
}

fn make_connect(to_connect: &Predicate, elems: &[ConnectElem], canvas: &mut Canvas, rng: &mut Rng) -> bool {
    let area = canvas.area();
    let points: Vec<IVec2> = area
        .iter()
        .filter(|&v| to_connect.eval(canvas.map(), v, rng))
        .collect();
    log::debug!(
        "connect: {} candidate point(s) in a {}x{} area",
        points.len(),
        area.width(),
        area.height()
    );
    if points.is_empty() {
        return true;
    }

    let mut distances = DistanceTable::new(area);
    let mut cost_cache = CostCache::new(area);
    for _ in 0..CONNECT_ATTEMPTS {
        let p1 = *rng.choose(&points);
        let p2 = *rng.choose(&points);
        if p1 == p2 {
            continue;
        }
        if !connect_once(elems, area, &mut distances, &mut cost_cache, canvas, rng, p1, p2) {
            return false;
        }
    }
    true
}

#[allow(clippy::too_many_arguments)]
fn connect_once(
    elems: &[ConnectElem],
    area: Rect,
    distances: &mut DistanceTable,
    cost_cache: &mut CostCache,
    canvas: &mut Canvas,
    rng: &mut Rng,
    p1: IVec2,
    p2: IVec2,
) -> bool {
    cost_cache.clear();
    let path = {
        let map = canvas.map();
        let entry_cost = |pos: IVec2| -> f64 {
            cost_cache.get_or_insert_with(pos, |p| match select_connect_elem(elems, map, p, rng) {
                Some(e) => e.cost.unwrap_or(INFINITY),
                None => 1.0,
            })
        };
        let router = Router::new(
            area,
            distances,
            entry_cost,
            |pos| manhattan(pos, p2) as f64,
            |_| directions4().to_vec(),
            p2,
            p1,
        );
        router.path().to_vec()
    };

    // `path` may be a single unreachable-from endpoint if `p1` and `p2` are
    // not connected through passable cells; nothing to paint in that case.
    let intermediate: &[IVec2] = if path.len() >= 2 {
        &path[1..path.len() - 1]
    } else {
        &[]
    };
    for &v in intermediate {
        if let Some(elem) = select_connect_elem(elems, canvas.map(), v, rng) {
            if elem.cost.is_some() {
                let cell_area = Rect::new(v, vec2(1, 1));
                if !elem.generator.make(&mut canvas.with(cell_area), rng) {
                    return false;
                }
            }
        }
    }
    true
}

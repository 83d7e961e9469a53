//! Midpoint-displacement (diamond-square) fractal noise over a rectangle.

use crate::geom::{vec2, Rect};
use crate::rng::Rng;
use crate::table::Table;
use bevy_math::IVec2;

/// The five seed values at the corners and center of the noise square.
#[derive(Debug, Clone, Copy)]
pub struct NoiseInit {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
    pub middle: f64,
}

const STARTING_VARIANCE: f64 = 0.5;

fn add_avg(x: i32, y: i32, values: &Table<f64>, avg: &mut f64, num: &mut i32) {
    let p = vec2(x, y);
    if values.bounds().contains(p) {
        *avg += values[p];
        *num += 1;
    }
}

/// Sample a fractal heightmap over `area` using diamond-square midpoint
/// displacement, seeded by `init` at the corners/center of the smallest
/// `2^n + 1` square enclosing `area`, then resampled onto `area` by
/// nearest-neighbour scaling.
///
/// Starting variance is fixed at `0.5`; it is multiplied by `variance_mult`
/// after every scale.
#[must_use]
pub fn midpoint_displacement(
    rng: &mut Rng,
    area: Rect,
    init: NoiseInit,
    variance_mult: f64,
) -> Table<f64> {
    let mut width = 1;
    while width < area.width() - 1 || width < area.height() - 1 {
        width *= 2;
    }
    width /= 2;
    width += 1;

    let mut grid = Table::new(width, width);
    grid[vec2(0, 0)] = init.top_left;
    grid[vec2(width - 1, 0)] = init.top_right;
    grid[vec2(width - 1, width - 1)] = init.bottom_right;
    grid[vec2(0, width - 1)] = init.bottom_left;
    grid[vec2((width - 1) / 2, (width - 1) / 2)] = init.middle;

    let mut variance = STARTING_VARIANCE;
    let mut a = width - 1;
    while a >= 2 {
        // Diamond step: skipped at the first (largest) scale, since the
        // center was already pre-seeded by `init.middle`.
        if a < width - 1 {
            let steps = (width - 1) / a;
            for sy in 0..steps {
                for sx in 0..steps {
                    let px = sx * a;
                    let py = sy * a;
                    let corners = grid[vec2(px, py)]
                        + grid[vec2(px + a, py)]
                        + grid[vec2(px, py + a)]
                        + grid[vec2(px + a, py + a)];
                    grid[vec2(px + a / 2, py + a / 2)] =
                        corners / 4.0 + variance * rng.signed_unit();
                }
            }
        }

        // Square step, horizontal edge midpoints.
        let steps_x = (width - 1) / a;
        let steps_y = (width - 1) / a + 1;
        for sy in 0..steps_y {
            for sx in 0..steps_x {
                let px = sx * a;
                let py = sy * a;
                let mut avg = 0.0;
                let mut num = 0;
                add_avg(px + a / 2, py - a / 2, &grid, &mut avg, &mut num);
                add_avg(px, py, &grid, &mut avg, &mut num);
                add_avg(px + a, py, &grid, &mut avg, &mut num);
                add_avg(px + a / 2, py + a / 2, &grid, &mut avg, &mut num);
                grid[vec2(px + a / 2, py)] = avg / num as f64 + variance * rng.signed_unit();
            }
        }

        // Square step, vertical edge midpoints.
        let steps_x = (width - 1) / a + 1;
        let steps_y = (width - 1) / a;
        for sy in 0..steps_y {
            for sx in 0..steps_x {
                let px = sx * a;
                let py = sy * a;
                let mut avg = 0.0;
                let mut num = 0;
                add_avg(px - a / 2, py + a / 2, &grid, &mut avg, &mut num);
                add_avg(px, py, &grid, &mut avg, &mut num);
                add_avg(px, py + a, &grid, &mut avg, &mut num);
                add_avg(px + a / 2, py + a / 2, &grid, &mut avg, &mut num);
                grid[vec2(px, py + a / 2)] = avg / num as f64 + variance * rng.signed_unit();
            }
        }

        variance *= variance_mult;
        a /= 2;
    }

    // `result` covers `area` at its own (possibly non-zero) origin, so
    // callers can index it with the same absolute coordinates they iterate
    // `area` with.
    let mut result = Table::new_over(area);
    let offset = area.top_left();
    for v in area.iter() {
        let local = v - offset;
        let lx = local.x * width / area.width();
        let ly = local.y * width / area.height();
        result[v] = grid[vec2(lx, ly)];
    }
    result
}

/// The fixed seeds and variance multiplier the engine's `NoiseMap` generator
/// always uses.
#[must_use]
pub fn default_init() -> NoiseInit {
    NoiseInit {
        top_left: 1.0,
        top_right: 1.0,
        bottom_right: 1.0,
        bottom_left: 1.0,
        middle: 0.0,
    }
}

pub const DEFAULT_VARIANCE_MULT: f64 = 0.45;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deterministic_for_seed() {
        let area = Rect::sized(8, 8);
        let mut a = Rng::seed_from_u64(1);
        let mut b = Rng::seed_from_u64(1);
        let ta = midpoint_displacement(&mut a, area, default_init(), DEFAULT_VARIANCE_MULT);
        let tb = midpoint_displacement(&mut b, area, default_init(), DEFAULT_VARIANCE_MULT);
        for v in area.iter() {
            assert_eq!(ta[v], tb[v]);
        }
    }

    #[test]
    fn test_output_covers_requested_area() {
        let area = Rect::sized(5, 7);
        let mut rng = Rng::seed_from_u64(2);
        let table = midpoint_displacement(&mut rng, area, default_init(), DEFAULT_VARIANCE_MULT);
        assert_eq!(table.bounds().width(), 5);
        assert_eq!(table.bounds().height(), 7);
    }

    #[test]
    fn test_non_square_power_of_two_plus_one_grid() {
        // A 1x1 area still needs at least a 2x2+1 = 3x3 working grid.
        let area = Rect::sized(1, 1);
        let mut rng = Rng::seed_from_u64(3);
        let table = midpoint_displacement(&mut rng, area, default_init(), DEFAULT_VARIANCE_MULT);
        assert_eq!(table.bounds().width(), 1);
        assert_eq!(table.bounds().height(), 1);
    }
}

//! Seeded PRNG wrapper consumed by every other subsystem.
//!
//! Every draw is made through this type so that two invocations of the
//! engine with the same seed and the same generator tree advance the
//! underlying stream identically, regardless of which generator node is
//! doing the drawing.

use bevy_math::IVec2;
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

/// A seeded pseudorandom source. Wraps [`StdRng`], a fixed, portable
/// algorithm, so that a given seed always reproduces the same stream across
/// platforms and crate versions.
#[derive(Debug, Clone)]
pub struct Rng {
    inner: StdRng,
}

impl Rng {
    /// Create a new generator seeded from `seed`.
    #[inline]
    #[must_use]
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer on `[lo, hi)`.
    ///
    /// # Panics
    ///
    /// Panics if `lo >= hi`.
    #[inline]
    #[must_use]
    pub fn int(&mut self, lo: i32, hi: i32) -> i32 {
        self.inner.gen_range(lo..hi)
    }

    /// Uniform `f64` on `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn f64(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }

    /// Uniform `f64` on `[a, b)`.
    #[inline]
    #[must_use]
    pub fn f64_range(&mut self, a: f64, b: f64) -> f64 {
        self.inner.gen_range(a..b)
    }

    /// `true` with probability `v`, drawn from a fresh [`f64`](Rng::f64) call.
    /// `v` is clamped to `[0, 1]` before comparison.
    #[inline]
    #[must_use]
    pub fn chance(&mut self, v: f64) -> bool {
        self.f64() <= v.clamp(0.0, 1.0)
    }

    /// Uniformly pick one element from a non-empty slice.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    #[must_use]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "choose called on an empty slice");
        let i = self.int(0, items.len() as i32) as usize;
        &items[i]
    }

    /// Uniform `f64` on `[-1, 1)`, used by the noise sampler's displacement
    /// term.
    #[inline]
    #[must_use]
    pub fn signed_unit(&mut self) -> f64 {
        self.f64_range(-1.0, 1.0)
    }
}

/// Convenience for picking a uniformly random cell of a rectangle; lives here
/// rather than on `Rect` to keep the RNG the single place random draws
/// happen, but re-exported through [`crate::geom::Rect::random`].
#[inline]
#[must_use]
pub(crate) fn random_point(rng: &mut Rng, px: i32, py: i32, kx: i32, ky: i32) -> IVec2 {
    IVec2::new(rng.int(px, kx), rng.int(py, ky))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deterministic_for_seed() {
        let mut a = Rng::seed_from_u64(42);
        let mut b = Rng::seed_from_u64(42);
        let seq_a: Vec<i32> = (0..20).map(|_| a.int(0, 1000)).collect();
        let seq_b: Vec<i32> = (0..20).map(|_| b.int(0, 1000)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_int_bounds() {
        let mut rng = Rng::seed_from_u64(7);
        for _ in 0..500 {
            let v = rng.int(3, 9);
            assert!((3..9).contains(&v));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = Rng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(rng.chance(1.0));
        }
        for _ in 0..50 {
            assert!(!rng.chance(0.0));
        }
    }

    #[test]
    fn test_choose_picks_member() {
        let mut rng = Rng::seed_from_u64(3);
        let items = vec!["a", "b", "c"];
        for _ in 0..20 {
            assert!(items.contains(rng.choose(&items)));
        }
    }
}

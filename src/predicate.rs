//! Boolean queries over a cell's current tokens and the RNG.
//!
//! A predicate is evaluated at a specific `(map, cell, rng)`. `Chance` is not
//! idempotent: every call consumes RNG state, and callers must assume a
//! predicate can have side effects on the random stream even when its result
//! is discarded (e.g. a short-circuited `And`/`Or` branch that is never
//! evaluated still consumes nothing, but a branch that *is* evaluated always
//! does if it contains a `Chance`).

use crate::map::Map;
use crate::rng::Rng;
use crate::token::Token;
use bevy_math::IVec2;
use serde::{Deserialize, Serialize};

/// An immutable tree of boolean tests over a map cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Predicate {
    /// True iff the cell contains the given token.
    On(Token),
    /// Logical negation.
    Not(Box<Predicate>),
    /// Constant true.
    True,
    /// Short-circuiting conjunction, evaluated in declared order.
    And(Vec<Predicate>),
    /// Short-circuiting disjunction, evaluated in declared order.
    Or(Vec<Predicate>),
    /// True with probability `v` (clamped to `[0, 1]`), drawn fresh from the
    /// RNG on every evaluation.
    Chance(f64),
}

impl Default for Predicate {
    /// The implicit predicate for config fields that omit one, e.g. a
    /// [`crate::generator::PlaceElem`] with no placement constraint.
    fn default() -> Self {
        Predicate::True
    }
}

impl Predicate {
    /// Evaluate this predicate at `cell`. May advance `rng`.
    #[must_use]
    pub fn eval(&self, map: &Map, cell: IVec2, rng: &mut Rng) -> bool {
        match self {
            Predicate::On(token) => map.contains(cell, token),
            Predicate::Not(p) => !p.eval(map, cell, rng),
            Predicate::True => true,
            Predicate::And(ps) => ps.iter().all(|p| p.eval(map, cell, rng)),
            Predicate::Or(ps) => ps.iter().any(|p| p.eval(map, cell, rng)),
            Predicate::Chance(v) => rng.chance(*v),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::vec2;

    fn cell(map: &mut Map, v: IVec2, tokens: &[&str]) {
        for t in tokens {
            map.insert(v, Token::new(*t));
        }
    }

    #[test]
    fn test_on() {
        let mut map = Map::new(1, 1);
        cell(&mut map, vec2(0, 0), &["wall"]);
        let mut rng = Rng::seed_from_u64(1);
        assert!(Predicate::On(Token::new("wall")).eval(&map, vec2(0, 0), &mut rng));
        assert!(!Predicate::On(Token::new("floor")).eval(&map, vec2(0, 0), &mut rng));
    }

    #[test]
    fn test_not() {
        let map = Map::new(1, 1);
        let mut rng = Rng::seed_from_u64(1);
        let p = Predicate::Not(Box::new(Predicate::True));
        assert!(!p.eval(&map, vec2(0, 0), &mut rng));
    }

    #[test]
    fn test_and_short_circuits_but_still_draws_once() {
        let map = Map::new(1, 1);
        // `a` evaluates the And; `b` is a reference stream that draws
        // exactly one throwaway value to model "one Chance draw happened".
        let mut a = Rng::seed_from_u64(1);
        let mut b = Rng::seed_from_u64(1);
        let and = Predicate::And(vec![Predicate::Chance(0.0), Predicate::True]);
        assert!(!and.eval(&map, vec2(0, 0), &mut a));
        b.f64();
        assert_eq!(a.int(0, 1_000_000), b.int(0, 1_000_000));
    }

    #[test]
    fn test_or_short_circuits_and_draws_nothing() {
        let map = Map::new(1, 1);
        let mut a = Rng::seed_from_u64(2);
        let mut b = Rng::seed_from_u64(2);
        let or = Predicate::Or(vec![Predicate::True, Predicate::Chance(1.0)]);
        assert!(or.eval(&map, vec2(0, 0), &mut a));
        // No draw happened on `a`; both streams remain in lockstep.
        assert_eq!(a.int(0, 1_000_000), b.int(0, 1_000_000));
    }

    #[test]
    fn test_chance_consumes_exactly_one_draw() {
        let map = Map::new(1, 1);
        let mut a = Rng::seed_from_u64(9);
        let mut b = Rng::seed_from_u64(9);
        Predicate::Chance(0.5).eval(&map, vec2(0, 0), &mut a);
        let _ = a.f64();
        b.f64();
        b.f64();
        // After one Chance(0.5) draw plus one more explicit draw on `a`, and
        // two explicit draws on `b`, both rngs have advanced the same
        // distance and so agree on the next value.
        assert_eq!(a.int(0, 1_000_000), b.int(0, 1_000_000));
    }
}

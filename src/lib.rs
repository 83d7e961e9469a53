//! mapforge
//! ========
//!
//! A declarative procedural map generator: a recursive tree of spatial
//! generator nodes paints string tokens onto sub-rectangles of a shared,
//! seeded 2D grid. The tree is data (deserialized from RON, see [`format`]);
//! evaluating it is a single pure function of `(Generator, size, seed)`.

mod config;
mod error;
mod format;
mod generator;
mod geom;
mod map;
mod noise;
mod predicate;
mod render;
mod rng;
mod router;
mod table;
mod token;

pub use config::Cli;
pub use error::MapForgeError;
pub use format::load_generator;
pub use generator::{
    ConnectElem, Generator, MarginType, NoiseMapElem, PlaceElem, PlacementPos, CONNECT_ATTEMPTS,
    PLACE_MAX_TRIES,
};
pub use geom::{vec2, Rect};
pub use map::{Canvas, Map};
pub use predicate::Predicate;
pub use render::{render_ascii, render_html};
pub use rng::Rng;
pub use token::Token;

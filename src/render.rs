//! ASCII and HTML renderers, grounded in `original_source/src/render.cpp`.
//!
//! Both renderers share a glyph table: a sequence of whitespace-separated
//! `"<token>" <char> <color>` triples read from a file (or string, for the
//! HTML path), where source order is priority — the first-listed token that
//! is present in a cell wins. Cells with no recognized token render as a
//! single space.

use crate::map::Map;
use crate::token::Token;
use fxhash::FxHashMap;
use std::path::Path;

struct Glyph {
    character: String,
    color: String,
}

/// A parsed glyph-definition file: token -> (glyph, declaration-order rank).
struct GlyphTable {
    glyphs: FxHashMap<Token, Glyph>,
    priority: FxHashMap<Token, usize>,
}

impl GlyphTable {
    fn parse(text: &str) -> Self {
        let mut glyphs = FxHashMap::default();
        let mut priority = FxHashMap::default();
        let mut words = text.split_whitespace();
        let mut rank = 0;
        while let (Some(token), Some(character), Some(color)) =
            (words.next(), words.next(), words.next())
        {
            let token = Token::new(token.trim_matches('"'));
            glyphs.insert(
                token.clone(),
                Glyph {
                    character: character.to_string(),
                    color: color.to_string(),
                },
            );
            priority.insert(token, rank);
            rank += 1;
        }
        Self { glyphs, priority }
    }

    /// The best (lowest-priority-index) recognized token present at `cell`,
    /// if any.
    fn best_token<'a>(&self, map: &'a Map, cell: bevy_math::IVec2) -> Option<&'a Token> {
        map.tokens(cell)
            .iter()
            .filter(|t| self.priority.contains_key(*t))
            .min_by_key(|t| self.priority[*t])
    }
}

/// ANSI SGR color code for a named color, matching the original's fixed
/// table. Unknown names log a warning and fall back to white (37), the
/// original's own default-and-diagnose behavior.
fn ansi_code(color: &str) -> u8 {
    match color {
        "black" => 30,
        "red" => 31,
        "green" => 32,
        "brown" => 33,
        "yellow" => 93,
        "blue" => 34,
        "magenta" => 35,
        "cyan" => 36,
        "white" => 37,
        "gray" => 90,
        other => {
            log::warn!("unknown color: {other}");
            37
        }
    }
}

/// Render `map` as ANSI-colored text using the glyph file at `path`.
pub fn render_ascii(map: &Map, path: &Path) -> std::io::Result<String> {
    let text = std::fs::read_to_string(path)?;
    let table = GlyphTable::parse(&text);
    let bounds = map.bounds();
    let mut out = String::new();
    for y in bounds.top()..bounds.bottom() {
        for x in bounds.left()..bounds.right() {
            let cell = bevy_math::IVec2::new(x, y);
            match table.best_token(map, cell) {
                Some(token) => {
                    let glyph = &table.glyphs[token];
                    out.push_str(&format!(
                        "\x1b[{}m{}\x1b[0m",
                        ansi_code(&glyph.color),
                        glyph.character
                    ));
                }
                None => out.push(' '),
            }
        }
        out.push('\n');
    }
    Ok(out)
}

/// Render `map` as an HTML fragment using an in-memory glyph definition.
#[must_use]
pub fn render_html(map: &Map, glyph_text: &str) -> String {
    let table = GlyphTable::parse(glyph_text);
    let bounds = map.bounds();
    let mut out = String::new();
    for y in bounds.top()..bounds.bottom() {
        for x in bounds.left()..bounds.right() {
            let cell = bevy_math::IVec2::new(x, y);
            match table.best_token(map, cell) {
                Some(token) => {
                    let glyph = &table.glyphs[token];
                    out.push_str(&format!(
                        "<font color=\"{}\">{}</font>",
                        glyph.color, glyph.character
                    ));
                }
                None => out.push(' '),
            }
        }
        out.push_str("<br/>");
    }
    out
}

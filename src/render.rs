//! ASCII renderer for resolved structures, with optional ANSI truecolor.

use crate::config::WorldConfig;
use crate::structure::Structure;
use std::fmt::Write as _;

const RESET: &str = "\x1b[0m";
/// Glyph of an empty cell.
pub const EMPTY: char = '.';
/// Glyph of a cell covered more than once.
pub const OVERLAP: char = '!';

/// A kind and the glyph it is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'a> {
    /// Building kind.
    pub kind: &'a str,
    /// Character used for its cells.
    pub symbol: char,
}

/// Pick one distinct glyph per kind, in first-seen order.
///
/// Each kind takes the first letter or digit of its name (upper case, then
/// lower case) that no earlier kind has taken, or `*` when none is left.
#[must_use]
pub fn assign_glyphs(structures: &[Structure]) -> Vec<Glyph<'_>> {
    let mut glyphs: Vec<Glyph<'_>> = Vec::new();
    for structure in structures {
        if glyphs.iter().any(|g| g.kind == structure.kind) {
            continue;
        }
        let symbol = structure
            .kind
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .flat_map(|c| [c.to_ascii_uppercase(), c.to_ascii_lowercase()])
            .find(|c| glyphs.iter().all(|g| g.symbol != *c))
            .unwrap_or('*');
        glyphs.push(Glyph {
            kind: &structure.kind,
            symbol,
        });
    }
    glyphs
}

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// No structure covers the cell.
    Empty,
    /// Covered by exactly one structure, by index.
    Covered(usize),
    /// Covered by more than one structure.
    Overlap,
}

/// Row-major cell contents of a `cols` x `rows` grid.
///
/// Cells outside the grid are clipped.
#[must_use]
pub fn occupancy(structures: &[Structure], cols: usize, rows: usize) -> Vec<Cell> {
    let mut grid = vec![Cell::Empty; cols * rows];
    for (index, structure) in structures.iter().enumerate() {
        for cell in structure.cells() {
            let (Ok(x), Ok(y)) = (usize::try_from(cell.x), usize::try_from(cell.y)) else {
                continue;
            };
            if x >= cols || y >= rows {
                continue;
            }
            let slot = &mut grid[y * cols + x];
            *slot = match slot {
                Cell::Empty => Cell::Covered(index),
                Cell::Covered(_) | Cell::Overlap => Cell::Overlap,
            };
        }
    }
    grid
}

/// Glyph of a kind, `*` when it has none.
#[must_use]
pub fn glyph_of(glyphs: &[Glyph<'_>], kind: &str) -> char {
    glyphs.iter().find(|g| g.kind == kind).map_or('*', |g| g.symbol)
}

/// Render the grid with every structure drawn in.
///
/// Output format:
/// ```text
/// Village 8x4 (cell 10px)
/// ┌─────────────────┐
/// │ T T . . C C C . │
/// │ T T . . C C C . │
/// │ . . . . C C C . │
/// │ . . . . . . . . │
/// └─────────────────┘
///
/// Legend: T=townhall  C=cannon  .=empty  !=overlap
/// ```
///
/// With `color`, cells of kinds that have a configured color are wrapped in
/// ANSI truecolor escapes.
#[must_use]
pub fn render_ascii(structures: &[Structure], config: &WorldConfig, color: bool) -> String {
    let cols = usize::try_from(config.num_cols).unwrap_or(0);
    let rows = usize::try_from(config.num_rows).unwrap_or(0);
    let glyphs = assign_glyphs(structures);
    let grid = occupancy(structures, cols, rows);

    let mut output = String::new();
    let _ = writeln!(output, "Village {cols}x{rows} (cell {}px)", config.cell_size);

    let border = "─".repeat(cols * 2 + 1);
    let _ = writeln!(output, "┌{border}┐");
    for row in grid.chunks(cols.max(1)).take(rows) {
        output.push_str("│ ");
        for cell in row {
            match cell {
                Cell::Empty => output.push(EMPTY),
                Cell::Overlap => output.push(OVERLAP),
                Cell::Covered(index) => {
                    let kind = structures[*index].kind.as_str();
                    let rgb = color.then(|| config.color_of(kind)).flatten();
                    push_cell(&mut output, glyph_of(&glyphs, kind), rgb);
                }
            }
            output.push(' ');
        }
        output.push_str("│\n");
    }
    let _ = writeln!(output, "└{border}┘");

    output.push_str("\nLegend:");
    for glyph in &glyphs {
        let _ = write!(output, " {}={} ", glyph.symbol, glyph.kind);
    }
    let _ = writeln!(output, " {EMPTY}=empty  {OVERLAP}=overlap");

    output
}

fn push_cell(output: &mut String, symbol: char, rgb: Option<[u8; 3]>) {
    match rgb {
        Some([r, g, b]) => {
            let _ = write!(output, "\x1b[38;2;{r};{g};{b}m{symbol}{RESET}");
        }
        None => output.push(symbol),
    }
}

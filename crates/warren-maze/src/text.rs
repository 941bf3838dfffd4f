//! Plain-text maze parsing and rendering.
//!
//! Glyphs are never global: every parse or render call takes a
//! [`Symbols`] table.

use warren_core::{ConfigError, Position};

use crate::grid::{Cell, Grid};
use crate::maze::Maze;

/// Glyph table for textual mazes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbols {
    /// Wall cell.
    pub wall: char,
    /// Unvisited path cell.
    pub path: char,
    /// Start position (a path cell).
    pub start: char,
    /// End position (a path cell).
    pub end: char,
    /// Visited path cell (render only).
    pub visited: char,
    /// Cell occupied by a worker (render only).
    pub worker: char,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            wall: '#',
            path: '.',
            start: 'S',
            end: 'E',
            visited: 'o',
            worker: '@',
        }
    }
}

impl Grid {
    /// Parse a grid of `wall` and `path` glyphs. Start and end glyphs are
    /// read as path cells.
    ///
    /// Blank lines are skipped; leading and trailing whitespace on each
    /// line is ignored.
    pub fn parse(text: &str, symbols: &Symbols) -> Result<Self, ConfigError> {
        Ok(parse_rows(text, symbols)?.0)
    }
}

impl Maze {
    /// Parse a maze whose start and end are marked with the `start` and
    /// `end` glyphs. Each must appear exactly once.
    pub fn parse(text: &str, symbols: &Symbols) -> Result<Self, ConfigError> {
        let (grid, start, end) = parse_rows(text, symbols)?;
        let start = start.ok_or_else(|| missing(symbols.start))?;
        let end = end.ok_or_else(|| missing(symbols.end))?;
        Maze::new(grid, start, end)
    }

    /// Render the maze with workers and visited cells drawn over it.
    ///
    /// Precedence per cell: worker, start, end, visited, then wall/path.
    pub fn render<F>(&self, symbols: &Symbols, workers: &[Position], visited: F) -> String
    where
        F: Fn(Position) -> bool,
    {
        let n = self.size_matrix() as usize;
        let mut out = String::with_capacity(n * (n + 1));
        for (r, row) in self.grid().rows().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let pos = Position::new(r as i32, c as i32);
                let glyph = if workers.contains(&pos) {
                    symbols.worker
                } else if pos == self.start_pos() {
                    symbols.start
                } else if pos == self.end_pos() {
                    symbols.end
                } else if *cell == Cell::Path && visited(pos) {
                    symbols.visited
                } else {
                    match cell {
                        Cell::Wall => symbols.wall,
                        Cell::Path => symbols.path,
                    }
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

type Parsed = (Grid, Option<Position>, Option<Position>);

fn parse_rows(text: &str, symbols: &Symbols) -> Result<Parsed, ConfigError> {
    let mut rows = Vec::new();
    let mut start = None;
    let mut end = None;
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let r = rows.len() as i32;
        let mut row = Vec::with_capacity(line.len());
        for (c, ch) in line.chars().enumerate() {
            let pos = Position::new(r, c as i32);
            let cell = if ch == symbols.wall {
                Cell::Wall
            } else if ch == symbols.path {
                Cell::Path
            } else if ch == symbols.start {
                mark(&mut start, pos, ch, idx)?;
                Cell::Path
            } else if ch == symbols.end {
                mark(&mut end, pos, ch, idx)?;
                Cell::Path
            } else {
                return Err(ConfigError::Parse {
                    line: idx + 1,
                    reason: format!("unexpected glyph {ch:?} at column {}", c + 1),
                });
            };
            row.push(cell);
        }
        rows.push(row);
    }
    Ok((Grid::from_rows(rows)?, start, end))
}

fn mark(slot: &mut Option<Position>, pos: Position, ch: char, idx: usize) -> Result<(), ConfigError> {
    if slot.replace(pos).is_some() {
        return Err(ConfigError::Parse {
            line: idx + 1,
            reason: format!("glyph {ch:?} appears more than once"),
        });
    }
    Ok(())
}

fn missing(ch: char) -> ConfigError {
    ConfigError::Parse {
        line: 0,
        reason: format!("no {ch:?} glyph found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "
###
#S#
###
";

    #[test]
    fn parse_locates_goals() {
        let text = "#####\n#S..#\n###.#\n#E..#\n#####\n";
        let m = Maze::parse(text, &Symbols::default()).unwrap();
        assert_eq!(m.start_pos(), Position::new(1, 1));
        assert_eq!(m.end_pos(), Position::new(3, 1));
        assert_eq!(m.size(), 2);
    }

    #[test]
    fn missing_end_is_a_parse_error() {
        let err = Maze::parse(SMALL, &Symbols::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn grid_parse_ignores_goals() {
        let g = Grid::parse(SMALL, &Symbols::default()).unwrap();
        assert_eq!(g.cell(Position::new(1, 1)), Some(Cell::Path));
    }

    #[test]
    fn unknown_glyph_reports_line() {
        let err = Grid::parse("###\n#?#\n###", &Symbols::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
    }

    #[test]
    fn duplicate_start_rejected() {
        let err = Maze::parse("#####\n#S.S#\n#...#\n#..E#\n#####", &Symbols::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
    }

    #[test]
    fn custom_symbols_round_trip() {
        let symbols = Symbols {
            wall: 'X',
            path: ' ',
            ..Symbols::default()
        };
        let text = "XXXXX\nXS  X\nXXX X\nXE  X\nXXXXX";
        let m = Maze::parse(text, &symbols).unwrap();
        let rendered = m.render(&symbols, &[], |_| false);
        assert_eq!(rendered.trim_end(), text);
    }

    #[test]
    fn render_overlays_workers_and_visited() {
        let text = "#####\n#S..#\n###.#\n#E..#\n#####";
        let m = Maze::parse(text, &Symbols::default()).unwrap();
        let out = m.render(
            &Symbols::default(),
            &[Position::new(1, 3)],
            |p| p == Position::new(1, 2),
        );
        assert_eq!(out.lines().nth(1), Some("#So@#"));
    }
}

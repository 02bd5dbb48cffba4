//! Board parsing functionality for converting raw board layouts into terrain and food layers.

use glam::IVec2;

use crate::error::ParseError;

/// The terrain of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terrain {
    #[default]
    Empty,
    Wall,
    /// The ghost house door; only ghosts entering or leaving the house may pass.
    Door,
    /// Part of a tunnel; ghosts slow down here and tunnels at the board edges form portals.
    Tunnel,
}

/// Food lying on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Food {
    Pellet,
    Energizer,
}

/// A single parsed board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub terrain: Terrain,
    pub food: Option<Food>,
}

/// Represents the parsed data from a raw board layout.
#[derive(Debug, Clone)]
pub struct ParsedBoard {
    /// Number of columns.
    pub cols: usize,
    /// Number of rows.
    pub rows: usize,
    /// Row-major cells.
    pub cells: Vec<Cell>,
    /// The positions of the house door tiles.
    pub house_door: Vec<IVec2>,
    /// Pac-Man's starting tile, if the board marks one with `X`.
    pub pac_start: Option<IVec2>,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Parses a single character into a board cell.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownCharacter`] for characters outside the board vocabulary.
    pub fn parse_character(c: char) -> Result<Cell, ParseError> {
        let (terrain, food) = match c {
            '#' => (Terrain::Wall, None),
            '.' => (Terrain::Empty, Some(Food::Pellet)),
            'o' => (Terrain::Empty, Some(Food::Energizer)),
            ' ' | 'X' => (Terrain::Empty, None),
            'T' => (Terrain::Tunnel, None),
            '=' => (Terrain::Door, None),
            _ => return Err(ParseError::UnknownCharacter(c)),
        };
        Ok(Cell { terrain, food })
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, its rows differ in width, or it
    /// contains unknown characters.
    pub fn parse_board<S: AsRef<str>>(raw_board: &[S]) -> Result<ParsedBoard, ParseError> {
        let cols = raw_board.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if cols == 0 {
            return Err(ParseError::EmptyBoard);
        }

        let mut cells = Vec::with_capacity(cols * raw_board.len());
        let mut house_door = Vec::new();
        let mut pac_start = None;

        for (y, line) in raw_board.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != cols {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: cols,
                    found: width,
                });
            }

            for (x, character) in line.chars().enumerate() {
                let cell = Self::parse_character(character)?;
                let tile = IVec2::new(x as i32, y as i32);

                match character {
                    '=' => house_door.push(tile),
                    'X' => pac_start = Some(tile),
                    _ => {}
                }

                cells.push(cell);
            }
        }

        Ok(ParsedBoard {
            cols,
            rows: raw_board.len(),
            cells,
            house_door,
            pac_start,
        })
    }
}

//! ASCII grid world implementing the [`GridMap`] port.

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error, ports::GridMap, types::Position};

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Open,
    Wall,
    Door,
    Exit,
}

impl Cell {
    fn symbol(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Wall => '#',
            Cell::Door => 'D',
            Cell::Exit => 'E',
        }
    }
}

/// Rectangular grid of cells.
///
/// Maps are written top row first, as they would be drawn:
///
/// ```text
/// #######
/// #S...E#
/// #..D..#
/// #######
/// ```
///
/// `#` is a wall, `.` open floor, `D` a door, `E` the exit and `S` open floor
/// where an agent starts. The bottom text row is `y = 0`, so north (`+y`)
/// points up the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridWorld {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    starts: Vec<Position>,
}

impl GridWorld {
    /// An all-open grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] if either dimension is not positive or
/// the cell count does not fit in an `i32`.
    pub fn open(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidGrid {
                message: format!("dimensions must be positive, got {width}x{height}"),
            });
        }
        // Cell indices are computed as `y * width + x` in i32.
        let cell_count = width
            .checked_mul(height)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| Error::InvalidGrid {
                message: format!("{width}x{height} grid has too many cells"),
            })?;

        Ok(Self {
            width,
            height,
            cells: vec![Cell::Open; cell_count],
            starts: Vec::new(),
        })
    }

    /// Parse a map drawn in ASCII.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] for an empty map, ragged rows or an
    /// unknown character.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .collect();

        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(Error::InvalidGrid {
                message: "map is empty".to_string(),
            });
        }

        let height = rows.len();
        let mut grid = Self::open(to_i32(width)?, to_i32(height)?)?;

        for (row_index, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(Error::InvalidGrid {
                    message: format!(
                        "row {} has {} cells, expected {width}",
                        row_index + 1,
                        row.chars().count()
                    ),
                });
            }

            let y = to_i32(height - 1 - row_index)?;
            for (x, symbol) in row.chars().enumerate() {
                let position = Position::new(to_i32(x)?, y);
                let cell = match symbol {
                    '.' | ' ' => Cell::Open,
                    'S' => {
                        grid.starts.push(position);
                        Cell::Open
                    }
                    '#' => Cell::Wall,
                    'D' => Cell::Door,
                    'E' => Cell::Exit,
                    other => {
                        return Err(Error::InvalidGrid {
                            message: format!(
                                "unknown cell '{other}' at row {}, column {}",
                                row_index + 1,
                                x + 1
                            ),
                        });
                    }
                };
                grid.set(position, cell)?;
            }
        }

        grid.starts.sort();
        Ok(grid)
    }

    /// Read and parse a map file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise see
    /// [`GridWorld::parse`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read map {path:?}"),
            source,
        })?;
        Self::parse(&text)
    }

    /// Builder-style [`GridWorld::set`] for cells known to be in bounds.
    ///
    /// Out-of-bounds positions are ignored.
    pub fn with_cell(mut self, position: Position, cell: Cell) -> Self {
        let _ = self.set(position, cell);
        self
    }

    /// Change one cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] if `position` is outside the grid.
    pub fn set(&mut self, position: Position, cell: Cell) -> Result<()> {
        let index = self.index(position).ok_or_else(|| Error::InvalidGrid {
            message: format!("{position} is outside the {}x{} grid", self.width, self.height),
        })?;
        self.cells[index] = cell;
        Ok(())
    }

    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.index(position).map(|index| self.cells[index])
    }

    /// Start cells marked with `S`, ordered by position.
    pub fn starts(&self) -> &[Position] {
        &self.starts
    }

    pub fn exits(&self) -> Vec<Position> {
        self.positions_of(Cell::Exit)
    }

    fn positions_of(&self, wanted: Cell) -> Vec<Position> {
        (0..self.width)
            .flat_map(|x| (0..self.height).map(move |y| Position::new(x, y)))
            .filter(|&position| self.cell(position) == Some(wanted))
            .collect()
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| (position.y * self.width + position.x) as usize)
    }
}

fn to_i32(value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::InvalidGrid {
        message: format!("dimension {value} is too large"),
    })
}

impl GridMap for GridWorld {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_exit(&self, cell: Position) -> bool {
        self.cell(cell) == Some(Cell::Exit)
    }

    fn is_door(&self, cell: Position) -> bool {
        self.cell(cell) == Some(Cell::Door)
    }

    fn is_routable(&self, cell: Position) -> bool {
        matches!(self.cell(cell), Some(Cell::Open | Cell::Door | Cell::Exit))
    }
}

impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let position = Position::new(x, y);
                let symbol = match self.cell(position) {
                    Some(Cell::Open) if self.starts.contains(&position) => 'S',
                    Some(cell) => cell.symbol(),
                    None => '?',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
#######
#S...E#
#..D.S#
#######
";

    #[test]
    fn test_parse_flips_rows() {
        let grid = GridWorld::parse(MAP).unwrap();
        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 4);
        assert!(grid.is_exit(Position::new(5, 2)));
        assert!(grid.is_door(Position::new(3, 1)));
        assert_eq!(grid.starts(), &[Position::new(1, 2), Position::new(5, 1)]);
        assert_eq!(grid.exits(), vec![Position::new(5, 2)]);
    }

    #[test]
    fn test_routability() {
        let grid = GridWorld::parse(MAP).unwrap();
        assert!(!grid.is_routable(Position::new(0, 0)));
        assert!(grid.is_routable(Position::new(3, 1)));
        assert!(grid.is_routable(Position::new(5, 2)));
        assert!(!grid.is_routable(Position::new(-1, 2)));
        assert!(!grid.is_routable(Position::new(7, 2)));
    }

    #[test]
    fn test_display_reproduces_map() {
        let grid = GridWorld::parse(MAP).unwrap();
        assert_eq!(grid.to_string(), MAP);
    }

    #[test]
    fn test_parse_rejects_bad_maps() {
        assert!(GridWorld::parse("").is_err());
        assert!(GridWorld::parse("###\n##").is_err());
        assert!(GridWorld::parse("#X#").is_err());
    }

    #[test]
    fn test_open_grid_with_cells() {
        let grid = GridWorld::open(3, 3)
            .unwrap()
            .with_cell(Position::new(1, 1), Cell::Wall)
            .with_cell(Position::new(9, 9), Cell::Exit);
        assert!(!grid.is_routable(Position::new(1, 1)));
        assert!(grid.exits().is_empty());
        assert!(GridWorld::open(0, 3).is_err());
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        assert!(matches!(
            GridWorld::open(i32::MAX, 2),
            Err(Error::InvalidGrid { .. })
        ));
        assert!(matches!(
            GridWorld::open(70_000, 70_000),
            Err(Error::InvalidGrid { .. })
        ));
    }
}

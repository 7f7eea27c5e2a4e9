use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: u8 = 100;
pub const ROW_LEN: u8 = 10;
pub const NUM_ROWS: u8 = BOARD_SIZE / ROW_LEN;

/// Grid location of a cell. Row 0 is the bottom row, column 0 the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: u8,
    pub col: u8,
}

impl GridCoord {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Rows counted from the top, the order a screen draws them in.
    pub fn row_from_top(self) -> u8 {
        NUM_ROWS - 1 - self.row
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("cell {0} is outside the board (1..=100)")]
    CellOutOfRange(u8),
    #[error("coordinate ({row}, {col}) is outside the 10x10 grid")]
    CoordOutOfRange { row: u8, col: u8 },
}

pub fn is_on_board(cell: u8) -> bool {
    (1..=BOARD_SIZE).contains(&cell)
}

/// Maps a 1-based cell onto the serpentine grid: even rows run left to right,
/// odd rows right to left, so consecutive cells are always adjacent.
pub fn cell_to_coord(cell: u8) -> Result<GridCoord, DomainError> {
    if !is_on_board(cell) {
        return Err(DomainError::CellOutOfRange(cell));
    }
    let offset = cell - 1;
    let row = offset / ROW_LEN;
    let along = offset % ROW_LEN;
    let col = if row % 2 == 0 {
        along
    } else {
        ROW_LEN - 1 - along
    };
    Ok(GridCoord::new(row, col))
}

pub fn coord_to_cell(coord: GridCoord) -> Result<u8, DomainError> {
    if coord.row >= NUM_ROWS || coord.col >= ROW_LEN {
        return Err(DomainError::CoordOutOfRange {
            row: coord.row,
            col: coord.col,
        });
    }
    let along = if coord.row % 2 == 0 {
        coord.col
    } else {
        ROW_LEN - 1 - coord.col
    };
    Ok(coord.row * ROW_LEN + along + 1)
}

pub fn cells() -> impl Iterator<Item = u8> {
    1..=BOARD_SIZE
}

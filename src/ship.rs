//! Ship catalog entries and the cell runs they cover.

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends left to right from its origin.
    Horizontal,
    /// Extends top to bottom from its origin.
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Coordinate of the `i`th segment of a run starting at (`row`, `col`).
    #[inline]
    pub fn step(self, row: usize, col: usize, i: usize) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (row, col + i),
            Orientation::Vertical => (row + i, col),
        }
    }
}

/// Catalog entry: id, name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    id: usize,
    name: &'static str,
    length: usize,
}

impl ShipType {
    pub const fn new(id: usize, name: &'static str, length: usize) -> Self {
        Self { id, name, length }
    }

    /// Index of this ship in the fleet catalog.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// Cells covered by a run of `len` starting at (`row`, `col`).
///
/// Coordinates are not bounds checked; callers decide what off-board means.
pub fn run_cells(
    row: usize,
    col: usize,
    len: usize,
    orientation: Orientation,
) -> impl Iterator<Item = (usize, usize)> {
    (0..len).map(move |i| orientation.step(row, col, i))
}

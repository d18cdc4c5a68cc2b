/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for card counts and pair counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, column)`.
pub type Coord2 = (Coord, Coord);

/// Pair identity of a card, doubles as the index into a theme's faces.
pub type CardValue = u16;

/// Index of a theme as known by the [`ThemeProvider`](crate::ThemeProvider).
pub type ThemeId = u16;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major linear index of `coords` on a board with `columns` columns.
pub const fn linear_index((row, column): Coord2, columns: Coord) -> usize {
    row as usize * columns as usize + column as usize
}

/// Inverse of [`linear_index`].
pub const fn coords_from_index(index: usize, columns: Coord) -> Coord2 {
    let columns = columns as usize;
    ((index / columns) as Coord, (index % columns) as Coord)
}

//! A fixed-size set of board cells packed into one unsigned integer.
//!
//! Cells of an `N×N` grid map to bit `row * N + col` of `T`. The board uses
//! these sets for its occupancy map and its received-attack history, and
//! players use a pair of them (hits, misses) as their sent-attack history.

use core::ops::{BitAnd, BitOr, BitOrAssign, Not};
use core::{fmt, mem};
use num_traits::{PrimInt, Unsigned, Zero};

use crate::common::{Coord, GameError, Result};
use crate::config::BOARD_SIZE;

/// The cell set used for a standard board.
pub type CellSet = BitGrid<u128, BOARD_SIZE>;

/// Offsets of the eight cells surrounding a cell.
pub const NEIGHBOURHOOD: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitGrid<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
}

impl<T, const N: usize> BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    const CELLS: usize = N * N;

    /// Rejects at compile time any `T` too narrow for the grid.
    const FITS: () = assert!(N * N <= mem::size_of::<T>() * 8, "grid does not fit in T");

    #[inline]
    fn mask() -> T {
        if Self::CELLS == mem::size_of::<T>() * 8 {
            !T::zero()
        } else {
            (T::one() << Self::CELLS) - T::one()
        }
    }

    #[inline]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        BitGrid { bits: T::zero() }
    }

    /// Every cell of the grid.
    pub fn full() -> Self {
        BitGrid { bits: Self::mask() }
    }

    pub fn from_cells<I>(cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut set = Self::new();
        for cell in cells {
            set.insert(cell)?;
        }
        Ok(set)
    }

    #[inline]
    fn index(cell: Coord) -> Option<usize> {
        (cell.row < N && cell.col < N).then_some(cell.row * N + cell.col)
    }

    /// Off-grid cells are never members.
    pub fn contains(&self, cell: Coord) -> bool {
        match Self::index(cell) {
            Some(idx) => ((self.bits >> idx) & T::one()) != T::zero(),
            None => false,
        }
    }

    /// Adds `cell`, returning `true` if it was not already present.
    pub fn insert(&mut self, cell: Coord) -> Result<bool> {
        let idx = Self::index(cell).ok_or(GameError::OutOfBounds {
            row: cell.row,
            col: cell.col,
        })?;
        let bit = T::one() << idx;
        let fresh = (self.bits & bit).is_zero();
        self.bits = self.bits | bit;
        Ok(fresh)
    }

    pub fn remove(&mut self, cell: Coord) {
        if let Some(idx) = Self::index(cell) {
            self.bits = self.bits & !(T::one() << idx);
        }
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_zero()
    }

    pub fn is_disjoint(&self, other: &Self) -> bool {
        (self.bits & other.bits).is_zero()
    }

    /// The set grown by one cell in all eight directions, clipped to the grid.
    pub fn halo(&self) -> Self {
        let mut grown = *self;
        for cell in self.iter() {
            for (dr, dc) in NEIGHBOURHOOD {
                let (Some(row), Some(col)) = (
                    cell.row.checked_add_signed(dr),
                    cell.col.checked_add_signed(dc),
                ) else {
                    continue;
                };
                if row < N && col < N {
                    grown.bits = grown.bits | (T::one() << (row * N + col));
                }
            }
        }
        grown
    }

    /// Members in row-major order.
    pub fn iter(&self) -> Cells<T, N> {
        Cells {
            bits: self.bits,
            idx: 0,
        }
    }
}

impl<T, const N: usize> Default for BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> fmt::Debug for BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitGrid<{}> ({} set):", N, self.len())?;
        for r in 0..N {
            for c in 0..N {
                let mark = if self.contains(Coord::new(r, c)) {
                    '■'
                } else {
                    '□'
                };
                write!(f, "{} ", mark)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Row-major iterator over the members of a [`BitGrid`].
#[derive(Clone, Copy)]
pub struct Cells<T, const N: usize>
where
    T: PrimInt + Unsigned + Zero,
{
    bits: T,
    idx: usize,
}

impl<T, const N: usize> Iterator for Cells<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        while self.idx < N * N {
            let idx = self.idx;
            self.idx += 1;
            if ((self.bits >> idx) & T::one()) != T::zero() {
                return Some(Coord::new(idx / N, idx % N));
            }
        }
        None
    }
}

impl<T, const N: usize> BitAnd for BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        BitGrid {
            bits: self.bits & rhs.bits,
        }
    }
}

impl<T, const N: usize> BitOr for BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        BitGrid {
            bits: self.bits | rhs.bits,
        }
    }
}

impl<T, const N: usize> BitOrAssign for BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits = self.bits | rhs.bits;
    }
}

/// Complement within the grid.
impl<T, const N: usize> Not for BitGrid<T, N>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = Self;
    fn not(self) -> Self {
        BitGrid {
            bits: !self.bits & Self::mask(),
        }
    }
}

//! Discrete cell addressing and the continuous-to-grid coordinate mapping.
//!
//! The world is an unbounded square grid. Continuous positions are quantized
//! by flooring against the configured cell size; viewport bounds quantize to
//! an inclusive [`CellRect`] (floor on the west/south edge, ceil on the
//! east/north edge).

use std::fmt;

use crate::scalar::Scalar;

/// Structural key for one grid cell. Ordering is lexicographic on `(i, j)`
/// and fixes the emission order of every cell list the engine produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub i: i64,
    pub j: i64,
}

impl CellId {
    pub fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }

    /// King-move distance: the number of steps a piece moving one cell in
    /// any direction (diagonals included) needs to reach `other`.
    pub fn chebyshev_distance(self, other: CellId) -> u64 {
        self.i.abs_diff(other.i).max(self.j.abs_diff(other.j))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// Continuous position in world units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WorldPos {
    pub x: Scalar,
    pub y: Scalar,
}

impl WorldPos {
    pub fn new(x: Scalar, y: Scalar) -> Self {
        Self { x, y }
    }

    pub fn from_f64(x: f64, y: f64) -> Self {
        Self {
            x: Scalar::from_f64(x),
            y: Scalar::from_f64(y),
        }
    }

    /// Quantize to the cell containing this position.
    pub fn cell(self, cell_size: Scalar) -> CellId {
        CellId::new(self.x.floor_div(cell_size), self.y.floor_div(cell_size))
    }
}

/// Continuous viewport bounds as reported by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewBounds {
    pub west: Scalar,
    pub south: Scalar,
    pub east: Scalar,
    pub north: Scalar,
}

impl ViewBounds {
    pub fn new(west: Scalar, south: Scalar, east: Scalar, north: Scalar) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    pub fn from_f64(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::new(
            Scalar::from_f64(west),
            Scalar::from_f64(south),
            Scalar::from_f64(east),
            Scalar::from_f64(north),
        )
    }

    /// Quantize to the inclusive cell rectangle covered by these bounds.
    /// Swapped edges are normalized rather than rejected.
    pub fn to_cell_rect(self, cell_size: Scalar) -> CellRect {
        let (west, east) = if self.west <= self.east {
            (self.west, self.east)
        } else {
            (self.east, self.west)
        };
        let (south, north) = if self.south <= self.north {
            (self.south, self.north)
        } else {
            (self.north, self.south)
        };
        CellRect {
            min: CellId::new(west.floor_div(cell_size), south.floor_div(cell_size)),
            max: CellId::new(east.ceil_div(cell_size), north.ceil_div(cell_size)),
        }
    }
}

/// Inclusive rectangle of cells, `min.i..=max.i` by `min.j..=max.j`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub min: CellId,
    pub max: CellId,
}

impl CellRect {
    pub fn new(min: CellId, max: CellId) -> Self {
        debug_assert!(min.i <= max.i && min.j <= max.j, "inverted cell rect");
        Self { min, max }
    }

    pub fn contains(&self, cell: CellId) -> bool {
        cell.i >= self.min.i && cell.i <= self.max.i && cell.j >= self.min.j && cell.j <= self.max.j
    }

    pub fn cell_count(&self) -> u64 {
        let width = (self.max.i - self.min.i + 1) as u64;
        let height = (self.max.j - self.min.j + 1) as u64;
        width * height
    }

    /// All cells in the rectangle, ordered by `CellId`.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        let rect = *self;
        (rect.min.i..=rect.max.i)
            .flat_map(move |i| (rect.min.j..=rect.max.j).map(move |j| CellId::new(i, j)))
    }

    pub fn intersection(&self, other: &CellRect) -> Option<CellRect> {
        let min = CellId::new(self.min.i.max(other.min.i), self.min.j.max(other.min.j));
        let max = CellId::new(self.max.i.min(other.max.i), self.max.j.min(other.max.j));
        if min.i <= max.i && min.j <= max.j {
            Some(CellRect { min, max })
        } else {
            None
        }
    }

    /// Cells of `self` outside `other`, ordered by `CellId`.
    ///
    /// Decomposes into at most three column bands (left of the overlap,
    /// the overlap columns minus overlap rows, right of the overlap), so the
    /// work is proportional to the emitted cells rather than the full area.
    pub fn cells_outside(&self, other: Option<&CellRect>) -> Vec<CellId> {
        let overlap = match other.and_then(|other| self.intersection(other)) {
            Some(overlap) => overlap,
            None => return self.cells().collect(),
        };

        let mut out = Vec::new();
        for i in self.min.i..overlap.min.i {
            for j in self.min.j..=self.max.j {
                out.push(CellId::new(i, j));
            }
        }
        for i in overlap.min.i..=overlap.max.i {
            for j in self.min.j..overlap.min.j {
                out.push(CellId::new(i, j));
            }
            for j in (overlap.max.j + 1)..=self.max.j {
                out.push(CellId::new(i, j));
            }
        }
        for i in (overlap.max.i + 1)..=self.max.i {
            for j in self.min.j..=self.max.j {
                out.push(CellId::new(i, j));
            }
        }
        out
    }
}

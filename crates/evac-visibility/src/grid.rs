//! Regular cell grid over the walkable area.

use serde::{Deserialize, Serialize};

use evac_core::Point;

use crate::{VisibilityError, VisibilityResult};

/// An axis-aligned grid of `nx × ny` square cells starting at `origin`.
///
/// Cell `(ix, iy)` covers `[origin.x + ix·size, origin.x + (ix+1)·size)` and
/// likewise in `y`; the far boundary of the grid belongs to the last cell so
/// the full extent is queryable.  Cells are stored row-major:
/// `index = iy · nx + ix`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub origin:    Point,
    pub cell_size: f64,
    pub nx:        usize,
    pub ny:        usize,
}

impl GridSpec {
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Upper-right corner of the grid.
    pub fn extent(&self) -> Point {
        Point::new(
            self.origin.x + self.nx as f64 * self.cell_size,
            self.origin.y + self.ny as f64 * self.cell_size,
        )
    }

    pub fn validate(&self) -> VisibilityResult<()> {
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            return Err(VisibilityError::InvalidData(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.nx == 0 || self.ny == 0 {
            return Err(VisibilityError::InvalidData("grid has no cells".into()));
        }
        if !self.origin.is_finite() {
            return Err(VisibilityError::InvalidData("grid origin is not finite".into()));
        }
        Ok(())
    }

    /// Row-major index of the cell containing `p`.
    pub fn cell_of(&self, p: Point) -> VisibilityResult<usize> {
        let ix = axis_index(p.x, self.origin.x, self.cell_size, self.nx);
        let iy = axis_index(p.y, self.origin.y, self.cell_size, self.ny);
        match (ix, iy) {
            (Some(ix), Some(iy)) => Ok(iy * self.nx + ix),
            _ => Err(VisibilityError::OutOfBounds(p)),
        }
    }

    /// Centre of cell `index`.
    pub fn cell_center(&self, index: usize) -> Point {
        let ix = index % self.nx;
        let iy = index / self.nx;
        Point::new(
            self.origin.x + (ix as f64 + 0.5) * self.cell_size,
            self.origin.y + (iy as f64 + 0.5) * self.cell_size,
        )
    }

    /// Centres of every cell in storage order.
    pub fn cell_centers(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.cell_count()).map(|i| self.cell_center(i))
    }
}

fn axis_index(v: f64, origin: f64, size: f64, n: usize) -> Option<usize> {
    let rel = (v - origin) / size;
    if !(rel >= 0.0) || rel > n as f64 {
        return None;
    }
    Some((rel.floor() as usize).min(n - 1))
}

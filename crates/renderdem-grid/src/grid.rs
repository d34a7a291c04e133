//! Dense grid accumulation of point elevations.
//!
//! A point contributes to every cell whose center lies within `radius` of
//! it. Cells nobody touched hold a NaN sentinel after finalization.

use crate::{GridError, Result};
use std::str::FromStr;

/// Distance below which a point is considered to sit exactly on a cell
/// center, pinning the IDW value instead of dividing by a vanishing
/// distance.
const EXACT_HIT: f64 = 1e-12;

/// Statistic accumulated per grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    /// Maximum z of the contributing points.
    Max,
    /// Inverse-distance-weighted mean z of the contributing points.
    Idw,
}

impl Statistic {
    /// Tag used in log lines and raster metadata.
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Max => "max",
            Statistic::Idw => "idw",
        }
    }
}

impl FromStr for Statistic {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "max" => Ok(Statistic::Max),
            "idw" => Ok(Statistic::Idw),
            other => Err(GridError::UnknownStatistic(other.to_string())),
        }
    }
}

/// Per-statistic accumulation state.
#[derive(Debug)]
enum Cells {
    Max {
        /// Running maximum per cell, NaN where untouched.
        value: Vec<f64>,
    },
    Idw {
        /// Sum of weighted z per cell.
        numerator: Vec<f64>,
        /// Sum of weights per cell.
        denominator: Vec<f64>,
        /// z of a point sitting exactly on the cell center, NaN otherwise.
        exact: Vec<f64>,
    },
}

/// Accumulates point elevations into a dense row-major grid.
///
/// Row 0 is the southernmost row (the row containing the origin); callers
/// writing north-up rasters flip rows on output.
///
/// Scoped to one tile and one invocation: build it, feed points, finalize,
/// read the data, drop it.
#[derive(Debug)]
pub struct GridAccumulator {
    origin_x: f64,
    origin_y: f64,
    width: usize,
    height: usize,
    resolution: f64,
    radius: f64,
    power: f64,
    window_size: usize,
    cells: Cells,
    data: Option<Vec<f64>>,
}

impl GridAccumulator {
    /// Create an accumulator covering `width x height` cells of edge length
    /// `resolution`, anchored at the grid's southwest corner.
    ///
    /// * `radius` - support radius of the interpolation kernel.
    /// * `window_size` - post-finalize hole-fill window in cells (0 = off).
    /// * `power` - IDW distance exponent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin_x: f64,
        origin_y: f64,
        width: usize,
        height: usize,
        resolution: f64,
        radius: f64,
        statistic: Statistic,
        window_size: usize,
        power: f64,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidGeometry(format!(
                "grid dimensions {}x{}",
                width, height
            )));
        }
        if resolution <= 0.0 {
            return Err(GridError::InvalidGeometry(format!(
                "resolution {}",
                resolution
            )));
        }
        if radius <= 0.0 {
            return Err(GridError::InvalidGeometry(format!("radius {}", radius)));
        }

        let n = width * height;
        let cells = match statistic {
            Statistic::Max => Cells::Max {
                value: vec![f64::NAN; n],
            },
            Statistic::Idw => Cells::Idw {
                numerator: vec![0.0; n],
                denominator: vec![0.0; n],
                exact: vec![f64::NAN; n],
            },
        };

        Ok(GridAccumulator {
            origin_x,
            origin_y,
            width,
            height,
            resolution,
            radius,
            power,
            window_size,
            cells,
            data: None,
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Map-space x of a column's cell center.
    fn center_x(&self, col: usize) -> f64 {
        self.origin_x + (col as f64 + 0.5) * self.resolution
    }

    /// Map-space y of a row's cell center.
    fn center_y(&self, row: usize) -> f64 {
        self.origin_y + (row as f64 + 0.5) * self.resolution
    }

    /// Cell index range whose centers may lie within `radius` along one axis.
    fn index_range(&self, coord: f64, origin: f64, count: usize) -> Option<(usize, usize)> {
        let lo = (coord - origin - self.radius) / self.resolution - 0.5;
        let hi = (coord - origin + self.radius) / self.resolution - 0.5;
        let lo = lo.ceil().max(0.0);
        let hi = hi.floor().min(count as f64 - 1.0);
        if lo > hi {
            return None;
        }
        Some((lo as usize, hi as usize))
    }

    /// Contribute one point to every cell within the kernel radius.
    pub fn add_point(&mut self, x: f64, y: f64, z: f64) {
        let Some((col_lo, col_hi)) = self.index_range(x, self.origin_x, self.width) else {
            return;
        };
        let Some((row_lo, row_hi)) = self.index_range(y, self.origin_y, self.height) else {
            return;
        };

        let radius2 = self.radius * self.radius;
        for row in row_lo..=row_hi {
            let dy = self.center_y(row) - y;
            for col in col_lo..=col_hi {
                let dx = self.center_x(col) - x;
                let dist2 = dx * dx + dy * dy;
                if dist2 > radius2 {
                    continue;
                }
                let idx = row * self.width + col;
                match &mut self.cells {
                    Cells::Max { value } => {
                        if value[idx].is_nan() || z > value[idx] {
                            value[idx] = z;
                        }
                    }
                    Cells::Idw {
                        numerator,
                        denominator,
                        exact,
                    } => {
                        let dist = dist2.sqrt();
                        if dist < EXACT_HIT {
                            exact[idx] = z;
                        } else {
                            let weight = 1.0 / dist.powf(self.power);
                            numerator[idx] += weight * z;
                            denominator[idx] += weight;
                        }
                    }
                }
            }
        }
    }

    /// Resolve accumulated state into the dense output array.
    pub fn finalize(&mut self) {
        let mut data = match &self.cells {
            Cells::Max { value } => value.clone(),
            Cells::Idw {
                numerator,
                denominator,
                exact,
            } => numerator
                .iter()
                .zip(denominator)
                .zip(exact)
                .map(|((&num, &den), &exact)| {
                    if !exact.is_nan() {
                        exact
                    } else if den > 0.0 {
                        num / den
                    } else {
                        f64::NAN
                    }
                })
                .collect(),
        };

        if self.window_size > 0 {
            self.fill_windows(&mut data);
        }
        self.data = Some(data);
    }

    /// Fill empty cells from filled neighbors within the window, weighted by
    /// inverse cell distance.
    fn fill_windows(&self, data: &mut [f64]) {
        let source = data.to_vec();
        let w = self.window_size as isize;
        for row in 0..self.height as isize {
            for col in 0..self.width as isize {
                let idx = (row * self.width as isize + col) as usize;
                if !source[idx].is_nan() {
                    continue;
                }
                let mut num = 0.0;
                let mut den = 0.0;
                for dr in -w..=w {
                    for dc in -w..=w {
                        let (nr, nc) = (row + dr, col + dc);
                        if nr < 0
                            || nc < 0
                            || nr >= self.height as isize
                            || nc >= self.width as isize
                        {
                            continue;
                        }
                        let v = source[(nr * self.width as isize + nc) as usize];
                        if v.is_nan() {
                            continue;
                        }
                        let dist = ((dr * dr + dc * dc) as f64).sqrt();
                        if dist == 0.0 {
                            continue;
                        }
                        num += v / dist;
                        den += 1.0 / dist;
                    }
                }
                if den > 0.0 {
                    data[idx] = num / den;
                }
            }
        }
    }

    /// Dense row-major result, NaN where no data was accumulated.
    pub fn data(&self) -> Result<&[f64]> {
        self.data.as_deref().ok_or(GridError::NotFinalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(statistic: Statistic, radius: f64) -> GridAccumulator {
        GridAccumulator::new(0.0, 0.0, 4, 4, 1.0, radius, statistic, 0, 1.0)
            .expect("valid grid")
    }

    #[test]
    fn test_statistic_from_str() {
        assert_eq!("max".parse::<Statistic>().unwrap(), Statistic::Max);
        assert_eq!("idw".parse::<Statistic>().unwrap(), Statistic::Idw);
        assert!(matches!(
            "mean".parse::<Statistic>(),
            Err(GridError::UnknownStatistic(_))
        ));
    }

    #[test]
    fn test_untouched_cells_are_nan() {
        let mut g = grid(Statistic::Max, 0.6);
        g.finalize();
        assert!(g.data().unwrap().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_max_takes_largest_z() {
        let mut g = grid(Statistic::Max, 0.6);
        // Both points sit on the center of cell (0, 0) at (0.5, 0.5).
        g.add_point(0.5, 0.5, 3.0);
        g.add_point(0.5, 0.5, 7.0);
        g.add_point(0.5, 0.5, 5.0);
        g.finalize();
        let data = g.data().unwrap();
        assert_relative_eq!(data[0], 7.0);
        assert!(data[1].is_nan());
    }

    #[test]
    fn test_point_spreads_within_radius() {
        let mut g = grid(Statistic::Max, 1.1);
        // Centered on cell (1,1) at (1.5, 1.5); radius 1.1 reaches the four
        // edge-adjacent centers (distance 1.0) but not the diagonals (~1.41).
        g.add_point(1.5, 1.5, 9.0);
        g.finalize();
        let data = g.data().unwrap();
        let filled: Vec<usize> = data
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(filled, vec![1, 4, 5, 6, 9]);
        assert!(data.iter().filter(|v| !v.is_nan()).all(|&v| v == 9.0));
    }

    #[test]
    fn test_idw_weights_by_inverse_distance() {
        let mut g = GridAccumulator::new(0.0, 0.0, 1, 1, 1.0, 2.0, Statistic::Idw, 0, 1.0)
            .expect("valid grid");
        // Cell center at (0.5, 0.5). One point at distance 0.5, one at 1.0.
        g.add_point(1.0, 0.5, 10.0); // d=0.5, w=2
        g.add_point(1.5, 0.5, 4.0); // d=1.0, w=1
        g.finalize();
        let data = g.data().unwrap();
        assert_relative_eq!(data[0], (2.0 * 10.0 + 4.0) / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_idw_exact_hit_pins_cell() {
        let mut g = GridAccumulator::new(0.0, 0.0, 1, 1, 1.0, 2.0, Statistic::Idw, 0, 1.0)
            .expect("valid grid");
        g.add_point(1.0, 0.5, 100.0);
        g.add_point(0.5, 0.5, 42.0); // exactly on the center
        g.finalize();
        assert_relative_eq!(g.data().unwrap()[0], 42.0);
    }

    #[test]
    fn test_idw_power_two() {
        let mut g = GridAccumulator::new(0.0, 0.0, 1, 1, 1.0, 2.0, Statistic::Idw, 0, 2.0)
            .expect("valid grid");
        g.add_point(1.0, 0.5, 10.0); // d=0.5, w=4
        g.add_point(1.5, 0.5, 4.0); // d=1.0, w=1
        g.finalize();
        assert_relative_eq!(g.data().unwrap()[0], (4.0 * 10.0 + 4.0) / 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_window_fill() {
        let mut g = GridAccumulator::new(0.0, 0.0, 3, 1, 1.0, 0.6, Statistic::Max, 1, 1.0)
            .expect("valid grid");
        g.add_point(0.5, 0.5, 5.0);
        g.add_point(2.5, 0.5, 7.0);
        g.finalize();
        let data = g.data().unwrap();
        // Middle cell had no data; filled from equal-distance neighbors.
        assert_relative_eq!(data[1], 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_data_before_finalize_is_error() {
        let g = grid(Statistic::Max, 0.6);
        assert!(matches!(g.data(), Err(GridError::NotFinalized)));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert!(GridAccumulator::new(0.0, 0.0, 0, 4, 1.0, 0.5, Statistic::Max, 0, 1.0).is_err());
        assert!(GridAccumulator::new(0.0, 0.0, 4, 4, 0.0, 0.5, Statistic::Max, 0, 1.0).is_err());
        assert!(GridAccumulator::new(0.0, 0.0, 4, 4, 1.0, 0.0, Statistic::Max, 0, 1.0).is_err());
    }
}

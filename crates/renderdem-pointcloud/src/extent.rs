//! Axis-aligned 2D bounding box in projected map units.

/// Axis-aligned bounding box of a point set or tile.
///
/// Invariant: `minx <= maxx` and `miny <= maxy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Minimum x (west edge).
    pub minx: f64,
    /// Maximum x (east edge).
    pub maxx: f64,
    /// Minimum y (south edge).
    pub miny: f64,
    /// Maximum y (north edge).
    pub maxy: f64,
}

impl Extent {
    /// Create an extent from its four edges.
    pub fn new(minx: f64, maxx: f64, miny: f64, maxy: f64) -> Self {
        Extent {
            minx,
            maxx,
            miny,
            maxy,
        }
    }

    /// Width of the extent in map units.
    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }

    /// Height of the extent in map units.
    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }

    /// Check if a coordinate is within the extent (inclusive on all edges).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.minx && x <= self.maxx && y >= self.miny && y <= self.maxy
    }

    /// Return a copy expanded by `buffer` map units on all four sides.
    pub fn buffered(&self, buffer: f64) -> Self {
        Extent {
            minx: self.minx - buffer,
            maxx: self.maxx + buffer,
            miny: self.miny - buffer,
            maxy: self.maxy + buffer,
        }
    }

    /// Grow the extent to include a point.
    pub fn expand_to(&mut self, x: f64, y: f64) {
        self.minx = self.minx.min(x);
        self.maxx = self.maxx.max(x);
        self.miny = self.miny.min(y);
        self.maxy = self.maxy.max(y);
    }

    /// An extent that contains nothing and absorbs the first point expanded
    /// into it.
    pub fn empty() -> Self {
        Extent {
            minx: f64::INFINITY,
            maxx: f64::NEG_INFINITY,
            miny: f64::INFINITY,
            maxy: f64::NEG_INFINITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_height() {
        let e = Extent::new(2.0, 10.0, -3.0, 4.0);
        assert_eq!(e.width(), 8.0);
        assert_eq!(e.height(), 7.0);
    }

    #[test]
    fn test_contains_inclusive_edges() {
        let e = Extent::new(0.0, 10.0, 0.0, 5.0);
        assert!(e.contains(0.0, 0.0));
        assert!(e.contains(10.0, 5.0));
        assert!(e.contains(5.0, 2.5));
        assert!(!e.contains(-0.001, 2.5));
        assert!(!e.contains(10.001, 2.5));
        assert!(!e.contains(5.0, 5.001));
    }

    #[test]
    fn test_buffered_symmetric() {
        let e = Extent::new(0.0, 10.0, 0.0, 5.0);
        let b = e.buffered(2.0);
        assert_eq!(b, Extent::new(-2.0, 12.0, -2.0, 7.0));
    }

    #[test]
    fn test_empty_absorbs_first_point() {
        let mut e = Extent::empty();
        e.expand_to(3.0, -1.0);
        assert_eq!(e, Extent::new(3.0, 3.0, -1.0, -1.0));
        e.expand_to(-2.0, 5.0);
        assert_eq!(e, Extent::new(-2.0, 3.0, -1.0, 5.0));
    }
}

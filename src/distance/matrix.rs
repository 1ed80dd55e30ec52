//! Dense distance matrix.

/// A dense n×n distance matrix stored in row-major order.
///
/// Entries default to `f64::INFINITY`, meaning "no known path". Filled
/// row by row by [`ShortestPaths`](super::ShortestPaths).
///
/// # Examples
///
/// ```
/// use u_arc_routing::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::new(3);
/// assert!(dm.get(0, 1).is_infinite());
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size with every entry infinite.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![f64::INFINITY; size * size],
            size,
        }
    }

    /// Returns the distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Mutable view of the row for `from`.
    pub(crate) fn row_mut(&mut self, from: usize) -> &mut [f64] {
        let start = from * self.size;
        &mut self.data[start..start + self.size]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    ///
    /// Two infinite entries count as equal.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if a.is_infinite() && b.is_infinite() {
                    continue;
                }
                if (a - b).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

use crate::error::{Error, Result};

/// An identified, labelled feature vector.
///
/// The `label` is an opaque tag carried through to search results; the index
/// never looks at it. All points handed to one index must share its dimension.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub id: usize,
    pub label: i32,
    pub vec: Vec<f64>,
}

impl Point {
    pub fn new(id: usize, label: i32, vec: Vec<f64>) -> Self {
        Self { id, label, vec }
    }

    pub fn dimension(&self) -> usize {
        self.vec.len()
    }

    /// Fails with `InvalidDimension` unless the vector has exactly `dimension` coordinates.
    pub fn check_dimension(&self, dimension: usize) -> Result<()> {
        if self.vec.len() != dimension {
            return Err(Error::InvalidDimension {
                id: self.id,
                expected: dimension,
                found: self.vec.len(),
            });
        }
        Ok(())
    }

    /// Fails with `NonFiniteCoordinate` on the first NaN or infinite coordinate.
    pub fn check_finite(&self) -> Result<()> {
        match self.vec.iter().position(|v| !v.is_finite()) {
            Some(axis) => Err(Error::NonFiniteCoordinate { id: self.id, axis }),
            None => Ok(()),
        }
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        distance_squared(&self.vec, &other.vec)
    }
}

/// Squared Euclidean distance. Callers guarantee equal lengths.
#[inline]
pub fn distance_squared(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

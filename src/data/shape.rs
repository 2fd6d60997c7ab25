//! Field shapes: ordered tuples of extents.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, LayoutResult};

/// Rank and per-dimension size of a field. Every extent is at least 1.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Create a shape, rejecting zero extents.
    pub fn new<E: Into<Vec<usize>>>(extents: E) -> LayoutResult<Self> {
        let extents = extents.into();
        if extents.iter().any(|&e| e == 0) {
            return Err(LayoutError::InvalidShape { extents });
        }
        Ok(Self(extents))
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn extents(&self) -> &[usize] {
        &self.0
    }

    /// Extent along `dim`, if the shape has that many dimensions.
    pub fn extent(&self, dim: usize) -> Option<usize> {
        self.0.get(dim).copied()
    }

    /// The identity index mapping `[0, 1, .., rank-1]`.
    pub fn identity_indices(&self) -> Vec<usize> {
        (0..self.rank()).collect()
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = LayoutError;

    fn try_from(extents: Vec<usize>) -> Result<Self, Self::Error> {
        Shape::new(extents)
    }
}

impl From<Shape> for Vec<usize> {
    fn from(shape: Shape) -> Self {
        shape.0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, ")")
    }
}

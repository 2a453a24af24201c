use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZooErr};

/// A tensor shape where any dimension may be unknown.
///
/// Unknown dimensions, usually the batch axis, serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<Option<usize>>);

impl Shape {
    /// Creates a new `Shape` from its raw dimensions.
    pub fn new(dims: Vec<Option<usize>>) -> Self {
        Self(dims)
    }

    /// A `[batch, length, channels]` sequence shape with an unknown batch size.
    ///
    /// # Arguments
    /// * `length` - The sequence length.
    /// * `channels` - The number of channels per position.
    pub fn sequence(length: usize, channels: usize) -> Self {
        Self(vec![None, Some(length), Some(channels)])
    }

    /// A `[batch, num_labels]` label shape with an unknown batch size.
    pub fn labels(num_labels: usize) -> Self {
        Self(vec![None, Some(num_labels)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the dimension at `axis` if it's present and known.
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.0.get(axis).copied().flatten()
    }

    /// Returns the dimension at `axis`, failing unless it's known and positive.
    ///
    /// # Arguments
    /// * `name` - How this shape is referred to in the error.
    /// * `axis` - The axis to read.
    ///
    /// # Returns
    /// The dimension or a `MissingDimension` error.
    pub fn require(&self, name: &'static str, axis: usize) -> Result<usize> {
        self.dim(axis)
            .filter(|&d| d > 0)
            .ok_or(ZooErr::MissingDimension { shape: name, axis })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match d {
                Some(d) => write!(f, "{d}")?,
                None => write!(f, "?")?,
            }
        }
        write!(f, "]")
    }
}

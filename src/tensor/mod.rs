//! Tensor element types, shapes, and constant tensor data read from trained models.

mod data;
mod types;

use core::{fmt, ops::Deref};

use smallvec::SmallVec;

pub use self::{data::TensorData, types::TensorElementType};

/// The shape of a tensor. Dynamic dimensions are represented by `-1`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Shape(SmallVec<i64, 4>);

impl Shape {
	pub fn new(dims: impl IntoIterator<Item = i64>) -> Self {
		Self(dims.into_iter().collect())
	}

	/// Returns `true` if no dimension is dynamic.
	pub fn is_static(&self) -> bool {
		self.0.iter().all(|d| *d >= 0)
	}

	/// Total number of elements, or `None` if the shape has a dynamic dimension or its size overflows `usize`.
	pub fn num_elements(&self) -> Option<usize> {
		self.0.iter().try_fold(1usize, |n, d| n.checked_mul(usize::try_from(*d).ok()?))
	}

	/// The dimensions as `usize`, or `None` if the shape has a dynamic dimension.
	pub fn to_static(&self) -> Option<Vec<usize>> {
		self.is_static().then(|| self.0.iter().map(|d| *d as usize).collect())
	}
}

impl Deref for Shape {
	type Target = [i64];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<const N: usize> From<[i64; N]> for Shape {
	fn from(value: [i64; N]) -> Self {
		Self::new(value)
	}
}

impl From<&[i64]> for Shape {
	fn from(value: &[i64]) -> Self {
		Self::new(value.iter().copied())
	}
}

impl fmt::Display for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[")?;
		for (i, d) in self.0.iter().enumerate() {
			if i != 0 {
				f.write_str(", ")?;
			}
			if *d < 0 { f.write_str("?")? } else { write!(f, "{d}")? }
		}
		f.write_str("]")
	}
}

#[cfg(test)]
mod tests {
	use super::Shape;

	#[test]
	fn test_shape() {
		let shape = Shape::new([1, 1, 28, 28]);
		assert!(shape.is_static());
		assert_eq!(shape.num_elements(), Some(784));
		assert_eq!(shape.to_string(), "[1, 1, 28, 28]");

		let shape = Shape::new([-1, 10]);
		assert!(!shape.is_static());
		assert_eq!(shape.num_elements(), None);
		assert_eq!(shape.to_static(), None);
		assert_eq!(shape.to_string(), "[?, 10]");

		assert_eq!(Shape::new([1 << 40, 1 << 40]).num_elements(), None);
		assert_eq!(Shape::new([]).num_elements(), Some(1));
	}
}

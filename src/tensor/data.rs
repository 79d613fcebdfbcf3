use mlport_proto::onnx::{TensorProto, tensor_proto::DataLocation};
use ndarray::{ArrayD, IxDyn};

use super::{Shape, TensorElementType};
use crate::{Error, ErrorCode, Result};

/// A constant tensor from a trained model: an initializer, or the value of a `Constant` node.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorData {
	name: String,
	ty: TensorElementType,
	shape: Shape,
	len: usize,
	proto: TensorProto
}

impl TensorData {
	pub(crate) fn from_proto(name: impl Into<String>, proto: TensorProto) -> Result<Self> {
		let name = name.into();
		if proto.data_location() == DataLocation::External {
			return Err(Error::new_with_code(
				ErrorCode::NotImplemented,
				format!("Tensor `{name}` stores its data in an external file, which is not supported")
			));
		}
		let ty = TensorElementType::try_from(proto.data_type)?;
		let shape = Shape::new(proto.dims.iter().copied());
		let len = shape.num_elements().ok_or_else(|| {
			Error::new_with_code(ErrorCode::InvalidGraph, format!("Tensor `{name}` has dimensions {:?}, which do not describe a valid size", proto.dims))
		})?;
		Ok(Self { name, ty, shape, len, proto })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn into_proto(self) -> TensorProto {
		self.proto
	}

	pub fn dtype(&self) -> TensorElementType {
		self.ty
	}

	pub fn shape(&self) -> &Shape {
		&self.shape
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Decodes the tensor's values as `f32`, regardless of the stored floating point width.
	pub fn to_f32_vec(&self) -> Result<Vec<f32>> {
		let raw = &self.proto.raw_data;
		let values: Vec<f32> = match self.ty {
			TensorElementType::Float32 if raw.is_empty() => self.proto.float_data.clone(),
			TensorElementType::Float32 => raw.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect(),
			TensorElementType::Float64 if raw.is_empty() => self.proto.double_data.iter().map(|v| *v as f32).collect(),
			TensorElementType::Float64 => raw
				.chunks_exact(8)
				.map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32)
				.collect(),
			#[cfg(feature = "half")]
			TensorElementType::Float16 if raw.is_empty() => self.proto.int32_data.iter().map(|v| half::f16::from_bits(*v as u16).to_f32()).collect(),
			#[cfg(feature = "half")]
			TensorElementType::Float16 => raw.chunks_exact(2).map(|c| half::f16::from_le_bytes([c[0], c[1]]).to_f32()).collect(),
			#[cfg(feature = "half")]
			TensorElementType::Bfloat16 if raw.is_empty() => self.proto.int32_data.iter().map(|v| half::bf16::from_bits(*v as u16).to_f32()).collect(),
			#[cfg(feature = "half")]
			TensorElementType::Bfloat16 => raw.chunks_exact(2).map(|c| half::bf16::from_le_bytes([c[0], c[1]]).to_f32()).collect(),
			#[cfg(not(feature = "half"))]
			TensorElementType::Float16 | TensorElementType::Bfloat16 => {
				return Err(Error::new_with_code(
					ErrorCode::NotImplemented,
					format!("Tensor `{}` holds 16-bit floats; enable the `half` feature to decode it", self.name)
				));
			}
			_ => self.to_i64_vec()?.into_iter().map(|v| v as f32).collect()
		};
		self.check_len(values.len())?;
		Ok(values)
	}

	/// Decodes the tensor's values as `i64`. Only integer and boolean tensors can be decoded this way.
	pub fn to_i64_vec(&self) -> Result<Vec<i64>> {
		let raw = &self.proto.raw_data;
		let values: Vec<i64> = match self.ty {
			TensorElementType::Int64 if raw.is_empty() => self.proto.int64_data.clone(),
			TensorElementType::Uint64 if raw.is_empty() => self.proto.uint64_data.iter().map(|v| *v as i64).collect(),
			TensorElementType::Int64 | TensorElementType::Uint64 => raw
				.chunks_exact(8)
				.map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
				.collect(),
			TensorElementType::Uint32 if raw.is_empty() => self.proto.uint64_data.iter().map(|v| *v as i64).collect(),
			TensorElementType::Int32 | TensorElementType::Int16 | TensorElementType::Int8 | TensorElementType::Uint16 | TensorElementType::Uint8 | TensorElementType::Bool
				if raw.is_empty() =>
			{
				self.proto.int32_data.iter().map(|v| *v as i64).collect()
			}
			TensorElementType::Int32 => raw.chunks_exact(4).map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64).collect(),
			TensorElementType::Uint32 => raw.chunks_exact(4).map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as i64).collect(),
			TensorElementType::Int16 => raw.chunks_exact(2).map(|c| i16::from_le_bytes([c[0], c[1]]) as i64).collect(),
			TensorElementType::Uint16 => raw.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]]) as i64).collect(),
			TensorElementType::Int8 => raw.iter().map(|b| *b as i8 as i64).collect(),
			TensorElementType::Uint8 | TensorElementType::Bool => raw.iter().map(|b| *b as i64).collect(),
			other => {
				return Err(Error::new_with_code(
					ErrorCode::InvalidGraph,
					format!("Tensor `{}` has element type `{other}`, expected an integer tensor", self.name)
				));
			}
		};
		self.check_len(values.len())?;
		Ok(values)
	}

	/// Decodes the tensor into an `f32` array of its declared shape.
	pub fn to_f32_array(&self) -> Result<ArrayD<f32>> {
		let dims = self
			.shape
			.to_static()
			.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidGraph, format!("Tensor `{}` has a negative dimension", self.name)))?;
		Ok(ArrayD::from_shape_vec(IxDyn(&dims), self.to_f32_vec()?)?)
	}

	fn check_len(&self, len: usize) -> Result<()> {
		let expected = self.len();
		if len != expected {
			return Err(Error::new_with_code(
				ErrorCode::InvalidGraph,
				format!("Tensor `{}` with shape {} should hold {expected} elements, but holds {len}", self.name, self.shape)
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use mlport_proto::onnx::TensorProto;

	use super::TensorData;
	use crate::{ErrorCode, tensor::TensorElementType};

	#[test]
	fn test_float_data_and_raw_data_agree() -> crate::Result<()> {
		let from_floats = TensorData::from_proto("w", TensorProto {
			dims: vec![2, 2],
			data_type: 1,
			float_data: vec![1., 2., 3., 4.],
			..Default::default()
		})?;
		let from_raw = TensorData::from_proto("w", TensorProto {
			dims: vec![2, 2],
			data_type: 1,
			raw_data: [1f32, 2., 3., 4.].iter().flat_map(|v| v.to_le_bytes()).collect(),
			..Default::default()
		})?;
		assert_eq!(from_floats.dtype(), TensorElementType::Float32);
		assert_eq!(from_floats.to_f32_vec()?, from_raw.to_f32_vec()?);
		assert_eq!(from_raw.to_f32_array()?.shape(), &[2, 2]);
		Ok(())
	}

	#[test]
	fn test_int64_shape_constant() -> crate::Result<()> {
		let shape = TensorData::from_proto("shape", TensorProto {
			dims: vec![2],
			data_type: 7,
			raw_data: [-1i64, 784].iter().flat_map(|v| v.to_le_bytes()).collect(),
			..Default::default()
		})?;
		assert_eq!(shape.to_i64_vec()?, vec![-1, 784]);
		Ok(())
	}

	#[test]
	fn test_length_mismatch() -> crate::Result<()> {
		let bad = TensorData::from_proto("bad", TensorProto {
			dims: vec![3],
			data_type: 1,
			float_data: vec![1., 2.],
			..Default::default()
		})?;
		assert_eq!(bad.to_f32_vec().map_err(|e| e.code()), Err(ErrorCode::InvalidGraph));
		Ok(())
	}

	#[test]
	fn test_oversized_dimensions() {
		let huge = TensorData::from_proto("huge", TensorProto {
			dims: vec![1 << 40, 1 << 40],
			data_type: 1,
			float_data: vec![0.; 2],
			..Default::default()
		});
		assert_eq!(huge.map(|_| ()).map_err(|e| e.code()), Err(ErrorCode::InvalidGraph));

		let negative = TensorData::from_proto("negative", TensorProto { dims: vec![-1, 4], data_type: 1, ..Default::default() });
		assert_eq!(negative.map(|_| ()).map_err(|e| e.code()), Err(ErrorCode::InvalidGraph));
	}

	#[cfg(feature = "half")]
	#[test]
	fn test_float16_raw_data() -> crate::Result<()> {
		let t = TensorData::from_proto("h", TensorProto {
			dims: vec![2],
			data_type: 10,
			raw_data: [half::f16::from_f32(0.5), half::f16::from_f32(-2.0)].iter().flat_map(|v| v.to_le_bytes()).collect(),
			..Default::default()
		})?;
		assert_eq!(t.to_f32_vec()?, vec![0.5, -2.0]);
		Ok(())
	}
}

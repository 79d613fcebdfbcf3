use core::fmt;

use mlport_proto::{coreml::array_feature_type::ArrayDataType, onnx::tensor_proto::DataType};

use crate::{Error, ErrorCode, Result};

/// Enum mapping the tensor element types an ONNX graph can declare.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TensorElementType {
	/// 32-bit floating point number, equivalent to Rust's `f32`.
	Float32,
	/// Unsigned 8-bit integer, equivalent to Rust's `u8`.
	Uint8,
	/// Signed 8-bit integer, equivalent to Rust's `i8`.
	Int8,
	/// Unsigned 16-bit integer, equivalent to Rust's `u16`.
	Uint16,
	/// Signed 16-bit integer, equivalent to Rust's `i16`.
	Int16,
	/// Signed 32-bit integer, equivalent to Rust's `i32`.
	Int32,
	/// Signed 64-bit integer, equivalent to Rust's `i64`.
	Int64,
	/// String, equivalent to Rust's `String`.
	String,
	/// Boolean, equivalent to Rust's `bool`.
	Bool,
	/// 16-bit floating point number, decoded through [`half::f16`] when the `half` feature is enabled.
	Float16,
	/// 64-bit floating point number, equivalent to Rust's `f64`. Also known as `double`.
	Float64,
	/// Unsigned 32-bit integer, equivalent to Rust's `u32`.
	Uint32,
	/// Unsigned 64-bit integer, equivalent to Rust's `u64`.
	Uint64,
	/// Brain 16-bit floating point number, decoded through [`half::bf16`] when the `half` feature is enabled.
	Bfloat16
}

impl TensorElementType {
	/// Returns `true` for the floating point element types.
	pub fn is_float(&self) -> bool {
		matches!(self, TensorElementType::Float32 | TensorElementType::Float16 | TensorElementType::Float64 | TensorElementType::Bfloat16)
	}

	/// The Core ML multi-array data type used to declare a feature of this element type.
	pub(crate) fn to_array_data_type(self) -> Result<ArrayDataType> {
		match self {
			TensorElementType::Float32 => Ok(ArrayDataType::Float32),
			TensorElementType::Float64 => Ok(ArrayDataType::Double),
			TensorElementType::Float16 => Ok(ArrayDataType::Float16),
			TensorElementType::Int32 | TensorElementType::Int64 => Ok(ArrayDataType::Int32),
			other => Err(Error::new_with_code(ErrorCode::NotImplemented, format!("Core ML multi-arrays cannot hold `{other}` elements")))
		}
	}
}

impl TryFrom<i32> for TensorElementType {
	type Error = Error;

	/// Converts an ONNX `TensorProto.DataType` code.
	fn try_from(value: i32) -> Result<Self> {
		let data_type = DataType::try_from(value).map_err(|_| Error::new_with_code(ErrorCode::InvalidGraph, format!("Unknown ONNX tensor data type {value}")))?;
		match data_type {
			DataType::Float => Ok(TensorElementType::Float32),
			DataType::Uint8 => Ok(TensorElementType::Uint8),
			DataType::Int8 => Ok(TensorElementType::Int8),
			DataType::Uint16 => Ok(TensorElementType::Uint16),
			DataType::Int16 => Ok(TensorElementType::Int16),
			DataType::Int32 => Ok(TensorElementType::Int32),
			DataType::Int64 => Ok(TensorElementType::Int64),
			DataType::String => Ok(TensorElementType::String),
			DataType::Bool => Ok(TensorElementType::Bool),
			DataType::Float16 => Ok(TensorElementType::Float16),
			DataType::Double => Ok(TensorElementType::Float64),
			DataType::Uint32 => Ok(TensorElementType::Uint32),
			DataType::Uint64 => Ok(TensorElementType::Uint64),
			DataType::Bfloat16 => Ok(TensorElementType::Bfloat16),
			DataType::Undefined | DataType::Complex64 | DataType::Complex128 => {
				Err(Error::new_with_code(ErrorCode::NotImplemented, format!("Unsupported ONNX tensor data type {data_type:?}")))
			}
		}
	}
}

impl fmt::Display for TensorElementType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TensorElementType::Bool => "bool",
			TensorElementType::Bfloat16 => "bf16",
			TensorElementType::Float16 => "f16",
			TensorElementType::Float32 => "f32",
			TensorElementType::Float64 => "f64",
			TensorElementType::Int16 => "i16",
			TensorElementType::Int32 => "i32",
			TensorElementType::Int64 => "i64",
			TensorElementType::Int8 => "i8",
			TensorElementType::String => "String",
			TensorElementType::Uint16 => "u16",
			TensorElementType::Uint32 => "u32",
			TensorElementType::Uint64 => "u64",
			TensorElementType::Uint8 => "u8"
		})
	}
}

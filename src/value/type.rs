use core::fmt;

use mlport_proto::{
	coreml::{
		ArrayFeatureType, DictionaryFeatureType, DoubleFeatureType, FeatureType, ImageFeatureType, Int64FeatureType, StringFeatureType,
		dictionary_feature_type::KeyType, feature_type, image_feature_type
	},
	onnx::{TypeProto, tensor_shape_proto::dimension, type_proto}
};

use crate::{
	Error, ErrorCode, Result,
	tensor::{Shape, TensorElementType}
};

/// Pixel layout of an image feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
	/// One 8-bit channel.
	Grayscale,
	/// Three 8-bit channels in red, green, blue order.
	Rgb,
	/// Three 8-bit channels in blue, green, red order.
	Bgr,
	/// One 16-bit floating point channel.
	GrayscaleFloat16
}

impl ColorSpace {
	/// Number of channels an image of this color space feeds into the network.
	pub fn channels(&self) -> i64 {
		match self {
			ColorSpace::Grayscale | ColorSpace::GrayscaleFloat16 => 1,
			ColorSpace::Rgb | ColorSpace::Bgr => 3
		}
	}
}

impl From<ColorSpace> for image_feature_type::ColorSpace {
	fn from(value: ColorSpace) -> Self {
		match value {
			ColorSpace::Grayscale => image_feature_type::ColorSpace::Grayscale,
			ColorSpace::Rgb => image_feature_type::ColorSpace::Rgb,
			ColorSpace::Bgr => image_feature_type::ColorSpace::Bgr,
			ColorSpace::GrayscaleFloat16 => image_feature_type::ColorSpace::GrayscaleFloat16
		}
	}
}

impl TryFrom<image_feature_type::ColorSpace> for ColorSpace {
	type Error = Error;

	fn try_from(value: image_feature_type::ColorSpace) -> Result<Self> {
		match value {
			image_feature_type::ColorSpace::Grayscale => Ok(ColorSpace::Grayscale),
			image_feature_type::ColorSpace::Rgb => Ok(ColorSpace::Rgb),
			image_feature_type::ColorSpace::Bgr => Ok(ColorSpace::Bgr),
			image_feature_type::ColorSpace::GrayscaleFloat16 => Ok(ColorSpace::GrayscaleFloat16),
			image_feature_type::ColorSpace::InvalidColorSpace => Err(Error::new_with_code(ErrorCode::InvalidProtobuf, "Image feature has an invalid color space"))
		}
	}
}

impl fmt::Display for ColorSpace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ColorSpace::Grayscale => "Grayscale",
			ColorSpace::Rgb => "RGB",
			ColorSpace::Bgr => "BGR",
			ColorSpace::GrayscaleFloat16 => "Grayscale16Half"
		})
	}
}

/// Key type of a [`ValueType::Dictionary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryKey {
	Int64,
	String
}

/// The type of a trained model's graph input/output, or of a converted model's input/output feature.
///
/// Trained models only ever produce [`ValueType::Tensor`]; the other variants are Core ML feature types.
///
/// ```
/// # use mlport::{tensor::{Shape, TensorElementType}, value::{ColorSpace, ValueType}};
/// let input = ValueType::Tensor {
/// 	ty: TensorElementType::Float32,
/// 	shape: Shape::new([-1, 1, 28, 28]),
/// 	dimension_symbols: vec![Some("batch".to_string()), None, None, None]
/// };
/// assert_eq!(input.to_string(), "Tensor<f32>(batch, 1, 28, 28)");
///
/// let image = ValueType::Image { width: 28, height: 28, color_space: ColorSpace::Grayscale };
/// assert_eq!(image.image_dimensions(), Some((28, 28)));
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValueType {
	/// A tensor/multi-dimensional array in a trained model's graph.
	Tensor {
		/// Element type of the tensor.
		ty: TensorElementType,
		/// Dimensions of the tensor. Dimensions not fixed by the model are `-1`.
		shape: Shape,
		/// Names of symbolic (dynamic) dimensions, if the model gives them one.
		dimension_symbols: Vec<Option<String>>
	},
	/// An image with a fixed pixel size.
	Image { width: i64, height: i64, color_space: ColorSpace },
	/// A Core ML multi-array; the shape excludes the batch dimension.
	MultiArray { ty: TensorElementType, shape: Shape },
	/// A dictionary from labels to `f64` scores, as produced by classifiers.
	Dictionary { key: DictionaryKey },
	String,
	Int64,
	Double
}

impl ValueType {
	pub(crate) fn from_type_proto(name: &str, ty: Option<&TypeProto>) -> Result<Self> {
		let Some(type_proto::Value::TensorType(tensor)) = ty.and_then(|t| t.value.as_ref()) else {
			return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("Value `{name}` is not a tensor; only tensor inputs & outputs are supported")));
		};
		let ty = TensorElementType::try_from(tensor.elem_type)?;
		let dims = tensor.shape.as_ref().map(|s| s.dim.as_slice()).unwrap_or_default();
		let shape = Shape::new(dims.iter().map(|d| match d.value {
			Some(dimension::Value::DimValue(v)) if v >= 0 => v,
			_ => -1
		}));
		let dimension_symbols = dims
			.iter()
			.map(|d| match &d.value {
				Some(dimension::Value::DimParam(s)) if !s.is_empty() => Some(s.clone()),
				_ => None
			})
			.collect();
		Ok(ValueType::Tensor { ty, shape, dimension_symbols })
	}

	pub(crate) fn from_feature_type(ty: &FeatureType) -> Result<Self> {
		match &ty.r#type {
			Some(feature_type::Type::Int64Type(_)) => Ok(ValueType::Int64),
			Some(feature_type::Type::DoubleType(_)) => Ok(ValueType::Double),
			Some(feature_type::Type::StringType(_)) => Ok(ValueType::String),
			Some(feature_type::Type::ImageType(image)) => Ok(ValueType::Image {
				width: image.width,
				height: image.height,
				color_space: ColorSpace::try_from(image.color_space())?
			}),
			Some(feature_type::Type::MultiArrayType(array)) => Ok(ValueType::MultiArray {
				ty: match array.data_type() {
					mlport_proto::coreml::array_feature_type::ArrayDataType::Double => TensorElementType::Float64,
					mlport_proto::coreml::array_feature_type::ArrayDataType::Int32 => TensorElementType::Int32,
					mlport_proto::coreml::array_feature_type::ArrayDataType::Float16 => TensorElementType::Float16,
					_ => TensorElementType::Float32
				},
				shape: Shape::new(array.shape.iter().copied())
			}),
			Some(feature_type::Type::DictionaryType(dict)) => Ok(ValueType::Dictionary {
				key: match dict.key_type {
					Some(KeyType::Int64KeyType(_)) => DictionaryKey::Int64,
					_ => DictionaryKey::String
				}
			}),
			None => Err(Error::new_with_code(ErrorCode::InvalidProtobuf, "Feature has no type"))
		}
	}

	pub(crate) fn to_feature_type(&self) -> Result<FeatureType> {
		let ty = match self {
			ValueType::Int64 => feature_type::Type::Int64Type(Int64FeatureType {}),
			ValueType::Double => feature_type::Type::DoubleType(DoubleFeatureType {}),
			ValueType::String => feature_type::Type::StringType(StringFeatureType {}),
			ValueType::Image { width, height, color_space } => {
				let mut image = ImageFeatureType { width: *width, height: *height, ..Default::default() };
				image.set_color_space((*color_space).into());
				feature_type::Type::ImageType(image)
			}
			ValueType::MultiArray { ty, shape } => {
				let mut array = ArrayFeatureType { shape: shape.to_vec(), ..Default::default() };
				array.set_data_type(ty.to_array_data_type()?);
				feature_type::Type::MultiArrayType(array)
			}
			ValueType::Dictionary { key } => feature_type::Type::DictionaryType(DictionaryFeatureType {
				key_type: Some(match key {
					DictionaryKey::Int64 => KeyType::Int64KeyType(Int64FeatureType {}),
					DictionaryKey::String => KeyType::StringKeyType(StringFeatureType {})
				})
			}),
			ValueType::Tensor { .. } => {
				return Err(Error::new_with_code(ErrorCode::InvalidArgument, "Graph tensors must be converted to images or multi-arrays to be Core ML features"));
			}
		};
		Ok(FeatureType { r#type: Some(ty), is_optional: false })
	}

	/// Returns the shape of this value type if it is a tensor or multi-array.
	#[must_use]
	pub fn tensor_shape(&self) -> Option<&Shape> {
		match self {
			ValueType::Tensor { shape, .. } | ValueType::MultiArray { shape, .. } => Some(shape),
			_ => None
		}
	}

	/// Returns `(width, height)` if this value type is an image.
	#[must_use]
	pub fn image_dimensions(&self) -> Option<(i64, i64)> {
		match self {
			ValueType::Image { width, height, .. } => Some((*width, *height)),
			_ => None
		}
	}
}

impl fmt::Display for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValueType::Tensor { ty, shape, dimension_symbols } => {
				write!(
					f,
					"Tensor<{ty}>({})",
					shape
						.iter()
						.enumerate()
						.map(|(i, c)| if *c == -1 {
							dimension_symbols.get(i).cloned().flatten().unwrap_or_else(|| String::from("dyn"))
						} else {
							c.to_string()
						})
						.collect::<Vec<_>>()
						.join(", ")
				)
			}
			ValueType::Image { width, height, color_space } => write!(f, "Image<{color_space}>({width}x{height})"),
			ValueType::MultiArray { ty, shape } => {
				write!(f, "MultiArray<{ty}>({})", shape.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", "))
			}
			ValueType::Dictionary { key: DictionaryKey::Int64 } => f.write_str("Dictionary<i64, f64>"),
			ValueType::Dictionary { key: DictionaryKey::String } => f.write_str("Dictionary<String, f64>"),
			ValueType::String => f.write_str("String"),
			ValueType::Int64 => f.write_str("Int64"),
			ValueType::Double => f.write_str("Double")
		}
	}
}

#[cfg(test)]
mod tests {
	use mlport_proto::onnx::{
		TensorShapeProto, TypeProto,
		tensor_shape_proto::{Dimension, dimension},
		type_proto
	};

	use super::{ColorSpace, DictionaryKey, ValueType};
	use crate::tensor::{Shape, TensorElementType};

	fn dim(value: dimension::Value) -> Dimension {
		Dimension { value: Some(value), ..Default::default() }
	}

	#[test]
	fn test_from_onnx_type() -> crate::Result<()> {
		let proto = TypeProto {
			value: Some(type_proto::Value::TensorType(type_proto::Tensor {
				elem_type: 1,
				shape: Some(TensorShapeProto {
					dim: vec![dim(dimension::Value::DimParam("N".to_string())), dim(dimension::Value::DimValue(1)), dim(dimension::Value::DimValue(28))]
				})
			})),
			..Default::default()
		};
		let ty = ValueType::from_type_proto("x", Some(&proto))?;
		assert_eq!(ty, ValueType::Tensor {
			ty: TensorElementType::Float32,
			shape: Shape::new([-1, 1, 28]),
			dimension_symbols: vec![Some("N".to_string()), None, None]
		});
		assert_eq!(ty.to_string(), "Tensor<f32>(N, 1, 28)");
		Ok(())
	}

	#[test]
	fn test_feature_type_round_trip() -> crate::Result<()> {
		for ty in [
			ValueType::Image { width: 28, height: 14, color_space: ColorSpace::Rgb },
			ValueType::MultiArray { ty: TensorElementType::Float32, shape: Shape::new([10]) },
			ValueType::Dictionary { key: DictionaryKey::String },
			ValueType::String
		] {
			assert_eq!(ValueType::from_feature_type(&ty.to_feature_type()?)?, ty);
		}
		Ok(())
	}

	#[test]
	fn test_tensor_is_not_a_feature() {
		let ty = ValueType::Tensor { ty: TensorElementType::Float32, shape: Shape::new([1]), dimension_symbols: vec![None] };
		assert!(ty.to_feature_type().is_err());
	}
}

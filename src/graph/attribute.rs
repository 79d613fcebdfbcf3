use mlport_proto::onnx::{AttributeProto, attribute_proto::AttributeType};

use crate::{Error, ErrorCode, Result, tensor::TensorData};

mod private {
	pub trait Sealed {}
}

/// Types an ONNX node attribute can be read as.
pub trait FromAttribute: private::Sealed + Sized {
	#[doc(hidden)]
	fn attr_type() -> AttributeType;

	#[doc(hidden)]
	fn from_attribute(attr: &AttributeProto) -> Result<Self>;
}

macro_rules! impl_from_attribute {
	($type_:ty, $attr_type:ident, |$attr:ident| $read:expr) => {
		impl private::Sealed for $type_ {}

		impl FromAttribute for $type_ {
			fn attr_type() -> AttributeType {
				AttributeType::$attr_type
			}

			fn from_attribute($attr: &AttributeProto) -> Result<Self> {
				Ok($read)
			}
		}
	};
}

impl_from_attribute!(f32, Float, |attr| attr.f);
impl_from_attribute!(i64, Int, |attr| attr.i);
impl_from_attribute!(Vec<f32>, Floats, |attr| attr.floats.clone());
impl_from_attribute!(Vec<i64>, Ints, |attr| attr.ints.clone());
impl_from_attribute!(String, String, |attr| String::from_utf8(attr.s.clone()).map_err(Error::wrap)?);

impl private::Sealed for TensorData {}

impl FromAttribute for TensorData {
	fn attr_type() -> AttributeType {
		AttributeType::Tensor
	}

	fn from_attribute(attr: &AttributeProto) -> Result<Self> {
		let tensor = attr
			.t
			.clone()
			.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidGraph, format!("Tensor attribute `{}` holds no tensor", attr.name)))?;
		TensorData::from_proto(attr.name.clone(), tensor)
	}
}

pub(crate) fn read_attribute<T: FromAttribute>(attr: &AttributeProto) -> Result<T> {
	// older exporters leave `type` unset; trust the field that was requested in that case
	let declared = attr.r#type();
	if declared != AttributeType::Undefined && declared != T::attr_type() {
		return Err(Error::new_with_code(
			ErrorCode::InvalidGraph,
			format!("Attribute `{}` has type {declared:?}, expected {:?}", attr.name, T::attr_type())
		));
	}
	T::from_attribute(attr)
}

#[cfg(test)]
mod tests {
	use mlport_proto::onnx::{AttributeProto, attribute_proto::AttributeType};

	use super::read_attribute;

	#[test]
	fn test_typed_read() -> crate::Result<()> {
		let mut attr = AttributeProto { name: "strides".to_string(), ints: vec![2, 2], ..Default::default() };
		attr.set_type(AttributeType::Ints);
		assert_eq!(read_attribute::<Vec<i64>>(&attr)?, vec![2, 2]);
		assert!(read_attribute::<f32>(&attr).is_err());

		let untyped = AttributeProto { name: "alpha".to_string(), f: 0.2, ..Default::default() };
		assert_eq!(read_attribute::<f32>(&untyped)?, 0.2);
		Ok(())
	}
}

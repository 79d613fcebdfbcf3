//! Types of model inputs & outputs.

mod r#type;

pub use self::r#type::{ColorSpace, DictionaryKey, ValueType};

/// A named input or output of a model, along with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outlet {
	name: String,
	dtype: ValueType
}

impl Outlet {
	pub fn new(name: impl Into<String>, dtype: ValueType) -> Self {
		Self { name: name.into(), dtype }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn dtype(&self) -> &ValueType {
		&self.dtype
	}
}

//! Descriptive model metadata: the free-text block attached to converted models, and the producer information
//! carried by trained models.

use std::collections::BTreeMap;

use mlport_proto::{coreml::Metadata, onnx::ModelProto};

/// Free-text metadata stored in a converted model: author, license, description, version and user-defined pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModelMetadata {
	pub author: String,
	pub license: String,
	pub short_description: String,
	pub version: String,
	pub user_defined: BTreeMap<String, String>
}

impl ModelMetadata {
	/// Returns `true` if no field is set.
	pub fn is_empty(&self) -> bool {
		self.author.is_empty() && self.license.is_empty() && self.short_description.is_empty() && self.version.is_empty() && self.user_defined.is_empty()
	}
}

impl From<&Metadata> for ModelMetadata {
	fn from(value: &Metadata) -> Self {
		Self {
			author: value.author.clone(),
			license: value.license.clone(),
			short_description: value.short_description.clone(),
			version: value.version_string.clone(),
			user_defined: value.user_defined.clone()
		}
	}
}

impl From<ModelMetadata> for Metadata {
	fn from(value: ModelMetadata) -> Self {
		Self {
			author: value.author,
			license: value.license,
			short_description: value.short_description,
			version_string: value.version,
			user_defined: value.user_defined
		}
	}
}

/// Container for a trained model's metadata, including name & producer information.
#[derive(Debug, Clone, Copy)]
pub struct TrainedModelMetadata<'m> {
	model: &'m ModelProto
}

impl<'m> TrainedModelMetadata<'m> {
	pub(crate) fn new(model: &'m ModelProto) -> Self {
		TrainedModelMetadata { model }
	}

	/// Gets the model description, or `None` if no description is present.
	pub fn description(&self) -> Option<&'m str> {
		non_empty(&self.model.doc_string)
	}

	/// Gets the name of the tool that produced the model, or `None` if it is not present.
	pub fn producer(&self) -> Option<&'m str> {
		non_empty(&self.model.producer_name)
	}

	/// Gets the version of the tool that produced the model.
	pub fn producer_version(&self) -> Option<&'m str> {
		non_empty(&self.model.producer_version)
	}

	/// Gets the graph name, or `None` if it is not present.
	pub fn name(&self) -> Option<&'m str> {
		self.model.graph.as_ref().and_then(|g| non_empty(&g.name))
	}

	/// Gets the model version.
	pub fn version(&self) -> i64 {
		self.model.model_version
	}

	/// Fetch the value of a custom metadata key. Returns `None` if the key is not found.
	pub fn custom(&self, key: &str) -> Option<&'m str> {
		self.model.metadata_props.iter().find(|p| p.key == key).map(|p| p.value.as_str())
	}

	pub fn custom_keys(&self) -> Vec<&'m str> {
		self.model.metadata_props.iter().map(|p| p.key.as_str()).collect()
	}
}

fn non_empty(s: &str) -> Option<&str> {
	if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
	use mlport_proto::{
		coreml::Metadata,
		onnx::{GraphProto, ModelProto, StringStringEntryProto}
	};

	use super::{ModelMetadata, TrainedModelMetadata};

	#[test]
	fn test_trained_metadata() {
		let model = ModelProto {
			producer_name: "tf2onnx".to_string(),
			doc_string: "test description".to_string(),
			graph: Some(GraphProto { name: "mnist".to_string(), ..Default::default() }),
			metadata_props: vec![StringStringEntryProto { key: "custom_key".to_string(), value: "custom_value".to_string() }],
			..Default::default()
		};
		let meta = TrainedModelMetadata::new(&model);
		assert_eq!(meta.producer(), Some("tf2onnx"));
		assert_eq!(meta.description(), Some("test description"));
		assert_eq!(meta.name(), Some("mnist"));
		assert_eq!(meta.producer_version(), None);
		assert_eq!(meta.custom("custom_key"), Some("custom_value"));
		assert_eq!(meta.custom_keys(), vec!["custom_key"]);
	}

	#[test]
	fn test_coreml_metadata_round_trip() {
		let mut meta = ModelMetadata { author: "Keras-team".to_string(), license: "nope".to_string(), ..Default::default() };
		meta.user_defined.insert("source".to_string(), "mnist.onnx".to_string());
		let proto = Metadata::from(meta.clone());
		assert_eq!(proto.author, "Keras-team");
		assert_eq!(ModelMetadata::from(&proto), meta);
		assert!(ModelMetadata::default().is_empty());
	}
}

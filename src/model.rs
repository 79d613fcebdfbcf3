//! Converted models: Core ML neural network specifications.

use std::{fs, path::Path};

use mlport_proto::{
	Message,
	coreml::{Metadata, Model, NeuralNetworkLayer, NeuralNetworkPreprocessing, model}
};

use crate::{
	Error, ErrorCode, Result,
	convert::{ClassLabels, ConverterBuilder},
	metadata::ModelMetadata,
	value::{Outlet, ValueType}
};

/// Reads a Core ML model specification from disk.
///
/// Fails with [`ErrorCode::NoSuchFile`] if `path` does not exist, and [`ErrorCode::InvalidProtobuf`] if the file is
/// not a Core ML specification.
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<Model> {
	let path = path.as_ref();
	let bytes = fs::read(path).map_err(|e| Error::io_at(path, e))?;
	let spec = Model::decode(bytes.as_slice())?;
	crate::debug!(path = %path.display(), version = spec.specification_version, "Loaded model specification");
	Ok(spec)
}

/// Returns the layers & preprocessing of whichever kind of neural network `spec` holds.
pub(crate) fn neural_network(spec: &Model) -> Option<(&[NeuralNetworkLayer], &[NeuralNetworkPreprocessing])> {
	match spec.r#type.as_ref()? {
		model::Type::NeuralNetwork(nn) => Some((&nn.layers, &nn.preprocessing)),
		model::Type::NeuralNetworkClassifier(nn) => Some((&nn.layers, &nn.preprocessing)),
		model::Type::NeuralNetworkRegressor(nn) => Some((&nn.layers, &nn.preprocessing))
	}
}

/// A converted Core ML model.
///
/// ```no_run
/// # fn main() -> mlport::Result<()> {
/// let mut model = mlport::ConvertedModel::load("mnist.mlmodel")?;
/// model.set_license("MIT");
/// model.save("mnist.mlmodel")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedModel {
	spec: Model
}

impl ConvertedModel {
	/// Creates a [`ConverterBuilder`] to convert a trained model.
	pub fn builder() -> ConverterBuilder {
		ConverterBuilder::new()
	}

	pub fn from_spec(spec: Model) -> Self {
		Self { spec }
	}

	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		load_spec(path).map(Self::from_spec)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Ok(Self::from_spec(Model::decode(bytes)?))
	}

	pub fn spec(&self) -> &Model {
		&self.spec
	}

	pub fn spec_mut(&mut self) -> &mut Model {
		&mut self.spec
	}

	pub fn into_spec(self) -> Model {
		self.spec
	}

	pub fn specification_version(&self) -> i32 {
		self.spec.specification_version
	}

	fn metadata_mut(&mut self) -> &mut Metadata {
		self.spec.description.get_or_insert_with(Default::default).metadata.get_or_insert_with(Default::default)
	}

	fn metadata_ref(&self) -> Option<&Metadata> {
		self.spec.description.as_ref().and_then(|d| d.metadata.as_ref())
	}

	pub fn metadata(&self) -> ModelMetadata {
		self.metadata_ref().map(ModelMetadata::from).unwrap_or_default()
	}

	pub fn set_metadata(&mut self, metadata: ModelMetadata) {
		*self.metadata_mut() = metadata.into();
	}

	pub fn author(&self) -> &str {
		self.metadata_ref().map(|m| m.author.as_str()).unwrap_or_default()
	}

	pub fn set_author(&mut self, author: impl Into<String>) {
		self.metadata_mut().author = author.into();
	}

	pub fn license(&self) -> &str {
		self.metadata_ref().map(|m| m.license.as_str()).unwrap_or_default()
	}

	pub fn set_license(&mut self, license: impl Into<String>) {
		self.metadata_mut().license = license.into();
	}

	pub fn short_description(&self) -> &str {
		self.metadata_ref().map(|m| m.short_description.as_str()).unwrap_or_default()
	}

	pub fn set_short_description(&mut self, description: impl Into<String>) {
		self.metadata_mut().short_description = description.into();
	}

	pub fn version(&self) -> &str {
		self.metadata_ref().map(|m| m.version_string.as_str()).unwrap_or_default()
	}

	pub fn set_version(&mut self, version: impl Into<String>) {
		self.metadata_mut().version_string = version.into();
	}

	/// The class labels of a classifier, or `None` if this model is not a classifier.
	pub fn class_labels(&self) -> Option<ClassLabels> {
		match self.spec.r#type.as_ref()? {
			model::Type::NeuralNetworkClassifier(nn) => nn.class_labels.as_ref().map(ClassLabels::from_proto),
			_ => None
		}
	}

	/// Name of a classifier's predicted label output.
	pub fn predicted_feature_name(&self) -> Option<&str> {
		self.spec.description.as_ref().map(|d| d.predicted_feature_name.as_str()).filter(|s| !s.is_empty())
	}

	pub fn inputs(&self) -> Result<Vec<Outlet>> {
		self.spec.description.as_ref().map(|d| outlets(&d.input)).unwrap_or_else(|| Ok(Vec::new()))
	}

	pub fn outputs(&self) -> Result<Vec<Outlet>> {
		self.spec.description.as_ref().map(|d| outlets(&d.output)).unwrap_or_else(|| Ok(Vec::new()))
	}

	pub fn layers(&self) -> &[NeuralNetworkLayer] {
		neural_network(&self.spec).map(|(layers, _)| layers).unwrap_or_default()
	}

	pub fn layer_count(&self) -> usize {
		self.layers().len()
	}

	pub fn preprocessing(&self) -> &[NeuralNetworkPreprocessing] {
		neural_network(&self.spec).map(|(_, pre)| pre).unwrap_or_default()
	}

	pub fn is_classifier(&self) -> bool {
		matches!(self.spec.r#type, Some(model::Type::NeuralNetworkClassifier(_)))
	}

	/// Serializes the model to the bytes of a `.mlmodel` file.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.spec.encode_to_vec()
	}

	/// Writes the model to a `.mlmodel` file, replacing it if it exists.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		if self.spec.r#type.is_none() {
			return Err(Error::new_with_code(ErrorCode::NoModel, "Cannot save a specification without a model"));
		}
		let bytes = self.to_bytes();
		fs::write(path, &bytes).map_err(|e| {
			crate::error!(path = %path.display(), "Failed to save converted model: {e}");
			Error::io_at(path, e)
		})?;
		crate::info!(path = %path.display(), bytes = bytes.len(), "Saved converted model");
		Ok(())
	}
}

fn outlets(features: &[mlport_proto::coreml::FeatureDescription]) -> Result<Vec<Outlet>> {
	features
		.iter()
		.map(|f| {
			let ty = f
				.r#type
				.as_ref()
				.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidProtobuf, format!("Feature `{}` has no type", f.name)))?;
			Ok(Outlet::new(f.name.clone(), ValueType::from_feature_type(ty)?))
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use mlport_proto::coreml::{Model, NeuralNetwork, model};

	use super::ConvertedModel;
	use crate::ErrorCode;

	#[test]
	fn test_metadata_setters() -> crate::Result<()> {
		let mut model = ConvertedModel::from_spec(Model {
			specification_version: 1,
			r#type: Some(model::Type::NeuralNetwork(NeuralNetwork::default())),
			..Default::default()
		});
		assert_eq!(model.author(), "");
		model.set_author("Keras-team");
		model.set_license("nope");
		model.set_short_description("Predicts a handwritten digit");

		let reloaded = ConvertedModel::from_bytes(&model.to_bytes())?;
		assert_eq!(reloaded.author(), "Keras-team");
		assert_eq!(reloaded.license(), "nope");
		assert_eq!(reloaded.metadata().short_description, "Predicts a handwritten digit");
		assert_eq!(reloaded.class_labels(), None);
		assert_eq!(reloaded.layer_count(), 0);
		Ok(())
	}

	#[test]
	fn test_save_without_model() {
		let dir = std::env::temp_dir();
		let err = ConvertedModel::from_spec(Model::default()).save(dir.join("mlport-empty.mlmodel")).map_err(|e| e.code());
		assert_eq!(err, Err(ErrorCode::NoModel));
	}
}

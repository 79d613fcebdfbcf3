//! Conversion of trained models into Core ML neural networks.
//!
//! Conversion is configured through a [`ConverterBuilder`], created with [`ConvertedModel::builder`], and committed
//! from a file, a byte buffer, or (with the `fetch-models` feature) a URL.

use std::collections::HashSet;

use mlport_proto::coreml::{
	FeatureDescription, Int64Vector, Metadata, Model, ModelDescription, NeuralNetwork, NeuralNetworkClassifier, NeuralNetworkRegressor, StringVector, model,
	neural_network_classifier
};

mod image;
mod impl_commit;
mod layers;

pub use self::image::{ImageInput, ImageLayout};
use self::layers::LayerBuilder;
use crate::{
	ConvertedModel, Error, ErrorCode, Result,
	graph::{Node, TrainedModel},
	metadata::ModelMetadata,
	tensor::{Shape, TensorElementType},
	value::{ColorSpace, DictionaryKey, Outlet, ValueType}
};

/// The predicted label output of classifiers, unless overridden with [`ConverterBuilder::with_predicted_feature_name`].
pub const DEFAULT_PREDICTED_FEATURE_NAME: &str = "classLabel";

/// Labels of a classifier's output classes, in output index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassLabels {
	String(Vec<String>),
	Int64(Vec<i64>)
}

impl ClassLabels {
	pub fn len(&self) -> usize {
		match self {
			ClassLabels::String(labels) => labels.len(),
			ClassLabels::Int64(labels) => labels.len()
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn key(&self) -> DictionaryKey {
		match self {
			ClassLabels::String(_) => DictionaryKey::String,
			ClassLabels::Int64(_) => DictionaryKey::Int64
		}
	}

	fn label_type(&self) -> ValueType {
		match self {
			ClassLabels::String(_) => ValueType::String,
			ClassLabels::Int64(_) => ValueType::Int64
		}
	}

	pub(crate) fn from_proto(labels: &neural_network_classifier::ClassLabels) -> Self {
		match labels {
			neural_network_classifier::ClassLabels::StringClassLabels(v) => ClassLabels::String(v.vector.clone()),
			neural_network_classifier::ClassLabels::Int64ClassLabels(v) => ClassLabels::Int64(v.vector.clone())
		}
	}

	fn to_proto(&self) -> neural_network_classifier::ClassLabels {
		match self {
			ClassLabels::String(labels) => neural_network_classifier::ClassLabels::StringClassLabels(StringVector { vector: labels.clone() }),
			ClassLabels::Int64(labels) => neural_network_classifier::ClassLabels::Int64ClassLabels(Int64Vector { vector: labels.clone() })
		}
	}
}

/// Converts a trained model into a [`ConvertedModel`] using the builder pattern.
///
/// Once configured, use [`ConverterBuilder::commit_from_file`] to 'commit' the builder configuration to a trained
/// model file.
///
/// ```no_run
/// # use mlport::{ConvertedModel, convert::ImageInput};
/// # fn main() -> mlport::Result<()> {
/// let mut model = ConvertedModel::builder()
/// 	.with_input_names(["image"])
/// 	.with_image_input("image", ImageInput::new().with_scale(1. / 255.))
/// 	.with_output_names(["prediction"])
/// 	.with_class_labels((0..10).map(|d| d.to_string()))
/// 	.commit_from_file("mnist.onnx")?;
/// model.set_author("Keras-team");
/// model.save("mnist.mlmodel")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConverterBuilder {
	input_names: Vec<String>,
	output_names: Vec<String>,
	image_inputs: Vec<(String, ImageInput)>,
	class_labels: Option<ClassLabels>,
	predicted_feature_name: Option<String>,
	half_precision_weights: bool,
	regressor: bool,
	metadata: ModelMetadata
}

impl ConverterBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Renames the trained model's inputs, in order. Inputs past the end of `names` keep their names.
	#[must_use]
	pub fn with_input_names<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>
	{
		self.input_names = names.into_iter().map(Into::into).collect();
		self
	}

	/// Renames the trained model's outputs, in order. For classifiers, the first output becomes the class probability
	/// output.
	#[must_use]
	pub fn with_output_names<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>
	{
		self.output_names = names.into_iter().map(Into::into).collect();
		self
	}

	/// Feeds input `name` with images rather than multi-arrays. `name` may be the input's new name (see
	/// [`ConverterBuilder::with_input_names`]) or its name in the trained model.
	#[must_use]
	pub fn with_image_input(mut self, name: impl Into<String>, image: ImageInput) -> Self {
		let name = name.into();
		self.image_inputs.retain(|(n, _)| *n != name);
		self.image_inputs.push((name, image));
		self
	}

	/// Converts to a classifier with the given class labels. Label `i` names the class whose probability is element
	/// `i` of the first output.
	#[must_use]
	pub fn with_class_labels<I, S>(mut self, labels: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>
	{
		self.class_labels = Some(ClassLabels::String(labels.into_iter().map(Into::into).collect()));
		self
	}

	/// Converts to a classifier with integer class labels.
	#[must_use]
	pub fn with_int_class_labels(mut self, labels: impl IntoIterator<Item = i64>) -> Self {
		self.class_labels = Some(ClassLabels::Int64(labels.into_iter().collect()));
		self
	}

	/// Sets the name of a classifier's predicted label output. Defaults to [`DEFAULT_PREDICTED_FEATURE_NAME`].
	#[must_use]
	pub fn with_predicted_feature_name(mut self, name: impl Into<String>) -> Self {
		self.predicted_feature_name = Some(name.into());
		self
	}

	/// Stores weights as 16-bit floats, halving the size of the converted model. Requires the `half` feature.
	#[must_use]
	pub fn with_half_precision_weights(mut self) -> Self {
		self.half_precision_weights = true;
		self
	}

	/// Converts to a regressor rather than a plain neural network. Cannot be combined with class labels.
	#[must_use]
	pub fn with_regressor(mut self) -> Self {
		self.regressor = true;
		self
	}

	#[must_use]
	pub fn with_author(mut self, author: impl Into<String>) -> Self {
		self.metadata.author = author.into();
		self
	}

	#[must_use]
	pub fn with_license(mut self, license: impl Into<String>) -> Self {
		self.metadata.license = license.into();
		self
	}

	#[must_use]
	pub fn with_short_description(mut self, description: impl Into<String>) -> Self {
		self.metadata.short_description = description.into();
		self
	}

	#[must_use]
	pub fn with_version(mut self, version: impl Into<String>) -> Self {
		self.metadata.version = version.into();
		self
	}

	#[must_use]
	pub fn with_user_defined(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata.user_defined.insert(key.into(), value.into());
		self
	}

	/// Converts an already loaded trained model.
	pub fn convert(&self, trained: &TrainedModel) -> Result<ConvertedModel> {
		if self.half_precision_weights && cfg!(not(feature = "half")) {
			return Err(Error::new_with_code(ErrorCode::NotImplemented, "Half precision weights require the `half` feature"));
		}
		if self.regressor && self.class_labels.is_some() {
			return Err(Error::new_with_code(ErrorCode::InvalidArgument, "A model cannot be both a classifier and a regressor"));
		}

		let inputs = rename(trained, trained.inputs(), &self.input_names, "input")?;
		let outputs = rename(trained, trained.outputs(), &self.output_names, "output")?;
		if let Some((_, name)) = outputs.iter().find(|(_, o)| inputs.iter().any(|(_, i)| i == o)) {
			return Err(Error::new_with_code(ErrorCode::InvalidArgument, format!("`{name}` names both an input and an output")));
		}
		for (name, _) in &self.image_inputs {
			if !inputs.iter().any(|(outlet, n)| n == name || outlet.name() == name) {
				return Err(Error::new_with_code(ErrorCode::InvalidArgument, format!("Image input `{name}` is not an input of the model")));
			}
		}
		crate::info!(
			inputs = inputs.len(),
			outputs = outputs.len(),
			nodes = trained.nodes().len(),
			classifier = self.class_labels.is_some(),
			"Converting trained model"
		);

		let mut builder = LayerBuilder::new(trained, self.half_precision_weights);
		let mut input_features = Vec::with_capacity(inputs.len());
		let mut preprocessing = Vec::new();
		for (outlet, name) in &inputs {
			if outlet.name() != name {
				builder.rename(outlet.name(), name.as_str());
			}
			let image = self.image_inputs.iter().find(|(n, _)| n == name || n == outlet.name()).map(|(_, i)| i);
			let ty = match image {
				Some(image) => {
					let (ty, transpose) = image_feature(trained, outlet, image)?;
					if let Some(transpose) = transpose {
						crate::debug!(input = name.as_str(), node = %transpose, "Removing channels-last transpose");
						builder.elide(transpose.index());
						if let Some(output) = transpose.output(0) {
							builder.alias(output, outlet.name());
						}
					}
					if image.has_preprocessing() {
						preprocessing.push(image.to_preprocessing(name));
					}
					ty
				}
				None => multi_array_feature(outlet, true)?
			};
			input_features.push(feature(name, &ty)?);
		}

		let output_blobs: Vec<(String, String)> = outputs.iter().map(|(outlet, name)| (outlet.name().to_string(), name.clone())).collect();
		let layers = builder.build(&output_blobs)?;

		let mut output_features = Vec::with_capacity(outputs.len() + 1);
		let mut description = ModelDescription::default();
		let network = match &self.class_labels {
			Some(labels) => {
				let predicted = self.predicted_feature_name.as_deref().unwrap_or(DEFAULT_PREDICTED_FEATURE_NAME);
				let (probabilities, probabilities_name) = &outputs[0];
				check_label_count(probabilities, labels)?;
				if outputs.iter().any(|(_, n)| n == predicted) || inputs.iter().any(|(_, n)| n == predicted) {
					return Err(Error::new_with_code(
						ErrorCode::InvalidArgument,
						format!("Predicted feature name `{predicted}` collides with a model input or output")
					));
				}

				output_features.push(feature(probabilities_name, &ValueType::Dictionary { key: labels.key() })?);
				output_features.push(feature(predicted, &labels.label_type())?);
				for (outlet, name) in &outputs[1..] {
					output_features.push(feature(name, &multi_array_feature(outlet, false)?)?);
				}
				description.predicted_feature_name = predicted.to_string();
				description.predicted_probabilities_name = probabilities_name.clone();

				model::Type::NeuralNetworkClassifier(NeuralNetworkClassifier {
					layers,
					preprocessing,
					label_probability_layer_name: probabilities_name.clone(),
					class_labels: Some(labels.to_proto())
				})
			}
			None => {
				for (outlet, name) in &outputs {
					output_features.push(feature(name, &multi_array_feature(outlet, false)?)?);
				}
				if self.regressor {
					model::Type::NeuralNetworkRegressor(NeuralNetworkRegressor { layers, preprocessing })
				} else {
					model::Type::NeuralNetwork(NeuralNetwork { layers, preprocessing })
				}
			}
		};
		description.input = input_features;
		description.output = output_features;
		description.metadata = Some(Metadata::from(self.metadata.clone()));

		let spec = Model {
			specification_version: if self.half_precision_weights { 2 } else { 1 },
			description: Some(description),
			is_updatable: false,
			r#type: Some(network)
		};
		let converted = ConvertedModel::from_spec(spec);
		crate::info!(layers = converted.layer_count(), "Conversion finished");
		Ok(converted)
	}
}

/// Pairs each outlet with its name in the converted model.
///
/// A new name may not be the name of any other tensor in the trained model, since blobs keep the names of the graph
/// tensors they carry.
fn rename<'o>(trained: &TrainedModel, outlets: &'o [Outlet], names: &[String], kind: &str) -> Result<Vec<(&'o Outlet, String)>> {
	if names.len() > outlets.len() {
		return Err(Error::new_with_code(
			ErrorCode::InvalidArgument,
			format!("{} {kind} names were given, but the model only has {} {kind}s", names.len(), outlets.len())
		));
	}
	let renamed: Vec<_> = outlets
		.iter()
		.enumerate()
		.map(|(i, outlet)| (outlet, names.get(i).cloned().unwrap_or_else(|| outlet.name().to_string())))
		.collect();
	let mut seen = HashSet::new();
	for (outlet, name) in &renamed {
		if !seen.insert(name.as_str()) {
			return Err(Error::new_with_code(ErrorCode::InvalidArgument, format!("Duplicate {kind} name `{name}`")));
		}
		if outlet.name() != name && trained.has_tensor(name) {
			return Err(Error::new_with_code(
				ErrorCode::InvalidArgument,
				format!("Cannot rename {kind} `{}` to `{name}`; the model already has a tensor of that name", outlet.name())
			));
		}
	}
	Ok(renamed)
}

fn feature(name: &str, ty: &ValueType) -> Result<FeatureDescription> {
	Ok(FeatureDescription {
		name: name.to_string(),
		short_description: String::new(),
		r#type: Some(ty.to_feature_type()?)
	})
}

/// Determines the image type of `outlet`, along with the channels-last transpose to remove, if any.
fn image_feature<'m>(trained: &'m TrainedModel, outlet: &Outlet, image: &ImageInput) -> Result<(ValueType, Option<&'m Node>)> {
	let ValueType::Tensor { ty, shape, .. } = outlet.dtype() else {
		return Err(Error::new_with_code(ErrorCode::InvalidArgument, format!("Input `{}` is not a tensor", outlet.name())));
	};
	if !ty.is_float() {
		return Err(Error::new_with_code(
			ErrorCode::InvalidArgument,
			format!("Input `{}` holds `{ty}` elements; image inputs must be floating point", outlet.name())
		));
	}

	let mut consumers = trained.consumers(outlet.name());
	let channels_last_transpose = match (consumers.next(), consumers.next()) {
		(Some(node), None) if node.op_type() == "Transpose" && node.attribute::<Vec<i64>>("perm")?.as_deref() == Some(&[0, 3, 1, 2][..]) => Some(node),
		_ => None
	};
	let channels_last = match image.layout {
		ImageLayout::ChannelsFirst => false,
		ImageLayout::ChannelsLast => {
			if channels_last_transpose.is_none() {
				return Err(Error::new_with_code(
					ErrorCode::InvalidArgument,
					format!("Input `{}` is declared channels-last, but is not transposed to channels-first by the model", outlet.name())
				));
			}
			true
		}
		ImageLayout::Auto => channels_last_transpose.is_some()
	};

	let (channels, height, width) = match (&shape[..], channels_last) {
		(&[_, c, h, w], false) | (&[c, h, w], false) | (&[_, h, w, c], true) => (c, h, w),
		_ => {
			return Err(Error::new_with_code(
				ErrorCode::InvalidArgument,
				format!("Input `{}` of shape {shape} cannot be an image; expected [N, C, H, W] or [C, H, W]", outlet.name())
			));
		}
	};
	if height <= 0 || width <= 0 {
		return Err(Error::new_with_code(
			ErrorCode::InvalidArgument,
			format!("Input `{}` of shape {shape} has a dynamic image size", outlet.name())
		));
	}

	let color_space = match (image.color_space, channels) {
		(Some(color_space), c) if color_space.channels() == c => color_space,
		(None, 1) => ColorSpace::Grayscale,
		(None, 3) => ColorSpace::Rgb,
		_ => {
			return Err(Error::new_with_code(
				ErrorCode::InvalidArgument,
				format!("Input `{}` of shape {shape} has {channels} channels, which does not match a supported color space", outlet.name())
			));
		}
	};
	Ok((ValueType::Image { width, height, color_space }, if channels_last { channels_last_transpose } else { None }))
}

/// Declares `outlet` as a multi-array, dropping the batch dimension.
///
/// Inputs must have a static shape; outputs whose shape is not fully known are declared without one.
fn multi_array_feature(outlet: &Outlet, is_input: bool) -> Result<ValueType> {
	let ValueType::Tensor { ty, shape, .. } = outlet.dtype() else {
		return Ok(outlet.dtype().clone());
	};
	let dims = if shape.len() >= 2 { &shape[1..] } else { &shape[..] };
	let shape = if dims.iter().all(|d| *d >= 0) {
		Shape::from(dims)
	} else if is_input {
		return Err(Error::new_with_code(
			ErrorCode::InvalidArgument,
			format!("Input `{}` of shape {shape} has a dynamic dimension other than the batch dimension", outlet.name())
		));
	} else {
		Shape::default()
	};
	let ty = match ty {
		TensorElementType::Bfloat16 => TensorElementType::Float32,
		ty => *ty
	};
	Ok(ValueType::MultiArray { ty, shape })
}

fn check_label_count(probabilities: &Outlet, labels: &ClassLabels) -> Result<()> {
	if labels.is_empty() {
		return Err(Error::new_with_code(ErrorCode::InvalidArgument, "Classifiers need at least one class label"));
	}
	match probabilities.dtype().tensor_shape().and_then(|s| s.last().copied()) {
		Some(classes) if classes >= 0 && classes as usize != labels.len() => Err(Error::new_with_code(
			ErrorCode::InvalidArgument,
			format!("Output `{}` scores {classes} classes, but {} class labels were given", probabilities.name(), labels.len())
		)),
		Some(classes) if classes >= 0 => Ok(()),
		_ => {
			crate::warn!(output = probabilities.name(), labels = labels.len(), "Cannot verify the class label count; output size is dynamic");
			Ok(())
		}
	}
}

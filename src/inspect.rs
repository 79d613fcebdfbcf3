//! Human-readable listings of a Core ML neural network's layers and features.

use std::io::{self, Write};

use mlport_proto::coreml::{
	FeatureDescription, FeatureType, Model, NeuralNetworkLayer, activation_params::NonlinearityType, array_feature_type::ArrayDataType,
	dictionary_feature_type::KeyType, feature_type, image_feature_type::ColorSpace, neural_network_layer::Layer, pooling_layer_params::PoolingType
};

use crate::{Error, ErrorCode, Result, metadata::ModelMetadata, model::neural_network};

const INDENT: &str = "          ";

/// Inspects the neural network held by a Core ML model specification.
///
/// ```no_run
/// # use mlport::{NeuralNetworkInspector, load_spec};
/// # fn main() -> mlport::Result<()> {
/// let spec = load_spec("mnist.mlmodel")?;
/// let inspector = NeuralNetworkInspector::new(&spec)?;
/// inspector.inspect_layers()?;
/// inspector.inspect_input_features()?;
/// println!("{}", inspector.input_image_width()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NeuralNetworkInspector<'s> {
	spec: &'s Model,
	layers: &'s [NeuralNetworkLayer]
}

impl<'s> NeuralNetworkInspector<'s> {
	/// Fails with [`ErrorCode::NoModel`] if `spec` does not hold a neural network.
	pub fn new(spec: &'s Model) -> Result<Self> {
		let (layers, _) = neural_network(spec).ok_or_else(|| Error::new_with_code(ErrorCode::NoModel, "Specification does not hold a neural network"))?;
		Ok(Self { spec, layers })
	}

	pub fn spec(&self) -> &'s Model {
		self.spec
	}

	pub fn layers(&self) -> &'s [NeuralNetworkLayer] {
		self.layers
	}

	/// Prints every layer to stdout, last layer first.
	pub fn inspect_layers(&self) -> Result<()> {
		self.inspect_layers_with(None, false)
	}

	/// Prints the last `last` layers (or all, if `None`) to stdout, last layer first. `verbose` adds each layer's
	/// parameters.
	pub fn inspect_layers_with(&self, last: Option<usize>, verbose: bool) -> Result<()> {
		self.write_layers(&mut io::stdout().lock(), last, verbose)?;
		Ok(())
	}

	pub fn write_layers<W: Write>(&self, w: &mut W, last: Option<usize>, verbose: bool) -> io::Result<()> {
		let count = last.unwrap_or(self.layers.len()).min(self.layers.len());
		for (i, layer) in self.layers.iter().enumerate().rev().take(count) {
			writeln!(w, "[Id: {i}], Name: {} (Type: {})", layer.name, layer_type(layer))?;
			writeln!(w, "{INDENT}Updatable: {}", if layer.is_updatable { "True" } else { "False" })?;
			writeln!(w, "{INDENT}Input blobs: {}", blob_list(&layer.input))?;
			writeln!(w, "{INDENT}Output blobs: {}", blob_list(&layer.output))?;
			if verbose {
				let params = layer_parameters(layer);
				if !params.is_empty() {
					writeln!(w, "{INDENT}Parameters:")?;
					for (key, value) in params {
						writeln!(w, "{INDENT}  {key}: {value}")?;
					}
				}
			}
		}
		Ok(())
	}

	/// Prints the model's input features to stdout.
	pub fn inspect_input_features(&self) -> Result<()> {
		self.write_input_features(&mut io::stdout().lock())?;
		Ok(())
	}

	pub fn write_input_features<W: Write>(&self, w: &mut W) -> io::Result<()> {
		write_features(w, self.spec.description.as_ref().map(|d| d.input.as_slice()).unwrap_or_default())
	}

	/// Prints the model's output features to stdout.
	pub fn inspect_output_features(&self) -> Result<()> {
		self.write_output_features(&mut io::stdout().lock())?;
		Ok(())
	}

	pub fn write_output_features<W: Write>(&self, w: &mut W) -> io::Result<()> {
		write_features(w, self.spec.description.as_ref().map(|d| d.output.as_slice()).unwrap_or_default())
	}

	/// Prints the model's metadata to stdout.
	pub fn inspect_metadata(&self) -> Result<()> {
		self.write_metadata(&mut io::stdout().lock())?;
		Ok(())
	}

	pub fn write_metadata<W: Write>(&self, w: &mut W) -> io::Result<()> {
		let metadata = self
			.spec
			.description
			.as_ref()
			.and_then(|d| d.metadata.as_ref())
			.map(ModelMetadata::from)
			.unwrap_or_default();
		writeln!(w, "Author: {}", metadata.author)?;
		writeln!(w, "License: {}", metadata.license)?;
		writeln!(w, "Description: {}", metadata.short_description)?;
		writeln!(w, "Version: {}", metadata.version)?;
		for (key, value) in &metadata.user_defined {
			writeln!(w, "{INDENT}{key}: {value}")?;
		}
		Ok(())
	}

	/// Width of the first input, which must be an image.
	pub fn input_image_width(&self) -> Result<i64> {
		self.input_image_dimensions().map(|(width, _)| width)
	}

	/// Height of the first input, which must be an image.
	pub fn input_image_height(&self) -> Result<i64> {
		self.input_image_dimensions().map(|(_, height)| height)
	}

	fn input_image_dimensions(&self) -> Result<(i64, i64)> {
		let input = self
			.spec
			.description
			.as_ref()
			.and_then(|d| d.input.first())
			.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidArgument, "Model has no inputs"))?;
		match input.r#type.as_ref().and_then(|t| t.r#type.as_ref()) {
			Some(feature_type::Type::ImageType(image)) => Ok((image.width, image.height)),
			_ => Err(Error::new_with_code(ErrorCode::InvalidArgument, format!("Input `{}` is not an image", input.name)))
		}
	}
}

fn blob_list(blobs: &[String]) -> String {
	format!("[{}]", blobs.iter().map(|b| format!("'{b}'")).collect::<Vec<_>>().join(", "))
}

fn layer_type(layer: &NeuralNetworkLayer) -> &'static str {
	match &layer.layer {
		Some(Layer::Convolution(_)) => "convolution",
		Some(Layer::Pooling(_)) => "pooling",
		Some(Layer::Activation(_)) => "activation",
		Some(Layer::InnerProduct(_)) => "innerProduct",
		Some(Layer::Batchnorm(_)) => "batchnorm",
		Some(Layer::Softmax(_)) => "softmax",
		Some(Layer::Add(_)) => "add",
		Some(Layer::Multiply(_)) => "multiply",
		Some(Layer::Max(_)) => "max",
		Some(Layer::Min(_)) => "min",
		Some(Layer::Reshape(_)) => "reshape",
		Some(Layer::Flatten(_)) => "flatten",
		Some(Layer::Permute(_)) => "permute",
		Some(Layer::Concat(_)) => "concat",
		None => "unknown"
	}
}

fn layer_parameters(layer: &NeuralNetworkLayer) -> Vec<(&'static str, String)> {
	match &layer.layer {
		Some(Layer::Convolution(conv)) => vec![
			("outputChannels", conv.output_channels.to_string()),
			("kernelChannels", conv.kernel_channels.to_string()),
			("nGroups", conv.n_groups.to_string()),
			("kernelSize", format!("{:?}", conv.kernel_size)),
			("stride", format!("{:?}", conv.stride)),
			("dilationFactor", format!("{:?}", conv.dilation_factor)),
			("hasBias", conv.has_bias.to_string()),
		],
		Some(Layer::Pooling(pool)) => vec![
			(
				"type",
				match pool.r#type() {
					PoolingType::Max => "MAX",
					PoolingType::Average => "AVERAGE",
					PoolingType::L2 => "L2"
				}
				.to_string()
			),
			("kernelSize", format!("{:?}", pool.kernel_size)),
			("stride", format!("{:?}", pool.stride)),
			("globalPooling", pool.global_pooling.to_string()),
		],
		Some(Layer::Activation(act)) => vec![(
			"nonlinearity",
			match &act.nonlinearity_type {
				Some(NonlinearityType::Linear(_)) => "linear",
				Some(NonlinearityType::ReLu(_)) => "ReLU",
				Some(NonlinearityType::LeakyReLu(_)) => "leakyReLU",
				Some(NonlinearityType::Tanh(_)) => "tanh",
				Some(NonlinearityType::Sigmoid(_)) => "sigmoid",
				Some(NonlinearityType::SigmoidHard(_)) => "sigmoidHard",
				Some(NonlinearityType::Elu(_)) => "ELU",
				Some(NonlinearityType::Softsign(_)) => "softsign",
				Some(NonlinearityType::Softplus(_)) => "softplus",
				None => "unknown"
			}
			.to_string()
		)],
		Some(Layer::InnerProduct(ip)) => vec![
			("inputChannels", ip.input_channels.to_string()),
			("outputChannels", ip.output_channels.to_string()),
			("hasBias", ip.has_bias.to_string()),
		],
		Some(Layer::Batchnorm(bn)) => vec![("channels", bn.channels.to_string()), ("epsilon", bn.epsilon.to_string())],
		Some(Layer::Reshape(reshape)) => vec![("targetShape", format!("{:?}", reshape.target_shape))],
		Some(Layer::Permute(permute)) => vec![("axis", format!("{:?}", permute.axis))],
		_ => Vec::new()
	}
}

fn write_features<W: Write>(w: &mut W, features: &[FeatureDescription]) -> io::Result<()> {
	for (i, feature) in features.iter().enumerate() {
		writeln!(w, "[Id: {i}] Name: {}", feature.name)?;
		let rendered = feature.r#type.as_ref().map(render_feature_type).unwrap_or_default();
		let mut lines = rendered.lines();
		writeln!(w, "{INDENT}Type: {}", lines.next().unwrap_or_default())?;
		for line in lines {
			writeln!(w, "{INDENT}{line}")?;
		}
	}
	Ok(())
}

/// Renders a feature type in protobuf text format.
fn render_feature_type(ty: &FeatureType) -> String {
	let mut out = match &ty.r#type {
		Some(feature_type::Type::Int64Type(_)) => "int64Type {\n}".to_string(),
		Some(feature_type::Type::DoubleType(_)) => "doubleType {\n}".to_string(),
		Some(feature_type::Type::StringType(_)) => "stringType {\n}".to_string(),
		Some(feature_type::Type::ImageType(image)) => {
			let color_space = match image.color_space() {
				ColorSpace::InvalidColorSpace => "INVALID_COLOR_SPACE",
				ColorSpace::Grayscale => "GRAYSCALE",
				ColorSpace::Rgb => "RGB",
				ColorSpace::Bgr => "BGR",
				ColorSpace::GrayscaleFloat16 => "GRAYSCALE_FLOAT16"
			};
			format!("imageType {{\n  width: {}\n  height: {}\n  colorSpace: {color_space}\n}}", image.width, image.height)
		}
		Some(feature_type::Type::MultiArrayType(array)) => {
			let mut s = String::from("multiArrayType {\n");
			for dim in &array.shape {
				s.push_str(&format!("  shape: {dim}\n"));
			}
			let data_type = match array.data_type() {
				ArrayDataType::InvalidArrayDataType => "INVALID_ARRAY_DATA_TYPE",
				ArrayDataType::Float32 => "FLOAT32",
				ArrayDataType::Double => "DOUBLE",
				ArrayDataType::Int32 => "INT32",
				ArrayDataType::Float16 => "FLOAT16"
			};
			s.push_str(&format!("  dataType: {data_type}\n}}"));
			s
		}
		Some(feature_type::Type::DictionaryType(dict)) => match dict.key_type {
			Some(KeyType::Int64KeyType(_)) => "dictionaryType {\n  int64KeyType {\n  }\n}".to_string(),
			_ => "dictionaryType {\n  stringKeyType {\n  }\n}".to_string()
		},
		None => String::new()
	};
	if ty.is_optional {
		out.push_str("\nisOptional: true");
	}
	out
}

#[cfg(test)]
mod tests {
	use mlport_proto::coreml::{
		ActivationParams, ActivationReLu, FeatureDescription, FeatureType, ImageFeatureType, Model, ModelDescription, NeuralNetwork, NeuralNetworkLayer,
		activation_params::NonlinearityType, feature_type, image_feature_type::ColorSpace, model, neural_network_layer::Layer
	};

	use super::NeuralNetworkInspector;
	use crate::ErrorCode;

	fn spec() -> Model {
		let mut image = ImageFeatureType { width: 28, height: 28, ..Default::default() };
		image.set_color_space(ColorSpace::Grayscale);
		let relu = |name: &str, input: &str, output: &str| NeuralNetworkLayer {
			name: name.to_string(),
			input: vec![input.to_string()],
			output: vec![output.to_string()],
			is_updatable: false,
			layer: Some(Layer::Activation(ActivationParams { nonlinearity_type: Some(NonlinearityType::ReLu(ActivationReLu {})) }))
		};
		Model {
			specification_version: 1,
			description: Some(ModelDescription {
				input: vec![FeatureDescription {
					name: "image".to_string(),
					short_description: String::new(),
					r#type: Some(FeatureType { r#type: Some(feature_type::Type::ImageType(image)), is_optional: false })
				}],
				..Default::default()
			}),
			is_updatable: false,
			r#type: Some(model::Type::NeuralNetwork(NeuralNetwork {
				layers: vec![relu("first", "image", "a"), relu("second", "a", "b")],
				preprocessing: vec![]
			}))
		}
	}

	#[test]
	fn test_layers_are_listed_last_first() -> crate::Result<()> {
		let spec = spec();
		let inspector = NeuralNetworkInspector::new(&spec)?;
		let mut out = Vec::new();
		inspector.write_layers(&mut out, None, false)?;
		let out = String::from_utf8(out).map_err(crate::Error::wrap)?;
		let lines: Vec<&str> = out.lines().collect();
		assert_eq!(lines[0], "[Id: 1], Name: second (Type: activation)");
		assert_eq!(lines[1], "          Updatable: False");
		assert_eq!(lines[2], "          Input blobs: ['a']");
		assert_eq!(lines[3], "          Output blobs: ['b']");
		assert_eq!(lines[4], "[Id: 0], Name: first (Type: activation)");

		let mut out = Vec::new();
		inspector.write_layers(&mut out, Some(1), true)?;
		let out = String::from_utf8(out).map_err(crate::Error::wrap)?;
		assert!(!out.contains("first"));
		assert!(out.contains("nonlinearity: ReLU"));
		Ok(())
	}

	#[test]
	fn test_input_features() -> crate::Result<()> {
		let spec = spec();
		let inspector = NeuralNetworkInspector::new(&spec)?;
		let mut out = Vec::new();
		inspector.write_input_features(&mut out)?;
		let out = String::from_utf8(out).map_err(crate::Error::wrap)?;
		assert!(out.starts_with("[Id: 0] Name: image\n          Type: imageType {\n"));
		assert!(out.contains("colorSpace: GRAYSCALE"));
		assert_eq!(inspector.input_image_width()?, 28);
		assert_eq!(inspector.input_image_height()?, 28);
		Ok(())
	}

	#[test]
	fn test_not_a_neural_network() {
		let spec = Model::default();
		assert_eq!(NeuralNetworkInspector::new(&spec).map(|_| ()).map_err(|e| e.code()), Err(ErrorCode::NoModel));
	}
}

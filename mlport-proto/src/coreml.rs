//! Messages from the Core ML model specification (`Model.proto`, `FeatureTypes.proto`, `NeuralNetwork.proto`,
//! `DataStructures.proto`). Only the neural network model types and the layer kinds mlport emits are declared.

use std::collections::BTreeMap;

use prost::Message;

#[derive(Clone, PartialEq, Message)]
pub struct Model {
	#[prost(int32, tag = "1")]
	pub specification_version: i32,
	#[prost(message, optional, tag = "2")]
	pub description: Option<ModelDescription>,
	#[prost(bool, tag = "10")]
	pub is_updatable: bool,
	#[prost(oneof = "model::Type", tags = "303, 403, 500")]
	pub r#type: Option<model::Type>
}

pub mod model {
	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum Type {
		#[prost(message, tag = "303")]
		NeuralNetworkRegressor(super::NeuralNetworkRegressor),
		#[prost(message, tag = "403")]
		NeuralNetworkClassifier(super::NeuralNetworkClassifier),
		#[prost(message, tag = "500")]
		NeuralNetwork(super::NeuralNetwork)
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct Metadata {
	#[prost(string, tag = "1")]
	pub short_description: String,
	#[prost(string, tag = "2")]
	pub version_string: String,
	#[prost(string, tag = "3")]
	pub author: String,
	#[prost(string, tag = "4")]
	pub license: String,
	#[prost(btree_map = "string, string", tag = "100")]
	pub user_defined: BTreeMap<String, String>
}

#[derive(Clone, PartialEq, Message)]
pub struct ModelDescription {
	#[prost(message, repeated, tag = "1")]
	pub input: Vec<FeatureDescription>,
	#[prost(message, repeated, tag = "10")]
	pub output: Vec<FeatureDescription>,
	#[prost(string, tag = "11")]
	pub predicted_feature_name: String,
	#[prost(string, tag = "12")]
	pub predicted_probabilities_name: String,
	#[prost(message, optional, tag = "100")]
	pub metadata: Option<Metadata>
}

#[derive(Clone, PartialEq, Message)]
pub struct FeatureDescription {
	#[prost(string, tag = "1")]
	pub name: String,
	#[prost(string, tag = "2")]
	pub short_description: String,
	#[prost(message, optional, tag = "3")]
	pub r#type: Option<FeatureType>
}

#[derive(Clone, PartialEq, Message)]
pub struct FeatureType {
	#[prost(bool, tag = "1000")]
	pub is_optional: bool,
	#[prost(oneof = "feature_type::Type", tags = "1, 2, 3, 4, 5, 6")]
	pub r#type: Option<feature_type::Type>
}

pub mod feature_type {
	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum Type {
		#[prost(message, tag = "1")]
		Int64Type(super::Int64FeatureType),
		#[prost(message, tag = "2")]
		DoubleType(super::DoubleFeatureType),
		#[prost(message, tag = "3")]
		StringType(super::StringFeatureType),
		#[prost(message, tag = "4")]
		ImageType(super::ImageFeatureType),
		#[prost(message, tag = "5")]
		MultiArrayType(super::ArrayFeatureType),
		#[prost(message, tag = "6")]
		DictionaryType(super::DictionaryFeatureType)
	}
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct Int64FeatureType {}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct DoubleFeatureType {}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct StringFeatureType {}

#[derive(Clone, PartialEq, Message)]
pub struct ImageFeatureType {
	#[prost(int64, tag = "1")]
	pub width: i64,
	#[prost(int64, tag = "2")]
	pub height: i64,
	#[prost(enumeration = "image_feature_type::ColorSpace", tag = "3")]
	pub color_space: i32
}

pub mod image_feature_type {
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
	#[repr(i32)]
	pub enum ColorSpace {
		InvalidColorSpace = 0,
		Grayscale = 10,
		Rgb = 20,
		Bgr = 30,
		GrayscaleFloat16 = 40
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct ArrayFeatureType {
	#[prost(int64, repeated, tag = "1")]
	pub shape: Vec<i64>,
	#[prost(enumeration = "array_feature_type::ArrayDataType", tag = "2")]
	pub data_type: i32
}

pub mod array_feature_type {
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
	#[repr(i32)]
	pub enum ArrayDataType {
		InvalidArrayDataType = 0,
		Float32 = 65568,
		Double = 65600,
		Int32 = 131104,
		Float16 = 65552
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct DictionaryFeatureType {
	#[prost(oneof = "dictionary_feature_type::KeyType", tags = "1, 2")]
	pub key_type: Option<dictionary_feature_type::KeyType>
}

pub mod dictionary_feature_type {
	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum KeyType {
		#[prost(message, tag = "1")]
		Int64KeyType(super::Int64FeatureType),
		#[prost(message, tag = "2")]
		StringKeyType(super::StringFeatureType)
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct StringVector {
	#[prost(string, repeated, tag = "1")]
	pub vector: Vec<String>
}

#[derive(Clone, PartialEq, Message)]
pub struct Int64Vector {
	#[prost(int64, repeated, tag = "1")]
	pub vector: Vec<i64>
}

#[derive(Clone, PartialEq, Message)]
pub struct NeuralNetwork {
	#[prost(message, repeated, tag = "1")]
	pub layers: Vec<NeuralNetworkLayer>,
	#[prost(message, repeated, tag = "2")]
	pub preprocessing: Vec<NeuralNetworkPreprocessing>
}

#[derive(Clone, PartialEq, Message)]
pub struct NeuralNetworkRegressor {
	#[prost(message, repeated, tag = "1")]
	pub layers: Vec<NeuralNetworkLayer>,
	#[prost(message, repeated, tag = "2")]
	pub preprocessing: Vec<NeuralNetworkPreprocessing>
}

#[derive(Clone, PartialEq, Message)]
pub struct NeuralNetworkClassifier {
	#[prost(message, repeated, tag = "1")]
	pub layers: Vec<NeuralNetworkLayer>,
	#[prost(message, repeated, tag = "2")]
	pub preprocessing: Vec<NeuralNetworkPreprocessing>,
	#[prost(string, tag = "200")]
	pub label_probability_layer_name: String,
	#[prost(oneof = "neural_network_classifier::ClassLabels", tags = "100, 101")]
	pub class_labels: Option<neural_network_classifier::ClassLabels>
}

pub mod neural_network_classifier {
	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum ClassLabels {
		#[prost(message, tag = "100")]
		StringClassLabels(super::StringVector),
		#[prost(message, tag = "101")]
		Int64ClassLabels(super::Int64Vector)
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct NeuralNetworkImageScaler {
	#[prost(float, tag = "10")]
	pub channel_scale: f32,
	#[prost(float, tag = "20")]
	pub blue_bias: f32,
	#[prost(float, tag = "21")]
	pub green_bias: f32,
	#[prost(float, tag = "22")]
	pub red_bias: f32,
	#[prost(float, tag = "30")]
	pub gray_bias: f32
}

#[derive(Clone, PartialEq, Message)]
pub struct NeuralNetworkPreprocessing {
	#[prost(string, tag = "1")]
	pub feature_name: String,
	#[prost(oneof = "neural_network_preprocessing::Preprocessor", tags = "10")]
	pub preprocessor: Option<neural_network_preprocessing::Preprocessor>
}

pub mod neural_network_preprocessing {
	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum Preprocessor {
		#[prost(message, tag = "10")]
		Scaler(super::NeuralNetworkImageScaler)
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct NeuralNetworkLayer {
	#[prost(string, tag = "1")]
	pub name: String,
	#[prost(string, repeated, tag = "2")]
	pub input: Vec<String>,
	#[prost(string, repeated, tag = "3")]
	pub output: Vec<String>,
	#[prost(bool, tag = "10")]
	pub is_updatable: bool,
	#[prost(oneof = "neural_network_layer::Layer", tags = "100, 120, 130, 140, 160, 175, 230, 231, 260, 261, 300, 301, 310, 320")]
	pub layer: Option<neural_network_layer::Layer>
}

pub mod neural_network_layer {
	use super::*;

	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum Layer {
		#[prost(message, tag = "100")]
		Convolution(ConvolutionLayerParams),
		#[prost(message, tag = "120")]
		Pooling(PoolingLayerParams),
		#[prost(message, tag = "130")]
		Activation(ActivationParams),
		#[prost(message, tag = "140")]
		InnerProduct(InnerProductLayerParams),
		#[prost(message, tag = "160")]
		Batchnorm(BatchnormLayerParams),
		#[prost(message, tag = "175")]
		Softmax(SoftmaxLayerParams),
		#[prost(message, tag = "230")]
		Add(AddLayerParams),
		#[prost(message, tag = "231")]
		Multiply(MultiplyLayerParams),
		#[prost(message, tag = "260")]
		Max(MaxLayerParams),
		#[prost(message, tag = "261")]
		Min(MinLayerParams),
		#[prost(message, tag = "300")]
		Reshape(ReshapeLayerParams),
		#[prost(message, tag = "301")]
		Flatten(FlattenLayerParams),
		#[prost(message, tag = "310")]
		Permute(PermuteLayerParams),
		#[prost(message, tag = "320")]
		Concat(ConcatLayerParams)
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct WeightParams {
	#[prost(float, repeated, tag = "1")]
	pub float_value: Vec<f32>,
	#[prost(bytes = "vec", tag = "2")]
	pub float16_value: Vec<u8>,
	#[prost(bytes = "vec", tag = "30")]
	pub raw_value: Vec<u8>,
	#[prost(bool, tag = "50")]
	pub is_updatable: bool
}

#[derive(Clone, PartialEq, Message)]
pub struct BorderAmounts {
	#[prost(message, repeated, tag = "10")]
	pub border_amounts: Vec<border_amounts::EdgeSizes>
}

pub mod border_amounts {
	#[derive(Clone, Copy, PartialEq, ::prost::Message)]
	pub struct EdgeSizes {
		#[prost(uint64, tag = "1")]
		pub start_edge_size: u64,
		#[prost(uint64, tag = "2")]
		pub end_edge_size: u64
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct ValidPadding {
	#[prost(message, optional, tag = "1")]
	pub padding_amounts: Option<BorderAmounts>
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct SamePadding {
	#[prost(enumeration = "same_padding::SamePaddingMode", tag = "1")]
	pub asymmetry_mode: i32
}

pub mod same_padding {
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
	#[repr(i32)]
	pub enum SamePaddingMode {
		BottomRightHeavy = 0,
		TopLeftHeavy = 1
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct ConvolutionLayerParams {
	#[prost(uint64, tag = "1")]
	pub output_channels: u64,
	#[prost(uint64, tag = "2")]
	pub kernel_channels: u64,
	#[prost(uint64, tag = "10")]
	pub n_groups: u64,
	#[prost(uint64, repeated, tag = "20")]
	pub kernel_size: Vec<u64>,
	#[prost(uint64, repeated, tag = "30")]
	pub stride: Vec<u64>,
	#[prost(uint64, repeated, tag = "40")]
	pub dilation_factor: Vec<u64>,
	#[prost(bool, tag = "60")]
	pub is_deconvolution: bool,
	#[prost(bool, tag = "70")]
	pub has_bias: bool,
	#[prost(message, optional, tag = "90")]
	pub weights: Option<WeightParams>,
	#[prost(message, optional, tag = "91")]
	pub bias: Option<WeightParams>,
	#[prost(oneof = "convolution_layer_params::ConvolutionPaddingType", tags = "50, 51")]
	pub convolution_padding_type: Option<convolution_layer_params::ConvolutionPaddingType>
}

pub mod convolution_layer_params {
	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum ConvolutionPaddingType {
		#[prost(message, tag = "50")]
		Valid(super::ValidPadding),
		#[prost(message, tag = "51")]
		Same(super::SamePadding)
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct PoolingLayerParams {
	#[prost(enumeration = "pooling_layer_params::PoolingType", tag = "1")]
	pub r#type: i32,
	#[prost(uint64, repeated, tag = "10")]
	pub kernel_size: Vec<u64>,
	#[prost(uint64, repeated, tag = "20")]
	pub stride: Vec<u64>,
	#[prost(bool, tag = "50")]
	pub avg_pool_exclude_padding: bool,
	#[prost(bool, tag = "60")]
	pub global_pooling: bool,
	#[prost(oneof = "pooling_layer_params::PoolingPaddingType", tags = "30, 31")]
	pub pooling_padding_type: Option<pooling_layer_params::PoolingPaddingType>
}

pub mod pooling_layer_params {
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
	#[repr(i32)]
	pub enum PoolingType {
		Max = 0,
		Average = 1,
		L2 = 2
	}

	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum PoolingPaddingType {
		#[prost(message, tag = "30")]
		Valid(super::ValidPadding),
		#[prost(message, tag = "31")]
		Same(super::SamePadding)
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct ActivationParams {
	#[prost(oneof = "activation_params::NonlinearityType", tags = "5, 10, 15, 30, 40, 41, 50, 60, 70")]
	pub nonlinearity_type: Option<activation_params::NonlinearityType>
}

pub mod activation_params {
	use super::*;

	#[derive(Clone, PartialEq, ::prost::Oneof)]
	pub enum NonlinearityType {
		#[prost(message, tag = "5")]
		Linear(ActivationLinear),
		#[prost(message, tag = "10")]
		ReLu(ActivationReLu),
		#[prost(message, tag = "15")]
		LeakyReLu(ActivationLeakyReLu),
		#[prost(message, tag = "30")]
		Tanh(ActivationTanh),
		#[prost(message, tag = "40")]
		Sigmoid(ActivationSigmoid),
		#[prost(message, tag = "41")]
		SigmoidHard(ActivationSigmoidHard),
		#[prost(message, tag = "50")]
		Elu(ActivationElu),
		#[prost(message, tag = "60")]
		Softsign(ActivationSoftsign),
		#[prost(message, tag = "70")]
		Softplus(ActivationSoftplus)
	}
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationLinear {
	#[prost(float, tag = "1")]
	pub alpha: f32,
	#[prost(float, tag = "2")]
	pub beta: f32
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationReLu {}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationLeakyReLu {
	#[prost(float, tag = "1")]
	pub alpha: f32
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationTanh {}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationSigmoid {}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationSigmoidHard {
	#[prost(float, tag = "1")]
	pub alpha: f32,
	#[prost(float, tag = "2")]
	pub beta: f32
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationElu {
	#[prost(float, tag = "1")]
	pub alpha: f32
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationSoftsign {}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ActivationSoftplus {}

#[derive(Clone, PartialEq, Message)]
pub struct InnerProductLayerParams {
	#[prost(uint64, tag = "1")]
	pub input_channels: u64,
	#[prost(uint64, tag = "2")]
	pub output_channels: u64,
	#[prost(bool, tag = "10")]
	pub has_bias: bool,
	#[prost(message, optional, tag = "20")]
	pub weights: Option<WeightParams>,
	#[prost(message, optional, tag = "21")]
	pub bias: Option<WeightParams>
}

#[derive(Clone, PartialEq, Message)]
pub struct BatchnormLayerParams {
	#[prost(uint64, tag = "1")]
	pub channels: u64,
	#[prost(bool, tag = "5")]
	pub compute_mean_var: bool,
	#[prost(bool, tag = "6")]
	pub instance_normalization: bool,
	#[prost(float, tag = "10")]
	pub epsilon: f32,
	#[prost(message, optional, tag = "15")]
	pub gamma: Option<WeightParams>,
	#[prost(message, optional, tag = "16")]
	pub beta: Option<WeightParams>,
	#[prost(message, optional, tag = "17")]
	pub mean: Option<WeightParams>,
	#[prost(message, optional, tag = "18")]
	pub variance: Option<WeightParams>
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct SoftmaxLayerParams {}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct AddLayerParams {
	#[prost(float, tag = "1")]
	pub alpha: f32
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct MultiplyLayerParams {
	#[prost(float, tag = "1")]
	pub alpha: f32
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct MaxLayerParams {}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct MinLayerParams {}

#[derive(Clone, PartialEq, Message)]
pub struct ReshapeLayerParams {
	#[prost(int64, repeated, tag = "1")]
	pub target_shape: Vec<i64>,
	#[prost(enumeration = "reshape_layer_params::ReshapeOrder", tag = "2")]
	pub mode: i32
}

pub mod reshape_layer_params {
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
	#[repr(i32)]
	pub enum ReshapeOrder {
		ChannelFirst = 0,
		ChannelLast = 1
	}
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct FlattenLayerParams {
	#[prost(enumeration = "flatten_layer_params::FlattenOrder", tag = "1")]
	pub mode: i32
}

pub mod flatten_layer_params {
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
	#[repr(i32)]
	pub enum FlattenOrder {
		ChannelFirst = 0,
		ChannelLast = 1
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct PermuteLayerParams {
	#[prost(uint64, repeated, tag = "1")]
	pub axis: Vec<u64>
}

#[derive(Clone, Copy, PartialEq, Message)]
pub struct ConcatLayerParams {
	#[prost(bool, tag = "100")]
	pub sequence_concat: bool
}

use mlport_proto::coreml::{NeuralNetworkImageScaler, NeuralNetworkPreprocessing, neural_network_preprocessing::Preprocessor};

use crate::value::ColorSpace;

/// Memory layout of an image input tensor in the trained model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
	/// Detect the layout from the graph: channels-last if the input is immediately transposed to channels-first, otherwise
	/// channels-first.
	#[default]
	Auto,
	/// `[N, C, H, W]`
	ChannelsFirst,
	/// `[N, H, W, C]`, transposed to `[N, C, H, W]` by the model's first node.
	ChannelsLast
}

/// Options for converting a tensor input into an image input.
///
/// Pixel values are preprocessed as `scale * pixel + bias` before they are fed to the network.
///
/// ```
/// # use mlport::{convert::ImageInput, value::ColorSpace};
/// // map [0, 255] pixels to [-1, 1]
/// let input = ImageInput::new()
/// 	.with_color_space(ColorSpace::Rgb)
/// 	.with_scale(2. / 255.)
/// 	.with_bias(-1., -1., -1.);
/// assert!(input.has_preprocessing());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
	pub(crate) color_space: Option<ColorSpace>,
	pub(crate) layout: ImageLayout,
	scale: f32,
	red_bias: f32,
	green_bias: f32,
	blue_bias: f32,
	gray_bias: f32
}

impl Default for ImageInput {
	fn default() -> Self {
		Self {
			color_space: None,
			layout: ImageLayout::Auto,
			scale: 1.0,
			red_bias: 0.0,
			green_bias: 0.0,
			blue_bias: 0.0,
			gray_bias: 0.0
		}
	}
}

impl ImageInput {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the color space of the image. By default, it is inferred from the channel count: one channel is
	/// [`ColorSpace::Grayscale`], three channels are [`ColorSpace::Rgb`].
	#[must_use]
	pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
		self.color_space = Some(color_space);
		self
	}

	#[must_use]
	pub fn with_layout(mut self, layout: ImageLayout) -> Self {
		self.layout = layout;
		self
	}

	/// Multiplies every channel of every pixel by `scale`.
	#[must_use]
	pub fn with_scale(mut self, scale: f32) -> Self {
		self.scale = scale;
		self
	}

	/// Biases added to the red, green & blue channels of color images, after scaling.
	#[must_use]
	pub fn with_bias(mut self, red: f32, green: f32, blue: f32) -> Self {
		self.red_bias = red;
		self.green_bias = green;
		self.blue_bias = blue;
		self
	}

	/// Bias added to grayscale images, after scaling.
	#[must_use]
	pub fn with_gray_bias(mut self, bias: f32) -> Self {
		self.gray_bias = bias;
		self
	}

	pub fn color_space(&self) -> Option<ColorSpace> {
		self.color_space
	}

	pub fn layout(&self) -> ImageLayout {
		self.layout
	}

	/// Returns `true` if pixels are modified before being fed to the network.
	pub fn has_preprocessing(&self) -> bool {
		self.scale != 1.0 || self.red_bias != 0.0 || self.green_bias != 0.0 || self.blue_bias != 0.0 || self.gray_bias != 0.0
	}

	pub(crate) fn to_preprocessing(&self, feature_name: &str) -> NeuralNetworkPreprocessing {
		NeuralNetworkPreprocessing {
			feature_name: feature_name.to_string(),
			preprocessor: Some(Preprocessor::Scaler(NeuralNetworkImageScaler {
				channel_scale: self.scale,
				blue_bias: self.blue_bias,
				green_bias: self.green_bias,
				red_bias: self.red_bias,
				gray_bias: self.gray_bias
			}))
		}
	}
}

#[cfg(test)]
mod tests {
	use mlport_proto::coreml::neural_network_preprocessing::Preprocessor;

	use super::ImageInput;

	#[test]
	fn test_default_has_no_preprocessing() {
		assert!(!ImageInput::default().has_preprocessing());
		assert!(ImageInput::new().with_gray_bias(-0.5).has_preprocessing());
	}

	#[test]
	fn test_scaler() {
		let pre = ImageInput::new().with_scale(1. / 255.).to_preprocessing("image");
		assert_eq!(pre.feature_name, "image");
		let Some(Preprocessor::Scaler(scaler)) = pre.preprocessor else { panic!("expected a scaler") };
		assert_eq!(scaler.channel_scale, 1. / 255.);
		assert_eq!(scaler.red_bias, 0.);
	}
}

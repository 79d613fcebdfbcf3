//! Translation of trained model operators into neural network layers.

use std::collections::{HashMap, HashSet};

use mlport_proto::coreml::{
	ActivationElu, ActivationLeakyReLu, ActivationParams, ActivationReLu, ActivationSigmoid, ActivationSigmoidHard, ActivationSoftplus, ActivationSoftsign,
	ActivationTanh, AddLayerParams, BatchnormLayerParams, BorderAmounts, ConcatLayerParams, ConvolutionLayerParams, FlattenLayerParams, InnerProductLayerParams,
	MaxLayerParams, MinLayerParams, MultiplyLayerParams, NeuralNetworkLayer, PermuteLayerParams, PoolingLayerParams, ReshapeLayerParams, SamePadding,
	SoftmaxLayerParams, ValidPadding, WeightParams, activation_params::NonlinearityType, border_amounts::EdgeSizes, convolution_layer_params,
	flatten_layer_params::FlattenOrder, neural_network_layer::Layer, pooling_layer_params, reshape_layer_params::ReshapeOrder,
	same_padding::SamePaddingMode
};

use crate::{
	Error, ErrorCode, Result,
	graph::{Node, TrainedModel},
	tensor::TensorData
};

enum Padding {
	Valid(ValidPadding),
	Same(SamePaddingMode)
}

/// Walks a trained model's nodes in order, emitting one layer per operator.
///
/// Blobs (the named values flowing between layers) keep the name of the graph tensor they carry, except for the
/// outputs of elided nodes, which forward their input (see [`LayerBuilder::alias`]), and renamed graph inputs (see
/// [`LayerBuilder::rename`]).
pub(crate) struct LayerBuilder<'m> {
	model: &'m TrainedModel,
	#[cfg_attr(not(feature = "half"), allow(dead_code))]
	half_weights: bool,
	layers: Vec<NeuralNetworkLayer>,
	aliases: HashMap<String, String>,
	renames: HashMap<String, String>,
	elided: HashSet<usize>,
	layer_names: HashSet<String>
}

impl<'m> LayerBuilder<'m> {
	pub fn new(model: &'m TrainedModel, half_weights: bool) -> Self {
		Self {
			model,
			half_weights,
			layers: Vec::with_capacity(model.nodes().len()),
			aliases: HashMap::new(),
			renames: HashMap::new(),
			elided: HashSet::new(),
			layer_names: HashSet::new()
		}
	}

	/// Makes tensor `tensor` refer to blob `blob`.
	pub fn alias(&mut self, tensor: impl Into<String>, blob: impl Into<String>) {
		self.aliases.insert(tensor.into(), blob.into());
	}

	/// Skips node `index` entirely.
	pub fn elide(&mut self, index: usize) {
		self.elided.insert(index);
	}

	/// Gives graph input `tensor` the feature name `feature`. Renames apply after aliases are resolved, and never
	/// chain.
	pub fn rename(&mut self, tensor: impl Into<String>, feature: impl Into<String>) {
		self.renames.insert(tensor.into(), feature.into());
	}

	/// Resolves the blob carrying tensor `tensor`.
	pub fn blob(&self, tensor: &str) -> Result<String> {
		let mut name = tensor;
		for _ in 0..=self.aliases.len() {
			match self.aliases.get(name) {
				Some(next) => name = next,
				None => return Ok(self.renames.get(name).cloned().unwrap_or_else(|| name.to_string()))
			}
		}
		Err(Error::new_with_code(ErrorCode::InvalidGraph, format!("Tensor `{tensor}` is forwarded in a cycle by `Identity`/`Dropout` nodes")))
	}

	/// Translates every node, then renames the blobs carrying graph outputs according to `outputs`, a list of
	/// `(graph output, feature name)` pairs.
	pub fn build(mut self, outputs: &[(String, String)]) -> Result<Vec<NeuralNetworkLayer>> {
		let model = self.model;
		for node in model.nodes() {
			if self.elided.contains(&node.index()) {
				crate::trace!(node = %node, "Elided node");
				continue;
			}
			if !node.is_standard_domain() {
				return Err(Error::new_with_code(
					ErrorCode::NotImplemented,
					format!("{node} belongs to operator domain `{}`, which is not supported", node.domain())
				));
			}
			self.translate(node)?;
		}

		for (tensor, feature) in outputs {
			let blob = self.blob(tensor)?;
			if &blob == feature {
				continue;
			}
			let Some(producer) = self.layers.iter().rposition(|l| l.output.contains(&blob)) else {
				return Err(Error::new_with_code(
					ErrorCode::InvalidGraph,
					format!("Graph output `{tensor}` is not computed by any layer; it passes an input straight through")
				));
			};
			for (i, layer) in self.layers.iter_mut().enumerate().skip(producer) {
				if i == producer {
					layer.output.iter_mut().filter(|o| **o == blob).for_each(|o| o.clone_from(feature));
				} else {
					layer.input.iter_mut().filter(|o| **o == blob).for_each(|o| o.clone_from(feature));
				}
			}
			crate::trace!(blob = blob.as_str(), feature = feature.as_str(), "Renamed output blob");
		}

		Ok(self.layers)
	}

	fn translate(&mut self, node: &Node) -> Result<()> {
		match node.op_type() {
			"Conv" => self.convolution(node),
			"MaxPool" => self.pooling(node, pooling_layer_params::PoolingType::Max, false),
			"AveragePool" => self.pooling(node, pooling_layer_params::PoolingType::Average, false),
			"GlobalMaxPool" => self.pooling(node, pooling_layer_params::PoolingType::Max, true),
			"GlobalAveragePool" => self.pooling(node, pooling_layer_params::PoolingType::Average, true),
			"Relu" | "LeakyRelu" | "Sigmoid" | "HardSigmoid" | "Tanh" | "Elu" | "Softplus" | "Softsign" => self.activation(node),
			"Gemm" => self.gemm(node),
			"MatMul" => self.mat_mul(node),
			"BatchNormalization" => self.batch_norm(node),
			"Softmax" => self.softmax(node),
			"Flatten" => self.flatten(node),
			"Reshape" => self.reshape(node),
			"Transpose" => self.transpose(node),
			"Add" | "Mul" | "Max" | "Min" => self.elementwise(node),
			"Concat" => self.concat(node),
			"Dropout" | "Identity" => {
				self.input_blob(node, 0)?;
				// aliases refer to graph tensors, so renames are applied exactly once when the alias is resolved
				let input = node.input(0).unwrap_or_default().to_string();
				let output = output_name(node)?;
				self.alias(output, input);
				Ok(())
			}
			other => Err(Error::new_with_code(ErrorCode::NotImplemented, format!("Operator `{other}` ({node}) has no neural network layer equivalent")))
		}
	}

	fn input_blob(&self, node: &Node, i: usize) -> Result<String> {
		let name = node
			.input(i)
			.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} is missing input #{i}")))?;
		if self.model.is_constant(name) {
			return Err(Error::new_with_code(
				ErrorCode::NotImplemented,
				format!("{node} reads constant `{name}` as a layer input; only weights may be constant")
			));
		}
		self.blob(name)
	}

	fn constant(&self, node: &Node, i: usize) -> Result<&'m TensorData> {
		self.optional_constant(node, i)?
			.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} is missing input #{i}")))
	}

	fn optional_constant(&self, node: &Node, i: usize) -> Result<Option<&'m TensorData>> {
		let Some(name) = node.input(i) else {
			return Ok(None);
		};
		match self.model.constant(name) {
			Some(tensor) => Ok(Some(tensor)),
			None => Err(Error::new_with_code(
				ErrorCode::NotImplemented,
				format!("{node} requires input `{name}` to be a constant, but it is computed at runtime")
			))
		}
	}

	fn weights(&self, values: impl IntoIterator<Item = f32>) -> WeightParams {
		#[cfg(feature = "half")]
		if self.half_weights {
			return WeightParams {
				float16_value: values.into_iter().flat_map(|v| half::f16::from_f32(v).to_le_bytes()).collect(),
				..Default::default()
			};
		}
		WeightParams { float_value: values.into_iter().collect(), ..Default::default() }
	}

	fn push(&mut self, node: &Node, input: Vec<String>, output: String, layer: Layer) {
		let mut name = if node.name().is_empty() {
			format!("{}_{}", node.op_type().to_lowercase(), node.index())
		} else {
			node.name().to_string()
		};
		if self.layer_names.contains(&name) {
			name = format!("{name}_{}", node.index());
		}
		self.layer_names.insert(name.clone());

		crate::debug!(layer = name.as_str(), op_type = node.op_type(), ?input, output = output.as_str(), "Translated node");
		self.layers.push(NeuralNetworkLayer {
			name,
			input,
			output: vec![output],
			is_updatable: false,
			layer: Some(layer)
		});
	}

	fn convolution(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let weights = self.constant(node, 1)?;
		let &[output_channels, kernel_channels, kernel_h, kernel_w] = &weights.shape()[..] else {
			return Err(Error::new_with_code(
				ErrorCode::NotImplemented,
				format!("{node} has weights of shape {}; only 2D convolutions are supported", weights.shape())
			));
		};
		let groups = node.attribute_or("group", 1i64)?;
		let kernel_size = node.attribute_or("kernel_shape", vec![kernel_h, kernel_w])?;
		let stride = node.attribute_or("strides", vec![1, 1])?;
		let dilation = node.attribute_or("dilations", vec![1, 1])?;
		let bias = self.optional_constant(node, 2)?.map(TensorData::to_f32_vec).transpose()?;
		if let Some(bias) = &bias {
			if bias.len() as i64 != output_channels {
				return Err(Error::new_with_code(
					ErrorCode::InvalidGraph,
					format!("{node} has {output_channels} output channels but {} biases", bias.len())
				));
			}
		}

		let params = ConvolutionLayerParams {
			output_channels: output_channels as u64,
			kernel_channels: kernel_channels as u64,
			n_groups: to_u64(node, "group", groups)?,
			kernel_size: to_u64s(node, "kernel_shape", &kernel_size)?,
			stride: to_u64s(node, "strides", &stride)?,
			dilation_factor: to_u64s(node, "dilations", &dilation)?,
			is_deconvolution: false,
			has_bias: bias.is_some(),
			weights: Some(self.weights(weights.to_f32_vec()?)),
			bias: bias.map(|b| self.weights(b)),
			convolution_padding_type: Some(match padding(node)? {
				Padding::Valid(valid) => convolution_layer_params::ConvolutionPaddingType::Valid(valid),
				Padding::Same(mode) => convolution_layer_params::ConvolutionPaddingType::Same(SamePadding { asymmetry_mode: mode as i32 })
			})
		};
		let output = output_name(node)?;
		self.push(node, vec![input], output, Layer::Convolution(params));
		Ok(())
	}

	fn pooling(&mut self, node: &Node, ty: pooling_layer_params::PoolingType, global: bool) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let params = if global {
			PoolingLayerParams {
				r#type: ty as i32,
				kernel_size: vec![],
				stride: vec![1, 1],
				avg_pool_exclude_padding: false,
				global_pooling: true,
				pooling_padding_type: Some(pooling_layer_params::PoolingPaddingType::Valid(ValidPadding { padding_amounts: None }))
			}
		} else {
			let kernel_size = node
				.attribute::<Vec<i64>>("kernel_shape")?
				.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} has no `kernel_shape`")))?;
			if kernel_size.len() != 2 {
				return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} is not a 2D pooling operation")));
			}
			if node.attribute_or("ceil_mode", 0i64)? != 0 {
				return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} uses `ceil_mode`, which is not supported")));
			}
			if node.attribute::<Vec<i64>>("dilations")?.is_some_and(|d| d.iter().any(|d| *d != 1)) {
				return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} uses dilated pooling, which is not supported")));
			}
			let stride = node.attribute_or("strides", vec![1, 1])?;
			PoolingLayerParams {
				r#type: ty as i32,
				kernel_size: to_u64s(node, "kernel_shape", &kernel_size)?,
				stride: to_u64s(node, "strides", &stride)?,
				avg_pool_exclude_padding: node.attribute_or("count_include_pad", 0i64)? == 0,
				global_pooling: false,
				pooling_padding_type: Some(match padding(node)? {
					Padding::Valid(valid) => pooling_layer_params::PoolingPaddingType::Valid(valid),
					Padding::Same(mode) => pooling_layer_params::PoolingPaddingType::Same(SamePadding { asymmetry_mode: mode as i32 })
				})
			}
		};
		let output = output_name(node)?;
		self.push(node, vec![input], output, Layer::Pooling(params));
		Ok(())
	}

	fn activation(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let nonlinearity = match node.op_type() {
			"Relu" => NonlinearityType::ReLu(ActivationReLu {}),
			"LeakyRelu" => NonlinearityType::LeakyReLu(ActivationLeakyReLu { alpha: node.attribute_or("alpha", 0.01)? }),
			"Sigmoid" => NonlinearityType::Sigmoid(ActivationSigmoid {}),
			"HardSigmoid" => NonlinearityType::SigmoidHard(ActivationSigmoidHard {
				alpha: node.attribute_or("alpha", 0.2)?,
				beta: node.attribute_or("beta", 0.5)?
			}),
			"Tanh" => NonlinearityType::Tanh(ActivationTanh {}),
			"Elu" => NonlinearityType::Elu(ActivationElu { alpha: node.attribute_or("alpha", 1.0)? }),
			"Softplus" => NonlinearityType::Softplus(ActivationSoftplus {}),
			"Softsign" => NonlinearityType::Softsign(ActivationSoftsign {}),
			other => return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("`{other}` is not an activation")))
		};
		let output = output_name(node)?;
		self.push(node, vec![input], output, Layer::Activation(ActivationParams { nonlinearity_type: Some(nonlinearity) }));
		Ok(())
	}

	fn gemm(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		if node.attribute_or("transA", 0i64)? != 0 {
			return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} transposes its input, which is not supported")));
		}
		let trans_b = node.attribute_or("transB", 0i64)? != 0;
		let alpha = node.attribute_or("alpha", 1.0f32)?;
		let beta = node.attribute_or("beta", 1.0f32)?;

		let b = self.constant(node, 1)?.to_f32_array()?;
		if b.ndim() != 2 {
			return Err(Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} has {}-dimensional weights, expected 2", b.ndim())));
		}
		// inner product weights are laid out [output_channels, input_channels]
		let weights = if trans_b { b.view() } else { b.t() };
		let (output_channels, input_channels) = (weights.shape()[0], weights.shape()[1]);
		let weights: Vec<f32> = weights.iter().map(|w| w * alpha).collect();

		let bias = match self.optional_constant(node, 2)? {
			Some(c) => Some(broadcast_bias(node, c.to_f32_vec()?, output_channels)?.into_iter().map(|v| v * beta).collect()),
			None => None
		};
		let output = output_name(node)?;
		self.inner_product(node, input, output, weights, (input_channels, output_channels), bias);
		Ok(())
	}

	fn mat_mul(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let b = self.constant(node, 1)?.to_f32_array()?;
		if b.ndim() != 2 {
			return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} multiplies by a {}-dimensional matrix; only 2D is supported", b.ndim())));
		}
		let (input_channels, output_channels) = (b.shape()[0], b.shape()[1]);
		let weights: Vec<f32> = b.t().iter().copied().collect();

		let mut output = output_name(node)?;
		let mut bias = None;
		if let Some((add, add_bias)) = self.fusable_bias(&output, output_channels)? {
			crate::debug!(mat_mul = %node, add = %add, "Fusing bias into inner product");
			output = output_name(add)?;
			bias = Some(add_bias);
			self.elide(add.index());
		}
		self.inner_product(node, input, output, weights, (input_channels, output_channels), bias);
		Ok(())
	}

	/// Finds an `Add` node that is the only reader of `tensor` and adds a constant bias of `channels` values to it.
	fn fusable_bias(&self, tensor: &str, channels: usize) -> Result<Option<(&'m Node, Vec<f32>)>> {
		let model = self.model;
		if model.is_output(tensor) {
			return Ok(None);
		}
		let mut consumers = model.consumers(tensor);
		let (Some(add), None) = (consumers.next(), consumers.next()) else {
			return Ok(None);
		};
		if add.op_type() != "Add" || !add.is_standard_domain() || add.inputs().len() != 2 {
			return Ok(None);
		}
		let other = if add.inputs()[0] == tensor { &add.inputs()[1] } else { &add.inputs()[0] };
		let Some(bias) = model.constant(other) else {
			return Ok(None);
		};
		if bias.len() != channels || bias.shape().iter().filter(|d| **d != 1).count() > 1 {
			return Ok(None);
		}
		Ok(Some((add, bias.to_f32_vec()?)))
	}

	fn inner_product(&mut self, node: &Node, input: String, output: String, weights: Vec<f32>, channels: (usize, usize), bias: Option<Vec<f32>>) {
		let params = InnerProductLayerParams {
			input_channels: channels.0 as u64,
			output_channels: channels.1 as u64,
			has_bias: bias.is_some(),
			weights: Some(self.weights(weights)),
			bias: bias.map(|b| self.weights(b))
		};
		self.push(node, vec![input], output, Layer::InnerProduct(params));
	}

	fn batch_norm(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let gamma = self.constant(node, 1)?.to_f32_vec()?;
		let beta = self.constant(node, 2)?.to_f32_vec()?;
		let mean = self.constant(node, 3)?.to_f32_vec()?;
		let variance = self.constant(node, 4)?.to_f32_vec()?;
		let channels = gamma.len();
		if [beta.len(), mean.len(), variance.len()].iter().any(|l| *l != channels) {
			return Err(Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} has parameters of differing lengths")));
		}
		let params = BatchnormLayerParams {
			channels: channels as u64,
			compute_mean_var: false,
			instance_normalization: false,
			epsilon: node.attribute_or("epsilon", 1e-5)?,
			gamma: Some(self.weights(gamma)),
			beta: Some(self.weights(beta)),
			mean: Some(self.weights(mean)),
			variance: Some(self.weights(variance))
		};
		let output = output_name(node)?;
		self.push(node, vec![input], output, Layer::Batchnorm(params));
		Ok(())
	}

	fn softmax(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let default_axis: i64 = if self.model.opset_version() >= 13 { -1 } else { 1 };
		let axis = node.attribute_or("axis", default_axis)?;
		if axis != 1 && axis != -1 {
			return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} normalizes over axis {axis}; only the channel axis is supported")));
		}
		let output = output_name(node)?;
		self.push(node, vec![input], output, Layer::Softmax(SoftmaxLayerParams {}));
		Ok(())
	}

	fn flatten(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let axis = node.attribute_or("axis", 1i64)?;
		if axis != 1 {
			return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} flattens from axis {axis}; only axis 1 is supported")));
		}
		self.push_flatten(node, input)
	}

	fn push_flatten(&mut self, node: &Node, input: String) -> Result<()> {
		let output = output_name(node)?;
		self.push(node, vec![input], output, Layer::Flatten(FlattenLayerParams { mode: FlattenOrder::ChannelFirst as i32 }));
		Ok(())
	}

	fn reshape(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let target = match node.attribute::<Vec<i64>>("shape")? {
			Some(shape) => shape,
			None => self.constant(node, 1)?.to_i64_vec()?
		};
		match target.len() {
			2 => self.push_flatten(node, input),
			4 if target[1..].iter().all(|d| *d > 0) => {
				let output = output_name(node)?;
				let params = ReshapeLayerParams { target_shape: target[1..].to_vec(), mode: ReshapeOrder::ChannelFirst as i32 };
				self.push(node, vec![input], output, Layer::Reshape(params));
				Ok(())
			}
			_ => Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} reshapes to {target:?}, which is not supported")))
		}
	}

	fn transpose(&mut self, node: &Node) -> Result<()> {
		let input = self.input_blob(node, 0)?;
		let perm = node
			.attribute::<Vec<i64>>("perm")?
			.ok_or_else(|| Error::new_with_code(ErrorCode::NotImplemented, format!("{node} reverses all axes, which is not supported")))?;
		if perm.len() != 4 || perm[0] != 0 {
			return Err(Error::new_with_code(
				ErrorCode::NotImplemented,
				format!("{node} permutes axes {perm:?}; only 4D permutations that keep the batch axis are supported")
			));
		}
		let output = output_name(node)?;
		let params = PermuteLayerParams { axis: to_u64s(node, "perm", &perm)? };
		self.push(node, vec![input], output, Layer::Permute(params));
		Ok(())
	}

	fn elementwise(&mut self, node: &Node) -> Result<()> {
		if node.inputs().len() < 2 {
			return Err(Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} needs at least 2 inputs")));
		}
		let inputs = (0..node.inputs().len()).map(|i| self.input_blob(node, i)).collect::<Result<Vec<_>>>()?;
		let layer = match node.op_type() {
			"Add" => Layer::Add(AddLayerParams { alpha: 0.0 }),
			"Mul" => Layer::Multiply(MultiplyLayerParams { alpha: 1.0 }),
			"Max" => Layer::Max(MaxLayerParams {}),
			"Min" => Layer::Min(MinLayerParams {}),
			other => return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("`{other}` is not an elementwise operator")))
		};
		let output = output_name(node)?;
		self.push(node, inputs, output, layer);
		Ok(())
	}

	fn concat(&mut self, node: &Node) -> Result<()> {
		let axis = node
			.attribute::<i64>("axis")?
			.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} has no `axis`")))?;
		if axis != 1 && axis != -3 {
			return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} concatenates along axis {axis}; only channels are supported")));
		}
		let inputs = (0..node.inputs().len()).map(|i| self.input_blob(node, i)).collect::<Result<Vec<_>>>()?;
		let output = output_name(node)?;
		self.push(node, inputs, output, Layer::Concat(ConcatLayerParams { sequence_concat: false }));
		Ok(())
	}
}

fn output_name(node: &Node) -> Result<String> {
	node.output(0)
		.map(str::to_string)
		.ok_or_else(|| Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} has no output")))
}

fn to_u64(node: &Node, attribute: &str, value: i64) -> Result<u64> {
	u64::try_from(value).map_err(|_| Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} has a negative value in `{attribute}`")))
}

fn to_u64s(node: &Node, attribute: &str, values: &[i64]) -> Result<Vec<u64>> {
	values.iter().map(|v| to_u64(node, attribute, *v)).collect()
}

fn broadcast_bias(node: &Node, bias: Vec<f32>, channels: usize) -> Result<Vec<f32>> {
	match bias.len() {
		n if n == channels => Ok(bias),
		1 => Ok(vec![bias[0]; channels]),
		n => Err(Error::new_with_code(
			ErrorCode::NotImplemented,
			format!("{node} adds {n} biases to {channels} outputs; only per-channel or scalar biases are supported")
		))
	}
}

fn padding(node: &Node) -> Result<Padding> {
	let auto_pad = node.attribute_or("auto_pad", String::from("NOTSET"))?;
	match auto_pad.as_str() {
		"SAME_UPPER" => Ok(Padding::Same(SamePaddingMode::BottomRightHeavy)),
		"SAME_LOWER" => Ok(Padding::Same(SamePaddingMode::TopLeftHeavy)),
		"VALID" => Ok(Padding::Valid(ValidPadding { padding_amounts: None })),
		"NOTSET" | "" => {
			let pads = node.attribute_or("pads", vec![0; 4])?;
			// [top, left, bottom, right]
			let &[top, left, bottom, right] = &pads[..] else {
				return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} has {} padding values, expected 4", pads.len())));
			};
			if pads.iter().all(|p| *p == 0) {
				return Ok(Padding::Valid(ValidPadding { padding_amounts: None }));
			}
			let pads = to_u64s(node, "pads", &[top, left, bottom, right])?;
			Ok(Padding::Valid(ValidPadding {
				padding_amounts: Some(BorderAmounts {
					border_amounts: vec![
						EdgeSizes { start_edge_size: pads[0], end_edge_size: pads[2] },
						EdgeSizes { start_edge_size: pads[1], end_edge_size: pads[3] },
					]
				})
			}))
		}
		other => Err(Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} has unknown `auto_pad` mode `{other}`")))
	}
}

use mlport::{
	ConvertedModel, ErrorCode,
	proto::{
		coreml::{
			BorderAmounts, ConvolutionLayerParams, PoolingLayerParams, border_amounts::EdgeSizes, convolution_layer_params::ConvolutionPaddingType,
			neural_network_layer::Layer, pooling_layer_params::PoolingPaddingType, same_padding::SamePaddingMode
		},
		onnx::AttributeProto
	}
};

mod common;

use common::{GraphBuilder, int, ints, string};

fn convert(graph: GraphBuilder) -> mlport::Result<ConvertedModel> {
	common::init_logging();
	ConvertedModel::builder().commit_from_memory(&graph.to_bytes())
}

fn error_code(graph: GraphBuilder) -> Result<(), ErrorCode> {
	convert(graph).map(|_| ()).map_err(|e| e.code())
}

fn first_layer(model: &ConvertedModel) -> Layer {
	model.layers()[0].layer.clone().expect("layer has no parameters")
}

/// A single 3x3 convolution with 2 output channels over an 8x8 single-channel input.
fn conv(attributes: Vec<AttributeProto>) -> GraphBuilder {
	GraphBuilder::new()
		.input("x", &[1, 1, 8, 8])
		.output("y", &[1, 2, 8, 8])
		.initializer("w", &[2, 1, 3, 3], vec![0.5; 18])
		.node("Conv", "conv", &["x", "w"], &["y"], attributes)
}

fn pool(op_type: &str, attributes: Vec<AttributeProto>) -> GraphBuilder {
	GraphBuilder::new()
		.input("x", &[1, 1, 8, 8])
		.output("y", &[1, 1, 4, 4])
		.node(op_type, "pool", &["x"], &["y"], attributes)
}

fn conv_params(model: &ConvertedModel) -> ConvolutionLayerParams {
	match first_layer(model) {
		Layer::Convolution(params) => params,
		other => panic!("expected a convolution, got {other:?}")
	}
}

fn pool_params(model: &ConvertedModel) -> PoolingLayerParams {
	match first_layer(model) {
		Layer::Pooling(params) => params,
		other => panic!("expected a pooling layer, got {other:?}")
	}
}

#[test]
fn explicit_pads_become_border_amounts() -> mlport::Result<()> {
	// ONNX orders pads [top, left, bottom, right]
	let model = convert(conv(vec![ints("kernel_shape", &[3, 3]), ints("pads", &[1, 2, 3, 4])]))?;
	let Some(ConvolutionPaddingType::Valid(valid)) = conv_params(&model).convolution_padding_type else {
		panic!("expected valid padding");
	};
	assert_eq!(
		valid.padding_amounts,
		Some(BorderAmounts {
			border_amounts: vec![EdgeSizes { start_edge_size: 1, end_edge_size: 3 }, EdgeSizes { start_edge_size: 2, end_edge_size: 4 }]
		})
	);

	let model = convert(conv(vec![]))?;
	let params = conv_params(&model);
	assert_eq!((params.output_channels, params.kernel_channels, params.n_groups), (2, 1, 1));
	assert_eq!(params.kernel_size, vec![3, 3]);
	assert!(!params.has_bias);
	let Some(ConvolutionPaddingType::Valid(valid)) = params.convolution_padding_type else {
		panic!("expected valid padding");
	};
	assert_eq!(valid.padding_amounts, None);
	Ok(())
}

#[test]
fn same_padding_keeps_asymmetry() -> mlport::Result<()> {
	let model = convert(conv(vec![string("auto_pad", "SAME_UPPER")]))?;
	let Some(ConvolutionPaddingType::Same(same)) = conv_params(&model).convolution_padding_type else {
		panic!("expected same padding");
	};
	assert_eq!(same.asymmetry_mode(), SamePaddingMode::BottomRightHeavy);

	let model = convert(pool("MaxPool", vec![ints("kernel_shape", &[2, 2]), ints("strides", &[2, 2]), string("auto_pad", "SAME_LOWER")]))?;
	let Some(PoolingPaddingType::Same(same)) = pool_params(&model).pooling_padding_type else {
		panic!("expected same padding");
	};
	assert_eq!(same.asymmetry_mode(), SamePaddingMode::TopLeftHeavy);

	assert_eq!(error_code(conv(vec![string("auto_pad", "SIDEWAYS")])), Err(ErrorCode::InvalidGraph));
	Ok(())
}

#[test]
fn negative_group_is_rejected() {
	assert_eq!(error_code(conv(vec![int("group", -1)])), Err(ErrorCode::InvalidGraph));
}

#[test]
fn average_pool_padding_exclusion() -> mlport::Result<()> {
	let model = convert(pool("AveragePool", vec![ints("kernel_shape", &[2, 2]), ints("strides", &[2, 2])]))?;
	assert!(pool_params(&model).avg_pool_exclude_padding);

	let model = convert(pool("AveragePool", vec![ints("kernel_shape", &[2, 2]), ints("strides", &[2, 2]), int("count_include_pad", 1)]))?;
	let params = pool_params(&model);
	assert!(!params.avg_pool_exclude_padding);
	assert_eq!(params.stride, vec![2, 2]);

	assert_eq!(error_code(pool("MaxPool", vec![ints("kernel_shape", &[2, 2]), int("ceil_mode", 1)])), Err(ErrorCode::NotImplemented));
	Ok(())
}

#[test]
fn batch_normalization() -> mlport::Result<()> {
	let graph = |variance: Vec<f32>| {
		GraphBuilder::new()
			.input("x", &[1, 2, 4, 4])
			.output("y", &[1, 2, 4, 4])
			.initializer("gamma", &[2], vec![1., 2.])
			.initializer("beta", &[2], vec![0., 0.5])
			.initializer("mean", &[2], vec![0.1, 0.2])
			.initializer("var", &[variance.len() as i64], variance)
			.node("BatchNormalization", "bn", &["x", "gamma", "beta", "mean", "var"], &["y"], vec![common::float("epsilon", 1e-3)])
	};

	let model = convert(graph(vec![1., 1.]))?;
	let Layer::Batchnorm(bn) = first_layer(&model) else {
		panic!("expected a batchnorm layer");
	};
	assert_eq!(bn.channels, 2);
	assert_eq!(bn.epsilon, 1e-3);
	assert_eq!(bn.gamma.map(|w| w.float_value), Some(vec![1., 2.]));
	assert_eq!(bn.mean.map(|w| w.float_value), Some(vec![0.1, 0.2]));

	assert_eq!(error_code(graph(vec![1., 1., 1.])), Err(ErrorCode::InvalidGraph));
	Ok(())
}

#[test]
fn concat_along_channels_only() -> mlport::Result<()> {
	let graph = |axis: i64| {
		GraphBuilder::new()
			.input("a", &[1, 2, 4, 4])
			.input("b", &[1, 3, 4, 4])
			.output("y", &[1, 5, 4, 4])
			.node("Concat", "concat", &["a", "b"], &["y"], vec![int("axis", axis)])
	};

	let model = convert(graph(1))?;
	assert!(matches!(first_layer(&model), Layer::Concat(_)));
	assert_eq!(model.layers()[0].input, vec!["a".to_string(), "b".to_string()]);
	assert!(convert(graph(-3)).is_ok());

	assert_eq!(error_code(graph(2)), Err(ErrorCode::NotImplemented));
	Ok(())
}

#[test]
fn transpose_becomes_permute() -> mlport::Result<()> {
	let graph = |perm: &[i64]| {
		GraphBuilder::new()
			.input("x", &[1, 2, 3, 4])
			.output("y", &[1, 3, 4, 2])
			.node("Transpose", "transpose", &["x"], &["y"], vec![ints("perm", perm)])
	};

	let model = convert(graph(&[0, 2, 3, 1]))?;
	let Layer::Permute(permute) = first_layer(&model) else {
		panic!("expected a permute layer");
	};
	assert_eq!(permute.axis, vec![0, 2, 3, 1]);

	assert_eq!(error_code(graph(&[1, 0, 2, 3])), Err(ErrorCode::NotImplemented));
	assert_eq!(error_code(graph(&[0, 2, 1])), Err(ErrorCode::NotImplemented));
	Ok(())
}

#[test]
fn reshape_to_rank_four() -> mlport::Result<()> {
	let graph = |shape: &[i64]| {
		GraphBuilder::new()
			.input("x", &[1, 8])
			.output("y", &[1, 2, 2, 2])
			.int_initializer("shape", shape)
			.node("Reshape", "reshape", &["x", "shape"], &["y"], vec![])
	};

	let model = convert(graph(&[1, 2, 2, 2]))?;
	let Layer::Reshape(reshape) = first_layer(&model) else {
		panic!("expected a reshape layer");
	};
	assert_eq!(reshape.target_shape, vec![2, 2, 2]);

	assert_eq!(error_code(graph(&[1, 2, 4])), Err(ErrorCode::NotImplemented));
	assert_eq!(error_code(graph(&[1, -1, 2, 2])), Err(ErrorCode::NotImplemented));
	Ok(())
}

#[test]
fn softmax_over_channels_only() -> mlport::Result<()> {
	let graph = |axis: i64| {
		GraphBuilder::new()
			.input("x", &[1, 3, 4, 4])
			.output("y", &[1, 3, 4, 4])
			.node("Softmax", "softmax", &["x"], &["y"], vec![int("axis", axis)])
	};

	assert!(matches!(first_layer(&convert(graph(1))?), Layer::Softmax(_)));
	assert_eq!(error_code(graph(2)), Err(ErrorCode::NotImplemented));
	assert_eq!(error_code(graph(0)), Err(ErrorCode::NotImplemented));
	Ok(())
}

#[test]
fn forwarding_cycle_is_rejected() {
	let graph = GraphBuilder::new()
		.input("x", &[1, 4])
		.output("a", &[1, 4])
		.node("Identity", "first", &["b"], &["a"], vec![])
		.node("Identity", "second", &["a"], &["b"], vec![]);
	assert_eq!(error_code(graph), Err(ErrorCode::InvalidGraph));
}

#[test]
fn oversized_initializer_is_rejected() {
	let graph = GraphBuilder::new()
		.input("x", &[-1, 2])
		.output("y", &[-1, 2])
		.initializer("w", &[2, 2], vec![1., 2., 3., 4.])
		.initializer("bias", &[1 << 40, 1 << 40], vec![0.; 2])
		.node("MatMul", "matmul", &["x", "w"], &["xw"], vec![])
		.node("Add", "add", &["xw", "bias"], &["y"], vec![]);
	assert_eq!(error_code(graph), Err(ErrorCode::InvalidGraph));
}

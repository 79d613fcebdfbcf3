#![allow(dead_code)]

use std::{
	fs,
	path::{Path, PathBuf}
};

use mlport::proto::{
	Message,
	onnx::{
		AttributeProto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto, TensorProto, TensorShapeProto, TypeProto, ValueInfoProto,
		attribute_proto::AttributeType,
		tensor_proto::DataType,
		tensor_shape_proto::{Dimension, dimension},
		type_proto
	}
};

pub fn init_logging() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::new("mlport=trace"))
		.with_test_writer()
		.try_init();
}

/// Builds small ONNX models in memory.
#[derive(Default)]
pub struct GraphBuilder {
	graph: GraphProto,
	opset: i64
}

impl GraphBuilder {
	pub fn new() -> Self {
		Self { graph: GraphProto { name: "test".to_string(), ..Default::default() }, opset: 13 }
	}

	pub fn input(mut self, name: &str, dims: &[i64]) -> Self {
		self.graph.input.push(value_info(name, dims));
		self
	}

	pub fn output(mut self, name: &str, dims: &[i64]) -> Self {
		self.graph.output.push(value_info(name, dims));
		self
	}

	pub fn initializer(mut self, name: &str, dims: &[i64], values: Vec<f32>) -> Self {
		self.graph.initializer.push(TensorProto {
			name: name.to_string(),
			dims: dims.to_vec(),
			data_type: DataType::Float as i32,
			raw_data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
			..Default::default()
		});
		self
	}

	pub fn int_initializer(mut self, name: &str, values: &[i64]) -> Self {
		self.graph.initializer.push(TensorProto {
			name: name.to_string(),
			dims: vec![values.len() as i64],
			data_type: DataType::Int64 as i32,
			int64_data: values.to_vec(),
			..Default::default()
		});
		self
	}

	pub fn node(mut self, op_type: &str, name: &str, inputs: &[&str], outputs: &[&str], attribute: Vec<AttributeProto>) -> Self {
		self.graph.node.push(NodeProto {
			name: name.to_string(),
			op_type: op_type.to_string(),
			input: inputs.iter().map(|s| s.to_string()).collect(),
			output: outputs.iter().map(|s| s.to_string()).collect(),
			attribute,
			..Default::default()
		});
		self
	}

	pub fn build(self) -> ModelProto {
		ModelProto {
			ir_version: 7,
			opset_import: vec![OperatorSetIdProto { domain: String::new(), version: self.opset }],
			producer_name: "mlport-tests".to_string(),
			graph: Some(self.graph),
			..Default::default()
		}
	}

	pub fn to_bytes(self) -> Vec<u8> {
		self.build().encode_to_vec()
	}
}

fn value_info(name: &str, dims: &[i64]) -> ValueInfoProto {
	ValueInfoProto {
		name: name.to_string(),
		r#type: Some(TypeProto {
			value: Some(type_proto::Value::TensorType(type_proto::Tensor {
				elem_type: DataType::Float as i32,
				shape: Some(TensorShapeProto {
					dim: dims
						.iter()
						.map(|d| Dimension {
							value: Some(if *d < 0 { dimension::Value::DimParam("N".to_string()) } else { dimension::Value::DimValue(*d) }),
							..Default::default()
						})
						.collect()
				})
			})),
			..Default::default()
		}),
		..Default::default()
	}
}

pub fn ints(name: &str, values: &[i64]) -> AttributeProto {
	let mut attr = AttributeProto { name: name.to_string(), ints: values.to_vec(), ..Default::default() };
	attr.set_type(AttributeType::Ints);
	attr
}

pub fn int(name: &str, value: i64) -> AttributeProto {
	let mut attr = AttributeProto { name: name.to_string(), i: value, ..Default::default() };
	attr.set_type(AttributeType::Int);
	attr
}

pub fn string(name: &str, value: &str) -> AttributeProto {
	let mut attr = AttributeProto { name: name.to_string(), s: value.as_bytes().to_vec(), ..Default::default() };
	attr.set_type(AttributeType::String);
	attr
}

pub fn float(name: &str, value: f32) -> AttributeProto {
	let mut attr = AttributeProto { name: name.to_string(), f: value, ..Default::default() };
	attr.set_type(AttributeType::Float);
	attr
}

/// A digit classifier shaped like the Keras MNIST example: one 28x28 grayscale image in, 10 class scores out.
///
/// `Conv(4, 3x3) -> Relu -> MaxPool(2x2) -> Flatten -> Gemm(676 -> 10) -> Softmax`
pub fn mnist() -> GraphBuilder {
	GraphBuilder::new()
		.input("input_1", &[-1, 1, 28, 28])
		.output("dense_1", &[-1, 10])
		.initializer("conv_w", &[4, 1, 3, 3], (0..36).map(|i| i as f32 / 36.).collect())
		.initializer("conv_b", &[4], vec![0.1, 0.2, 0.3, 0.4])
		.initializer("dense_w", &[10, 676], vec![0.01; 6760])
		.initializer("dense_b", &[10], vec![0.; 10])
		.node("Conv", "conv2d_1", &["input_1", "conv_w", "conv_b"], &["conv_out"], vec![ints("kernel_shape", &[3, 3]), ints("strides", &[1, 1])])
		.node("Relu", "activation_1", &["conv_out"], &["relu_out"], vec![])
		.node("MaxPool", "max_pooling2d_1", &["relu_out"], &["pool_out"], vec![ints("kernel_shape", &[2, 2]), ints("strides", &[2, 2])])
		.node("Flatten", "flatten_1", &["pool_out"], &["flat_out"], vec![int("axis", 1)])
		.node("Gemm", "dense_logits", &["flat_out", "dense_w", "dense_b"], &["logits"], vec![int("transB", 1)])
		.node("Softmax", "softmax_1", &["logits"], &["dense_1"], vec![int("axis", -1)])
}

pub fn write_model(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
	let path = dir.join(name);
	fs::write(&path, bytes).expect("failed to write test model");
	path
}

//! Trained models: the ONNX graphs that go into a conversion.

use std::{
	collections::{HashMap, HashSet},
	fs,
	path::Path
};

use mlport_proto::{
	Message,
	onnx::{GraphProto, ModelProto, TensorProto, ValueInfoProto, tensor_proto::DataType}
};

mod attribute;
mod node;

pub use self::{attribute::FromAttribute, node::Node};
use crate::{
	Error, ErrorCode, Result,
	metadata::TrainedModelMetadata,
	tensor::TensorData,
	value::{Outlet, ValueType}
};

/// A trained model loaded from an ONNX file.
///
/// The graph's initializers and the outputs of its `Constant` nodes are folded into [`TrainedModel::constant`];
/// [`TrainedModel::nodes`] only lists the remaining operators, in graph order.
///
/// ```no_run
/// # fn main() -> mlport::Result<()> {
/// let model = mlport::TrainedModel::from_file("mnist.onnx")?;
/// for input in model.inputs() {
/// 	println!("{}: {}", input.name(), input.dtype());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TrainedModel {
	proto: ModelProto,
	inputs: Vec<Outlet>,
	outputs: Vec<Outlet>,
	nodes: Vec<Node>,
	constants: HashMap<String, TensorData>
}

impl TrainedModel {
	/// Loads a trained model from an ONNX file on disk.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path).map_err(|e| Error::io_at(path, e))?;
		crate::debug!(path = %path.display(), bytes = bytes.len(), "Read trained model");
		Self::from_memory(&bytes)
	}

	/// Loads a trained model from the bytes of an ONNX file.
	pub fn from_memory(bytes: &[u8]) -> Result<Self> {
		Self::from_proto(ModelProto::decode(bytes)?)
	}

	pub(crate) fn from_proto(proto: ModelProto) -> Result<Self> {
		let graph = proto
			.graph
			.as_ref()
			.ok_or_else(|| Error::new_with_code(ErrorCode::NoModel, "File holds an ONNX model without a graph"))?;

		let mut constants = HashMap::new();
		for init in &graph.initializer {
			constants.insert(init.name.clone(), TensorData::from_proto(init.name.clone(), init.clone())?);
		}

		let mut nodes = Vec::with_capacity(graph.node.len());
		for (index, proto) in graph.node.iter().enumerate() {
			let node = Node::new(index, proto.clone());
			if node.op_type() == "Constant" && node.is_standard_domain() {
				let Some(output) = node.output(0) else {
					return Err(Error::new_with_code(ErrorCode::InvalidGraph, format!("{node} has no output")));
				};
				constants.insert(output.to_string(), constant_value(&node, output)?);
				continue;
			}
			nodes.push(node);
		}

		let inputs = graph_outlets(graph, &graph.input, &constants)?;
		let outputs = graph_outlets(graph, &graph.output, &HashMap::new())?;
		if outputs.is_empty() {
			return Err(Error::new_with_code(ErrorCode::InvalidGraph, "Graph declares no outputs"));
		}

		crate::debug!(inputs = inputs.len(), outputs = outputs.len(), nodes = nodes.len(), constants = constants.len(), "Loaded trained model");
		Ok(Self { proto, inputs, outputs, nodes, constants })
	}

	/// The graph's inputs, excluding those bound to an initializer.
	pub fn inputs(&self) -> &[Outlet] {
		&self.inputs
	}

	pub fn outputs(&self) -> &[Outlet] {
		&self.outputs
	}

	/// The graph's operator nodes in order, without `Constant` nodes.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Looks up the constant value of tensor `name`, if it is an initializer or a `Constant` node's output.
	pub fn constant(&self, name: &str) -> Option<&TensorData> {
		self.constants.get(name)
	}

	pub fn is_constant(&self, name: &str) -> bool {
		self.constants.contains_key(name)
	}

	/// Nodes that read tensor `name`, in graph order.
	pub fn consumers<'s, 'n>(&'s self, name: &'n str) -> impl Iterator<Item = &'s Node> + use<'s, 'n> {
		self.nodes.iter().filter(move |n| n.inputs().iter().any(|i| i == name))
	}

	/// Whether any input, output, constant, or node reads or writes a tensor called `name`.
	pub fn has_tensor(&self, name: &str) -> bool {
		self.inputs.iter().chain(&self.outputs).any(|o| o.name() == name)
			|| self.constants.contains_key(name)
			|| self.nodes.iter().any(|n| n.inputs().iter().chain(n.outputs()).any(|t| t == name))
	}

	/// Whether tensor `name` is one of the graph's outputs.
	pub fn is_output(&self, name: &str) -> bool {
		self.outputs.iter().any(|o| o.name() == name)
	}

	/// The opset version imported for the default ONNX domain.
	pub fn opset_version(&self) -> i64 {
		self.proto
			.opset_import
			.iter()
			.find(|o| matches!(o.domain.as_str(), "" | "ai.onnx"))
			.map(|o| o.version)
			.unwrap_or_default()
	}

	pub fn metadata(&self) -> TrainedModelMetadata<'_> {
		TrainedModelMetadata::new(&self.proto)
	}
}

fn graph_outlets(graph: &GraphProto, values: &[ValueInfoProto], exclude: &HashMap<String, TensorData>) -> Result<Vec<Outlet>> {
	let mut seen = HashSet::new();
	let mut outlets = Vec::with_capacity(values.len());
	for value in values {
		if exclude.contains_key(&value.name) {
			continue;
		}
		if !seen.insert(value.name.as_str()) {
			return Err(Error::new_with_code(
				ErrorCode::InvalidGraph,
				format!("Graph `{}` declares value `{}` more than once", graph.name, value.name)
			));
		}
		outlets.push(Outlet::new(value.name.clone(), ValueType::from_type_proto(&value.name, value.r#type.as_ref())?));
	}
	Ok(outlets)
}

fn constant_value(node: &Node, output: &str) -> Result<TensorData> {
	if let Some(mut tensor) = node.attribute::<TensorData>("value")? {
		if tensor.name() != output {
			tensor = TensorData::from_proto(output, tensor.into_proto())?;
		}
		return Ok(tensor);
	}

	let proto = if let Some(f) = node.attribute::<f32>("value_float")? {
		TensorProto { data_type: DataType::Float as i32, float_data: vec![f], ..Default::default() }
	} else if let Some(floats) = node.attribute::<Vec<f32>>("value_floats")? {
		TensorProto { dims: vec![floats.len() as i64], data_type: DataType::Float as i32, float_data: floats, ..Default::default() }
	} else if let Some(i) = node.attribute::<i64>("value_int")? {
		TensorProto { data_type: DataType::Int64 as i32, int64_data: vec![i], ..Default::default() }
	} else if let Some(ints) = node.attribute::<Vec<i64>>("value_ints")? {
		TensorProto { dims: vec![ints.len() as i64], data_type: DataType::Int64 as i32, int64_data: ints, ..Default::default() }
	} else {
		return Err(Error::new_with_code(ErrorCode::NotImplemented, format!("{node} has no supported value attribute")));
	};
	TensorData::from_proto(output, proto)
}

#[cfg(test)]
mod tests {
	use mlport_proto::{
		Message,
		onnx::{
			AttributeProto, GraphProto, ModelProto, NodeProto, TensorProto, TensorShapeProto, TypeProto, ValueInfoProto,
			attribute_proto::AttributeType,
			tensor_shape_proto::{Dimension, dimension},
			type_proto
		}
	};

	use super::TrainedModel;
	use crate::ErrorCode;

	fn tensor_value(name: &str) -> ValueInfoProto {
		ValueInfoProto {
			name: name.to_string(),
			r#type: Some(TypeProto {
				value: Some(type_proto::Value::TensorType(type_proto::Tensor {
					elem_type: 1,
					shape: Some(TensorShapeProto {
						dim: vec![Dimension { value: Some(dimension::Value::DimValue(4)), ..Default::default() }]
					})
				})),
				..Default::default()
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_constants_are_folded() -> crate::Result<()> {
		let mut value = AttributeProto { name: "value_floats".to_string(), floats: vec![1., 2., 3., 4.], ..Default::default() };
		value.set_type(AttributeType::Floats);
		let model = ModelProto {
			graph: Some(GraphProto {
				node: vec![
					NodeProto { op_type: "Constant".to_string(), output: vec!["c".to_string()], attribute: vec![value], ..Default::default() },
					NodeProto {
						op_type: "Add".to_string(),
						input: vec!["x".to_string(), "c".to_string()],
						output: vec!["y".to_string()],
						..Default::default()
					},
				],
				initializer: vec![TensorProto { name: "w".to_string(), dims: vec![4], data_type: 1, float_data: vec![0.; 4], ..Default::default() }],
				input: vec![tensor_value("x"), tensor_value("w")],
				output: vec![tensor_value("y")],
				..Default::default()
			}),
			..Default::default()
		};
		let model = TrainedModel::from_memory(&model.encode_to_vec())?;
		assert_eq!(model.inputs().len(), 1);
		assert_eq!(model.inputs()[0].name(), "x");
		assert_eq!(model.nodes().len(), 1);
		assert_eq!(model.nodes()[0].index(), 1);
		assert_eq!(model.constant("c").map(|c| c.len()), Some(4));
		assert!(model.is_constant("w"));
		assert_eq!(model.consumers("x").count(), 1);
		Ok(())
	}

	#[test]
	fn test_missing_graph() {
		let bytes = ModelProto::default().encode_to_vec();
		assert_eq!(TrainedModel::from_memory(&bytes).map(|_| ()).map_err(|e| e.code()), Err(ErrorCode::NoModel));
	}

	#[test]
	fn test_garbage_bytes() {
		assert_eq!(TrainedModel::from_memory(b"\xff\xff\xff\xff").map(|_| ()).map_err(|e| e.code()), Err(ErrorCode::InvalidProtobuf));
	}
}

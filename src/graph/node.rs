use core::fmt;

use mlport_proto::onnx::NodeProto;

use super::attribute::{FromAttribute, read_attribute};
use crate::Result;

/// An operator node of a trained model's graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
	index: usize,
	proto: NodeProto
}

impl Node {
	pub(crate) fn new(index: usize, proto: NodeProto) -> Self {
		Self { index, proto }
	}

	/// Position of this node in the graph's node list.
	pub fn index(&self) -> usize {
		self.index
	}

	/// The node's name; exporters are not required to set one.
	pub fn name(&self) -> &str {
		&self.proto.name
	}

	pub fn op_type(&self) -> &str {
		&self.proto.op_type
	}

	/// The operator domain. Standard ONNX operators use the empty domain or `ai.onnx`.
	pub fn domain(&self) -> &str {
		&self.proto.domain
	}

	pub fn is_standard_domain(&self) -> bool {
		matches!(self.proto.domain.as_str(), "" | "ai.onnx")
	}

	pub fn inputs(&self) -> &[String] {
		&self.proto.input
	}

	pub fn outputs(&self) -> &[String] {
		&self.proto.output
	}

	/// The name of input `i`, or `None` if the input is absent. Omitted optional inputs are encoded as empty names.
	pub fn input(&self, i: usize) -> Option<&str> {
		self.proto.input.get(i).map(String::as_str).filter(|s| !s.is_empty())
	}

	pub fn output(&self, i: usize) -> Option<&str> {
		self.proto.output.get(i).map(String::as_str).filter(|s| !s.is_empty())
	}

	/// Reads attribute `name`, returning `Ok(None)` if the node does not set it.
	pub fn attribute<T: FromAttribute>(&self, name: &str) -> Result<Option<T>> {
		self.proto.attribute.iter().find(|a| a.name == name).map(read_attribute).transpose()
	}

	/// Reads attribute `name`, falling back to `default` if the node does not set it.
	pub fn attribute_or<T: FromAttribute>(&self, name: &str, default: T) -> Result<T> {
		Ok(self.attribute(name)?.unwrap_or(default))
	}
}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.proto.name.is_empty() {
			write!(f, "`{}` node #{}", self.proto.op_type, self.index)
		} else {
			write!(f, "`{}` node `{}`", self.proto.op_type, self.proto.name)
		}
	}
}

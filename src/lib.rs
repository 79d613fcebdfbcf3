#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::tabs_in_doc_comments)]
#![warn(clippy::unwrap_used)]

//! `mlport` converts trained ONNX models into Core ML neural networks (`.mlmodel` files), and inspects the layers &
//! features of converted models.
//!
//! ```no_run
//! use mlport::{ConvertedModel, NeuralNetworkInspector, convert::ImageInput};
//!
//! # fn main() -> mlport::Result<()> {
//! let mut model = ConvertedModel::builder()
//! 	.with_input_names(["image (28x28)"])
//! 	.with_image_input("image (28x28)", ImageInput::new())
//! 	.with_output_names(["prediction"])
//! 	.with_class_labels((0..10).map(|d| d.to_string()))
//! 	.commit_from_file("mnist.onnx")?;
//! model.set_author("Keras-team");
//! model.save("mnist.mlmodel")?;
//!
//! let spec = mlport::load_spec("mnist.mlmodel")?;
//! let inspector = NeuralNetworkInspector::new(&spec)?;
//! inspector.inspect_layers()?;
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod error;
pub mod graph;
pub mod inspect;
pub mod logging;
pub mod metadata;
pub mod model;
pub mod tensor;
pub mod value;

pub use mlport_proto as proto;

pub(crate) use self::logging::{debug, error, info, trace, warning as warn};
pub use self::{
	convert::ConverterBuilder,
	error::{Error, ErrorCode, Result},
	graph::TrainedModel,
	inspect::NeuralNetworkInspector,
	model::{ConvertedModel, load_spec}
};

//! Raw protobuf messages read and written by [`mlport`](https://docs.rs/mlport).
//!
//! [`onnx`] describes trained models in the ONNX interchange format; [`coreml`] describes Core ML model
//! specifications (`.mlmodel`). The field numbers match the upstream `.proto` files so that files produced by other
//! tools decode, and files produced here load in Core ML.

#![allow(clippy::all)]

pub mod coreml;
pub mod onnx;

pub use prost::{DecodeError, EncodeError, Message};

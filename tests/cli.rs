#![cfg(feature = "cli")]

use std::process::Command;

use mlport::{ConvertedModel, ErrorCode};

mod common;

#[test]
fn convert_then_inspect() -> mlport::Result<()> {
	let dir = tempfile::tempdir()?;
	let input_path = common::write_model(dir.path(), "mnist.onnx", &common::mnist().to_bytes());
	let output_path = dir.path().join("mnist.mlmodel");

	let status = Command::new(env!("CARGO_BIN_EXE_mlport-convert")).arg(&input_path).arg(&output_path).status()?;
	assert!(status.success());

	let model = ConvertedModel::load(&output_path)?;
	assert_eq!(model.author(), "Keras-team");
	assert_eq!(model.license(), "nope");
	assert_eq!(model.short_description(), "Predicts a handwritten digit");

	let output = Command::new(env!("CARGO_BIN_EXE_mlport-inspect")).arg(&output_path).output()?;
	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout).map_err(mlport::Error::wrap)?;
	assert!(stdout.contains("(Type: convolution)"));
	assert!(stdout.contains("Name: image (28x28)"));
	assert_eq!(stdout.lines().last(), Some("28"));
	Ok(())
}

#[test]
fn missing_input_fails() -> mlport::Result<()> {
	let dir = tempfile::tempdir()?;
	let output_path = dir.path().join("out.mlmodel");

	let status = Command::new(env!("CARGO_BIN_EXE_mlport-convert"))
		.arg(dir.path().join("missing.onnx"))
		.arg(&output_path)
		.env("MLPORT_LOG", "error")
		.status()?;
	assert!(!status.success());
	assert!(!output_path.exists());
	assert_eq!(ConvertedModel::load(&output_path).map(|_| ()).map_err(|e| e.code()), Err(ErrorCode::NoSuchFile));

	let status = Command::new(env!("CARGO_BIN_EXE_mlport-inspect")).arg(&output_path).status()?;
	assert!(!status.success());
	Ok(())
}

#[test]
fn usage_without_arguments() -> mlport::Result<()> {
	let output = Command::new(env!("CARGO_BIN_EXE_mlport-inspect")).output()?;
	assert!(output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("usage:"));
	Ok(())
}

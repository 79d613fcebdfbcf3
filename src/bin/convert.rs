use std::{env, process};

use mlport::{ConvertedModel, TrainedModel, convert::ImageInput, logging};

const INPUT_NAME: &str = "image (28x28)";
const OUTPUT_NAME: &str = "prediction";

fn main() -> mlport::Result<()> {
	logging::init();

	let mut args = env::args().skip(1);
	let (Some(input_path), Some(output_path)) = (args.next(), args.next()) else {
		eprintln!("usage: ./mlport-convert <model>.onnx <output>.mlmodel");
		process::exit(0);
	};

	let trained = TrainedModel::from_file(&input_path)?;
	let meta = trained.metadata();
	if let Some(x) = meta.producer() {
		eprintln!("Produced by {x} {}", meta.producer_version().unwrap_or_default());
	}
	for (i, input) in trained.inputs().iter().enumerate() {
		eprintln!("    input {i} {}: {}", input.name(), input.dtype());
	}
	for (i, output) in trained.outputs().iter().enumerate() {
		eprintln!("    output {i} {}: {}", output.name(), output.dtype());
	}

	let mut model = ConvertedModel::builder()
		.with_input_names([INPUT_NAME])
		.with_image_input(INPUT_NAME, ImageInput::new())
		.with_output_names([OUTPUT_NAME])
		.with_class_labels((0..10).map(|d| d.to_string()))
		.convert(&trained)?;

	model.set_author("Keras-team");
	model.set_license("nope");
	model.set_short_description("Predicts a handwritten digit");

	model.save(&output_path)?;
	eprintln!("Wrote {} layers to {output_path}", model.layer_count());

	Ok(())
}

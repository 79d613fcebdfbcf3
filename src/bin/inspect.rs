use std::{env, process};

use mlport::{NeuralNetworkInspector, load_spec, logging};

fn main() -> mlport::Result<()> {
	logging::init();

	let Some(path) = env::args().nth(1) else {
		eprintln!("usage: ./mlport-inspect <model>.mlmodel");
		process::exit(0);
	};

	let spec = load_spec(path)?;
	let inspector = NeuralNetworkInspector::new(&spec)?;

	inspector.inspect_layers()?;
	inspector.inspect_input_features()?;
	println!("{}", inspector.input_image_width()?);

	Ok(())
}

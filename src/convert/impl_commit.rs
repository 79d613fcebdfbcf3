#[cfg(feature = "fetch-models")]
use std::fmt::Write;
use std::path::Path;
#[cfg(feature = "fetch-models")]
use std::path::PathBuf;

use super::ConverterBuilder;
#[cfg(feature = "fetch-models")]
use crate::Error;
use crate::{ConvertedModel, Result, graph::TrainedModel};

impl ConverterBuilder {
	/// Downloads a trained ONNX model from the given URL and converts it.
	///
	/// Downloads are cached in the directory named by `MLPORT_CACHE_DIR`, or `mlport/models` under the system's
	/// temporary directory, keyed by the SHA-256 hash of the URL.
	#[cfg(feature = "fetch-models")]
	#[cfg_attr(docsrs, doc(cfg(feature = "fetch-models")))]
	pub fn commit_from_url(self, model_url: impl AsRef<str>) -> Result<ConvertedModel> {
		let downloaded_path = ConverterBuilder::download(model_url.as_ref())?;
		self.commit_from_file(downloaded_path)
	}

	#[cfg(feature = "fetch-models")]
	fn download(url: &str) -> Result<PathBuf> {
		let mut download_dir = std::env::var_os("MLPORT_CACHE_DIR")
			.map(PathBuf::from)
			.unwrap_or_else(|| std::env::temp_dir().join("mlport").join("models"));
		if std::fs::create_dir_all(&download_dir).is_err() {
			download_dir = std::env::current_dir()?;
		}

		let model_filename = <sha2::Sha256 as sha2::Digest>::digest(url).into_iter().fold(String::new(), |mut s, b| {
			let _ = write!(&mut s, "{:02x}", b);
			s
		});
		let model_filepath = download_dir.join(&model_filename);
		if model_filepath.exists() {
			crate::info!(model_filepath = format!("{}", model_filepath.display()).as_str(), "Model already exists, skipping download");
			return Ok(model_filepath);
		}

		crate::info!(model_filepath = format!("{}", model_filepath.display()).as_str(), url = format!("{url:?}").as_str(), "Downloading model");
		let resp = ureq::get(url).call().map_err(|e| Error::new(format!("Error downloading to file: {e}")))?;
		let len = resp
			.headers()
			.get("Content-Length")
			.and_then(|h| h.to_str().ok())
			.and_then(|s| s.parse::<u64>().ok());
		crate::info!(len, "Downloading model bytes");

		let mut reader = resp.into_body().into_with_config().limit(u64::MAX).reader();
		let temp_filepath = download_dir.join(format!("tmp_{}.{model_filename}", std::process::id()));
		let f = std::fs::File::create(&temp_filepath).map_err(|e| Error::io_at(&temp_filepath, e))?;
		let mut writer = std::io::BufWriter::new(f);

		let bytes_io_count = std::io::copy(&mut reader, &mut writer).map_err(Error::wrap)?;
		if let Some(len) = len {
			if bytes_io_count != len {
				let _ = std::fs::remove_file(&temp_filepath);
				return Err(Error::new(format!("Failed to download entire model; file only has {bytes_io_count} bytes, expected {len}")));
			}
		}
		drop(writer);

		match std::fs::rename(&temp_filepath, &model_filepath) {
			Ok(()) => Ok(model_filepath),
			Err(e) => {
				if model_filepath.exists() {
					let _ = std::fs::remove_file(temp_filepath);
					Ok(model_filepath)
				} else {
					Err(Error::new(format!("Failed to download model: {e}")))
				}
			}
		}
	}

	/// Loads a trained ONNX model from a file and converts it.
	pub fn commit_from_file<P>(self, model_path: P) -> Result<ConvertedModel>
	where
		P: AsRef<Path>
	{
		let trained = TrainedModel::from_file(model_path)?;
		self.convert(&trained)
	}

	/// Converts a trained ONNX model from the bytes of its file.
	pub fn commit_from_memory(self, model_bytes: &[u8]) -> Result<ConvertedModel> {
		let trained = TrainedModel::from_memory(model_bytes)?;
		self.convert(&trained)
	}
}

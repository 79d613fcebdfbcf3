use std::{error::Error as StdError, fmt, io, path::Path};

/// Type alias for the `Result` type returned by `mlport` functions.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// An error returned by any `mlport` API.
pub struct Error {
	code: ErrorCode,
	message: String,
	cause: Option<Box<dyn StdError + Send + Sync + 'static>>
}

impl fmt::Debug for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Error")
			.field("code", &self.code)
			.field("message", &self.message)
			.field("cause", &self.cause)
			.finish()
	}
}

impl Error {
	/// Wrap a foreign error in an [`mlport::Error`](Error), keeping it as the [`source`](StdError::source).
	pub fn wrap<T: StdError + Send + Sync + 'static>(err: T) -> Self {
		Self::new_internal(ErrorCode::GenericFailure, err.to_string(), Some(Box::new(err)))
	}

	/// Creates a custom [`Error`] with the given message.
	pub fn new(msg: impl Into<String>) -> Self {
		Self::new_internal(ErrorCode::GenericFailure, msg, None)
	}

	/// Creates a custom [`Error`] with the given [`ErrorCode`] and message.
	pub fn new_with_code(code: ErrorCode, msg: impl Into<String>) -> Self {
		Self::new_internal(code, msg, None)
	}

	fn new_internal(code: ErrorCode, message: impl Into<String>, cause: Option<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
		Self { code, message: message.into(), cause }
	}

	/// Builds an error for a failed filesystem operation on `path`, mapping `NotFound` to [`ErrorCode::NoSuchFile`].
	pub(crate) fn io_at(path: &Path, err: io::Error) -> Self {
		let code = match err.kind() {
			io::ErrorKind::NotFound => ErrorCode::NoSuchFile,
			_ => ErrorCode::GenericFailure
		};
		Self::new_internal(code, format!("`{}`: {err}", path.display()), Some(Box::new(err)))
	}

	pub fn code(&self) -> ErrorCode {
		self.code
	}

	pub fn message(&self) -> &str {
		self.message.as_str()
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

impl StdError for Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.cause.as_ref().map(|x| &**x as &dyn StdError)
	}
}

impl From<Box<dyn StdError + Send + Sync + 'static>> for Error {
	fn from(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
		Error::new_internal(ErrorCode::GenericFailure, err.to_string(), Some(err))
	}
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		let code = match err.kind() {
			io::ErrorKind::NotFound => ErrorCode::NoSuchFile,
			_ => ErrorCode::GenericFailure
		};
		Error::new_internal(code, err.to_string(), Some(Box::new(err)))
	}
}

impl From<prost::DecodeError> for Error {
	fn from(err: prost::DecodeError) -> Self {
		Error::new_internal(ErrorCode::InvalidProtobuf, format!("Failed to decode protobuf: {err}"), Some(Box::new(err)))
	}
}

impl From<prost::EncodeError> for Error {
	fn from(err: prost::EncodeError) -> Self {
		Error::new_internal(ErrorCode::GenericFailure, format!("Failed to encode protobuf: {err}"), Some(Box::new(err)))
	}
}

impl From<ndarray::ShapeError> for Error {
	fn from(err: ndarray::ShapeError) -> Self {
		Error::new_internal(ErrorCode::InvalidGraph, format!("Tensor data does not match its shape: {err}"), Some(Box::new(err)))
	}
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
	GenericFailure,
	InvalidArgument,
	NoSuchFile,
	NoModel,
	InvalidProtobuf,
	NotImplemented,
	InvalidGraph
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ErrorCode::GenericFailure => "generic failure",
			ErrorCode::InvalidArgument => "invalid argument",
			ErrorCode::NoSuchFile => "no such file",
			ErrorCode::NoModel => "no model",
			ErrorCode::InvalidProtobuf => "invalid protobuf",
			ErrorCode::NotImplemented => "not implemented",
			ErrorCode::InvalidGraph => "invalid graph"
		})
	}
}

#[cfg(test)]
mod tests {
	use std::{error::Error as _, io};

	use super::{Error, ErrorCode};

	#[test]
	fn test_io_not_found_maps_to_no_such_file() {
		let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
		assert_eq!(err.code(), ErrorCode::NoSuchFile);
		assert!(err.source().is_some());

		let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
		assert_eq!(err.code(), ErrorCode::GenericFailure);
	}

	#[test]
	fn test_wrap_keeps_source() {
		let err = Error::wrap(io::Error::new(io::ErrorKind::Other, "inner"));
		assert_eq!(err.message(), "inner");
		assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("inner"));
	}
}

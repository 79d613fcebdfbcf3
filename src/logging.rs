macro_rules! trace {
	($($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		tracing::trace!($($arg)+);
	}}
}
macro_rules! debug {
	($($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		tracing::debug!($($arg)+);
	}}
}
macro_rules! info {
	($($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		tracing::info!($($arg)+);
	}}
}
macro_rules! warning {
	($($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		tracing::warn!($($arg)+);
	}}
}
macro_rules! error {
	($($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		tracing::error!($($arg)+);
	}}
}
pub(crate) use debug;
pub(crate) use error;
pub(crate) use info;
pub(crate) use trace;
pub(crate) use warning;

/// The environment variable consulted by [`default_log_filter`].
pub const LOG_ENV_VAR: &str = "MLPORT_LOG";

/// Returns the log filter directive for the `mlport` tools, read from `MLPORT_LOG`.
///
/// Accepts the plain level names `error`, `warn`/`warning`, `info`, `debug`, `trace`/`verbose`; any other non-empty
/// value is passed through as-is, so full `tracing_subscriber::EnvFilter` directives like `mlport=debug` work too.
/// Defaults to `warn`.
pub fn default_log_filter() -> String {
	match std::env::var(LOG_ENV_VAR).as_deref() {
		Ok("error") => "error".to_owned(),
		Ok("warn" | "warning") => "warn".to_owned(),
		Ok("info") => "info".to_owned(),
		Ok("debug") => "debug".to_owned(),
		Ok("trace" | "verbose") => "trace".to_owned(),
		Ok(other) if !other.trim().is_empty() => other.to_owned(),
		_ => "warn".to_owned()
	}
}

/// Installs a `tracing-subscriber` formatter writing to stderr, filtered by [`default_log_filter`].
///
/// Calling this more than once is harmless; only the first subscriber is kept.
#[cfg(feature = "cli")]
#[cfg_attr(docsrs, doc(cfg(feature = "cli")))]
pub fn init() {
	use tracing_subscriber::{EnvFilter, fmt};

	let filter = EnvFilter::try_new(default_log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

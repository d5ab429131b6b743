pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Configuration failures are fatal at startup; none of them are recoverable
/// at request time.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read the folio config at {path:?}.")]
	Read { path: std::path::PathBuf, source: std::io::Error },
	#[error("The folio config at {path:?} is not valid TOML.")]
	Toml { path: std::path::PathBuf, source: toml::de::Error },
	#[error("{message}")]
	Validation { message: String },
}

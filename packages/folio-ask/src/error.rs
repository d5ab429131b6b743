pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Content error: {message}")]
	Content { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Vector store error: {message}")]
	Vector { message: String },
	#[error("Vector retrieval returned no usable candidates.")]
	EmptyRetrieval,
	#[error("No retrieved candidate covers the queried years.")]
	TemporalMismatch,
	#[error("All answer tiers failed.")]
	TiersExhausted,
}
impl From<folio_content::Error> for Error {
	fn from(err: folio_content::Error) -> Self {
		Self::Content { message: err.to_string() }
	}
}

impl From<folio_providers::Error> for Error {
	fn from(err: folio_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<folio_storage::Error> for Error {
	fn from(err: folio_storage::Error) -> Self {
		Self::Vector { message: err.to_string() }
	}
}

use thiserror::Error;

use crate::ports::{DecodeError, StoreError};

/// Error returned by the lookup service.
///
/// Only the two query variants originate here; decoder and store failures are passed through
/// untouched so callers can still tell them apart.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("Lookup must include a valid query!")]
  InvalidQuery,

  #[error("Query parameters must include a valid Identity Key, Title, Artist Name, Song ID, or Display all!")]
  InsufficientQueryParams,

  #[error("decode error: {0}")]
  Decode(#[from] DecodeError),

  #[error("repository error: {0}")]
  Repository(#[from] StoreError),
}

impl CoreError {
  /// Stable machine-readable code, for hosts that forward errors to remote clients.
  pub fn code(&self) -> &'static str {
    match self {
      CoreError::InvalidQuery => "ERR_INVALID_QUERY",
      CoreError::InsufficientQueryParams => "ERR_INSUFFICIENT_QUERY_PARAMS",
      CoreError::Decode(_) => "ERR_DECODE",
      CoreError::Repository(_) => "ERR_REPOSITORY",
    }
  }
}

use crate::domain::{OutputRef, SongRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("record for output {0} already exists")]
  Duplicate(OutputRef),
  #[error("invalid table prefix {0:?}: only ASCII letters, digits and '_' are allowed, not starting with a digit")]
  InvalidTablePrefix(String),
  #[error("storage error: {0}")]
  Storage(String),
}

/// Persistence port for song records.
///
/// Lookups return the identities of matching outputs in insertion order; the host resolves them
/// back to full outputs on its own.
pub trait SongStore: Send + Sync {
  /// Inserts a new record. A record for the same output must be rejected with
  /// [`StoreError::Duplicate`]; existing rows are never overwritten.
  fn store_record(&self, record: &SongRecord) -> Result<(), StoreError>;

  /// Deletes the record for `output`, if any. Deleting an unknown output is not an error.
  fn delete_record(&self, output: &OutputRef) -> Result<(), StoreError>;

  fn find_by_artist_identity_key(&self, artist_identity_key: &str) -> Result<Vec<OutputRef>, StoreError>;
  fn find_by_song_title(&self, song_title: &str) -> Result<Vec<OutputRef>, StoreError>;
  fn find_by_artist_name(&self, artist_name: &str) -> Result<Vec<OutputRef>, StoreError>;

  /// Records whose song file URL is one of `song_ids`.
  fn find_by_song_ids(&self, song_ids: &[String]) -> Result<Vec<OutputRef>, StoreError>;

  fn find_all(&self) -> Result<Vec<OutputRef>, StoreError>;
}

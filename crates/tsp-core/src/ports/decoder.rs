use crate::domain::SongPayload;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
  #[error("malformed script: {0}")]
  Script(String),

  #[error("script does not start with a locking public key")]
  MissingLockingKey,

  #[error("not a pushdrop script: {0}")]
  NotPushDrop(String),

  #[error("expected {expected} fields, found {found}")]
  FieldCount { expected: usize, found: usize },

  #[error("field {field} cannot be encoded as text: {reason}")]
  Encoding { field: &'static str, reason: String },
}

/// Port that turns a locking script into the song fields it carries.
pub trait ScriptDecoder: Send + Sync {
  fn decode_song(&self, output_script: &[u8]) -> Result<SongPayload, DecodeError>;
}

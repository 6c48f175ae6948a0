use crate::domain::output::OutputRef;
use serde::{Deserialize, Serialize};

/// The song fields carried by a Tempo Song Protocol output, already rendered as text.
///
/// Produced by a [`ScriptDecoder`](crate::ports::ScriptDecoder); it has a fixed arity, so a
/// decoder that cannot fill every field has to fail rather than hand back a partial payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongPayload {
  /// Hex-encoded public key that locks the output.
  pub artist_identity_key: String,
  pub song_title: String,
  pub artist_name: String,
  pub description: String,
  pub duration: String,
  /// UHRP URL of the song file. Doubles as the song id in lookups.
  #[serde(rename = "songFileURL")]
  pub song_file_url: String,
  /// UHRP URL of the album artwork.
  #[serde(rename = "artFileURL")]
  pub art_file_url: String,
}

/// A tracked, currently unspent TSP output.
///
/// Rows are created when the output shows up and deleted when it is spent; they are never
/// updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
  pub output: OutputRef,
  #[serde(flatten)]
  pub song: SongPayload,
}

impl SongRecord {
  pub fn new(output: OutputRef, song: SongPayload) -> Self {
    Self { output, song }
  }
}

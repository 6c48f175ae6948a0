use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use tsp_core::domain::SongPayload;
use tsp_core::ports::DecodeError;

use crate::script::PushDrop;

// Field positions of a Tempo Song Protocol output.
pub const FIELD_PROTOCOL_NAMESPACE: usize = 0;
pub const FIELD_RESERVED: usize = 1;
pub const FIELD_SONG_TITLE: usize = 2;
pub const FIELD_ARTIST_NAME: usize = 3;
pub const FIELD_DESCRIPTION: usize = 4;
pub const FIELD_DURATION: usize = 5;
pub const FIELD_SONG_FILE_URL: usize = 6;
pub const FIELD_ART_FILE_URL: usize = 7;
/// Signature by the locking key over the preceding fields. Not verified here.
pub const FIELD_SIGNATURE: usize = 8;

pub const TSP_FIELD_COUNT: usize = 9;

/// How raw field bytes become the strings that get stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldEncoding {
  /// Standard base64, the format existing TSP lookup databases hold.
  #[default]
  Base64,
  /// Fields are taken as UTF-8 text; anything else is rejected.
  Utf8,
}

impl FieldEncoding {
  pub fn encode(self, field: &'static str, bytes: &[u8]) -> Result<String, DecodeError> {
    match self {
      FieldEncoding::Base64 => Ok(STANDARD.encode(bytes)),
      FieldEncoding::Utf8 => String::from_utf8(bytes.to_vec())
        .map_err(|e| DecodeError::Encoding { field, reason: e.utf8_error().to_string() }),
    }
  }
}

/// Maps the positional fields of a decoded TSP script onto a [`SongPayload`].
pub fn map_song_fields(pushdrop: &PushDrop, encoding: FieldEncoding) -> Result<SongPayload, DecodeError> {
  let fields = &pushdrop.fields;
  if fields.len() != TSP_FIELD_COUNT {
    return Err(DecodeError::FieldCount { expected: TSP_FIELD_COUNT, found: fields.len() });
  }

  let text = |index: usize, name: &'static str| encoding.encode(name, &fields[index]);

  Ok(SongPayload {
    artist_identity_key: pushdrop.locking_public_key_hex(),
    song_title: text(FIELD_SONG_TITLE, "songTitle")?,
    artist_name: text(FIELD_ARTIST_NAME, "artistName")?,
    description: text(FIELD_DESCRIPTION, "description")?,
    duration: text(FIELD_DURATION, "duration")?,
    song_file_url: text(FIELD_SONG_FILE_URL, "songFileURL")?,
    art_file_url: text(FIELD_ART_FILE_URL, "artFileURL")?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tsp_fields() -> Vec<Vec<u8>> {
    let mut fields = vec![Vec::new(); TSP_FIELD_COUNT];
    fields[FIELD_PROTOCOL_NAMESPACE] = b"1LQtKKK7c1TN3UcRfsp8SqGjWtzGskze36".to_vec();
    fields[FIELD_RESERVED] = b"1".to_vec();
    fields[FIELD_SONG_TITLE] = b"Song A".to_vec();
    fields[FIELD_ARTIST_NAME] = b"Ann".to_vec();
    fields[FIELD_DESCRIPTION] = b"first single".to_vec();
    fields[FIELD_DURATION] = b"214".to_vec();
    fields[FIELD_SONG_FILE_URL] = b"XUTsong".to_vec();
    fields[FIELD_ART_FILE_URL] = b"XUTart".to_vec();
    fields[FIELD_SIGNATURE] = vec![0x30, 0x44, 0x02];
    fields
  }

  fn pushdrop(fields: Vec<Vec<u8>>) -> PushDrop {
    PushDrop { locking_public_key: vec![0x03, 0xab], fields }
  }

  #[test]
  fn maps_positions_as_utf8() {
    let song = map_song_fields(&pushdrop(tsp_fields()), FieldEncoding::Utf8).unwrap();

    assert_eq!(song.artist_identity_key, "03ab");
    assert_eq!(song.song_title, "Song A");
    assert_eq!(song.artist_name, "Ann");
    assert_eq!(song.description, "first single");
    assert_eq!(song.duration, "214");
    assert_eq!(song.song_file_url, "XUTsong");
    assert_eq!(song.art_file_url, "XUTart");
  }

  #[test]
  fn base64_is_the_default() {
    let song = map_song_fields(&pushdrop(tsp_fields()), FieldEncoding::default()).unwrap();

    assert_eq!(song.song_title, "U29uZyBB");
    assert_eq!(song.artist_name, "QW5u");
    // the key is always hex, whatever the field encoding
    assert_eq!(song.artist_identity_key, "03ab");
  }

  #[test]
  fn wrong_field_count_is_rejected() {
    let mut short = tsp_fields();
    short.pop();
    let err = map_song_fields(&pushdrop(short), FieldEncoding::Utf8).unwrap_err();
    assert!(matches!(err, DecodeError::FieldCount { expected: 9, found: 8 }));

    let mut long = tsp_fields();
    long.push(b"extra".to_vec());
    let err = map_song_fields(&pushdrop(long), FieldEncoding::Base64).unwrap_err();
    assert!(matches!(err, DecodeError::FieldCount { expected: 9, found: 10 }));
  }

  #[test]
  fn invalid_utf8_names_the_field() {
    let mut fields = tsp_fields();
    fields[FIELD_ARTIST_NAME] = vec![0xff, 0xfe];

    let err = map_song_fields(&pushdrop(fields.clone()), FieldEncoding::Utf8).unwrap_err();
    assert!(matches!(err, DecodeError::Encoding { field: "artistName", .. }));

    assert!(map_song_fields(&pushdrop(fields), FieldEncoding::Base64).is_ok());
  }
}

use tracing::trace;

use tsp_config::ConfigError;
use tsp_core::domain::SongPayload;
use tsp_core::ports::{DecodeError, ScriptDecoder};

use crate::config::PushDropConfig;
use crate::mapping::{FieldEncoding, map_song_fields};
use crate::script::decode_pushdrop;

/// `ScriptDecoder` for Tempo Song Protocol outputs locked with a PushDrop script.
#[derive(Debug, Clone, Copy, Default)]
pub struct PushDropDecoder {
  encoding: FieldEncoding,
}

impl PushDropDecoder {
  pub fn new(encoding: FieldEncoding) -> Self {
    Self { encoding }
  }

  pub fn new_from_config() -> Result<Self, ConfigError> {
    let cfg = PushDropConfig::load()?;
    Ok(Self::new(cfg.field_encoding))
  }

  pub fn encoding(&self) -> FieldEncoding {
    self.encoding
  }
}

impl ScriptDecoder for PushDropDecoder {
  fn decode_song(&self, output_script: &[u8]) -> Result<SongPayload, DecodeError> {
    let pushdrop = decode_pushdrop(output_script)?;
    trace!(fields = pushdrop.fields.len(), "decoded pushdrop script");
    map_song_fields(&pushdrop, self.encoding)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::mapping::TSP_FIELD_COUNT;
  use crate::script::lock_script;

  const PUBKEY: [u8; 33] = [0x03; 33];

  fn tsp_script(title: &str) -> Vec<u8> {
    let fields: Vec<Vec<u8>> = vec![
      b"1LQtKKK7c1TN3UcRfsp8SqGjWtzGskze36".to_vec(),
      b"1".to_vec(),
      title.as_bytes().to_vec(),
      b"Ann".to_vec(),
      b"a song".to_vec(),
      b"180".to_vec(),
      b"XUTsong".to_vec(),
      b"XUTart".to_vec(),
      vec![0x30; 71],
    ];
    assert_eq!(fields.len(), TSP_FIELD_COUNT);
    lock_script(&PUBKEY, &fields).unwrap().to_bytes()
  }

  #[test]
  fn decodes_full_tsp_script() {
    let song = PushDropDecoder::new(FieldEncoding::Utf8).decode_song(&tsp_script("Song A")).unwrap();

    assert_eq!(song.artist_identity_key, "03".repeat(33));
    assert_eq!(song.song_title, "Song A");
    assert_eq!(song.artist_name, "Ann");
    assert_eq!(song.song_file_url, "XUTsong");
    assert_eq!(song.art_file_url, "XUTart");
  }

  #[test]
  fn default_decoder_stores_base64() {
    let decoder = PushDropDecoder::default();
    assert_eq!(decoder.encoding(), FieldEncoding::Base64);

    let song = decoder.decode_song(&tsp_script("Song A")).unwrap();
    assert_eq!(song.song_title, "U29uZyBB");
  }

  #[test]
  fn pushdrop_with_too_few_fields_fails() {
    let script = lock_script(&PUBKEY, &[b"only".to_vec(), b"two".to_vec()]).unwrap();
    let err = PushDropDecoder::default().decode_song(script.as_bytes()).unwrap_err();
    assert!(matches!(err, DecodeError::FieldCount { expected: 9, found: 2 }));
  }

  #[test]
  fn non_pushdrop_script_fails() {
    // plain P2PKH
    let mut p2pkh = vec![0x76, 0xa9, 0x14];
    p2pkh.extend([0u8; 20]);
    p2pkh.extend([0x88, 0xac]);
    assert!(PushDropDecoder::default().decode_song(&p2pkh).is_err());
  }
}

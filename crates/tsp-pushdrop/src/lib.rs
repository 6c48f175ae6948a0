pub mod config;
pub mod decoder;
pub mod mapping;
pub mod script;

pub use config::PushDropConfig;
pub use decoder::PushDropDecoder;
pub use mapping::{FieldEncoding, TSP_FIELD_COUNT, map_song_fields};
pub use script::{EncodeError, PushDrop, decode_pushdrop, lock_script};

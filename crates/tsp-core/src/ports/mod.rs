pub mod decoder;
pub mod lookup;
pub mod song_store;

pub use decoder::{DecodeError, ScriptDecoder};
pub use lookup::LookupService;
pub use song_store::{SongStore, StoreError};

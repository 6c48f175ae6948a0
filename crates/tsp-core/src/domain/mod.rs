pub mod output;
pub mod query;
pub mod song_record;

pub use output::OutputRef;
pub use query::{FindAll, LookupFilter, LookupQuery, SongIds};
pub use song_record::{SongPayload, SongRecord};

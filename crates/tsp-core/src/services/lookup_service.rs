use async_trait::async_trait;
use tracing::{debug, trace};

use crate::domain::{LookupFilter, LookupQuery, OutputRef, SongRecord};
use crate::errors::CoreError;
use crate::ports::{LookupService, ScriptDecoder, SongStore};

/// Topic under which Tempo Song Protocol outputs are admitted.
pub const TSP_TOPIC: &str = "TSP";

/// Lookup service for Tempo Song Protocol outputs.
///
/// Holds no state of its own: every notification is decoded and forwarded to the store, and
/// every lookup becomes exactly one store query.
pub struct TspLookupService<D, S>
where
  D: ScriptDecoder,
  S: SongStore,
{
  decoder: D,
  store: S,
  topic: String,
}

impl<D, S> TspLookupService<D, S>
where
  D: ScriptDecoder,
  S: SongStore,
{
  pub fn new(decoder: D, store: S) -> Self {
    Self::with_topic(decoder, store, TSP_TOPIC)
  }

  pub fn with_topic(decoder: D, store: S, topic: impl Into<String>) -> Self {
    Self { decoder, store, topic: topic.into() }
  }

  pub fn topic(&self) -> &str {
    &self.topic
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  fn tracks(&self, topic: &str) -> bool {
    topic == self.topic
  }

  fn run_filter(&self, filter: LookupFilter) -> Result<Vec<OutputRef>, CoreError> {
    let outputs = match filter {
      LookupFilter::ArtistIdentityKey(key) => self.store.find_by_artist_identity_key(&key)?,
      LookupFilter::SongTitle(title) => self.store.find_by_song_title(&title)?,
      LookupFilter::ArtistName(name) => self.store.find_by_artist_name(&name)?,
      LookupFilter::SongIds(ids) => self.store.find_by_song_ids(&ids)?,
      LookupFilter::All => self.store.find_all()?,
    };
    Ok(outputs)
  }
}

#[async_trait]
impl<D, S> LookupService for TspLookupService<D, S>
where
  D: ScriptDecoder,
  S: SongStore,
{
  async fn output_added(&self, output: OutputRef, output_script: &[u8], topic: &str) -> Result<(), CoreError> {
    if !self.tracks(topic) {
      trace!(%output, topic, "ignoring output from untracked topic");
      return Ok(());
    }

    let song = self.decoder.decode_song(output_script)?;
    let record = SongRecord::new(output, song);
    self.store.store_record(&record)?;

    debug!(output = %record.output, title = %record.song.song_title, "song output added");
    Ok(())
  }

  async fn output_spent(&self, output: &OutputRef, topic: &str) -> Result<(), CoreError> {
    if !self.tracks(topic) {
      trace!(%output, topic, "ignoring spend from untracked topic");
      return Ok(());
    }

    self.store.delete_record(output)?;

    debug!(%output, "song output spent");
    Ok(())
  }

  async fn lookup(&self, query: Option<LookupQuery>) -> Result<Vec<OutputRef>, CoreError> {
    let query = query.ok_or(CoreError::InvalidQuery)?;
    let filter = query.into_filter()?;

    debug!(filter = filter.kind(), "running lookup");
    self.run_filter(filter)
  }
}

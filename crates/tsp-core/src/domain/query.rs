use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A lookup request as clients send it.
///
/// Every field is optional; when several are set only the highest priority one is used
/// (see [`LookupQuery::into_filter`]). Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupQuery {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub artist_identity_key: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub song_title: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub artist_name: Option<String>,
  /// One song file URL or a list of them.
  #[serde(rename = "songID", skip_serializing_if = "Option::is_none")]
  pub song_id: Option<SongIds>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub find_all: Option<FindAll>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SongIds {
  One(String),
  Many(Vec<String>),
}

impl SongIds {
  fn into_vec(self) -> Vec<String> {
    match self {
      SongIds::One(id) => vec![id],
      SongIds::Many(ids) => ids,
    }
  }
}

/// `findAll` is accepted both as a JSON boolean and as the string `"true"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FindAll {
  Flag(bool),
  Text(String),
}

impl FindAll {
  pub fn is_set(&self) -> bool {
    match self {
      FindAll::Flag(flag) => *flag,
      FindAll::Text(text) => text == "true",
    }
  }
}

/// The single filter a lookup runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFilter {
  ArtistIdentityKey(String),
  SongTitle(String),
  ArtistName(String),
  /// Matches records whose song file URL is any of the given ones.
  SongIds(Vec<String>),
  All,
}

impl LookupFilter {
  pub fn kind(&self) -> &'static str {
    match self {
      LookupFilter::ArtistIdentityKey(_) => "artistIdentityKey",
      LookupFilter::SongTitle(_) => "songTitle",
      LookupFilter::ArtistName(_) => "artistName",
      LookupFilter::SongIds(_) => "songID",
      LookupFilter::All => "findAll",
    }
  }
}

impl LookupQuery {
  /// Picks the filter to run.
  ///
  /// Priority: artist identity key, song title, artist name, song id, find-all. Fails with
  /// [`CoreError::InsufficientQueryParams`] when none of them is usable.
  pub fn into_filter(self) -> Result<LookupFilter, CoreError> {
    if let Some(key) = non_empty(self.artist_identity_key) {
      return Ok(LookupFilter::ArtistIdentityKey(key));
    }
    if let Some(title) = non_empty(self.song_title) {
      return Ok(LookupFilter::SongTitle(title));
    }
    if let Some(name) = non_empty(self.artist_name) {
      return Ok(LookupFilter::ArtistName(name));
    }

    let song_ids: Vec<String> =
      self.song_id.map(SongIds::into_vec).unwrap_or_default().into_iter().filter(|id| !id.is_empty()).collect();
    if !song_ids.is_empty() {
      return Ok(LookupFilter::SongIds(song_ids));
    }

    if self.find_all.as_ref().is_some_and(FindAll::is_set) {
      return Ok(LookupFilter::All);
    }

    Err(CoreError::InsufficientQueryParams)
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}

pub mod config;
pub mod models;
pub mod schema;

use diesel::prelude::*;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::{Sqlite, SqliteConnection};
use tracing::{debug, info, warn};

use tsp_core::domain::{OutputRef, SongRecord};
use tsp_core::ports::{SongStore, StoreError};

pub use crate::config::{DEFAULT_TABLE_PREFIX, StorageConfig};
use crate::models::OutputRow;
pub use crate::schema::SongsTable;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

/// SQLite-backed [`SongStore`].
pub struct SqliteSongStore {
  pool: SqlitePool,
  table: SongsTable,
}

impl SqliteSongStore {
  /// Opens (or creates) the database at `database_url` and makes sure the songs table exists.
  pub fn new(database_url: &str, table_prefix: &str) -> Result<Self, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().build(manager).map_err(storage_error)?;
    Self::with_pool(pool, table_prefix)
  }

  /// A private in-memory database. The pool holds a single connection that is never recycled,
  /// since the data lives and dies with it.
  pub fn in_memory(table_prefix: &str) -> Result<Self, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = Pool::builder()
      .max_size(1)
      .max_lifetime(None)
      .idle_timeout(None)
      .build(manager)
      .map_err(storage_error)?;
    Self::with_pool(pool, table_prefix)
  }

  pub fn open(config: &StorageConfig) -> Result<Self, StoreError> {
    let store = Self::new(&config.db_path.to_string_lossy(), &config.table_prefix)?;
    if let Some(mode) = &config.journal_mode {
      store.set_journal_mode(mode)?;
    }
    Ok(store)
  }

  fn with_pool(pool: SqlitePool, table_prefix: &str) -> Result<Self, StoreError> {
    let table = SongsTable::with_prefix(table_prefix)?;
    let store = Self { pool, table };
    store.migrate()?;
    Ok(store)
  }

  pub fn table(&self) -> &SongsTable {
    &self.table
  }

  /// Creates the songs table and its indexes if they are missing.
  pub fn migrate(&self) -> Result<(), StoreError> {
    let mut conn = self.conn()?;
    for statement in self.table.up_sql() {
      sql_query(statement).execute(&mut *conn).map_err(storage_error)?;
    }
    info!(table = self.table.name(), "songs table ready");
    Ok(())
  }

  /// Drops the songs table with everything in it.
  pub fn drop_table(&self) -> Result<(), StoreError> {
    let mut conn = self.conn()?;
    sql_query(self.table.down_sql()).execute(&mut *conn).map_err(storage_error)?;
    info!(table = self.table.name(), "songs table dropped");
    Ok(())
  }

  fn set_journal_mode(&self, mode: &str) -> Result<(), StoreError> {
    let mode = mode.trim().to_ascii_uppercase();
    if !JOURNAL_MODES.contains(&mode.as_str()) {
      return Err(StoreError::Storage(format!("unsupported journal mode {mode:?}")));
    }

    let mut conn = self.conn()?;
    sql_query(format!("PRAGMA journal_mode = {mode}")).execute(&mut *conn).map_err(storage_error)?;
    debug!(%mode, "journal mode set");
    Ok(())
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, StoreError> {
    self.pool.get().map_err(storage_error)
  }

  fn select_where(&self, column: &'static str, value: &str) -> Result<Vec<OutputRef>, StoreError> {
    let sql = format!("SELECT txid, vout FROM {} WHERE {column} = ? ORDER BY songID", self.table.name());
    let mut conn = self.conn()?;

    let rows = sql_query(sql).bind::<Text, _>(value).load::<OutputRow>(&mut *conn).map_err(storage_error)?;

    debug!(column, matches = rows.len(), "songs selected");
    rows.into_iter().map(OutputRow::into_output).collect()
  }
}

impl SongStore for SqliteSongStore {
  fn store_record(&self, record: &SongRecord) -> Result<(), StoreError> {
    let sql = format!(
      "INSERT INTO {} (txid, vout, artistIdentityKey, songTitle, artistName, description, duration, songFileURL, artFileURL)
       VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
      self.table.name()
    );
    let song = &record.song;
    let mut conn = self.conn()?;

    let inserted = sql_query(sql)
      .bind::<Text, _>(record.output.txid.as_str())
      .bind::<BigInt, _>(i64::from(record.output.vout))
      .bind::<Text, _>(song.artist_identity_key.as_str())
      .bind::<Text, _>(song.song_title.as_str())
      .bind::<Text, _>(song.artist_name.as_str())
      .bind::<Text, _>(song.description.as_str())
      .bind::<Text, _>(song.duration.as_str())
      .bind::<Text, _>(song.song_file_url.as_str())
      .bind::<Text, _>(song.art_file_url.as_str())
      .execute(&mut *conn);

    match inserted {
      Ok(_) => {
        debug!(output = %record.output, "song stored");
        Ok(())
      }
      Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
        warn!(output = %record.output, "song already stored, keeping existing row");
        Err(StoreError::Duplicate(record.output.clone()))
      }
      Err(e) => Err(storage_error(e)),
    }
  }

  fn delete_record(&self, output: &OutputRef) -> Result<(), StoreError> {
    let sql = format!("DELETE FROM {} WHERE txid = ? AND vout = ?", self.table.name());
    let mut conn = self.conn()?;

    let deleted = sql_query(sql)
      .bind::<Text, _>(output.txid.as_str())
      .bind::<BigInt, _>(i64::from(output.vout))
      .execute(&mut *conn)
      .map_err(storage_error)?;

    debug!(%output, deleted, "song deleted");
    Ok(())
  }

  fn find_by_artist_identity_key(&self, artist_identity_key: &str) -> Result<Vec<OutputRef>, StoreError> {
    self.select_where("artistIdentityKey", artist_identity_key)
  }

  fn find_by_song_title(&self, song_title: &str) -> Result<Vec<OutputRef>, StoreError> {
    self.select_where("songTitle", song_title)
  }

  fn find_by_artist_name(&self, artist_name: &str) -> Result<Vec<OutputRef>, StoreError> {
    self.select_where("artistName", artist_name)
  }

  fn find_by_song_ids(&self, song_ids: &[String]) -> Result<Vec<OutputRef>, StoreError> {
    if song_ids.is_empty() {
      return Ok(Vec::new());
    }

    let placeholders = vec!["?"; song_ids.len()].join(", ");
    let sql =
      format!("SELECT txid, vout FROM {} WHERE songFileURL IN ({placeholders}) ORDER BY songID", self.table.name());

    let mut query: BoxedSqlQuery<'_, Sqlite, SqlQuery> = sql_query(sql).into_boxed();
    for id in song_ids {
      query = query.bind::<Text, _>(id.as_str());
    }

    let mut conn = self.conn()?;
    let rows = query.load::<OutputRow>(&mut *conn).map_err(storage_error)?;
    rows.into_iter().map(OutputRow::into_output).collect()
  }

  fn find_all(&self) -> Result<Vec<OutputRef>, StoreError> {
    let sql = format!("SELECT txid, vout FROM {} ORDER BY songID", self.table.name());
    let mut conn = self.conn()?;

    let rows = sql_query(sql).load::<OutputRow>(&mut *conn).map_err(storage_error)?;
    rows.into_iter().map(OutputRow::into_output).collect()
  }
}

fn storage_error(err: impl std::fmt::Display) -> StoreError {
  StoreError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;
  use tsp_core::domain::SongPayload;

  fn record(txid: &str, vout: u32, title: &str, artist: &str, url: &str) -> SongRecord {
    SongRecord::new(
      OutputRef::new(txid, vout),
      SongPayload {
        artist_identity_key: format!("key-{artist}"),
        song_title: title.to_string(),
        artist_name: artist.to_string(),
        description: "desc".to_string(),
        duration: "200".to_string(),
        song_file_url: url.to_string(),
        art_file_url: format!("{url}-art"),
      },
    )
  }

  fn seeded() -> SqliteSongStore {
    let store = SqliteSongStore::in_memory(DEFAULT_TABLE_PREFIX).unwrap();
    store.store_record(&record("tx1", 0, "Song A", "Ann", "uhrp-a")).unwrap();
    store.store_record(&record("tx2", 1, "Song B", "Bob", "uhrp-b")).unwrap();
    store.store_record(&record("tx3", 0, "Song C", "Ann", "uhrp-c")).unwrap();
    store
  }

  #[test]
  fn finds_by_each_field() {
    let store = seeded();

    assert_eq!(store.find_by_song_title("Song B").unwrap(), vec![OutputRef::new("tx2", 1)]);
    assert_eq!(store.find_by_artist_name("Ann").unwrap(), vec![OutputRef::new("tx1", 0), OutputRef::new("tx3", 0)]);
    assert_eq!(store.find_by_artist_identity_key("key-Bob").unwrap(), vec![OutputRef::new("tx2", 1)]);
    assert_eq!(
      store.find_by_song_ids(&["uhrp-c".to_string(), "uhrp-a".to_string(), "missing".to_string()]).unwrap(),
      vec![OutputRef::new("tx1", 0), OutputRef::new("tx3", 0)]
    );
    assert_eq!(store.find_all().unwrap().len(), 3);
  }

  #[test]
  fn matches_are_exact() {
    let store = seeded();
    assert!(store.find_by_song_title("song a").unwrap().is_empty());
    assert!(store.find_by_song_title("Song").unwrap().is_empty());
    assert!(store.find_by_song_ids(&[]).unwrap().is_empty());
  }

  #[test]
  fn delete_removes_only_that_output() {
    let store = seeded();

    store.delete_record(&OutputRef::new("tx1", 0)).unwrap();
    assert_eq!(store.find_by_artist_name("Ann").unwrap(), vec![OutputRef::new("tx3", 0)]);

    // absent rows are fine
    store.delete_record(&OutputRef::new("tx1", 0)).unwrap();
    store.delete_record(&OutputRef::new("tx2", 0)).unwrap();
    assert_eq!(store.find_all().unwrap(), vec![OutputRef::new("tx2", 1), OutputRef::new("tx3", 0)]);
  }

  #[test]
  fn duplicate_output_is_rejected_and_original_kept() {
    let store = seeded();

    let err = store.store_record(&record("tx1", 0, "Other", "Eve", "uhrp-x")).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(ref out) if *out == OutputRef::new("tx1", 0)));
    assert_eq!(store.find_by_song_title("Song A").unwrap(), vec![OutputRef::new("tx1", 0)]);
    assert!(store.find_by_song_title("Other").unwrap().is_empty());

    // same txid, other vout is a different output
    store.store_record(&record("tx1", 1, "Other", "Eve", "uhrp-x")).unwrap();
  }

  #[test]
  fn full_u32_vout_range_survives() {
    let store = SqliteSongStore::in_memory(DEFAULT_TABLE_PREFIX).unwrap();
    store.store_record(&record("tx", u32::MAX, "Big", "Ann", "uhrp")).unwrap();
    assert_eq!(store.find_all().unwrap(), vec![OutputRef::new("tx", u32::MAX)]);
  }

  #[test]
  fn file_database_persists_across_opens() {
    let tmp = tempdir().unwrap();
    let config = StorageConfig {
      db_path: tmp.path().join("tsp.db"),
      journal_mode: Some("wal".to_string()),
      table_prefix: "test_".to_string(),
    };

    {
      let store = SqliteSongStore::open(&config).unwrap();
      assert_eq!(store.table().name(), "test_songs");
      store.store_record(&record("tx1", 0, "Song A", "Ann", "uhrp-a")).unwrap();
    }

    let store = SqliteSongStore::open(&config).unwrap();
    assert_eq!(store.find_by_song_title("Song A").unwrap(), vec![OutputRef::new("tx1", 0)]);
  }

  #[test]
  fn prefixes_keep_tables_apart() {
    let tmp = tempdir().unwrap();
    let url = tmp.path().join("shared.db");
    let url = url.to_string_lossy();

    let first = SqliteSongStore::new(&url, "one_").unwrap();
    let second = SqliteSongStore::new(&url, "two_").unwrap();
    first.store_record(&record("tx1", 0, "Song A", "Ann", "uhrp-a")).unwrap();

    assert_eq!(first.find_all().unwrap().len(), 1);
    assert!(second.find_all().unwrap().is_empty());
  }

  #[test]
  fn drop_then_migrate_starts_empty() {
    let store = seeded();
    store.drop_table().unwrap();
    assert!(store.find_all().is_err());

    store.migrate().unwrap();
    assert!(store.find_all().unwrap().is_empty());
  }

  #[test]
  fn bad_config_values_are_rejected() {
    assert!(matches!(SqliteSongStore::in_memory("bad-prefix"), Err(StoreError::InvalidTablePrefix(_))));
    assert!(matches!(SqliteSongStore::in_memory("1_"), Err(StoreError::InvalidTablePrefix(_))));

    let tmp = tempdir().unwrap();
    let config = StorageConfig {
      db_path: tmp.path().join("tsp.db"),
      journal_mode: Some("wal; DROP TABLE x".to_string()),
      table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
    };
    assert!(matches!(SqliteSongStore::open(&config), Err(StoreError::Storage(_))));
  }
}

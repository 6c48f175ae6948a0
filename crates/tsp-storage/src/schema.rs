use tsp_core::ports::StoreError;

/// The songs table, `<prefix>songs`.
///
/// The name is configurable, so statements are rendered at runtime instead of going through a
/// `diesel::table!` definition. Only the prefix is ever spliced into SQL, and it is restricted
/// to `[A-Za-z0-9_]` without a leading digit, so the table and index names stay plain identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongsTable {
  name: String,
}

impl SongsTable {
  pub fn with_prefix(prefix: &str) -> Result<Self, StoreError> {
    let starts_with_digit = prefix.starts_with(|c: char| c.is_ascii_digit());
    if starts_with_digit || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
      return Err(StoreError::InvalidTablePrefix(prefix.to_string()));
    }
    Ok(Self { name: format!("{prefix}songs") })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Statements that create the table and its indexes. Safe to run on every start.
  pub fn up_sql(&self) -> Vec<String> {
    let t = &self.name;
    vec![
      format!(
        "CREATE TABLE IF NOT EXISTS {t} (
          songID INTEGER PRIMARY KEY AUTOINCREMENT,
          txid TEXT NOT NULL,
          vout INTEGER NOT NULL,
          artistIdentityKey TEXT NOT NULL,
          songTitle TEXT NOT NULL,
          artistName TEXT NOT NULL,
          description TEXT NOT NULL,
          duration TEXT NOT NULL,
          songFileURL TEXT NOT NULL,
          artFileURL TEXT NOT NULL
        )"
      ),
      format!("CREATE UNIQUE INDEX IF NOT EXISTS {t}_output_idx ON {t} (txid, vout)"),
      format!("CREATE INDEX IF NOT EXISTS {t}_artist_identity_key_idx ON {t} (artistIdentityKey)"),
      format!("CREATE INDEX IF NOT EXISTS {t}_song_title_idx ON {t} (songTitle)"),
      format!("CREATE INDEX IF NOT EXISTS {t}_artist_name_idx ON {t} (artistName)"),
      format!("CREATE INDEX IF NOT EXISTS {t}_song_file_url_idx ON {t} (songFileURL)"),
    ]
  }

  pub fn down_sql(&self) -> String {
    format!("DROP TABLE IF EXISTS {}", self.name)
  }
}

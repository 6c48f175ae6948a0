mod config;
mod infrastructure;

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::info;

use tsp_core::domain::{LookupQuery, OutputRef};
use tsp_core::errors::CoreError;
use tsp_core::ports::LookupService;
use tsp_core::services::TspLookupService;
use tsp_pushdrop::{PushDropDecoder, lock_script};
use tsp_storage::{SqliteSongStore, StorageConfig};

use crate::config::LookupConfig;
use infrastructure::logging;

/// Type alias to simplify the generic signature of the service.
type ConcreteLookupService = TspLookupService<PushDropDecoder, SqliteSongStore>;

#[derive(Debug, Parser)]
#[command(name = "tsp-lookup", version, about = "Indexes and queries Tempo Song Protocol outputs")]
pub struct Cli {
  /// SQLite database file. Overrides `[storage].db_path`.
  #[arg(long, global = true)]
  db: Option<PathBuf>,

  /// Table name prefix. Overrides `[storage].table_prefix`.
  #[arg(long, global = true)]
  table_prefix: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Report an output the host admitted.
  Add {
    #[arg(long)]
    txid: String,
    #[arg(long)]
    vout: u32,
    /// Locking script, hex encoded.
    #[arg(long)]
    script: String,
    /// Topic the output was admitted under. Defaults to the tracked topic.
    #[arg(long)]
    topic: Option<String>,
  },
  /// Report that an output was spent.
  Spend {
    #[arg(long)]
    txid: String,
    #[arg(long)]
    vout: u32,
    #[arg(long)]
    topic: Option<String>,
  },
  /// Run a lookup, e.g. `'{"songTitle":"..."}'` or `'{"findAll":true}'`.
  Lookup { query: String },
  /// Build a PushDrop locking script from UTF-8 fields.
  Encode {
    /// Locking public key, hex encoded.
    #[arg(long)]
    public_key: String,
    /// A field to push; repeat once per field, in order.
    #[arg(long = "field")]
    fields: Vec<String>,
  },
  /// Create the songs table, or drop it with `--down`.
  Migrate {
    #[arg(long)]
    down: bool,
  },
}

/// Entry point of the binary: parses arguments, wires the adapters and runs one command.
pub async fn run() -> anyhow::Result<()> {
  let cli = Cli::parse();
  logging::init();

  // --- Dependency Injection Phase ---

  // 1. Persistence adapter (SQLite), with CLI overrides on top of the config file.
  let mut storage_cfg = StorageConfig::load().context("loading [storage] config")?;
  if let Some(db) = cli.db {
    storage_cfg.db_path = db;
  }
  if let Some(prefix) = cli.table_prefix {
    storage_cfg.table_prefix = prefix;
  }
  let store = SqliteSongStore::open(&storage_cfg)?;

  // 2. Script decoder adapter (PushDrop).
  let decoder = PushDropDecoder::new_from_config().context("loading [pushdrop] config")?;

  // 3. Service wiring.
  let lookup_cfg = LookupConfig::load().context("loading [lookup] config")?;
  let service = TspLookupService::with_topic(decoder, store, lookup_cfg.topic);

  info!(db = %storage_cfg.db_path.display(), topic = service.topic(), "lookup service ready");

  let output = execute(&service, cli.command).await?;
  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

async fn execute(service: &ConcreteLookupService, command: Command) -> anyhow::Result<Value> {
  match command {
    Command::Add { txid, vout, script, topic } => {
      let script = hex::decode(script.trim()).context("script is not valid hex")?;
      let topic = topic.unwrap_or_else(|| service.topic().to_string());
      let output = OutputRef::new(txid, vout);

      service.output_added(output.clone(), &script, &topic).await.map_err(core_error)?;
      Ok(json!({ "status": "added", "output": output, "topic": topic }))
    }
    Command::Spend { txid, vout, topic } => {
      let topic = topic.unwrap_or_else(|| service.topic().to_string());
      let output = OutputRef::new(txid, vout);

      service.output_spent(&output, &topic).await.map_err(core_error)?;
      Ok(json!({ "status": "spent", "output": output, "topic": topic }))
    }
    Command::Lookup { query } => {
      let query = parse_query(&query).map_err(core_error)?;
      let outputs = service.lookup(query).await.map_err(core_error)?;
      Ok(serde_json::to_value(outputs)?)
    }
    Command::Encode { public_key, fields } => {
      let public_key = hex::decode(public_key.trim()).context("public key is not valid hex")?;
      let fields: Vec<Vec<u8>> = fields.into_iter().map(String::into_bytes).collect();

      let script = lock_script(&public_key, &fields)?;
      Ok(json!({ "script": hex::encode(script.as_bytes()) }))
    }
    Command::Migrate { down } => {
      let store = service.store();
      let status = if down {
        store.drop_table()?;
        "dropped"
      } else {
        store.migrate()?;
        "ready"
      };
      Ok(json!({ "table": store.table().name(), "status": status }))
    }
  }
}

/// Parses a raw JSON query. `null` is a request without a query object, and so is anything
/// that is not a JSON object. Inside an object, a recognized field holding the wrong type counts
/// as absent, so it falls through to the filter resolution like a missing one.
fn parse_query(raw: &str) -> Result<Option<LookupQuery>, CoreError> {
  let value: Value = serde_json::from_str(raw).map_err(|_| CoreError::InvalidQuery)?;
  let object = match value {
    Value::Null => return Ok(None),
    Value::Object(object) => object,
    _ => return Err(CoreError::InvalidQuery),
  };

  Ok(Some(LookupQuery {
    artist_identity_key: query_field(&object, "artistIdentityKey"),
    song_title: query_field(&object, "songTitle"),
    artist_name: query_field(&object, "artistName"),
    song_id: query_field(&object, "songID"),
    find_all: query_field(&object, "findAll"),
  }))
}

fn query_field<T: DeserializeOwned>(object: &Map<String, Value>, name: &str) -> Option<T> {
  object.get(name).and_then(|value| T::deserialize(value).ok())
}

fn core_error(err: CoreError) -> anyhow::Error {
  anyhow!("{}: {}", err.code(), err)
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a transaction output: the transaction id plus the output index.
///
/// Serialized as `{"txid": "...", "vout": 0}`, which is the shape lookup answers are returned in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
  pub txid: String,
  pub vout: u32,
}

impl OutputRef {
  pub fn new(txid: impl Into<String>, vout: u32) -> Self {
    Self { txid: txid.into(), vout }
  }
}

impl fmt::Display for OutputRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.txid, self.vout)
  }
}

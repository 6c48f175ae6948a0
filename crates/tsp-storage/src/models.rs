use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};

use tsp_core::domain::OutputRef;
use tsp_core::ports::StoreError;

/// `(txid, vout)` as selected by every lookup query.
#[derive(Debug, QueryableByName)]
pub struct OutputRow {
  #[diesel(sql_type = Text)]
  pub txid: String,
  #[diesel(sql_type = BigInt)]
  pub vout: i64,
}

impl OutputRow {
  pub fn into_output(self) -> Result<OutputRef, StoreError> {
    let vout = u32::try_from(self.vout)
      .map_err(|_| StoreError::Storage(format!("stored vout {} for {} is out of range", self.vout, self.txid)))?;
    Ok(OutputRef { txid: self.txid, vout })
  }
}

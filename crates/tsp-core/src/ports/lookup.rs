use async_trait::async_trait;

use crate::domain::{LookupQuery, OutputRef};
use crate::errors::CoreError;

/// Interface the transaction-indexing host drives.
///
/// The host reports every output it admits or sees spent, together with the topic it was
/// admitted under, and forwards client lookups.
#[async_trait]
pub trait LookupService: Send + Sync {
  async fn output_added(&self, output: OutputRef, output_script: &[u8], topic: &str) -> Result<(), CoreError>;

  async fn output_spent(&self, output: &OutputRef, topic: &str) -> Result<(), CoreError>;

  /// `None` stands for a request that carried no query object at all.
  async fn lookup(&self, query: Option<LookupQuery>) -> Result<Vec<OutputRef>, CoreError>;
}

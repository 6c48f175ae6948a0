#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tsp_lookup_lib::run().await
}

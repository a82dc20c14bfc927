use anyhow::Result;
use common::{init_tracing, load_config, price_flow};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    // read-only: no approval, no transaction
    let cfg = load_config()?;
    price_flow(&cfg).await?;
    Ok(())
}

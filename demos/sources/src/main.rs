use anyhow::Result;
use common::{init_tracing, load_config, sources_flow};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;
    sources_flow(&cfg).await?;
    Ok(())
}

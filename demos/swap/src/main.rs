// demos/swap/src/main.rs

use anyhow::Result;
use common::{init_tracing, load_config, swap_flow};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // Load .env (PRIVATE_KEY, ZERO_EX_API_KEY, ALCHEMY_HTTP_TRANSPORT_URL)
    let cfg = load_config()?;

    // Price, approve if needed, quote, sign the permit and send
    swap_flow(&cfg).await?;

    Ok(())
}

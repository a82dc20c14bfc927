// common/src/lib.rs
pub mod aggregator;
pub mod amount;
pub mod chain;
pub mod config;
pub mod error;
pub mod logging;
pub mod permit;
pub mod report;
pub mod scroll;
pub mod workflow;

use anyhow::Result;
use tracing::info;

pub use aggregator::{SwapApi, ZeroExClient};
pub use chain::{ChainClient, SwapWallet};
pub use config::{load_config, Config};
pub use error::{ConfigError, SwapError};
pub use logging::init_tracing;
pub use workflow::{run_swap, SwapOutcome, SwapRequest};

/// The demo pair: WETH → wstETH on Scroll, sized and monetized from config.
pub fn weth_to_wsteth(cfg: &Config) -> SwapRequest {
    SwapRequest {
        sell_token: scroll::WETH,
        buy_token: scroll::WSTETH,
        sell_amount: cfg.sell_amount.clone(),
        affiliate_fee_bps: cfg.affiliate_fee_bps,
        surplus_collection: cfg.surplus_collection,
    }
}

// ─────────────────── Sources Flow (/swap/v1/sources) ───────────────────

pub async fn sources_flow(cfg: &Config) -> Result<()> {
    let api = ZeroExClient::new(cfg)?;
    workflow::list_sources(&api, scroll::CHAIN_ID).await?;
    Ok(())
}

// ─────────────────── Price Flow (/swap/permit2/price, read-only) ───────────────────

pub async fn price_flow(cfg: &Config) -> Result<()> {
    let api = ZeroExClient::new(cfg)?;
    let wallet = ChainClient::connect(cfg, scroll::CHAIN_ID)?;
    let req = weth_to_wsteth(cfg);

    let params = workflow::build_params(&wallet, &req).await?;
    let price = api.price(&params).await?;

    info!(
        sell_amount = price.sell_amount.as_deref().unwrap_or("-"),
        buy_amount = price.buy_amount.as_deref().unwrap_or("-"),
        "indicative price for {} WETH -> wstETH",
        req.sell_amount
    );
    match &price.issues.allowance {
        Some(issue) => info!(spender = %issue.spender, "allowance required before swapping"),
        None => info!("WETH is already approved for Permit2"),
    }
    Ok(())
}

// ─────────────────── Swap Flow (price -> approve -> quote -> permit2 -> send) ───────────────────

pub async fn swap_flow(cfg: &Config) -> Result<SwapOutcome> {
    let api = ZeroExClient::new(cfg)?;
    let wallet = ChainClient::connect(cfg, scroll::CHAIN_ID)?;
    let req = weth_to_wsteth(cfg);

    info!("retrieving price to swap {} WETH for wstETH", req.sell_amount);
    let outcome = run_swap(&api, &wallet, &req).await?;
    info!("View transaction details at {}", scroll::explorer_link(&outcome.tx_hash));
    Ok(outcome)
}

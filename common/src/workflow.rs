//! The swap sequence: sources → price → allowance → quote → permit → submit.
//! Every step is awaited before the next one starts.

use crate::aggregator::{PriceResponse, QuoteResponse, SwapApi, SwapParams};
use crate::amount::parse_units;
use crate::chain::{SwapTransaction, SwapWallet};
use crate::error::SwapError;
use crate::permit::splice_signature;
use crate::report;
use alloy::primitives::{Address, B256};
use anyhow::{Context as _, Result};
use tracing::{debug, error, info};

/// What to sell, what to buy, and the monetization options.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub sell_token: Address,
    pub buy_token: Address,
    /// Human units of the sell token.
    pub sell_amount: String,
    pub affiliate_fee_bps: u32,
    pub surplus_collection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub tx_hash: B256,
    pub approval: Option<B256>,
}

pub async fn list_sources<A: SwapApi + ?Sized>(api: &A, chain_id: u64) -> Result<Vec<String>> {
    let names = api.sources(chain_id).await?.sources.names();
    info!(chain_id, "available liquidity sources: {}", names.join(", "));
    Ok(names)
}

/// Resolve the sell amount on chain and build the query shared by price and quote.
pub async fn build_params<W: SwapWallet + ?Sized>(wallet: &W, req: &SwapRequest) -> Result<SwapParams> {
    let decimals = wallet.decimals(req.sell_token).await?;
    let sell_amount = parse_units(&req.sell_amount, decimals)
        .with_context(|| format!("parse sell amount {:?}", req.sell_amount))?;
    Ok(SwapParams {
        chain_id: wallet.chain_id(),
        sell_token: req.sell_token,
        buy_token: req.buy_token,
        sell_amount: sell_amount.to_string(),
        taker: wallet.address(),
        affiliate_fee: req.affiliate_fee_bps,
        surplus_collection: req.surplus_collection,
    })
}

/// Approve the spender named by the price response, if any. Approval failures abort.
pub async fn ensure_allowance<W: SwapWallet + ?Sized>(
    wallet: &W,
    token: Address,
    price: &PriceResponse,
) -> Result<Option<B256>> {
    let Some(issue) = &price.issues.allowance else {
        info!(%token, "sell token already approved");
        return Ok(None);
    };
    info!(%token, spender = %issue.spender, "granting max allowance");
    let hash = wallet
        .approve_max(token, issue.spender)
        .await
        .with_context(|| format!("approve {} for {token}", issue.spender))?;
    info!(tx = %hash, "allowance confirmed");
    Ok(Some(hash))
}

/// Sign the quote's permit and splice it into the calldata.
///
/// Fails rather than returning an unsigned transaction.
pub async fn prepare_transaction<W: SwapWallet + ?Sized>(
    wallet: &W,
    quote: &QuoteResponse,
) -> Result<SwapTransaction> {
    let Some(typed) = quote.permit2.as_ref().and_then(|p| p.eip712.as_ref()) else {
        return Err(SwapError::MissingPermit.into());
    };

    let signature = wallet.sign_typed_data(typed).await.map_err(|e| {
        error!("error signing permit2 message: {e:#}");
        SwapError::MissingSignature
    })?;
    info!("permit2 message signed");

    let Some(tx) = &quote.transaction else {
        return Err(SwapError::MissingTransactionData.into());
    };
    let Some(data) = tx.data.as_ref().filter(|d| !d.is_empty()) else {
        return Err(SwapError::MissingTransactionData.into());
    };

    let spliced = splice_signature(data, &signature.as_bytes());
    SwapTransaction::from_quote(tx, spliced)
}

/// Run the whole sequence and broadcast one swap transaction.
pub async fn run_swap<A, W>(api: &A, wallet: &W, req: &SwapRequest) -> Result<SwapOutcome>
where
    A: SwapApi + ?Sized,
    W: SwapWallet + ?Sized,
{
    list_sources(api, wallet.chain_id()).await?;

    let params = build_params(wallet, req).await?;
    info!(
        sell_token = %params.sell_token,
        buy_token = %params.buy_token,
        sell_amount = %params.sell_amount,
        "fetching price"
    );
    let price = api.price(&params).await?;
    debug!(?price, "price response");
    if let Some(buy) = &price.buy_amount {
        info!(buy_amount = %buy, "indicative price");
    }

    let approval = ensure_allowance(wallet, params.sell_token, &price).await?;

    let quote = api.quote(&params).await?;
    debug!(?quote, "quote response");
    for line in report::quote_summary(&quote) {
        info!("{line}");
    }

    let tx = prepare_transaction(wallet, &quote).await?;
    let tx_hash = wallet.submit(tx).await?;
    info!(tx = %tx_hash, "swap transaction sent");
    Ok(SwapOutcome { tx_hash, approval })
}

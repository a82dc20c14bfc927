use crate::amount::parse_u256_dec;
use crate::config::Config;
use crate::aggregator::QuoteTransaction;
use crate::error::SwapError;
use alloy::{
    consensus::{SignableTransaction as _, TxEnvelope, TxLegacy},
    dyn_abi::TypedData,
    eips::eip2718::Encodable2718 as _,
    network::{EthereumWallet, ReceiptResponse as _, TransactionBuilder as _},
    primitives::{Address, Bytes, Signature, TxKind, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::{local::PrivateKeySigner, SignerSync as _},
    sol,
    sol_types::SolCall as _,
};
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret as _;
use std::str::FromStr as _;
use std::time::Duration;
use tracing::{debug, info};

const APPROVAL_TIMEOUT: Duration = Duration::from_secs(120);

sol! {
    #[sol(rpc)]
    contract IERC20 {
        function decimals() external view returns (uint8);
        function approve(address spender, uint256 value) returns (bool);
    }
}

/// A settlement call ready to sign: quote fields parsed, signature already spliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: Option<U256>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
}

impl SwapTransaction {
    /// Absent numeric fields stay `None`; present ones must be decimal integers.
    pub fn from_quote(tx: &QuoteTransaction, data: Bytes) -> Result<Self> {
        let value = tx
            .value
            .as_deref()
            .map(parse_u256_dec)
            .transpose()
            .context("parse transaction value")?;
        let gas = tx
            .gas
            .as_deref()
            .map(|g| parse_u256_dec(g).and_then(|v| u64::try_from(v).context("gas exceeds u64")))
            .transpose()
            .context("parse transaction gas")?;
        let gas_price = tx
            .gas_price
            .as_deref()
            .map(|g| {
                parse_u256_dec(g).and_then(|v| u128::try_from(v).context("gas price exceeds u128"))
            })
            .transpose()
            .context("parse transaction gasPrice")?;
        Ok(Self {
            to: tx.to,
            data,
            value,
            gas,
            gas_price,
        })
    }
}

/// The chain operations the workflow depends on.
#[async_trait]
pub trait SwapWallet {
    fn address(&self) -> Address;
    fn chain_id(&self) -> u64;
    async fn decimals(&self, token: Address) -> Result<u8>;
    /// Approve `U256::MAX` and wait for one confirmation.
    async fn approve_max(&self, token: Address, spender: Address) -> Result<B256>;
    async fn sign_typed_data(&self, data: &TypedData) -> Result<Signature>;
    /// Fetch the nonce, sign, and broadcast. Returns the transaction hash.
    async fn submit(&self, tx: SwapTransaction) -> Result<B256>;
}

// ─────────────────── RPC-backed client ───────────────────

pub struct ChainClient {
    signer: PrivateKeySigner,
    provider: DynProvider,
    chain_id: u64,
}

/// `approve(spender, type(uint256).max)` on `token`, sent from `from`.
pub fn build_max_approve(from: Address, token: Address, spender: Address) -> TransactionRequest {
    let calldata = IERC20::approveCall {
        spender,
        value: U256::MAX,
    }
    .abi_encode();
    TransactionRequest::default()
        .with_from(from)
        .with_to(token)
        .with_input(Bytes::from(calldata))
}

/// A mined approval counts only if its receipt reports success.
pub fn ensure_approved(status: bool, tx_hash: B256) -> Result<B256, SwapError> {
    if status {
        Ok(tx_hash)
    } else {
        Err(SwapError::ApprovalReverted(tx_hash))
    }
}

impl ChainClient {
    /// Bind one account to one chain over one HTTP transport. Makes no network calls.
    pub fn connect(cfg: &Config, chain_id: u64) -> Result<Self> {
        let key = cfg.private_key.expose_secret();
        let signer = PrivateKeySigner::from_str(key.trim_start_matches("0x"))
            .context("parse PRIVATE_KEY")?;
        let url: reqwest::Url = cfg
            .rpc_url
            .expose_secret()
            .parse()
            .context("parse ALCHEMY_HTTP_TRANSPORT_URL")?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(url)
            .erased();
        Ok(Self {
            signer,
            provider,
            chain_id,
        })
    }

    /// Pending nonce, plus gas price and gas limit from the node when the quote left them out.
    async fn fill_legacy(&self, tx: &SwapTransaction) -> Result<TxLegacy> {
        let from = self.signer.address();
        let nonce = self
            .provider
            .get_transaction_count(from)
            .pending()
            .await
            .context("get nonce")?;

        let gas_price = match tx.gas_price {
            Some(p) => p,
            None => self.provider.get_gas_price().await.context("get gas price")?,
        };
        let gas_limit = match tx.gas {
            Some(g) => g,
            None => {
                let req = TransactionRequest::default()
                    .with_from(from)
                    .with_to(tx.to)
                    .with_input(tx.data.clone())
                    .with_value(tx.value.unwrap_or_default());
                self.provider.estimate_gas(req).await.context("estimate gas")?
            }
        };

        Ok(TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(tx.to),
            value: tx.value.unwrap_or_default(),
            input: tx.data.clone(),
        })
    }

    fn sign_legacy(&self, tx: TxLegacy) -> Result<(Vec<u8>, B256)> {
        let sig = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .context("sign transaction")?;
        let signed = tx.into_signed(sig);
        let hash = *signed.hash();
        Ok((TxEnvelope::Legacy(signed).encoded_2718(), hash))
    }
}

#[async_trait]
impl SwapWallet for ChainClient {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        IERC20::new(token, &self.provider)
            .decimals()
            .call()
            .await
            .context("erc20 decimals")
    }

    async fn approve_max(&self, token: Address, spender: Address) -> Result<B256> {
        let req = build_max_approve(self.signer.address(), token, spender);
        let pending = self
            .provider
            .send_transaction(req)
            .await
            .context("send approve")?;
        info!(tx = %pending.tx_hash(), %spender, "approval sent, waiting for confirmation");
        let receipt = pending
            .with_required_confirmations(1)
            .with_timeout(Some(APPROVAL_TIMEOUT))
            .get_receipt()
            .await
            .context("wait for approval receipt")?;
        Ok(ensure_approved(receipt.status(), receipt.transaction_hash)?)
    }

    async fn sign_typed_data(&self, data: &TypedData) -> Result<Signature> {
        let hash = data
            .eip712_signing_hash()
            .context("hash eip712 message")?;
        self.signer
            .sign_hash_sync(&hash)
            .context("sign eip712 message")
    }

    async fn submit(&self, tx: SwapTransaction) -> Result<B256> {
        let legacy = self.fill_legacy(&tx).await?;
        debug!(
            nonce = legacy.nonce,
            gas_limit = legacy.gas_limit,
            gas_price = legacy.gas_price,
            "signing swap transaction"
        );
        let (raw, hash) = self.sign_legacy(legacy)?;

        self.provider
            .send_raw_transaction(&raw)
            .await
            .context("broadcast raw transaction")?;
        Ok(hash)
    }
}

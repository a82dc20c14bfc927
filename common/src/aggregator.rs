use crate::config::Config;
use alloy::dyn_abi::TypedData;
use alloy::primitives::Address;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tracing::info;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const SOURCES_PATH: &str = "/swap/v1/sources";
const PRICE_PATH: &str = "/swap/permit2/price";
const QUOTE_PATH: &str = "/swap/permit2/quote";

// ─────────────────── Request parameters ───────────────────

/// Query shared by `/price` and `/quote`. Built once; the quote reuses it as-is.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub chain_id: u64,
    pub sell_token: Address,
    pub buy_token: Address,
    /// Base units, decimal string.
    pub sell_amount: String,
    pub taker: Address,
    /// Affiliate fee in basis points.
    pub affiliate_fee: u32,
    pub surplus_collection: bool,
}

// ─────────────────── Responses ───────────────────

#[derive(Deserialize, Debug)]
pub struct SourcesResponse {
    pub sources: SourceList,
}

/// v1 returns an object keyed by source name, v2 a plain list.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum SourceList {
    Names(Vec<String>),
    Keyed(BTreeMap<String, serde_json::Value>),
}

impl SourceList {
    /// Distinct source names, sorted.
    pub fn names(&self) -> Vec<String> {
        let set: BTreeSet<&String> = match self {
            SourceList::Names(v) => v.iter().collect(),
            SourceList::Keyed(m) => m.keys().collect(),
        };
        set.into_iter().cloned().collect()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    #[serde(default)]
    pub buy_amount: Option<String>,
    #[serde(default)]
    pub sell_amount: Option<String>,
    #[serde(default)]
    pub issues: Issues,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

#[derive(Deserialize, Debug, Default)]
pub struct Issues {
    /// `null` when the spender is already authorized.
    #[serde(default)]
    pub allowance: Option<AllowanceIssue>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AllowanceIssue {
    #[serde(default)]
    pub actual: Option<String>,
    pub spender: Address,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(default)]
    pub buy_amount: Option<String>,
    #[serde(default)]
    pub transaction: Option<QuoteTransaction>,
    #[serde(default)]
    pub permit2: Option<Permit2>,
    #[serde(default)]
    pub route: Option<Route>,
    #[serde(default)]
    pub token_metadata: Option<TokenMetadata>,
    #[serde(default)]
    pub affiliate_fee_bps: Option<String>,
    #[serde(default)]
    pub trade_surplus: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Unsigned settlement call. Numeric fields are decimal strings.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTransaction {
    pub to: Address,
    #[serde(default)]
    pub data: Option<alloy::primitives::Bytes>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub gas: Option<String>,
    #[serde(default)]
    pub gas_price: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Permit2 {
    pub eip712: Option<TypedData>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Route {
    #[serde(default)]
    pub fills: Vec<Fill>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub source: String,
    pub proportion_bps: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub buy_token: TokenTax,
    pub sell_token: TokenTax,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TokenTax {
    #[serde(default)]
    pub buy_tax_bps: Option<String>,
    #[serde(default)]
    pub sell_tax_bps: Option<String>,
}

// ─────────────────── Client ───────────────────

/// The aggregator calls the workflow depends on.
#[async_trait]
pub trait SwapApi {
    async fn sources(&self, chain_id: u64) -> Result<SourcesResponse>;
    async fn price(&self, params: &SwapParams) -> Result<PriceResponse>;
    async fn quote(&self, params: &SwapParams) -> Result<QuoteResponse>;
}

trait ZeroExReqExt {
    fn with_zeroex_headers(self, api_key: &SecretString) -> Self;
}

/// Attach the API key and pin the v2 API.
impl ZeroExReqExt for reqwest::RequestBuilder {
    fn with_zeroex_headers(self, api_key: &SecretString) -> Self {
        self.header("0x-api-key", api_key.expose_secret())
            .header("0x-version", "v2")
    }
}

pub fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .build()
        .context("build http client")
}

pub struct ZeroExClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
}

impl ZeroExClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: cfg.api_url.clone(),
            api_key: SecretString::from(cfg.api_key.expose_secret().to_owned()),
        })
    }

    /// Full request URL, logged per call. Carries no credentials.
    fn url<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Url> {
        let base = Url::parse(&format!("{}{path}", self.base_url))
            .with_context(|| format!("invalid aggregator url: {}", self.base_url))?;
        let req = self.http.get(base).query(query).build().context("encode query")?;
        Ok(req.url().clone())
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned + Send,
        Q: Serialize + ?Sized + Sync,
    {
        let url = self.url(path, query)?;
        info!(%url, "aggregator call");
        self.http
            .get(url)
            .with_zeroex_headers(&self.api_key)
            .send()
            .await
            .with_context(|| format!("{path} request"))?
            .error_for_status()
            .with_context(|| format!("{path} status"))?
            .json()
            .await
            .with_context(|| format!("{path} json"))
    }
}

#[async_trait]
impl SwapApi for ZeroExClient {
    async fn sources(&self, chain_id: u64) -> Result<SourcesResponse> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Query {
            chain_id: u64,
        }
        self.get_json(SOURCES_PATH, &Query { chain_id }).await
    }

    async fn price(&self, params: &SwapParams) -> Result<PriceResponse> {
        self.get_json(PRICE_PATH, params).await
    }

    async fn quote(&self, params: &SwapParams) -> Result<QuoteResponse> {
        self.get_json(QUOTE_PATH, params).await
    }
}

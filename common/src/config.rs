use crate::error::ConfigError;
use dotenv::dotenv;
use secrecy::SecretString;
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.0x.org";
pub const DEFAULT_SELL_AMOUNT: &str = "0.1";
pub const DEFAULT_AFFILIATE_FEE_BPS: u32 = 100;

// ─────────────────── Configuration ───────────────────

/// Everything one run needs, read once at startup and passed down explicitly.
#[derive(Debug)]
pub struct Config {
    /// Hex private key, with or without `0x`.
    pub private_key: SecretString,
    pub api_key: SecretString,
    /// Provider URLs carry their API key in the path.
    pub rpc_url: SecretString,
    pub api_url: String,
    /// Human units of the sell token, e.g. `0.1`.
    pub sell_amount: String,
    pub affiliate_fee_bps: u32,
    pub surplus_collection: bool,
}

impl Config {
    /// Build a config from any key lookup. Required keys are checked first so a
    /// missing secret is always reported before anything else.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let private_key = get("PRIVATE_KEY").ok_or(ConfigError::Missing("PRIVATE_KEY"))?;
        let api_key = get("ZERO_EX_API_KEY").ok_or(ConfigError::Missing("ZERO_EX_API_KEY"))?;
        let rpc_url = get("ALCHEMY_HTTP_TRANSPORT_URL")
            .ok_or(ConfigError::Missing("ALCHEMY_HTTP_TRANSPORT_URL"))?;

        let api_url = get("ZERO_EX_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let sell_amount = get("SELL_AMOUNT").unwrap_or_else(|| DEFAULT_SELL_AMOUNT.to_owned());

        let affiliate_fee_bps = match get("AFFILIATE_FEE_BPS") {
            Some(v) => parse_bps(&v)?,
            None => DEFAULT_AFFILIATE_FEE_BPS,
        };
        let surplus_collection = match get("SURPLUS_COLLECTION") {
            Some(v) => parse_flag("SURPLUS_COLLECTION", &v)?,
            None => true,
        };

        Ok(Self {
            private_key: SecretString::from(private_key),
            api_key: SecretString::from(api_key),
            rpc_url: SecretString::from(rpc_url),
            api_url,
            sell_amount,
            affiliate_fee_bps,
            surplus_collection,
        })
    }
}

/// Load .env (if any) and read the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenv().ok();
    Config::from_lookup(|key| env::var(key).ok())
}

fn parse_bps(v: &str) -> Result<u32, ConfigError> {
    let bps: u32 = v.parse().map_err(|e| ConfigError::Invalid {
        key: "AFFILIATE_FEE_BPS",
        reason: format!("{e}"),
    })?;
    if bps > 10_000 {
        return Err(ConfigError::Invalid {
            key: "AFFILIATE_FEE_BPS",
            reason: format!("{bps} exceeds 10000 bps"),
        });
    }
    Ok(bps)
}

fn parse_flag(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("expected true/false, got {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret as _;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |k| map.get(k).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("PRIVATE_KEY", "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"),
        ("ZERO_EX_API_KEY", "test-key"),
        ("ALCHEMY_HTTP_TRANSPORT_URL", "https://scroll-mainnet.g.alchemy.com/v2/alchemy-secret"),
    ];

    #[test]
    fn defaults_apply_when_optional_values_absent() {
        let cfg = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.sell_amount, "0.1");
        assert_eq!(cfg.affiliate_fee_bps, 100);
        assert!(cfg.surplus_collection);
        assert_eq!(cfg.api_key.expose_secret(), "test-key");
    }

    #[test]
    fn missing_rpc_url_is_reported_by_name() {
        let err = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("ALCHEMY_HTTP_TRANSPORT_URL")));
        assert!(err.to_string().contains("ALCHEMY_HTTP_TRANSPORT_URL"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("PRIVATE_KEY", "   ");
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("PRIVATE_KEY")));
    }

    #[test]
    fn optional_overrides_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("ZERO_EX_API_URL", "http://localhost:8080/"),
            ("AFFILIATE_FEE_BPS", "25"),
            ("SURPLUS_COLLECTION", "false"),
            ("SELL_AMOUNT", "1.5"),
        ]);
        let cfg = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:8080");
        assert_eq!(cfg.affiliate_fee_bps, 25);
        assert!(!cfg.surplus_collection);
        assert_eq!(cfg.sell_amount, "1.5");
    }

    #[test]
    fn out_of_range_fee_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AFFILIATE_FEE_BPS", "10001"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "AFFILIATE_FEE_BPS", .. }));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let cfg = Config::from_lookup(lookup(&REQUIRED)).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("ac0974bec39a17e3"));
        assert!(!dbg.contains("test-key"));
        assert!(!dbg.contains("alchemy-secret"));
        assert_eq!(
            cfg.rpc_url.expose_secret(),
            "https://scroll-mainnet.g.alchemy.com/v2/alchemy-secret"
        );
    }
}

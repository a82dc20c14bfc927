use alloy::primitives::U256;
use anyhow::{anyhow, bail, Context as _, Result};

/// Convert a human decimal amount (`"0.1"`) into token base units without floats.
pub fn parse_units(s: &str, decimals: u8) -> Result<U256> {
    let s = s.trim();
    if s.is_empty() {
        bail!("empty amount");
    }
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.starts_with('-') {
        bail!("amount must be non-negative");
    }
    if frac.len() > usize::from(decimals) {
        bail!("too many decimal places for token (decimals={decimals})");
    }
    if whole.is_empty() && frac.is_empty() {
        bail!("amount has no digits");
    }

    let whole_v = if whole.is_empty() {
        U256::ZERO
    } else {
        parse_u256_dec(whole).context("parse whole part")?
    };
    let frac_v = if frac.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{frac:0<width$}", width = usize::from(decimals));
        parse_u256_dec(&padded).context("parse fractional part")?
    };

    let scale = U256::from(10u8)
        .checked_pow(U256::from(decimals))
        .ok_or_else(|| anyhow!("decimals too large"))?;
    whole_v
        .checked_mul(scale)
        .and_then(|x| x.checked_add(frac_v))
        .ok_or_else(|| anyhow!("amount overflow"))
}

/// Parse a base-10 integer string as returned by the aggregator.
pub fn parse_u256_dec(s: &str) -> Result<U256> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        bail!("not a decimal integer: {s:?}");
    }
    U256::from_str_radix(s, 10).with_context(|| format!("parse u256 {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenth_of_weth_in_wei() {
        let v = parse_units("0.1", 18).unwrap();
        assert_eq!(v, U256::from(100_000_000_000_000_000u128));
        assert_eq!(v.to_string(), "100000000000000000");
    }

    #[test]
    fn whole_and_leading_dot_amounts() {
        assert_eq!(parse_units("2", 6).unwrap(), U256::from(2_000_000u64));
        assert_eq!(parse_units(".5", 6).unwrap(), U256::from(500_000u64));
        assert_eq!(parse_units("1.", 6).unwrap(), U256::from(1_000_000u64));
    }

    #[test]
    fn rejects_excess_precision_and_junk() {
        assert!(parse_units("0.0000001", 6).is_err());
        assert!(parse_units("-1", 18).is_err());
        assert!(parse_units("1e18", 18).is_err());
        assert!(parse_units(".", 18).is_err());
        assert!(parse_units("", 18).is_err());
    }

    #[test]
    fn large_values_do_not_lose_precision() {
        let v = parse_u256_dec("115792089237316195423570985008687907853269984665640564039457584007913129639935")
            .unwrap();
        assert_eq!(v, U256::MAX);
        assert!(parse_u256_dec("0x10").is_err());
    }
}

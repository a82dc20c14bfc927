//! Console summaries of a fetched quote. Pure functions returning lines.

use crate::aggregator::{Fill, QuoteResponse, Route, TokenMetadata, TokenTax};
use crate::amount::parse_u256_dec;

/// `100` → `"1.00"`. Integer arithmetic, so shares add up exactly.
pub fn bps_to_percent(bps: u64) -> String {
    format!("{}.{:02}", bps / 100, bps % 100)
}

fn parse_bps(s: Option<&str>) -> u64 {
    s.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// `(source, proportion_bps)` per fill, in route order. Unparseable shares count as zero.
pub fn fill_shares(fills: &[Fill]) -> Vec<(&str, u64)> {
    fills
        .iter()
        .map(|f| (f.source.as_str(), parse_bps(Some(f.proportion_bps.as_str()))))
        .collect()
}

pub fn liquidity_breakdown(route: &Route) -> Vec<String> {
    let mut lines = vec![format!("{} Sources", route.fills.len())];
    lines.extend(
        fill_shares(&route.fills)
            .into_iter()
            .map(|(source, bps)| format!("{source}: {}%", bps_to_percent(bps))),
    );
    lines
}

fn tax_pair(label: &str, tax: &TokenTax) -> Vec<String> {
    let buy = parse_bps(tax.buy_tax_bps.as_deref());
    let sell = parse_bps(tax.sell_tax_bps.as_deref());
    if buy == 0 && sell == 0 {
        return Vec::new();
    }
    vec![
        format!("{label} Buy Tax: {}%", bps_to_percent(buy)),
        format!("{label} Sell Tax: {}%", bps_to_percent(sell)),
    ]
}

pub fn token_taxes(meta: &TokenMetadata) -> Vec<String> {
    let mut lines = tax_pair("Buy Token", &meta.buy_token);
    lines.extend(tax_pair("Sell Token", &meta.sell_token));
    lines
}

pub fn monetization(quote: &QuoteResponse) -> Vec<String> {
    let mut lines = Vec::new();
    let fee = parse_bps(quote.affiliate_fee_bps.as_deref());
    if fee > 0 {
        lines.push(format!("Affiliate Fee: {}%", bps_to_percent(fee)));
    }
    if let Some(surplus) = quote.trade_surplus.as_deref() {
        if parse_u256_dec(surplus).is_ok_and(|v| !v.is_zero()) {
            lines.push(format!("Trade Surplus Collected: {}", surplus.trim()));
        }
    }
    lines
}

/// Route shares, then taxes, then monetization.
pub fn quote_summary(quote: &QuoteResponse) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(route) = &quote.route {
        lines.extend(liquidity_breakdown(route));
    }
    if let Some(meta) = &quote.token_metadata {
        lines.extend(token_taxes(meta));
    }
    lines.extend(monetization(quote));
    lines
}

//! Scroll mainnet constants used by the demos.

use alloy::primitives::{address, Address, B256};

pub const CHAIN_ID: u64 = 534_352;

/// Wrapped ether on Scroll (predeploy).
pub const WETH: Address = address!("5300000000000000000000000000000000000004");

/// Lido wrapped staked ether on Scroll.
pub const WSTETH: Address = address!("f610a9dfb7c89644979b4a0f27063e9e7d7cda32");

pub const EXPLORER_TX_URL: &str = "https://scrollscan.com/tx/";

pub fn explorer_link(hash: &B256) -> String {
    format!("{EXPLORER_TX_URL}{hash}")
}

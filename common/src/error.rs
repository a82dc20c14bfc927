use alloy::primitives::B256;
use thiserror::Error;

/// Startup failures. Raised before any network call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is missing: set it in the environment or in .env")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Conditions that leave the swap transaction unsendable.
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("quote carried no permit2 message; transaction not sent")]
    MissingPermit,

    #[error("could not obtain a permit2 signature; transaction not sent")]
    MissingSignature,

    #[error("quote carried no transaction data; transaction not sent")]
    MissingTransactionData,

    #[error("approval transaction {0} reverted")]
    ApprovalReverted(B256),

    #[error("spliced payload is malformed: {0}")]
    MalformedPayload(&'static str),
}

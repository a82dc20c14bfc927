//! Appending a Permit2 signature to 0x settlement calldata.
//!
//! The settler contract reads the signature from the tail of the calldata:
//! `data ++ uint256(len(sig)) ++ sig`, with the length as a 32-byte big-endian word.

use crate::error::SwapError;
use alloy::primitives::{Bytes, U256};

const LENGTH_WORD: usize = 32;

pub fn splice_signature(data: &[u8], signature: &[u8]) -> Bytes {
    let len_word = U256::from(signature.len()).to_be_bytes::<LENGTH_WORD>();
    let mut out = Vec::with_capacity(data.len() + LENGTH_WORD + signature.len());
    out.extend_from_slice(data);
    out.extend_from_slice(&len_word);
    out.extend_from_slice(signature);
    Bytes::from(out)
}

/// Split a spliced payload back into `(original, signature)`.
///
/// `sig_len` is the signature length the caller expects; the length word in the
/// payload must agree with it.
pub fn unsplice_signature(payload: &[u8], sig_len: usize) -> Result<(&[u8], &[u8]), SwapError> {
    let tail = LENGTH_WORD + sig_len;
    if payload.len() < tail {
        return Err(SwapError::MalformedPayload("payload shorter than signature tail"));
    }
    let (original, rest) = payload.split_at(payload.len() - tail);
    let (len_word, signature) = rest.split_at(LENGTH_WORD);
    let declared = U256::from_be_slice(len_word);
    if declared != U256::from(sig_len) {
        return Err(SwapError::MalformedPayload("length word does not match signature"));
    }
    Ok((original, signature))
}

//! Stateless session token codec.
//!
//! A token is `base64url(json(payload)) + "." + base64url(hmac_sha256(secret, body))`,
//! unpadded. Only integrity is protected; the payload is readable by anyone holding it.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("invalid signing key")]
    Key,
}

/// Serializes `payload` and signs it with `secret`.
pub fn sign<T: Serialize>(payload: &T, secret: &str) -> Result<String, TokenError> {
    let json = serde_json::to_string(payload)?;
    let body = URL_SAFE_NO_PAD.encode(json.as_bytes());
    let mac = mac_over(&body, secret).ok_or(TokenError::Key)?;
    let sig = URL_SAFE_NO_PAD.encode(mac);
    Ok(format!("{body}.{sig}"))
}

/// Checks that `token` was produced by [`sign`] with the same `secret`.
pub fn verify(token: &str, secret: &str) -> bool {
    let Some((body, sig)) = token.split_once('.') else {
        return false;
    };
    if body.is_empty() || sig.is_empty() {
        return false;
    }

    let Some(expected) = mac_over(body, secret) else {
        return false;
    };
    let Some(given) = decode_base64url(sig) else {
        return false;
    };

    // Length mismatch fails before any byte comparison.
    if given.len() != expected.len() {
        return false;
    }
    expected.as_slice().ct_eq(&given).into()
}

fn mac_over(body: &str, secret: &str) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body.as_bytes());
    Some(mac.finalize().into_bytes().to_vec())
}

// Reverses the url-safe substitution and restores padding before decoding.
fn decode_base64url(value: &str) -> Option<Vec<u8>> {
    let mut standard: String = value
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }
    STANDARD.decode(standard).ok()
}

use std::fmt::Write;

use marquee_core::{AppError, AppResult};
use sha2::{Digest, Sha256};

/// Generates a random bearer token and its SHA-256 digest.
///
/// Returns `(raw_token_hex, sha256_hash_hex)`.
pub(super) fn generate_token() -> AppResult<(String, String)> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes)
        .map_err(|error| AppError::Internal(format!("failed to generate token: {error}")))?;

    let raw_token = to_hex(&bytes);
    let hash = hash_token(&raw_token);
    Ok((raw_token, hash))
}

/// Computes the storage digest of a raw token.
pub(super) fn hash_token(raw_token: &str) -> String {
    let digest = Sha256::digest(raw_token.as_bytes());
    to_hex(&digest)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}

#[cfg(test)]
mod tests {
    use marquee_core::AppResult;

    use super::{generate_token, hash_token};

    #[test]
    fn generated_tokens_hash_to_their_digest() -> AppResult<()> {
        let (raw, hash) = generate_token()?;
        assert_eq!(raw.len(), 64);
        assert_eq!(hash_token(&raw), hash);
        assert_ne!(raw, hash);
        Ok(())
    }
}

//! Session tokens
//!
//! The bearer token is only ever shown to the client. The database keeps its
//! SHA-256, plus an HMAC of the user's password hash so that changing the
//! password invalidates older sessions.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_PREFIX: &str = "nb-";

/// Generate a random bearer token
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("{}{}", TOKEN_PREFIX, hex::encode(bytes))
}

/// Hash a bearer token for storage and lookup
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// HMAC-SHA256 of a password hash, hex encoded
pub fn session_auth_hash(secret_key: &str, password_hash: &str) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())?;
    mac.update(password_hash.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of a stored auth hash against the current password hash
pub fn verify_session_auth_hash(secret_key: &str, password_hash: &str, stored: &str) -> bool {
    let Ok(expected) = hex::decode(stored) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret_key.as_bytes()) else {
        tracing::error!("Invalid session secret key");
        return false;
    };
    mac.update(password_hash.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

use base64::{engine::general_purpose, Engine as _};
use rand::{thread_rng, Rng};

/// Generates a cryptographically secure bearer token secret with 256 bits of
/// entropy.
///
/// The secret is formatted as `gb-{base64url_encoded_random_bytes}` where the
/// random bytes are 32 bytes of cryptographically secure random data.
pub fn generate_token_secret() -> String {
    // Generate 32 bytes (256 bits) of cryptographically secure random data
    let mut key_bytes = [0u8; 32];
    thread_rng().fill(&mut key_bytes);

    format!("gb-{}", general_purpose::URL_SAFE_NO_PAD.encode(key_bytes))
}

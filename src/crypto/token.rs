use rand::RngCore;
use rand::rngs::OsRng;
use base64::{Engine as _, engine::general_purpose};

/// The size of an access token in bytes.
const ACCESS_TOKEN_SIZE: usize = 32;

/// Generates a new random bearer token.
///
/// # Returns
///
/// A URL-safe base64-encoded access token.
pub fn generate_access_token() -> String {
    let mut token = [0u8; ACCESS_TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    general_purpose::URL_SAFE_NO_PAD.encode(token)
}

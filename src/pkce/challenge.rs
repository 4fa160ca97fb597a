// S256 code challenge
use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};

use crate::models::CodeChallenge;

/// SHA-256 of the verifier's UTF-8 bytes, base64url-encoded without padding.
///
/// URL_SAFE_NO_PAD is the standard base64 output with `+` -> `-`, `/` -> `_`
/// and `=` stripped (RFC 7636 appendix A).
pub fn create_code_challenge(verifier: &str) -> CodeChallenge {
    let hash = Sha256::digest(verifier.as_bytes());
    CodeChallenge::new_unchecked(general_purpose::URL_SAFE_NO_PAD.encode(hash))
}

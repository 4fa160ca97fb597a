//! PKCE (RFC 7636) verifier generation and S256 challenge derivation.
pub mod challenge;
pub mod verifier;

pub use challenge::create_code_challenge;
pub use verifier::{clamp_length, create_code_verifier, VerifierGenerator};

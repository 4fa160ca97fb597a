use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pkce::verifier::{is_alphabet_char, MAX_LENGTH, MIN_LENGTH};

/// How random bytes are turned into alphabet characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharMapping {
    /// `byte % 66`. Slightly biased since 256 is not a multiple of 66.
    #[default]
    Modulo,
    /// Discard bytes >= 198 before reducing, giving a uniform distribution.
    Rejection,
}

/// Correction applied to an out-of-range length request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthAdjustment {
    Raised { requested: i64 },
    Lowered { requested: i64 },
}

impl LengthAdjustment {
    pub fn requested(&self) -> i64 {
        match self {
            LengthAdjustment::Raised { requested } | LengthAdjustment::Lowered { requested } => *requested,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedLength {
    pub length: usize,
    pub adjustment: Option<LengthAdjustment>,
}

/// A PKCE code verifier: 43..=128 characters from `A-Z a-z 0-9 - . _ ~`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CodeVerifier(String);

impl CodeVerifier {
    /// Wrap a string produced by the generator. Caller guarantees the invariants.
    pub(crate) fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    /// Validate a caller-supplied verifier.
    pub fn parse(s: &str) -> Result<Self> {
        let len = s.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&len) {
            bail!(
                "code verifier must be {}..={} characters long, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                len
            );
        }
        if let Some((pos, c)) = s.chars().enumerate().find(|(_, c)| !is_alphabet_char(*c)) {
            bail!("code verifier contains invalid character {:?} at position {}", c, pos);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn challenge(&self) -> CodeChallenge {
        crate::pkce::challenge::create_code_challenge(self.as_str())
    }
}

impl fmt::Display for CodeVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// S256 code challenge derived from a verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CodeChallenge(String);

impl CodeChallenge {
    pub(crate) fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `code_challenge_method` value to send alongside this challenge.
    pub fn method(&self) -> &'static str {
        "S256"
    }
}

impl fmt::Display for CodeChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a generation request.
#[derive(Debug, Clone)]
pub struct Generated {
    pub verifier: CodeVerifier,
    pub adjustment: Option<LengthAdjustment>,
}

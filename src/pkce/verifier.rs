use anyhow::{Context, Result};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use tracing::{debug, warn};

use crate::models::{CharMapping, ClampedLength, CodeVerifier, Generated, LengthAdjustment};

// ref: https://datatracker.ietf.org/doc/html/rfc7636#section-4.1
pub const MIN_LENGTH: usize = 43;
pub const MAX_LENGTH: usize = 128;
pub const DEFAULT_LENGTH: i64 = 43;

/// Unreserved characters allowed in a code verifier.
pub const ALPHABET: &[u8; 66] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

// Largest multiple of 66 that fits in a byte.
const REJECTION_LIMIT: u8 = 198;

pub fn is_alphabet_char(c: char) -> bool {
    c.is_ascii() && ALPHABET.contains(&(c as u8))
}

fn map_byte(b: u8) -> char {
    ALPHABET[b as usize % ALPHABET.len()] as char
}

/// Clamp a requested verifier length into `MIN_LENGTH..=MAX_LENGTH`.
pub fn clamp_length(digits: i64) -> ClampedLength {
    if digits < MIN_LENGTH as i64 {
        ClampedLength {
            length: MIN_LENGTH,
            adjustment: Some(LengthAdjustment::Raised { requested: digits }),
        }
    } else if digits > MAX_LENGTH as i64 {
        ClampedLength {
            length: MAX_LENGTH,
            adjustment: Some(LengthAdjustment::Lowered { requested: digits }),
        }
    } else {
        ClampedLength { length: digits as usize, adjustment: None }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VerifierGenerator {
    mapping: CharMapping,
}

impl VerifierGenerator {
    pub fn new(mapping: CharMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> CharMapping {
        self.mapping
    }

    /// Generate a verifier from the operating system CSPRNG.
    pub fn generate(&self, digits: i64) -> Result<Generated> {
        self.generate_with(&mut OsRng, digits)
    }

    /// Generate a verifier from the given random source.
    ///
    /// A failing source is an error: no verifier is produced from partial or
    /// missing entropy.
    pub fn generate_with<R: RngCore + CryptoRng>(&self, rng: &mut R, digits: i64) -> Result<Generated> {
        let ClampedLength { length, adjustment } = clamp_length(digits);
        let s = match self.mapping {
            CharMapping::Modulo => modulo_sample(rng, length)?,
            CharMapping::Rejection => rejection_sample(rng, length)?,
        };
        debug!(length, mapping = ?self.mapping, "generated code verifier");
        Ok(Generated { verifier: CodeVerifier::new_unchecked(s), adjustment })
    }
}

fn modulo_sample<R: RngCore>(rng: &mut R, length: usize) -> Result<String> {
    let mut buf = vec![0u8; length];
    rng.try_fill_bytes(&mut buf)
        .context("reading from the random source")?;
    Ok(buf.into_iter().map(map_byte).collect())
}

fn rejection_sample<R: RngCore>(rng: &mut R, length: usize) -> Result<String> {
    let mut out = String::with_capacity(length);
    let mut buf = [0u8; 64];
    while out.len() < length {
        rng.try_fill_bytes(&mut buf)
            .context("reading from the random source")?;
        for &b in buf.iter().filter(|&&b| b < REJECTION_LIMIT) {
            if out.len() == length {
                break;
            }
            out.push(map_byte(b));
        }
    }
    Ok(out)
}

/// Generate a verifier with the default mapping, logging a warning when the
/// requested length had to be corrected.
pub fn create_code_verifier(digits: i64) -> Result<CodeVerifier> {
    let generated = VerifierGenerator::default().generate(digits)?;
    if let Some(adj) = generated.adjustment {
        log_adjustment(&adj, generated.verifier.len());
    }
    Ok(generated.verifier)
}

pub fn log_adjustment(adj: &LengthAdjustment, length: usize) {
    match adj {
        LengthAdjustment::Raised { requested } => {
            warn!("create_code_verifier: insufficient digits given ({}). change the digits to {}", requested, length)
        }
        LengthAdjustment::Lowered { requested } => {
            warn!("create_code_verifier: excessive digits given ({}). change the digits to {}", requested, length)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// Yields the given bytes in a cycle.
    struct SequenceRng {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl SequenceRng {
        fn new(bytes: &[u8]) -> Self {
            Self { bytes: bytes.to_vec(), pos: 0 }
        }
    }

    impl RngCore for SequenceRng {
        fn next_u32(&mut self) -> u32 {
            let mut b = [0u8; 4];
            self.fill_bytes(&mut b);
            u32::from_le_bytes(b)
        }
        fn next_u64(&mut self) -> u64 {
            let mut b = [0u8; 8];
            self.fill_bytes(&mut b);
            u64::from_le_bytes(b)
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for d in dest.iter_mut() {
                *d = self.bytes[self.pos % self.bytes.len()];
                self.pos += 1;
            }
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for SequenceRng {}

    #[test]
    fn alphabet_has_66_unique_chars() {
        let mut sorted = ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 66);
        assert!(is_alphabet_char('Z'));
        assert!(is_alphabet_char('~'));
        assert!(!is_alphabet_char('+'));
        assert!(!is_alphabet_char('é'));
    }

    #[test]
    fn clamp_boundaries() {
        assert_eq!(clamp_length(10).length, 43);
        assert_eq!(clamp_length(10).adjustment, Some(LengthAdjustment::Raised { requested: 10 }));
        assert_eq!(clamp_length(500).length, 128);
        assert_eq!(clamp_length(500).adjustment, Some(LengthAdjustment::Lowered { requested: 500 }));
        assert_eq!(clamp_length(43), ClampedLength { length: 43, adjustment: None });
        assert_eq!(clamp_length(128), ClampedLength { length: 128, adjustment: None });
        assert_eq!(clamp_length(-1).length, 43);
    }

    #[test]
    fn modulo_maps_bytes() {
        // 0 -> 'A', 65 -> '~', 66 -> 'A', 255 % 66 = 57 -> '5'
        let mut rng = SequenceRng::new(&[0, 65, 66, 255]);
        let g = VerifierGenerator::new(CharMapping::Modulo)
            .generate_with(&mut rng, 43)
            .unwrap();
        assert!(g.verifier.as_str().starts_with("A~A5A~A5"));
        assert_eq!(g.verifier.len(), 43);
    }

    #[test]
    fn rejection_skips_high_bytes() {
        let mut rng = SequenceRng::new(&[200, 1, 255, 197]);
        let g = VerifierGenerator::new(CharMapping::Rejection)
            .generate_with(&mut rng, 50)
            .unwrap();
        // 197 % 66 = 65 -> '~'
        assert!(g.verifier.as_str().starts_with("B~B~"));
        assert_eq!(g.verifier.len(), 50);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let gen = VerifierGenerator::default();
        let a = gen.generate_with(&mut StdRng::seed_from_u64(7), 64).unwrap();
        let b = gen.generate_with(&mut StdRng::seed_from_u64(7), 64).unwrap();
        assert_eq!(a.verifier, b.verifier);
    }

    #[test]
    fn create_code_verifier_clamps() {
        assert_eq!(create_code_verifier(0).unwrap().len(), 43);
        assert_eq!(create_code_verifier(1000).unwrap().len(), 128);
    }
}

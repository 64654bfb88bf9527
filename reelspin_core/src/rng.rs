use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

// Digits are decorative: sources only promise independent uniform draws from 0..=9.

pub type HmacSha256 = Hmac<Sha256>;

/// Supplies one target digit per reel.
pub trait DigitSource {
    /// Called once per spin, before any digit of that spin is drawn.
    fn begin_spin(&mut self, _reel_count: usize) {}

    fn next_digit(&mut self) -> u8;
}

impl std::fmt::Debug for dyn DigitSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DigitSource")
    }
}

/// Draws from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandDigits<R> {
    rng: R,
}

impl<R: Rng> RandDigits<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandDigits<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> DigitSource for RandDigits<R> {
    fn next_digit(&mut self) -> u8 {
        self.rng.gen_range(0..10)
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

/// Maps successive 4-byte chunks to floats in [0,1), stretching the buffer by
/// re-hashing when it runs out.
pub fn derive_floats(bytes: &[u8], count: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(count);
    let mut buffer = bytes.to_vec();
    let mut i = 0usize;
    while out.len() < count {
        if i + 4 > buffer.len() {
            buffer = Sha256::digest(&buffer).to_vec();
            i = 0;
            continue;
        }
        let v = u32::from_be_bytes([buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]);
        out.push(v as f64 / (u32::MAX as f64 + 1.0));
        i += 4;
    }
    out
}

/// Replayable digits: HMAC-SHA256 keyed by `seed` over `"{tag}:{nonce}"`.
///
/// The nonce advances once per spin, so the same seed and tag reproduce the
/// same run of outcomes.
#[derive(Debug, Clone)]
pub struct SeededDigits {
    seed: String,
    tag: String,
    nonce: u64,
    pending: Vec<u8>,
}

impl SeededDigits {
    pub fn new(seed: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            tag: tag.into(),
            nonce: 0,
            pending: Vec::new(),
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn seed_hash_hex(&self) -> String {
        derive_hash_hex(self.seed.as_bytes())
    }

    pub fn hmac_bytes(&self, nonce: u64) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.seed.as_bytes()).expect("HMAC key");
        mac.update(format!("{}:{}", self.tag, nonce).as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    /// The digits a spin over `count` reels draws at `nonce`.
    pub fn digits_at(&self, nonce: u64, count: usize) -> Vec<u8> {
        derive_floats(&self.hmac_bytes(nonce), count)
            .into_iter()
            .map(|f| ((f * 10.0).floor() as u8).min(9))
            .collect()
    }
}

impl DigitSource for SeededDigits {
    fn begin_spin(&mut self, reel_count: usize) {
        self.nonce += 1;
        let mut digits = self.digits_at(self.nonce, reel_count);
        digits.reverse();
        self.pending = digits;
    }

    fn next_digit(&mut self) -> u8 {
        match self.pending.pop() {
            Some(d) => d,
            // Drawn without begin_spin: take a fresh nonce for a single digit.
            None => {
                self.nonce += 1;
                self.digits_at(self.nonce, 1)[0]
            }
        }
    }
}

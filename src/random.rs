// This file is part of Wordpass.
//
// Copyright (c) 2025  René Coignard <contact@renecoignard.com>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::error::{Error, Result};
use blake2::{Blake2b512, Digest};
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use zeroize::Zeroizing;

const KEY_LEN: usize = 32;
const BUFFER_LEN: usize = 512;
const RANGE: u64 = 1 << 32;

/// Source of uniformly distributed 32-bit values.
///
/// Everything else is derived from `next_u32`, so test doubles only need
/// to provide that.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform index in `0..bound` using unbiased rejection sampling.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero or does not fit in a `u32`.
    fn below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be positive");
        let bound = bound as u64;
        assert!(bound <= u64::from(u32::MAX), "bound must fit in u32");

        let rejection_threshold = RANGE - (RANGE % bound);

        loop {
            let value = u64::from(self.next_u32());
            if value < rejection_threshold {
                return (value % bound) as usize;
            }
        }
    }

    fn coin(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }
}

/// ChaCha20 keystream used as a random byte source.
///
/// The same key always yields the same sequence.
pub struct KeystreamRng {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl KeystreamRng {
    pub fn from_seed(key: &[u8; KEY_LEN]) -> Self {
        let mut cipher = ChaCha20::new(key.into(), &[0u8; 12].into());
        let mut buffer = Zeroizing::new(vec![0u8; BUFFER_LEN]);
        cipher.apply_keystream(&mut buffer);

        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }

    /// Keys the stream with the first half of a BLAKE2b-512 digest of `phrase`.
    pub fn from_phrase(phrase: &str) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(phrase.as_bytes());
        let digest = Zeroizing::new(hasher.finalize().to_vec());

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(&digest[..KEY_LEN]);
        Self::from_seed(&key)
    }

    pub fn from_entropy() -> Result<Self> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        getrandom::fill(&mut key[..]).map_err(|e| Error::Entropy(e.to_string()))?;
        Ok(Self::from_seed(&key))
    }

    fn refill(&mut self) {
        self.buffer.fill(0);
        self.cipher.apply_keystream(&mut self.buffer);
        self.pos = 0;
    }
}

impl RandomSource for KeystreamRng {
    fn next_u32(&mut self) -> u32 {
        if self.pos + 4 > self.buffer.len() {
            self.refill();
        }

        let bytes = [
            self.buffer[self.pos],
            self.buffer[self.pos + 1],
            self.buffer[self.pos + 2],
            self.buffer[self.pos + 3],
        ];
        self.pos += 4;
        u32::from_le_bytes(bytes)
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
#[cfg(test)]
pub(crate) struct SequenceRng {
    values: Vec<u32>,
    pos: usize,
}

#[cfg(test)]
impl SequenceRng {
    pub(crate) fn new(values: Vec<u32>) -> Self {
        assert!(!values.is_empty());
        Self { values, pos: 0 }
    }
}

#[cfg(test)]
impl RandomSource for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystream_deterministic() {
        let key = [42u8; 32];
        let mut first = KeystreamRng::from_seed(&key);
        let mut second = KeystreamRng::from_seed(&key);

        for _ in 0..1000 {
            assert_eq!(first.next_u32(), second.next_u32());
        }
    }

    #[test]
    fn test_keystream_different_keys_differ() {
        let mut first = KeystreamRng::from_seed(&[1u8; 32]);
        let mut second = KeystreamRng::from_seed(&[2u8; 32]);

        let a: Vec<u32> = (0..8).map(|_| first.next_u32()).collect();
        let b: Vec<u32> = (0..8).map(|_| second.next_u32()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_keystream_continues_past_buffer() {
        let mut rng = KeystreamRng::from_seed(&[7u8; 32]);
        let values: Vec<u32> = (0..(BUFFER_LEN / 4) * 3).map(|_| rng.next_u32()).collect();

        let head = &values[..BUFFER_LEN / 4];
        let next = &values[BUFFER_LEN / 4..BUFFER_LEN / 2];
        assert_ne!(head, next, "Refill must advance the keystream");
    }

    #[test]
    fn test_phrase_seed_deterministic() {
        let mut first = KeystreamRng::from_phrase("life out of balance");
        let mut second = KeystreamRng::from_phrase("life out of balance");
        let mut other = KeystreamRng::from_phrase("life in balance");

        let a: Vec<u32> = (0..16).map(|_| first.next_u32()).collect();
        let b: Vec<u32> = (0..16).map(|_| second.next_u32()).collect();
        let c: Vec<u32> = (0..16).map(|_| other.next_u32()).collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_entropy_seeded_streams_differ() {
        let mut first = KeystreamRng::from_entropy().unwrap();
        let mut second = KeystreamRng::from_entropy().unwrap();

        let a: Vec<u32> = (0..8).map(|_| first.next_u32()).collect();
        let b: Vec<u32> = (0..8).map(|_| second.next_u32()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = KeystreamRng::from_seed(&[42u8; 32]);

        for bound in [1usize, 2, 3, 10, 27, 7776] {
            for _ in 0..500 {
                let value = rng.below(bound);
                assert!(value < bound, "{} out of range for bound {}", value, bound);
            }
        }
    }

    #[test]
    fn test_below_rejects_biased_tail() {
        // 2^32 % 10 == 6, so the top six values are rejected.
        let mut rng = SequenceRng::new(vec![u32::MAX, u32::MAX - 5, u32::MAX - 6, 13]);

        assert_eq!(rng.below(10), (u32::MAX - 6) as usize % 10);
        assert_eq!(rng.below(10), 3);
    }

    #[test]
    fn test_below_covers_all_values() {
        let mut rng = KeystreamRng::from_seed(&[3u8; 32]);
        let mut seen = [false; 10];

        for _ in 0..1000 {
            seen[rng.below(10)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    #[should_panic(expected = "bound must be positive")]
    fn test_below_zero_bound() {
        let mut rng = SequenceRng::new(vec![0]);
        rng.below(0);
    }

    #[test]
    fn test_coin_uses_low_bit() {
        let mut rng = SequenceRng::new(vec![0, 1, 2, 3]);
        assert!(!rng.coin());
        assert!(rng.coin());
        assert!(!rng.coin());
        assert!(rng.coin());
    }
}

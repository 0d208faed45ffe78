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

//! Passphrase composition.
//!
//! Words are drawn uniformly *without* replacement: a repeated index is
//! rejected and drawn again, so a tier needing `k` words fails with
//! [`Error::Generation`] when the word set holds fewer than `k` entries.
//! Delimiters go only between adjacent words, never before the first or
//! after the last.

use crate::error::{Error, Result};
use crate::random::{KeystreamRng, RandomSource};
use crate::tier::{Casing, Delimiters, PolicyTable, Tier, TierPolicy};
use crate::wordlist::WordSet;
use std::sync::Arc;
use zeroize::Zeroizing;

pub struct Composer {
    words: Arc<WordSet>,
    policies: PolicyTable,
}

impl Composer {
    pub fn new(words: Arc<WordSet>, policies: PolicyTable) -> Result<Self> {
        for tier in Tier::ALL {
            let policy = policies.policy(tier);
            let empty_charset = matches!(policy.delimiters, Delimiters::RandomFrom(set) if set.is_empty());
            if policy.word_count == 0 || empty_charset {
                return Err(Error::InvalidPolicy(tier));
            }
        }

        Ok(Self { words, policies })
    }

    pub fn words(&self) -> &WordSet {
        &self.words
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn generate<R>(&self, tier: Tier, rng: &mut R) -> Result<Zeroizing<String>>
    where
        R: RandomSource + ?Sized,
    {
        let policy = self.policies.policy(tier);
        let picked = self.sample_words(policy.word_count, rng)?;

        let mut passphrase = Zeroizing::new(String::with_capacity(picked.len() * 11));

        for (i, word) in picked.iter().enumerate() {
            if i > 0
                && let Delimiters::RandomFrom(set) = policy.delimiters
            {
                passphrase.push(set[rng.below(set.len())]);
            }

            match policy.casing {
                Casing::RandomPerWord if rng.coin() => push_title_case(&mut passphrase, word),
                _ => passphrase.push_str(word),
            }
        }

        Ok(passphrase)
    }

    /// Parses a selector such as `"strong"` and generates for that tier.
    pub fn generate_for<R>(&self, selector: &str, rng: &mut R) -> Result<Zeroizing<String>>
    where
        R: RandomSource + ?Sized,
    {
        let tier: Tier = selector.parse()?;
        self.generate(tier, rng)
    }

    /// Generates with a fresh OS-seeded keystream.
    pub fn generate_secure(&self, tier: Tier) -> Result<Zeroizing<String>> {
        let mut rng = KeystreamRng::from_entropy()?;
        self.generate(tier, &mut rng)
    }

    /// Estimated entropy in bits, or `None` if the word set is too small for the tier.
    pub fn entropy_bits(&self, tier: Tier) -> Option<f64> {
        policy_entropy(self.policies.policy(tier), self.words.len())
    }

    fn sample_words<R>(&self, count: usize, rng: &mut R) -> Result<Vec<&str>>
    where
        R: RandomSource + ?Sized,
    {
        let available = self.words.len();
        if count > available {
            return Err(Error::Generation {
                requested: count,
                available,
            });
        }

        let mut indices: Vec<usize> = Vec::with_capacity(count);
        while indices.len() < count {
            let index = rng.below(available);
            if !indices.contains(&index) {
                indices.push(index);
            }
        }

        indices
            .into_iter()
            .map(|index| {
                self.words.get(index).ok_or(Error::Generation {
                    requested: count,
                    available,
                })
            })
            .collect()
    }
}

fn push_title_case(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

fn policy_entropy(policy: &TierPolicy, wordlist_size: usize) -> Option<f64> {
    let k = policy.word_count;
    if k > wordlist_size {
        return None;
    }

    let words: f64 = (0..k).map(|i| ((wordlist_size - i) as f64).log2()).sum();

    let casing = match policy.casing {
        Casing::Lower => 0.0,
        Casing::RandomPerWord => k as f64,
    };

    let delimiters = match policy.delimiters {
        Delimiters::None => 0.0,
        Delimiters::RandomFrom(set) => (k - 1) as f64 * (set.len() as f64).log2(),
    };

    Some(words + casing + delimiters)
}

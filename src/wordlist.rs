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
use std::collections::BTreeSet;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

pub const DEFAULT_MIN_LENGTH: usize = 4;
pub const DEFAULT_MAX_LENGTH: usize = 10;

/// Characters a word may consist of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharClass {
    /// `a` to `z` only.
    #[default]
    AsciiLowercase,
    /// Any lowercase letter, after NFC normalization.
    Alphabetic,
}

impl CharClass {
    pub fn admits(self, c: char) -> bool {
        match self {
            CharClass::AsciiLowercase => c.is_ascii_lowercase(),
            CharClass::Alphabetic => c.is_alphabetic() && !c.is_uppercase(),
        }
    }
}

/// How a candidate word is cut out of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// The whole line is the candidate.
    #[default]
    Plain,
    /// Dice lists such as `11111\tabacus`; the last field is the candidate.
    Diceware,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordlistConstraints {
    pub char_class: CharClass,
    pub min_length: usize,
    pub max_length: usize,
    pub format: LineFormat,
}

impl WordlistConstraints {
    pub const DEFAULT: Self = Self {
        char_class: CharClass::AsciiLowercase,
        min_length: DEFAULT_MIN_LENGTH,
        max_length: DEFAULT_MAX_LENGTH,
        format: LineFormat::Plain,
    };

    fn validate(&self) -> Result<()> {
        if self.min_length == 0 || self.min_length > self.max_length {
            return Err(Error::InvalidLengthBounds {
                min: self.min_length,
                max: self.max_length,
            });
        }
        Ok(())
    }

    fn candidate<'a>(&self, line: &'a str) -> Option<&'a str> {
        let trimmed = line.trim();
        match self.format {
            LineFormat::Plain => Some(trimmed),
            LineFormat::Diceware => trimmed.split_whitespace().last(),
        }
    }

    fn admit(&self, candidate: &str) -> Option<String> {
        let word: String = candidate.nfc().collect::<String>().to_lowercase();
        let length = word.chars().count();

        if length < self.min_length || length > self.max_length {
            return None;
        }
        if !word.chars().all(|c| self.char_class.admits(c)) {
            return None;
        }
        Some(word)
    }
}

impl Default for WordlistConstraints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Deduplicated, non-empty set of admissible words.
///
/// Words are kept in sorted order so that a given index always maps to the
/// same word, which keeps seeded generation reproducible across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSet {
    words: Vec<String>,
}

impl WordSet {
    pub fn from_lines<I, S>(lines: I, constraints: &WordlistConstraints) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        constraints.validate()?;

        let mut seen = 0usize;
        let words: BTreeSet<String> = lines
            .into_iter()
            .inspect(|_| seen += 1)
            .filter_map(|line| {
                constraints
                    .candidate(line.as_ref())
                    .and_then(|candidate| constraints.admit(candidate))
            })
            .collect();

        tracing::debug!(lines = seen, words = words.len(), "filtered wordlist");

        if words.is_empty() {
            return Err(Error::EmptyWordlist);
        }

        Ok(Self {
            words: words.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words
            .binary_search_by(|probe| probe.as_str().cmp(word))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

pub fn load_wordlist(path: impl AsRef<Path>, constraints: &WordlistConstraints) -> Result<WordSet> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path).map_err(|source| Error::WordlistLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let words = WordSet::from_lines(data.lines(), constraints)?;
    tracing::info!(path = %path.display(), words = words.len(), "wordlist loaded");
    Ok(words)
}

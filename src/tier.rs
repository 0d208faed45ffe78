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

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

pub const DIGITS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

pub const SYMBOLS_AND_DIGITS: &[char] = &[
    '!', '$', '%', '^', '&', '*', '-', '_', '+', '=', ':', '|', '~', '?', '/', '.', ';', '0', '1',
    '2', '3', '4', '5', '6', '7', '8', '9',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Weak,
    Normal,
    Strong,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Weak, Tier::Normal, Tier::Strong];

    /// Selector string used on the wire (button payloads, CLI values).
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Weak => "weak",
            Tier::Normal => "normal",
            Tier::Strong => "strong",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownTier(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// Words are used exactly as stored (lower-case).
    Lower,
    /// Each word independently stays lower-case or becomes title-case.
    RandomPerWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiters {
    /// Words are concatenated directly.
    None,
    /// One character between each adjacent pair, drawn uniformly from the set.
    RandomFrom(&'static [char]),
}

impl Delimiters {
    pub fn charset_size(self) -> usize {
        match self {
            Delimiters::None => 0,
            Delimiters::RandomFrom(set) => set.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    pub word_count: usize,
    pub casing: Casing,
    pub delimiters: Delimiters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyTable {
    pub weak: TierPolicy,
    pub normal: TierPolicy,
    pub strong: TierPolicy,
}

impl PolicyTable {
    pub const STANDARD: Self = Self {
        weak: TierPolicy {
            word_count: 2,
            casing: Casing::Lower,
            delimiters: Delimiters::None,
        },
        normal: TierPolicy {
            word_count: 3,
            casing: Casing::RandomPerWord,
            delimiters: Delimiters::RandomFrom(DIGITS),
        },
        strong: TierPolicy {
            word_count: 4,
            casing: Casing::RandomPerWord,
            delimiters: Delimiters::RandomFrom(SYMBOLS_AND_DIGITS),
        },
    };

    pub fn policy(&self, tier: Tier) -> &TierPolicy {
        match tier {
            Tier::Weak => &self.weak,
            Tier::Normal => &self.normal,
            Tier::Strong => &self.strong,
        }
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

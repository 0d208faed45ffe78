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

use crate::tier::Tier;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read wordlist {}: {source}", path.display())]
    WordlistLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Wordlist contains no admissible words")]
    EmptyWordlist,

    #[error("Invalid word length bounds (min {min}, max {max})")]
    InvalidLengthBounds { min: usize, max: usize },

    #[error("Policy for tier {0} needs at least one word and a non-empty delimiter set")]
    InvalidPolicy(Tier),

    #[error("Unknown strength tier: {0:?}")]
    UnknownTier(String),

    #[error("Cannot draw {requested} distinct words from a set of {available}")]
    Generation { requested: usize, available: usize },

    #[error("System entropy source failed: {0}")]
    Entropy(String),
}

impl Error {
    /// Startup errors end the process; the rest reject a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::WordlistLoad { .. }
                | Error::EmptyWordlist
                | Error::InvalidLengthBounds { .. }
                | Error::InvalidPolicy(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

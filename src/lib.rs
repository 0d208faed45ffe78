pub mod chat;
pub mod error;
pub mod generator;
pub mod logging;
pub mod random;
pub mod tier;
pub mod wordlist;

pub use chat::{Button, Command, Reply, ReplyKind, Responder};
pub use error::{Error, Result};
pub use generator::Composer;
pub use random::{KeystreamRng, RandomSource};
pub use tier::{Casing, Delimiters, PolicyTable, Tier, TierPolicy};
pub use wordlist::{CharClass, LineFormat, WordSet, WordlistConstraints, load_wordlist};

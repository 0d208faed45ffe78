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

mod ui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use wordpass::wordlist::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH};
use wordpass::{
    CharClass, Command, Composer, KeystreamRng, LineFormat, PolicyTable, Responder, Tier,
    WordlistConstraints, load_wordlist, logging,
};

#[derive(Parser)]
#[command(
    name = "wordpass",
    version,
    author,
    about = "Memorable passphrase generator with weak, normal and strong tiers"
)]
struct Cli {
    /// Line-delimited word source
    #[arg(short, long, env = "WORDPASS_WORDLIST", default_value = "wordlist.txt")]
    wordlist: PathBuf,

    #[arg(long, env = "WORDPASS_MIN_LENGTH", default_value_t = DEFAULT_MIN_LENGTH)]
    min_length: usize,

    #[arg(long, env = "WORDPASS_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    #[arg(long, value_enum, default_value = "lower")]
    charset: Charset,

    /// Wordlist lines carry dice numbers before the word
    #[arg(long)]
    diceware: bool,

    #[arg(short, long, value_enum, default_value = "normal")]
    tier: TierArg,

    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=100))]
    count: u16,

    /// Derive the keystream from a phrase for reproducible output
    #[arg(long, env = "WORDPASS_SEED", hide_env_values = true)]
    seed: Option<String>,

    /// Run the conversation on stdin/stdout
    #[arg(long)]
    chat: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum Charset {
    Lower,
    Alpha,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum TierArg {
    Weak,
    Normal,
    Strong,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_tracing()?;

    let constraints = WordlistConstraints {
        char_class: match cli.charset {
            Charset::Lower => CharClass::AsciiLowercase,
            Charset::Alpha => CharClass::Alphabetic,
        },
        min_length: cli.min_length,
        max_length: cli.max_length,
        format: if cli.diceware {
            LineFormat::Diceware
        } else {
            LineFormat::Plain
        },
    };

    let words = load_wordlist(&cli.wordlist, &constraints)
        .inspect_err(|e| tracing::error!(error = %e, "startup failed"))
        .context("Failed to load wordlist")?;

    let composer = Composer::new(Arc::new(words), PolicyTable::STANDARD)
        .inspect_err(|e| tracing::error!(error = %e, "startup failed"))
        .context("Invalid tier policy")?;
    let composer = Arc::new(composer);

    let options = ui::DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    let seeded = cli.seed.is_some();
    let mut rng = match cli.seed.as_deref() {
        Some(phrase) => KeystreamRng::from_phrase(phrase),
        None => KeystreamRng::from_entropy().context("Failed to seed keystream")?,
    };

    if cli.chat {
        return run_chat(Responder::new(composer), &mut rng, &options);
    }

    let tier = match cli.tier {
        TierArg::Weak => Tier::Weak,
        TierArg::Normal => Tier::Normal,
        TierArg::Strong => Tier::Strong,
    };

    let start = Instant::now();
    let passphrases = (0..cli.count)
        .map(|_| composer.generate(tier, &mut rng))
        .collect::<wordpass::Result<Vec<_>>>()
        .context("Failed to generate passphrase")?;
    let elapsed = start.elapsed();

    let report = ui::Report {
        tier,
        policy: *composer.policies().policy(tier),
        wordlist_size: composer.words().len(),
        entropy_bits: composer.entropy_bits(tier),
        seeded,
        elapsed,
    };

    ui::display_output(&passphrases, &report, &options);

    Ok(())
}

fn run_chat(responder: Responder, rng: &mut KeystreamRng, options: &ui::DisplayOptions) -> Result<()> {
    tracing::info!("chat session started");
    ui::display_reply(&responder.on_command(Command::Help), options);

    let mut index = 1;
    while let Some(input) = ui::prompt_input(index)? {
        if input.is_empty() {
            continue;
        }
        if matches!(input.as_str(), "/exit" | "/quit") {
            break;
        }

        if let Some(reply) = responder.handle(&input, rng) {
            ui::display_reply(&reply, options);
        }
        index += 1;
    }

    tracing::info!("chat session ended");
    Ok(())
}

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

use anyhow::Result;
use console::Style;
use std::io::{self, Write};
use std::time::Duration;
use wordpass::chat::tier_label;
use wordpass::{Casing, Delimiters, Reply, ReplyKind, Tier, TierPolicy};
use zeroize::Zeroizing;

pub const MIN_SAFE_ENTROPY: f64 = 60.0;
pub const MIN_FAIR_ENTROPY: f64 = 40.0;

pub struct Report {
    pub tier: Tier,
    pub policy: TierPolicy,
    pub wordlist_size: usize,
    pub entropy_bits: Option<f64>,
    pub seeded: bool,
    pub elapsed: Duration,
}

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Weak,
    Fair,
    Strong,
}

impl Rating {
    pub fn from_entropy(bits: f64) -> Self {
        if bits >= MIN_SAFE_ENTROPY {
            Rating::Strong
        } else if bits >= MIN_FAIR_ENTROPY {
            Rating::Fair
        } else {
            Rating::Weak
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Weak => "Weak",
            Rating::Fair => "Fair",
            Rating::Strong => "Strong",
        }
    }
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn status_style(color_support: bool, secure: bool) -> Style {
    match (color_support, secure) {
        (false, _) => Style::new(),
        (true, true) => Style::new().green(),
        (true, false) => Style::new().yellow(),
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

/// Reads one line after an `In [n]: ` prompt; `None` on end of input.
pub fn prompt_input(index: usize) -> Result<Option<String>> {
    print!("In [{}]: ", index);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        println!();
        return Ok(None);
    }

    Ok(Some(input.trim().to_string()))
}

pub fn render_reply(reply: &Reply, options: &DisplayOptions) -> String {
    let (_, check_warn) = get_status_symbols(options.unicode_support);
    let text: &str = &reply.text;

    let mut out = match reply.kind {
        ReplyKind::Alert => {
            let style = status_style(options.color_support, false);
            format!("{} {}", style.apply_to(format!("[{}]", check_warn)), text)
        }
        ReplyKind::Message | ReplyKind::Edit => text.to_string(),
    };

    if !reply.buttons.is_empty() {
        let buttons: Vec<String> = reply
            .buttons
            .iter()
            .map(|b| format!("[{}] {}", b.payload, b.label))
            .collect();
        out.push_str("\n\n");
        out.push_str(&buttons.join("  "));
    }

    out
}

pub fn display_reply(reply: &Reply, options: &DisplayOptions) {
    let rendered = Zeroizing::new(render_reply(reply, options));
    println!("Out:\n{}\n", rendered.as_str());
}

pub fn display_output(
    passphrases: &[Zeroizing<String>],
    report: &Report,
    options: &DisplayOptions,
) {
    if options.quiet {
        for passphrase in passphrases {
            println!("{}", passphrase.as_str());
        }
        return;
    }

    for (i, passphrase) in passphrases.iter().enumerate() {
        println!("Out[{}]:\n{}", i, passphrase.as_str());
    }
    println!();

    let length = passphrases.first().map(|p| p.chars().count()).unwrap_or(0);

    display_settings(report);
    display_stats(report, length, options);
}

fn describe_casing(casing: Casing) -> &'static str {
    match casing {
        Casing::Lower => "lower-case",
        Casing::RandomPerWord => "random per word",
    }
}

fn describe_delimiters(delimiters: Delimiters) -> String {
    match delimiters {
        Delimiters::None => "none".to_string(),
        Delimiters::RandomFrom(set) => {
            let chars: String = set.iter().collect();
            format!("random from {} chars ({})", set.len(), chars)
        }
    }
}

fn display_settings(report: &Report) {
    let policy = &report.policy;

    println!("Settings:");
    println!("  ├─ Tier       {}", tier_label(report.tier));
    println!(
        "  ├─ Wordlist   {} {}",
        report.wordlist_size,
        plural(report.wordlist_size, "word", "words")
    );
    println!(
        "  ├─ Words      {} {}",
        policy.word_count,
        plural(policy.word_count, "word", "words")
    );
    println!("  ├─ Casing     {}", describe_casing(policy.casing));
    println!("  ├─ Delimiter  {}", describe_delimiters(policy.delimiters));
    println!(
        "  └─ Keystream  ChaCha20 ({})",
        if report.seeded { "seeded" } else { "OS entropy" }
    );
    println!();
}

fn display_stats(report: &Report, length: usize, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);

    let entropy = report.entropy_bits.unwrap_or(0.0);
    let rating = Rating::from_entropy(entropy);
    let secure = rating == Rating::Strong;
    let status_icon = if secure { check_ok } else { check_warn };
    let entropy_style = status_style(options.color_support, secure);

    println!("Stats:");
    println!(
        "  ├─ Entropy    {} {} bits ({})",
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(format!("{:.1}", entropy)),
        entropy_style.apply_to(rating.as_str())
    );
    println!("  ├─ Length     {} {}", length, plural(length, "char", "chars"));
    println!("  └─ Time       {:.3}s", report.elapsed.as_secs_f64());

    println!(
        "\n{} Security: {}",
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(rating.as_str())
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wordpass::{Command, Composer, PolicyTable, Responder, WordSet, WordlistConstraints};

    fn plain_options() -> DisplayOptions {
        DisplayOptions {
            unicode_support: false,
            color_support: false,
            quiet: false,
        }
    }

    fn responder() -> Responder {
        let set = WordSet::from_lines(
            ["abacus", "balance", "life", "planet", "zoom"],
            &WordlistConstraints::DEFAULT,
        )
        .unwrap();
        Responder::new(Arc::new(
            Composer::new(Arc::new(set), PolicyTable::STANDARD).unwrap(),
        ))
    }

    #[test]
    fn test_get_status_symbols_unicode() {
        let (ok, warn) = get_status_symbols(true);
        assert_eq!(ok, "✓");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_get_status_symbols_ascii() {
        let (ok, warn) = get_status_symbols(false);
        assert_eq!(ok, "+");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(Rating::from_entropy(25.8), Rating::Weak);
        assert_eq!(Rating::from_entropy(MIN_FAIR_ENTROPY), Rating::Fair);
        assert_eq!(Rating::from_entropy(59.9), Rating::Fair);
        assert_eq!(Rating::from_entropy(MIN_SAFE_ENTROPY), Rating::Strong);
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "word", "words"), "word");
        assert_eq!(plural(0, "word", "words"), "words");
        assert_eq!(plural(4, "char", "chars"), "chars");
    }

    #[test]
    fn test_describe_delimiters() {
        assert_eq!(describe_delimiters(Delimiters::None), "none");
        assert_eq!(
            describe_delimiters(Delimiters::RandomFrom(wordpass::tier::DIGITS)),
            "random from 10 chars (0123456789)"
        );
    }

    #[test]
    fn test_render_menu_lists_buttons() {
        let reply = responder().on_command(Command::ChooseTier);
        let rendered = render_reply(&reply, &plain_options());

        assert!(rendered.starts_with("🔒 Choose password strength:"));
        assert!(rendered.ends_with("[weak] Weak  [normal] Normal  [strong] Strong"));
    }

    #[test]
    fn test_render_alert_is_marked() {
        let reply = responder().on_button_secure("medium");
        let rendered = render_reply(&reply, &plain_options());

        assert!(rendered.starts_with("[!] "));
        assert!(!rendered.contains('`'));
    }

    #[test]
    fn test_render_passphrase_reply() {
        let reply = responder().on_button_secure("weak");
        let rendered = render_reply(&reply, &plain_options());
        let passphrase = reply.passphrase().unwrap();

        assert!(rendered.contains(&format!("`{}`", passphrase)));
        assert!(!rendered.contains('['));
    }
}

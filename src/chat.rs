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

//! Conversation flow between a chat transport and the composer.
//!
//! A transport forwards slash commands and button payloads; every reply
//! says whether it is a new message, an edit of the message holding the
//! pressed button, or a short alert. Failures always come back as alerts
//! and never carry anything shaped like a passphrase.

use crate::error::Error;
use crate::generator::Composer;
use crate::random::{KeystreamRng, RandomSource};
use crate::tier::Tier;
use std::sync::Arc;
use zeroize::Zeroizing;

pub const GENERATE_PAYLOAD: &str = "generate";

const WELCOME_TEXT: &str = "🔐 *XKCD password generator*\n\n\
    I create passwords that are easy to remember and hard to guess.\n\n\
    *Commands:*\n\
    /password - Choose password strength\n\
    /help - Show this message";

const CHOOSE_TIER_TEXT: &str = "🔒 Choose password strength:";

const FAILURE_TEXT: &str = "Password generation failed, please try again";

const UNKNOWN_OPTION_TEXT: &str = "Unknown option, please choose a strength from the menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`.
    Help,
    /// `/password` or `/generate`.
    ChooseTier,
}

impl Command {
    /// Parses `/name`, `/name@botname` and `/name args`; anything else is `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let token = text.split_whitespace().next()?;
        let name = token.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name.to_ascii_lowercase().as_str() {
            "start" | "help" => Some(Command::Help),
            "password" | "generate" => Some(Command::ChooseTier),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub payload: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Sent as a new message.
    Message,
    /// Replaces the message whose button was pressed.
    Edit,
    /// Short pop-up notice tied to the button press.
    Alert,
}

#[derive(Debug)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: Zeroizing<String>,
    pub buttons: Vec<Button>,
    pub markdown: bool,
    passphrase: Option<Zeroizing<String>>,
}

impl Reply {
    fn message(text: &str, buttons: Vec<Button>, markdown: bool) -> Self {
        Self {
            kind: ReplyKind::Message,
            text: Zeroizing::new(text.to_string()),
            buttons,
            markdown,
            passphrase: None,
        }
    }

    fn alert(text: &str) -> Self {
        Self {
            kind: ReplyKind::Alert,
            text: Zeroizing::new(text.to_string()),
            buttons: Vec::new(),
            markdown: false,
            passphrase: None,
        }
    }

    fn passphrase_for(tier: Tier, passphrase: Zeroizing<String>) -> Self {
        let text = Zeroizing::new(format!(
            "{}:\n`{}`\n\nStore it somewhere safe!",
            tier_title(tier),
            passphrase.as_str()
        ));

        Self {
            kind: ReplyKind::Edit,
            text,
            buttons: Vec::new(),
            markdown: true,
            passphrase: Some(passphrase),
        }
    }

    /// The generated secret, for transports that format it themselves.
    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_ref().map(|p| p.as_str())
    }
}

pub fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Weak => "Weak",
        Tier::Normal => "Normal",
        Tier::Strong => "Strong",
    }
}

fn tier_title(tier: Tier) -> &'static str {
    match tier {
        Tier::Weak => "🔓 Weak password",
        Tier::Normal => "🔐 Normal password",
        Tier::Strong => "🔒 Strong password",
    }
}

pub struct Responder {
    composer: Arc<Composer>,
}

impl Responder {
    pub fn new(composer: Arc<Composer>) -> Self {
        Self { composer }
    }

    pub fn on_command(&self, command: Command) -> Reply {
        tracing::debug!(?command, "command received");

        match command {
            Command::Help => Reply::message(
                WELCOME_TEXT,
                vec![Button {
                    label: "Generate password",
                    payload: GENERATE_PAYLOAD,
                }],
                true,
            ),
            Command::ChooseTier => tier_menu(),
        }
    }

    pub fn on_button<R>(&self, payload: &str, rng: &mut R) -> Reply
    where
        R: RandomSource + ?Sized,
    {
        if payload.trim() == GENERATE_PAYLOAD {
            return tier_menu();
        }

        let tier: Tier = match payload.parse() {
            Ok(tier) => tier,
            Err(e) => return failure(&e),
        };

        match self.composer.generate(tier, rng) {
            Ok(passphrase) => {
                tracing::info!(%tier, "passphrase generated");
                Reply::passphrase_for(tier, passphrase)
            }
            Err(e) => failure(&e),
        }
    }

    /// Like [`Responder::on_button`] with a fresh OS-seeded keystream per call.
    pub fn on_button_secure(&self, payload: &str) -> Reply {
        match KeystreamRng::from_entropy() {
            Ok(mut rng) => self.on_button(payload, &mut rng),
            Err(e) => failure(&e),
        }
    }

    /// Routes raw input: `/...` is a command, anything else a button payload.
    /// Unrecognised commands are ignored.
    pub fn handle<R>(&self, input: &str, rng: &mut R) -> Option<Reply>
    where
        R: RandomSource + ?Sized,
    {
        let input = input.trim();
        if input.starts_with('/') {
            Command::parse(input).map(|command| self.on_command(command))
        } else {
            Some(self.on_button(input, rng))
        }
    }
}

fn tier_menu() -> Reply {
    let buttons = Tier::ALL
        .into_iter()
        .map(|tier| Button {
            label: tier_label(tier),
            payload: tier.as_str(),
        })
        .collect();

    Reply::message(CHOOSE_TIER_TEXT, buttons, false)
}

fn failure(error: &Error) -> Reply {
    tracing::warn!(%error, "request rejected");

    match error {
        Error::UnknownTier(_) => Reply::alert(UNKNOWN_OPTION_TEXT),
        _ => Reply::alert(FAILURE_TEXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRng;
    use crate::tier::PolicyTable;
    use crate::wordlist::{WordSet, WordlistConstraints};

    fn responder_with(words: &[&str]) -> Responder {
        let set = WordSet::from_lines(words.iter().copied(), &WordlistConstraints::DEFAULT).unwrap();
        let composer = Composer::new(Arc::new(set), PolicyTable::STANDARD).unwrap();
        Responder::new(Arc::new(composer))
    }

    fn responder() -> Responder {
        responder_with(&["abacus", "balance", "life", "planet", "zoom"])
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Help));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/password"), Some(Command::ChooseTier));
        assert_eq!(Command::parse("/generate"), Some(Command::ChooseTier));
        assert_eq!(Command::parse("  /Password  "), Some(Command::ChooseTier));
        assert_eq!(Command::parse("/password@wordpass_bot"), Some(Command::ChooseTier));
        assert_eq!(Command::parse("/start now please"), Some(Command::Help));
    }

    #[test]
    fn test_parse_rejects_non_commands() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("password"), None);
        assert_eq!(Command::parse("/"), None);
        assert_eq!(Command::parse("/settings"), None);
    }

    #[test]
    fn test_help_offers_generate_button() {
        let reply = responder().on_command(Command::Help);

        assert_eq!(reply.kind, ReplyKind::Message);
        assert!(reply.markdown);
        assert!(reply.text.contains("/password"));
        assert!(reply.text.contains("/help"));
        assert_eq!(
            reply.buttons,
            vec![Button {
                label: "Generate password",
                payload: GENERATE_PAYLOAD
            }]
        );
        assert!(reply.passphrase().is_none());
    }

    #[test]
    fn test_tier_menu() {
        let reply = responder().on_command(Command::ChooseTier);

        assert_eq!(reply.kind, ReplyKind::Message);
        let payloads: Vec<&str> = reply.buttons.iter().map(|b| b.payload).collect();
        assert_eq!(payloads, vec!["weak", "normal", "strong"]);
        for button in &reply.buttons {
            assert!(button.payload.parse::<Tier>().is_ok());
        }
    }

    #[test]
    fn test_generate_button_opens_menu() {
        let mut rng = SequenceRng::new(vec![0]);
        let reply = responder().on_button("generate", &mut rng);

        assert_eq!(reply.kind, ReplyKind::Message);
        assert_eq!(reply.buttons.len(), 3);
    }

    #[test]
    fn test_tier_button_returns_passphrase() {
        let mut rng = SequenceRng::new(vec![0, 3]);
        let reply = responder().on_button("weak", &mut rng);

        assert_eq!(reply.kind, ReplyKind::Edit);
        assert!(reply.markdown);
        assert_eq!(reply.passphrase(), Some("abacusplanet"));
        assert!(reply.text.starts_with("🔓 Weak password:"));
        assert!(reply.text.contains("`abacusplanet`"));
        assert!(reply.buttons.is_empty());
    }

    #[test]
    fn test_unknown_payload_is_alert() {
        let mut rng = SequenceRng::new(vec![0]);
        let reply = responder().on_button("medium", &mut rng);

        assert_eq!(reply.kind, ReplyKind::Alert);
        assert!(reply.passphrase().is_none());
        assert_eq!(reply.text.as_str(), UNKNOWN_OPTION_TEXT);
    }

    #[test]
    fn test_generation_failure_is_alert() {
        let responder = responder_with(&["cat", "dog", "elephant", "ab", "CAT"]);
        let mut rng = SequenceRng::new(vec![0]);

        for tier in Tier::ALL {
            let reply = responder.on_button(tier.as_str(), &mut rng);
            assert_eq!(reply.kind, ReplyKind::Alert);
            assert!(reply.passphrase().is_none());
            assert_eq!(reply.text.as_str(), FAILURE_TEXT);
            assert!(!reply.text.contains('`'));
        }
    }

    #[test]
    fn test_on_button_secure() {
        let reply = responder().on_button_secure("strong");

        assert_eq!(reply.kind, ReplyKind::Edit);
        let passphrase = reply.passphrase().unwrap();
        assert_eq!(passphrase.chars().filter(|c| !c.is_ascii_alphabetic()).count(), 3);
    }

    #[test]
    fn test_handle_routes_input() {
        let responder = responder();
        let mut rng = SequenceRng::new(vec![1, 4, 0, 1, 5, 0, 9, 1]);

        let help = responder.handle("/start", &mut rng).unwrap();
        assert_eq!(help.buttons[0].payload, GENERATE_PAYLOAD);

        assert!(responder.handle("/unknown", &mut rng).is_none());

        let reply = responder.handle(" normal ", &mut rng).unwrap();
        assert_eq!(reply.kind, ReplyKind::Edit);
        assert_eq!(reply.passphrase(), Some("Balance5zoom9Abacus"));
    }
}

//! Platform-independent command handlers, and the session that dispatches to them.
//!
//! A command line looks like `<prefix><name> <rest>`.
//! Anything the handlers want to post goes through a [`Responder`],
//! which is where a chat client plugs in.

use std::fmt::Formatter;
use chrono::{DateTime, Utc};
use displaydoc::Display;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calc::{Calculator, Limits};
use crate::structures::{Color, Embed, RecentIds, Snowflake};

pub mod calc;
pub mod dice;
pub mod info;
pub mod text;

use dice::{DiceError, Roll};

/// Holds runtime data about a command.
/// Mostly useful for help listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeData {
    /// The canonical command.
    pub name: CommandName,
    /// Every spelling that invokes it. The first is canonical.
    pub aliases: &'static [&'static str],
    /// What it does.
    pub description: &'static str
}

macro_rules! commands {
    (
        data_name: $dataname: ident,
        commands: [$({
            $name: ident,
            [ $($alias: literal),+ ],
            $description: literal
        }),* $(,)?]
    ) => {
        /// Runtime data about every command, in listing order.
        pub static $dataname: [RuntimeData; commands!(count $($name)*)] = [
            $(
                RuntimeData {
                    name: CommandName::$name,
                    aliases: &[ $($alias),+ ],
                    description: $description
                }
            ),*
        ];

        /// An enumeration over the canonical names of commands.
        #[non_exhaustive]
        #[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
        #[allow(missing_docs)]
        pub enum CommandName {
            $(
                #[doc = $description]
                $name
            ),+
        }

        impl CommandName {
            /// Transforms an alias for a command into its canonical name, if it corresponds to one.
            #[must_use]
            pub fn from_alias(alias: &str) -> Option<CommandName> {
                Some( match alias {
                    $($($alias)|+ => CommandName::$name,)+
                    _ => return None
                } )
            }

            /// The canonical spelling.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $(CommandName::$name => commands!(first $($alias),+)),+
                }
            }
        }

        impl std::fmt::Display for CommandName {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
    (count $tt: tt $($tts: tt)*) => {
        1 + commands!(count $($tts)*)
    };
    (count) => {0};
    (first $head: literal $(, $tail: literal)*) => { $head };
}

commands! {
    data_name: COMMAND_DATA,
    commands: [
        { Ping, ["ping"], "Pong." },
        { Calc, ["calc", "math"], "Evaluates a mathematical expression and prints the result." },
        { Roll, ["roll", "dice"], "\"XdY\" rolls X dice with Y sides." },
        { Rot13, ["rot13"], "ROT13's the given text." },
        { Reverse, ["rev", "reverse"], "Reverses the given text." },
        { UpsideDown, ["upsidedown", "flip"], "Prints the given text upside down." },
        { SpaceWords, ["sw"], "Spaces out words for meme emphasis." },
        { Crossword, ["cw"], "\"Crossword\"-ifies the given text for meme emphasis." },
        { Kerrhau, ["kerrhau"], "\"kerrhau\"-ifies the given text for meme emphasis." },
        { TableFlip, ["tableflip"], "(╯°□°）╯︵ ┻━┻" },
        { Unflip, ["unflip"], "┬─┬﻿ ノ( ゜-゜ノ)" },
        { JustRight, ["justright"], "✋😩👌" },
        { Culol, ["culol"], "😂 👌" },
        { Shrug, ["shrug"], "¯\\_(ツ)_/¯" },
        { Lenny, ["lenny"], "( ͡° ͜ʖ ͡°)" },
        { Wtf, ["wtf"], "ಠ_ಠ" },
        { Id, ["id", "snowflake"], "Shows when the given ids were created." },
        { Uptime, ["uptime"], "Gets the uptime of this session." },
        { UnixTime, ["unixtime"], "Gets the current Unix timestamp." },
        { Today, ["today"], "Gets some information about today." },
        { Help, ["help"], "Lists every command." }
    ]
}

impl CommandName {
    /// The suffix an emoticon command appends, if this is one.
    #[must_use]
    pub fn emoticon(self) -> Option<&'static str> {
        Some(match self {
            CommandName::TableFlip => "(╯°□°）╯︵ ┻━┻",
            CommandName::Unflip => " ┬─┬﻿ ノ( ゜-゜ノ)",
            CommandName::JustRight => " ✋😩👌",
            CommandName::Culol => " 😂 👌",
            CommandName::Shrug => r" ¯\_(ツ)_/¯",
            CommandName::Lenny => " ( ͡° ͜ʖ ͡°)",
            CommandName::Wtf => " ಠ_ಠ",
            _ => return None
        })
    }
}

/// Something to post in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Replace the text of the command message.
    Edit(String),
    /// Post a new text message.
    Send(String),
    /// Post a new embed.
    Embed(Embed)
}

/// Posts replies somewhere. This is the seam a chat client implements.
pub trait Responder {
    /// What can go wrong while posting.
    type Error: std::error::Error;

    /// Posts a reply.
    ///
    /// # Errors
    /// Errors if the reply couldn't be posted.
    fn reply(&mut self, reply: Reply) -> Result<(), Self::Error>;

    /// Posts an error reply. By default, this is a red embed.
    ///
    /// # Errors
    /// Errors if the reply couldn't be posted.
    fn reply_error(&mut self, title: &str, message: &str) -> Result<(), Self::Error> {
        self.reply(Reply::Embed(Embed::new(title, message, Color::RED)))
    }
}

/// Tunables for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// What every command line starts with.
    pub prefix: String,
    /// How many decimals floating-point results show.
    pub precision: usize,
    /// The most dice a single roll may throw.
    pub max_dice: u32,
    /// Resource limits for the calculator.
    pub limits: Limits
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            prefix: String::from("."),
            precision: 4,
            max_dice: 100,
            limits: Limits::default()
        }
    }
}

/// An incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Its id.
    pub id: Snowflake,
    /// Its text.
    pub content: String
}

impl Message {
    /// Creates a message.
    pub fn new(id: Snowflake, content: impl Into<String>) -> Self {
        Message { id, content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
/// Different things that can go wrong when running a command.
pub enum CommandError {
    #[displaydoc("`{0}` needs some text to work with")]
    /// The command needs an argument it didn't get.
    MissingArgument(CommandName),
    #[displaydoc("{0}")]
    /// A roll was invalid.
    Dice(#[from] DiceError),
    #[displaydoc("`{0}` is not a valid snowflake")]
    /// An id didn't parse.
    InvalidSnowflake(String)
}

/// The local state of a running bot: settings, a calculator, an RNG,
/// and the ids of recently handled messages.
#[derive(Debug)]
pub struct Session {
    calculator: Calculator,
    settings: Settings,
    started: DateTime<Utc>,
    recent: RecentIds,
    rng: StdRng
}

impl Session {
    /// Starts a session now, seeding its RNG from the OS.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Session::with_rng(settings, StdRng::from_entropy(), Utc::now())
    }

    /// Starts a session at a given time with a given RNG.
    #[must_use]
    pub fn with_rng(settings: Settings, rng: StdRng, started: DateTime<Utc>) -> Self {
        Session {
            calculator: Calculator::new(settings.limits),
            settings,
            started,
            recent: RecentIds::default(),
            rng
        }
    }

    /// The settings this session was started with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// When this session was started.
    #[must_use]
    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    /// Handles a message as of now. See [`Session::handle_at`].
    ///
    /// # Errors
    /// Errors if the responder fails to post.
    pub fn handle<R: Responder>(&mut self, message: &Message, responder: &mut R) -> Result<bool, R::Error> {
        self.handle_at(message, Utc::now(), responder)
    }

    /// Handles a message, posting any replies through the responder.
    ///
    /// Messages seen recently, lines without the prefix, and unknown commands are ignored.
    /// Command failures are posted as error replies.
    /// Returns whether a command was run.
    ///
    /// # Errors
    /// Errors if the responder fails to post.
    pub fn handle_at<R: Responder>(
        &mut self,
        message: &Message,
        now: DateTime<Utc>,
        responder: &mut R
    ) -> Result<bool, R::Error> {
        if !self.recent.insert(message.id) {
            debug!(id = %message.id, "ignoring duplicate message");
            return Ok(false);
        }
        let Some(line) = message.content.strip_prefix(self.settings.prefix.as_str()) else {
            return Ok(false);
        };
        let (alias, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let Some(command) = CommandName::from_alias(alias) else {
            debug!(alias, "unknown command");
            return Ok(false);
        };
        debug!(%command, id = %message.id, "running command");
        match self.run(command, rest, now) {
            Ok(replies) => {
                for reply in replies {
                    responder.reply(reply)?;
                }
            }
            Err(err) => {
                warn!(%command, %err, "command failed");
                responder.reply_error(&format!("Error running `{command}`"), &err.to_string())?;
            }
        }
        Ok(true)
    }

    /// Runs a command with the rest of its line, returning what to post.
    ///
    /// # Errors
    /// Errors if the command's input is unusable. See [`CommandError`].
    pub fn run(&mut self, command: CommandName, rest: &str, now: DateTime<Utc>) -> Result<Vec<Reply>, CommandError> {
        let text = rest.trim();
        let require_text = || if text.is_empty() {
            Err(CommandError::MissingArgument(command))
        } else {
            Ok(text)
        };
        let reply = match command {
            CommandName::Ping => Reply::Edit(String::from("Pong!")),
            CommandName::Calc => Reply::Embed(
                calc::report(&self.calculator, text, self.settings.precision)
            ),
            CommandName::Roll => match Roll::parse(text, self.settings.max_dice)? {
                Some(roll) => Reply::Send(roll.roll(&mut self.rng).to_string()),
                None => {
                    debug!(text, "not a roll");
                    return Ok(Vec::new());
                }
            },
            CommandName::Rot13 => Reply::Edit(text::rot13(require_text()?)),
            CommandName::Reverse => Reply::Edit(text::reverse(require_text()?)),
            CommandName::UpsideDown => Reply::Edit(text::upside_down(require_text()?)),
            CommandName::SpaceWords => Reply::Edit(text::space_words(require_text()?)),
            CommandName::Crossword => Reply::Edit(text::crossword(require_text()?)),
            CommandName::Kerrhau => Reply::Edit(
                text::kerrhau(text, &mut self.rng).ok_or(CommandError::MissingArgument(command))?
            ),
            CommandName::TableFlip | CommandName::Unflip | CommandName::JustRight |
            CommandName::Culol | CommandName::Shrug | CommandName::Lenny | CommandName::Wtf => {
                let suffix = command.emoticon().unwrap_or_default();
                Reply::Edit(text::emoticon_line(text, suffix))
            }
            CommandName::Id => {
                let ids = require_text()?
                    .split_whitespace()
                    .map(|id| id.parse::<Snowflake>()
                        .map_err(|_| CommandError::InvalidSnowflake(id.to_string())))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(ids.into_iter().map(|id| Reply::Embed(info::snowflake(id))).collect());
            }
            CommandName::Uptime => Reply::Edit(format!("`{}`", info::format_uptime(now - self.started))),
            CommandName::UnixTime => Reply::Edit(format!("`{}`", info::unix_time(now))),
            CommandName::Today => Reply::Embed(info::today(now)),
            CommandName::Help => Reply::Send(self.help())
        };
        Ok(vec![reply])
    }

    /// Lists every command, its aliases and what it does.
    fn help(&self) -> String {
        let prefix = &self.settings.prefix;
        COMMAND_DATA.iter()
            .map(|data| format!(
                "`{}` {}",
                data.aliases.iter().map(|alias| format!("{prefix}{alias}")).join(" / "),
                data.description
            ))
            .join("\n")
    }
}

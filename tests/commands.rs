use std::convert::Infallible;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use mawa::commands::{
    CommandError, CommandName, Message, Reply, Responder, Session, Settings, COMMAND_DATA
};
use mawa::structures::{Color, Embed, Snowflake};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Collects everything posted, errors included.
#[derive(Default)]
struct Collector {
    replies: Vec<Reply>,
    errors: Vec<(String, String)>
}

impl Responder for Collector {
    type Error = Infallible;

    fn reply(&mut self, reply: Reply) -> Result<(), Infallible> {
        self.replies.push(reply);
        Ok(())
    }

    fn reply_error(&mut self, title: &str, message: &str) -> Result<(), Infallible> {
        self.errors.push((title.to_string(), message.to_string()));
        Ok(())
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 1, 20, 8, 0, 0).unwrap()
}

fn session() -> Session {
    Session::with_rng(Settings::default(), StdRng::seed_from_u64(0x5EED), start())
}

/// Sends one line through a fresh collector, returning what was posted.
fn send(session: &mut Session, id: u64, content: &str) -> Collector {
    let mut collector = Collector::default();
    session.handle_at(&Message::new(Snowflake(id), content), start(), &mut collector)
        .expect("collecting can't fail");
    collector
}

fn edit(text: &str) -> Vec<Reply> {
    vec![Reply::Edit(text.to_string())]
}

#[test]
fn ignores_what_isnt_a_command() {
    let mut session = session();
    for (id, line) in ["hello", "ping", ".", ".nonsense 1 2 3", ". ping"].into_iter().enumerate() {
        let collector = send(&mut session, id as u64, line);
        assert!(collector.replies.is_empty(), "{line}");
        assert!(collector.errors.is_empty(), "{line}");
    }
}

#[test]
fn ignores_duplicate_messages() {
    let mut session = session();
    assert_eq!(send(&mut session, 7, ".ping").replies, edit("Pong!"));
    assert!(send(&mut session, 7, ".ping").replies.is_empty());
    assert_eq!(send(&mut session, 8, ".ping").replies, edit("Pong!"));
}

#[test]
fn aliases_resolve() {
    for data in &COMMAND_DATA {
        assert_eq!(data.aliases[0], data.name.name());
        for alias in data.aliases {
            assert_eq!(CommandName::from_alias(alias), Some(data.name), "{alias}");
        }
    }
    assert_eq!(CommandName::from_alias("math"), Some(CommandName::Calc));
    assert_eq!(CommandName::from_alias("flip"), Some(CommandName::UpsideDown));
    assert_eq!(CommandName::from_alias("Ping"), None);
}

#[test]
fn calculator_embed() {
    let mut session = session();
    let replies = send(&mut session, 1, ".calc 2**10").replies;
    assert_eq!(replies, [Reply::Embed(Embed::new(
        "Calculator:",
        "**Input:**\n2\\*\\*10\n\n**Output:**\n1024",
        Color::TEAL
    ))]);

    let replies = send(&mut session, 2, ".math sqrt(2)").replies;
    let [Reply::Embed(embed)] = replies.as_slice() else { panic!("expected an embed, got {replies:?}") };
    assert!(embed.description.ends_with("**Output:**\n1.4142"));

    let replies = send(&mut session, 3, ".calc 1/0").replies;
    let [Reply::Embed(embed)] = replies.as_slice() else { panic!("expected an embed, got {replies:?}") };
    assert_eq!(embed.color, Color::RED);
    assert!(embed.description.ends_with("Error: division by zero"));

    let replies = send(&mut session, 4, ".calc").replies;
    let [Reply::Embed(embed)] = replies.as_slice() else { panic!("expected an embed, got {replies:?}") };
    assert!(embed.description.starts_with("**Input:**\n(nothing)\n"));
    assert_eq!(embed.color, Color::RED);
}

#[test]
fn precision_comes_from_settings() {
    let settings = Settings { precision: 2, prefix: String::from("!"), ..Settings::default() };
    let mut session = Session::with_rng(settings, StdRng::seed_from_u64(1), start());
    let mut collector = Collector::default();
    session.handle_at(&Message::new(Snowflake(1), "!calc 1/3"), start(), &mut collector).unwrap();
    let [Reply::Embed(embed)] = collector.replies.as_slice() else { panic!("expected an embed") };
    assert!(embed.description.ends_with("\n0.33"));
}

#[test]
fn dice() {
    let mut session = session();

    let replies = send(&mut session, 1, ".roll").replies;
    let [Reply::Send(text)] = replies.as_slice() else { panic!("expected text, got {replies:?}") };
    let face: u64 = text.strip_prefix("🎲 ").unwrap().parse().unwrap();
    assert!((1..=6).contains(&face));

    let replies = send(&mut session, 2, ".dice 3d1").replies;
    assert_eq!(replies, [Reply::Send(String::from("🎲 1 + 1 + 1 = 3"))]);

    let replies = send(&mut session, 3, ".roll 4D20").replies;
    let [Reply::Send(text)] = replies.as_slice() else { panic!("expected text, got {replies:?}") };
    let (rolls, total) = text.strip_prefix("🎲 ").unwrap().split_once(" = ").unwrap();
    let rolls = rolls.split(" + ").map(|roll| roll.parse::<u64>().unwrap()).collect::<Vec<_>>();
    assert_eq!(rolls.len(), 4);
    assert!(rolls.iter().all(|roll| (1..=20).contains(roll)));
    assert_eq!(rolls.iter().sum::<u64>(), total.parse::<u64>().unwrap());

    // Not a roll at all, so nothing happens
    let collector = send(&mut session, 4, ".roll lots");
    assert!(collector.replies.is_empty() && collector.errors.is_empty());

    let collector = send(&mut session, 5, ".roll 1d0");
    assert!(collector.replies.is_empty());
    assert_eq!(collector.errors, [(
        String::from("Error running `roll`"),
        String::from("dice need at least one side")
    )]);

    let collector = send(&mut session, 6, ".roll 1000d6");
    assert_eq!(collector.errors.len(), 1);
}

#[test]
fn seeded_rolls_repeat() {
    let mut first = session();
    let mut second = session();
    assert_eq!(
        send(&mut first, 1, ".roll 10d100").replies,
        send(&mut second, 1, ".roll 10d100").replies
    );
}

#[test]
fn text_commands() {
    let mut session = session();
    assert_eq!(send(&mut session, 1, ".rot13 Hello").replies, edit("Uryyb"));
    assert_eq!(send(&mut session, 2, ".rev hello world").replies, edit("dlrow olleh"));
    assert_eq!(send(&mut session, 3, ".reverse abc").replies, edit("cba"));
    assert_eq!(send(&mut session, 4, ".upsidedown hey").replies, edit("ʎǝɥ"));
    assert_eq!(send(&mut session, 5, ".sw big mood").replies, edit("b i g . m o o d"));
    assert_eq!(send(&mut session, 6, ".cw meme").replies, edit("MEME\nE\nM\nE"));
    assert_eq!(send(&mut session, 7, ".shrug oh well").replies, edit(r"oh well ¯\_(ツ)_/¯"));
    assert_eq!(send(&mut session, 8, ".tableflip").replies, edit("(╯°□°）╯︵ ┻━┻"));
    assert_eq!(send(&mut session, 9, ".wtf").replies, edit("ಠ_ಠ"));

    let replies = send(&mut session, 10, ".kerrhau a b c d").replies;
    let [Reply::Edit(text)] = replies.as_slice() else { panic!("expected an edit, got {replies:?}") };
    assert!(text.ends_with("\nd"));

    let collector = send(&mut session, 11, ".rot13");
    assert!(collector.replies.is_empty());
    assert_eq!(collector.errors[0].1, "`rot13` needs some text to work with");
    assert_eq!(send(&mut session, 12, ".kerrhau  ").errors.len(), 1);
}

#[test]
fn info_commands() {
    let mut session = session();
    let now = start() + TimeDelta::days(2) + TimeDelta::seconds(3725);
    let mut collector = Collector::default();
    session.handle_at(&Message::new(Snowflake(1), ".uptime"), now, &mut collector).unwrap();
    session.handle_at(&Message::new(Snowflake(2), ".unixtime"), now, &mut collector).unwrap();
    session.handle_at(&Message::new(Snowflake(3), ".today"), now, &mut collector).unwrap();
    assert_eq!(collector.replies[0], Reply::Edit(String::from("`2 days, 1:02:05`")));
    assert_eq!(collector.replies[1], Reply::Edit(format!("`{}.000`", now.timestamp())));
    let Reply::Embed(today) = &collector.replies[2] else { panic!("expected an embed") };
    assert_eq!(today.author, "Today is Monday, January 22, 2018");
    assert_eq!(today.description, "Moon Phase: 🌓\nZodiac sign: ♒");
}

#[test]
fn snowflakes() {
    let mut session = session();
    let replies = send(&mut session, 1, ".id 175928847299117063 0").replies;
    assert_eq!(replies.len(), 2);
    let Reply::Embed(embed) = &replies[0] else { panic!("expected an embed") };
    assert_eq!(embed.author, "Snowflake 175928847299117063");
    assert_eq!(embed.description, "Created at 2016-04-30 11:18:25.796 UTC");

    let collector = send(&mut session, 2, ".snowflake 12 potato");
    assert!(collector.replies.is_empty());
    assert_eq!(collector.errors[0].1, "`potato` is not a valid snowflake");
}

#[test]
fn help_lists_everything() {
    let mut session = session();
    let replies = send(&mut session, 1, ".help").replies;
    let [Reply::Send(help)] = replies.as_slice() else { panic!("expected text, got {replies:?}") };
    assert_eq!(help.lines().count(), COMMAND_DATA.len());
    assert!(help.contains("`.calc / .math` Evaluates a mathematical expression"));
}

#[test]
fn errors_reach_the_default_error_reply() {
    struct Plain(Vec<Reply>);

    impl Responder for Plain {
        type Error = Infallible;

        fn reply(&mut self, reply: Reply) -> Result<(), Infallible> {
            self.0.push(reply);
            Ok(())
        }
    }

    let mut session = session();
    let mut plain = Plain(Vec::new());
    session.handle_at(&Message::new(Snowflake(1), ".rev"), start(), &mut plain).unwrap();
    let [Reply::Embed(embed)] = plain.0.as_slice() else { panic!("expected an embed") };
    assert_eq!(embed.color, Color::RED);
    assert_eq!(embed.author, "Error running `rev`");

    assert_eq!(
        session.run(CommandName::Id, "", start()),
        Err(CommandError::MissingArgument(CommandName::Id))
    );
}

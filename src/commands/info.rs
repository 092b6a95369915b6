//! Commands that report times and ids.

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use crate::structures::{Color, Embed, Snowflake};

/// Formats a duration as `H:MM:SS`, prefixed by `N day(s), ` once it's a day or longer.
/// Negative durations count as zero.
#[must_use]
pub fn format_uptime(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    let (days, rest) = (total / 86_400, total % 86_400);
    let (hours, minutes, seconds) = (rest / 3600, rest % 3600 / 60, rest % 60);
    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        days => format!("{days} days, {clock}")
    }
}

/// Formats a time as Unix seconds with a millisecond fraction.
#[must_use]
pub fn unix_time(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis();
    format!("{}.{:03}", millis.div_euclid(1000), millis.rem_euclid(1000))
}

/// Last day (as `month * 100 + day`) of each sign's span, in calendar order.
const ZODIAC: [(u32, char); 13] = [
    (120, '♑'), (218, '♒'), (320, '♓'), (420, '♈'),
    (521, '♉'), (621, '♊'), (722, '♋'), (823, '♌'),
    (923, '♍'), (1023, '♎'), (1122, '♏'), (1222, '♐'),
    (1231, '♑')
];

/// The zodiac sign a calendar day falls under.
#[must_use]
pub fn zodiac(month: u32, day: u32) -> char {
    let date = month * 100 + day;
    ZODIAC.iter()
        .find(|(end, _)| date <= *end)
        .map_or('♑', |&(_, sign)| sign)
}

/// Mean length of a lunation, in days.
const SYNODIC_MONTH: f64 = 29.530_588_853;

/// A known new moon (2000-01-06 18:14 UTC), in Unix seconds.
const NEW_MOON: i64 = 947_182_440;

/// End of each phase's span, on a scale where a lunation lasts 28 days.
/// Past the last entry the moon is new again.
const MOON_PHASES: [(f64, char); 8] = [
    (0.0, '🌑'), (4.0, '🌒'), (7.0, '🌓'), (11.0, '🌔'),
    (14.0, '🌕'), (18.0, '🌖'), (21.0, '🌗'), (26.0, '🌘')
];

/// How far into the current lunation a time is, from 0 (new) through 14 (full) to just under 28.
#[must_use]
pub fn moon_age(now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let days = (now.timestamp() - NEW_MOON) as f64 / 86_400.0;
    days.rem_euclid(SYNODIC_MONTH) / SYNODIC_MONTH * 28.0
}

/// The moon phase symbol for a time.
#[must_use]
pub fn moon_phase(now: DateTime<Utc>) -> char {
    let age = moon_age(now);
    MOON_PHASES.iter()
        .find(|(end, _)| age <= *end)
        .map_or('🌑', |&(_, phase)| phase)
}

/// The embed for the `today` command.
#[must_use]
pub fn today(now: DateTime<Utc>) -> Embed {
    let author = format!("Today is {}", now.format("%A, %B %d, %Y"));
    let description = format!(
        "Moon Phase: {}\nZodiac sign: {}",
        moon_phase(now),
        zodiac(now.month(), now.day())
    );
    Embed::new(author, description, Color::TEAL)
}

/// The embed describing a snowflake's creation time.
#[must_use]
pub fn snowflake(id: Snowflake) -> Embed {
    let created = id.timestamp().format("%Y-%m-%d %H:%M:%S%.3f UTC");
    Embed::new(format!("Snowflake {id}"), format!("Created at {created}"), Color::TEAL)
}

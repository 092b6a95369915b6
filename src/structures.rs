//! Holds a few data structures for general use.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;
use chrono::{DateTime, TimeZone, Utc};

/// Milliseconds between the Unix epoch and the first second of 2015, where snowflakes start counting.
pub const SNOWFLAKE_EPOCH: i64 = 1_420_070_400_000;

/// An opaque 64-bit id with its creation time embedded in the top 42 bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snowflake(pub u64);

impl Snowflake {
    /// Builds a snowflake from a creation time and a 12-bit increment.
    ///
    /// Times before the snowflake epoch clamp to it.
    #[must_use]
    pub fn from_timestamp(time: DateTime<Utc>, increment: u16) -> Snowflake {
        let millis = (time.timestamp_millis() - SNOWFLAKE_EPOCH).max(0);
        #[allow(clippy::cast_sign_loss)]
        let millis = millis as u64;
        Snowflake((millis << 22) | u64::from(increment & 0x0FFF))
    }

    /// When this snowflake was created.
    #[must_use]
    pub fn timestamp(self) -> DateTime<Utc> {
        #[allow(clippy::cast_possible_wrap)]
        let millis = (self.0 >> 22) as i64 + SNOWFLAKE_EPOCH;
        // Any 42-bit offset from the epoch is well within chrono's range
        Utc.timestamp_millis_opt(millis).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// The per-process increment in the low 12 bits.
    #[must_use]
    pub fn increment(self) -> u16 {
        (self.0 & 0x0FFF) as u16
    }
}

impl Display for Snowflake {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Snowflake)
    }
}

/// A capped set of recently seen ids. Once full, the oldest id is forgotten first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentIds {
    ids: VecDeque<Snowflake>,
    capacity: usize
}

impl Default for RecentIds {
    fn default() -> Self {
        RecentIds::new(RecentIds::CAPACITY)
    }
}

impl RecentIds {
    /// How many ids are remembered by default.
    pub const CAPACITY: usize = 10;

    /// Creates an empty set remembering at most `capacity` ids.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        RecentIds { ids: VecDeque::with_capacity(capacity), capacity }
    }

    /// Remembers an id. Returns `false` if it was already remembered.
    pub fn insert(&mut self, id: Snowflake) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        if self.ids.len() >= self.capacity {
            self.ids.pop_front();
        }
        self.ids.push_back(id);
        true
    }

    /// Whether the id is currently remembered.
    #[must_use]
    pub fn contains(&self, id: Snowflake) -> bool {
        self.ids.contains(&id)
    }

    /// How many ids are remembered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no ids are remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
/// An embed's accent color.
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8
}

impl Color {
    /// Used for results.
    pub const TEAL: Color = Color { r: 0x1A, g: 0xBC, b: 0x9C };
    /// Used for failures.
    pub const RED: Color = Color { r: 0xE7, g: 0x4C, b: 0x3C };
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Color { r, g, b } = self;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

/// A rich reply: an author line, a body and an accent color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    /// The line shown above the body.
    pub author: String,
    /// The body.
    pub description: String,
    /// The accent color.
    pub color: Color
}

impl Embed {
    /// Creates an embed.
    pub fn new(author: impl Into<String>, description: impl Into<String>, color: Color) -> Self {
        Embed { author: author.into(), description: description.into(), color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_time() {
        // The first snowflake ever issued sits on the epoch
        assert_eq!(Snowflake(0).timestamp().timestamp_millis(), SNOWFLAKE_EPOCH);
        let id = Snowflake(175_928_847_299_117_063);
        assert_eq!(id.timestamp().timestamp_millis(), 1_462_015_105_796);
        let rebuilt = Snowflake::from_timestamp(id.timestamp(), id.increment());
        assert_eq!(rebuilt.timestamp(), id.timestamp());
    }

    #[test]
    fn recent_ids_are_capped() {
        let mut recent = RecentIds::default();
        for id in 0..12 {
            assert!(recent.insert(Snowflake(id)));
        }
        assert_eq!(recent.len(), RecentIds::CAPACITY);
        assert!(!recent.contains(Snowflake(0)));
        assert!(!recent.contains(Snowflake(1)));
        assert!(recent.contains(Snowflake(2)));
        assert!(!recent.insert(Snowflake(11)));
    }

    #[test]
    fn color_hex() {
        assert_eq!(Color::TEAL.to_string(), "#1ABC9C");
        assert_eq!(Color::RED.to_string(), "#E74C3C");
    }
}

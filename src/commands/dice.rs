//! Dice rolls written as `XdY`.

use std::fmt::{Display, Formatter};
use displaydoc::Display;
use itertools::Itertools;
use rand::Rng;
use regex_lite::Regex;
use thiserror::Error;

// Taken from once_cell docs
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: once_cell::sync::OnceCell<Regex> = once_cell::sync::OnceCell::new();
        RE.get_or_init(|| Regex::new($re).expect("dice pattern is valid"))
    }};
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
/// Something was wrong with a requested roll.
pub enum DiceError {
    /// dice need at least one side
    NoSides,
    #[displaydoc("can't roll more than {0} dice at once")]
    /// More dice than allowed in one roll.
    TooManyDice(u32),
    #[displaydoc("{0} is too large")]
    /// A count that doesn't fit.
    TooLarge(String)
}

/// A parsed roll request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Roll {
    /// How many dice to throw.
    pub dice: u32,
    /// How many sides each die has.
    pub sides: u64
}

impl Default for Roll {
    fn default() -> Self {
        Roll { dice: 1, sides: 6 }
    }
}

impl Roll {
    /// Parses `XdY`, `dY` or just `Y` (one die with `Y` sides).
    /// Empty text means one six-sided die.
    ///
    /// Returns `Ok(None)` when the text doesn't look like a roll at all.
    ///
    /// # Errors
    /// Errors if the roll has zero sides, too many dice, or numbers that don't fit.
    pub fn parse(text: &str, max_dice: u32) -> Result<Option<Roll>, DiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Some(Roll::default()));
        }
        let Some(captures) = regex!(r"(?i)^(?:([0-9]+)?\s*d)?\s*([0-9]+)").captures(text) else {
            return Ok(None);
        };
        let dice = match captures.get(1) {
            Some(count) => count.as_str().parse::<u32>()
                .map_err(|_| DiceError::TooLarge(count.as_str().to_string()))?,
            None => 1
        };
        let sides = &captures[2];
        let sides = sides.parse::<u64>().map_err(|_| DiceError::TooLarge(sides.to_string()))?;
        if sides == 0 {
            return Err(DiceError::NoSides);
        }
        if dice > max_dice {
            return Err(DiceError::TooManyDice(max_dice));
        }
        Ok(Some(Roll { dice, sides }))
    }

    /// Throws the dice.
    pub fn roll(&self, rng: &mut impl Rng) -> Rolled {
        Rolled {
            rolls: (0..self.dice).map(|_| rng.gen_range(1..=self.sides)).collect()
        }
    }
}

/// The outcome of a roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rolled {
    /// Each die's face, in order.
    pub rolls: Vec<u64>
}

impl Rolled {
    /// The sum of every die.
    #[must_use]
    pub fn total(&self) -> u128 {
        self.rolls.iter().map(|&roll| u128::from(roll)).sum()
    }
}

impl Display for Rolled {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.rolls.as_slice() {
            [single] => write!(f, "🎲 {single}"),
            rolls => write!(f, "🎲 {} = {}", rolls.iter().join(" + "), self.total())
        }
    }
}

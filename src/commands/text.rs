//! Text transformations.

use itertools::Itertools;
use rand::Rng;

/// Rotates ASCII letters by 13 places.
#[must_use]
pub fn rot13(text: &str) -> String {
    text.chars().map(|c| match c {
        'a'..='z' => rotate(c, b'a'),
        'A'..='Z' => rotate(c, b'A'),
        _ => c
    }).collect()
}

fn rotate(c: char, base: u8) -> char {
    // Only called on ASCII letters
    let offset = (c as u8 - base + 13) % 26;
    char::from(base + offset)
}

/// Reverses the text, character by character.
#[must_use]
pub fn reverse(text: &str) -> String {
    text.chars().rev().collect()
}

/// Turns the text upside down: every character is flipped, and the order is reversed.
#[must_use]
pub fn upside_down(text: &str) -> String {
    text.chars().rev().map(flip).collect()
}

fn flip(c: char) -> char {
    match c {
        'a' => 'ɐ', 'b' => 'q', 'c' => 'ɔ', 'd' => 'p', 'e' => 'ǝ', 'f' => 'ɟ',
        'g' => 'ƃ', 'h' => 'ɥ', 'i' => 'ᴉ', 'j' => 'ɾ', 'k' => 'ʞ', 'm' => 'ɯ',
        'n' => 'u', 'p' => 'd', 'q' => 'b', 'r' => 'ɹ', 't' => 'ʇ', 'u' => 'n',
        'v' => 'ʌ', 'w' => 'ʍ', 'y' => 'ʎ',
        'A' => '∀', 'B' => 'ᗺ', 'C' => 'Ɔ', 'D' => 'ᗡ', 'E' => 'Ǝ', 'F' => 'Ⅎ',
        'G' => '⅁', 'J' => 'ſ', 'K' => 'ʞ', 'L' => '˥', 'M' => 'W', 'P' => 'Ԁ',
        'Q' => 'Ό', 'R' => 'ᴚ', 'T' => '⊥', 'U' => '∩', 'V' => 'Λ', 'W' => 'M',
        'Y' => '⅄',
        '1' => 'Ɩ', '2' => 'ᄅ', '3' => 'Ɛ', '4' => 'ㄣ', '5' => 'ϛ', '6' => '9',
        '7' => 'ㄥ', '9' => '6',
        '.' => '˙', ',' => '\'', '\'' => ',', '?' => '¿', '!' => '¡', '"' => '„',
        '(' => ')', ')' => '(', '[' => ']', ']' => '[', '{' => '}', '}' => '{',
        '<' => '>', '>' => '<', '&' => '⅋', '_' => '‾', ';' => '؛',
        // Symmetric, or no good counterpart
        c => c
    }
}

/// Spaces out the letters of every word, and puts a dot between words.
#[must_use]
pub fn space_words(text: &str) -> String {
    text.split(' ')
        .map(|word| word.chars().join(" "))
        .join(" . ")
}

/// Writes the text across, then the rest of it down, crossword style.
#[must_use]
pub fn crossword(text: &str) -> String {
    let text = text.to_uppercase();
    std::iter::once(text.clone())
        .chain(text.chars().skip(1).map(String::from))
        .join("\n")
}

/// Breaks the words into lines of one to three words,
/// then drops the very last character onto a line of its own.
///
/// Returns `None` if there are no words.
pub fn kerrhau(text: &str, rng: &mut impl Rng) -> Option<String> {
    let mut words = text.split_whitespace().peekable();
    words.peek()?;
    let mut lines = Vec::new();
    while words.peek().is_some() {
        let take = rng.gen_range(1..=3);
        lines.push(words.by_ref().take(take).join(" "));
    }
    let last_line = lines.last_mut()?;
    let last = last_line.pop()?;
    lines.push(last.to_string());
    Some(lines.join("\n"))
}

/// Appends an emoticon suffix to the text. Leading whitespace of the result is dropped.
#[must_use]
pub fn emoticon_line(text: &str, suffix: &str) -> String {
    format!("{}{suffix}", text.trim()).trim_start().to_string()
}

//! Yes/no parsing for the two confirmation gates.
//!
//! Negative cues are checked first: "not correct" contains "correct", and a
//! caller pushing back must never be read as agreeing.

use crate::domain::booking::fields::FieldKind;
use crate::domain::booking::transition::Confirmation;

const NEGATIVE_PHRASES: &[&str] = &[
    "that's wrong",
    "thats wrong",
    "not correct",
    "not right",
    "that's not",
    "don't book",
    "do not book",
    "no thanks",
    "no thank you",
    "hold on",
];

const NEGATIVE_WORDS: &[&str] = &["no", "nope", "nah", "incorrect", "wrong", "cancel"];

const AFFIRMATIVE_PHRASES: &[&str] = &[
    "that's right",
    "thats right",
    "that's correct",
    "thats correct",
    "sounds good",
    "looks good",
    "book it",
    "go ahead",
    "that works",
    "yes please",
];

const AFFIRMATIVE_WORDS: &[&str] = &[
    "yes",
    "yeah",
    "yep",
    "yup",
    "sure",
    "correct",
    "confirm",
    "confirmed",
    "absolutely",
    "ok",
    "okay",
    "perfect",
];

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Reads a yes/no out of the message, if it contains one.
pub fn parse_confirmation(text: &str) -> Option<Confirmation> {
    let lower = text.to_lowercase();
    let words = tokens(&lower);

    if NEGATIVE_PHRASES.iter().any(|p| lower.contains(p))
        || NEGATIVE_WORDS.iter().any(|w| words.iter().any(|t| t == w))
    {
        return Some(Confirmation::Negative);
    }
    if AFFIRMATIVE_PHRASES.iter().any(|p| lower.contains(p))
        || AFFIRMATIVE_WORDS.iter().any(|w| words.iter().any(|t| t == w))
    {
        return Some(Confirmation::Affirmative);
    }
    None
}

/// Which field the caller says is wrong, when they name one.
///
/// Birth language is checked before "date" so "my date of birth is wrong"
/// routes to the birth date, not the appointment date.
pub fn correction_target(text: &str) -> Option<FieldKind> {
    let lower = text.to_lowercase();
    if ["birth", "birthday", "dob"].iter().any(|kw| lower.contains(kw)) {
        return Some(FieldKind::DateOfBirth);
    }
    if lower.contains("name") {
        return Some(FieldKind::Name);
    }
    if lower.contains("phone") || lower.contains("number") {
        return Some(FieldKind::Phone);
    }
    if lower.contains("insurance") {
        return Some(FieldKind::Insurance);
    }
    if lower.contains("service") {
        return Some(FieldKind::Service);
    }
    if lower.contains("time") {
        return Some(FieldKind::PreferredTime);
    }
    if lower.contains("date") || lower.contains("day") {
        return Some(FieldKind::PreferredDate);
    }
    None
}

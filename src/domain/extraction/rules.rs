//! The concrete extraction rules, one per booking field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::booking::fields::FieldKind;
use crate::domain::qualification::{
    urgency_level, UrgencyLevel, ACCEPTED_INSURANCE, CASH_PAY, CASH_PAY_PHRASES, SERVICE_SYNONYMS,
    VALID_SERVICES,
};

use super::{Extracted, ExtractionRule};

// --- name ---------------------------------------------------------------

static NAME_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:my name(?:'s| is)|i am|i'm|this is|it's)\s+([A-Za-z][A-Za-z .'\-]*)")
        .expect("hard-coded pattern compiles")
});

/// Words that disqualify a candidate token from being part of a name.
const NAME_STOPWORDS: &[&str] = &[
    "phone", "number", "birth", "birthday", "insurance", "cash", "wrong", "calling", "about",
    "new", "patient", "appointment", "here", "today", "tomorrow", "pain", "hurt", "severe",
    "tooth", "sorry",
];

/// Filler that may precede the actual name after an anchor phrase.
const NAME_LEADING_FILLER: &[&str] = &["actually", "um", "uh", "well", "so"];

fn clean_name(raw: &str) -> Option<String> {
    let mut tokens: Vec<&str> = raw
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphabetic() && c != '\'' && c != '-'))
        .filter(|t| !t.is_empty())
        .collect();

    while matches!(tokens.first().map(|t| t.to_lowercase()), Some(t) if NAME_LEADING_FILLER.contains(&t.as_str()))
    {
        tokens.remove(0);
    }
    while matches!(tokens.last().map(|t| t.to_lowercase()), Some(t) if t == "here" || t == "speaking")
    {
        tokens.pop();
    }

    if tokens.len() < 2 || tokens.len() > 4 {
        return None;
    }
    for token in &tokens {
        if token.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        if NAME_STOPWORDS.contains(&token.to_lowercase().as_str()) {
            return None;
        }
    }

    let name = tokens
        .iter()
        .map(|t| {
            let mut chars = t.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Some(name)
}

pub struct NameRule;

impl ExtractionRule for NameRule {
    fn field(&self) -> FieldKind {
        FieldKind::Name
    }

    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        self.extract_explicit(text)
            .or_else(|| clean_name(text))
            .map(Extracted::trusted)
    }

    fn extract_explicit(&self, text: &str) -> Option<String> {
        let captures = NAME_ANCHOR_RE.captures(text)?;
        clean_name(captures.get(1)?.as_str())
    }
}

// --- phone --------------------------------------------------------------

static PHONE_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:phone|number|call|reach|text)\b\D{0,15}(\+?\d[\d\s().\-]{5,}\d)")
        .expect("hard-coded pattern compiles")
});

static PHONE_LOOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s().\-]{7,}\d").expect("hard-coded pattern compiles"));

fn digits_of(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

pub struct PhoneRule;

impl ExtractionRule for PhoneRule {
    fn field(&self) -> FieldKind {
        FieldKind::Phone
    }

    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        let digits = digits_of(text);
        match digits.len() {
            10..=15 => Some(Extracted::trusted(digits)),
            // Plausibly a number missing its area code; keep it but flag it.
            7..=9 => Some(Extracted::tentative(digits)),
            _ => None,
        }
    }

    fn extract_explicit(&self, text: &str) -> Option<String> {
        let captures = PHONE_ANCHOR_RE.captures(text)?;
        let digits = digits_of(captures.get(1)?.as_str());
        (10..=15).contains(&digits.len()).then_some(digits)
    }

    fn extract_loose(&self, text: &str) -> Option<String> {
        let matched = PHONE_LOOSE_RE.find(text)?;
        let digits = digits_of(matched.as_str());
        (10..=15).contains(&digits.len()).then_some(digits)
    }
}

// --- date of birth ------------------------------------------------------

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})\b").expect("hard-coded pattern compiles")
});

fn find_date(text: &str) -> Option<(String, bool)> {
    let captures = DATE_RE.captures(text)?;
    let whole = captures.get(0)?.as_str().to_string();
    let month: u32 = captures.get(1)?.as_str().parse().ok()?;
    let day: u32 = captures.get(2)?.as_str().parse().ok()?;
    let plausible = (1..=12).contains(&month) && (1..=31).contains(&day);
    Some((whole, plausible))
}

pub struct DobRule;

impl ExtractionRule for DobRule {
    fn field(&self) -> FieldKind {
        FieldKind::DateOfBirth
    }

    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        let (date, plausible) = find_date(text)?;
        Some(if plausible {
            Extracted::trusted(date)
        } else {
            Extracted::tentative(date)
        })
    }

    fn extract_explicit(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        if !["born", "birth", "dob"].iter().any(|kw| lower.contains(kw)) {
            return None;
        }
        let (date, plausible) = find_date(text)?;
        plausible.then_some(date)
    }

    fn extract_loose(&self, _text: &str) -> Option<String> {
        // A bare date in an arbitrary message is more likely an appointment
        // preference than a birth date.
        None
    }
}

// --- service ------------------------------------------------------------

fn find_service(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    for (synonym, canonical) in SERVICE_SYNONYMS {
        if lower.contains(synonym) {
            return Some(canonical);
        }
    }
    VALID_SERVICES.iter().find(|s| lower.contains(**s)).copied()
}

pub struct ServiceRule;

impl ExtractionRule for ServiceRule {
    fn field(&self) -> FieldKind {
        FieldKind::Service
    }

    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        find_service(text).map(Extracted::trusted)
    }

    fn extract_loose(&self, text: &str) -> Option<String> {
        find_service(text).map(str::to_string)
    }
}

// --- insurance ----------------------------------------------------------

static INSURANCE_CARRIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:have|with|through)\s+([A-Za-z][A-Za-z ]{1,30}?)\s+insurance\b")
        .expect("hard-coded pattern compiles")
});

static INSURANCE_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bmy insurance is\s+([A-Za-z][A-Za-z ]{1,30})")
        .expect("hard-coded pattern compiles")
});

fn known_insurance(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    if CASH_PAY_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(CASH_PAY.to_string());
    }
    ACCEPTED_INSURANCE
        .iter()
        .find(|p| lower.contains(**p))
        .map(|p| p.to_string())
}

pub struct InsuranceRule;

impl ExtractionRule for InsuranceRule {
    fn field(&self) -> FieldKind {
        FieldKind::Insurance
    }

    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        if let Some(known) = known_insurance(text) {
            return Some(Extracted::trusted(known));
        }
        // Unknown carrier named outright ("I have DentalPlus insurance").
        // Kept, but flagged so qualification can double-check it.
        let captures = INSURANCE_CARRIER_RE.captures(text)?;
        let carrier = captures.get(1)?.as_str().trim().to_lowercase();
        (!carrier.is_empty()).then(|| Extracted::tentative(carrier))
    }

    fn extract_explicit(&self, text: &str) -> Option<String> {
        if let Some(known) = known_insurance(text) {
            if INSURANCE_ANCHOR_RE.is_match(text) || text.to_lowercase().contains("insurance") {
                return Some(known);
            }
            return None;
        }
        let captures = INSURANCE_ANCHOR_RE.captures(text)?;
        Some(captures.get(1)?.as_str().trim().to_lowercase())
    }

    fn extract_loose(&self, text: &str) -> Option<String> {
        known_insurance(text)
    }
}

// --- patient type -------------------------------------------------------

const NEW_PATIENT_PHRASES: &[&str] = &[
    "new patient",
    "first time",
    "first visit",
    "never been",
    "haven't been",
    "i'm new",
    "im new",
];

const EXISTING_PATIENT_PHRASES: &[&str] = &[
    "been here before",
    "been there before",
    "been before",
    "existing patient",
    "returning",
    "regular patient",
    "come here before",
    "you've seen me",
];

fn find_patient_type(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    // "never been there before" must read as new, so new phrases win.
    if NEW_PATIENT_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some("new");
    }
    if EXISTING_PATIENT_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some("existing");
    }
    None
}

pub struct PatientTypeRule;

impl ExtractionRule for PatientTypeRule {
    fn field(&self) -> FieldKind {
        FieldKind::PatientType
    }

    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        find_patient_type(text).map(Extracted::trusted)
    }

    fn extract_loose(&self, text: &str) -> Option<String> {
        find_patient_type(text).map(str::to_string)
    }
}

// --- urgency ------------------------------------------------------------

pub struct UrgencyRule;

impl ExtractionRule for UrgencyRule {
    fn field(&self) -> FieldKind {
        FieldKind::Urgency
    }

    /// The urgency question always resolves: with no timing keyword the
    /// answer is routine. This keeps the flow from stalling on that state.
    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        Some(Extracted::trusted(urgency_level(text).as_str()))
    }

    fn extract_loose(&self, text: &str) -> Option<String> {
        let level = urgency_level(text);
        (level > UrgencyLevel::Routine).then(|| level.as_str().to_string())
    }
}

// --- scheduling preferences ---------------------------------------------

const DAY_KEYWORDS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "tomorrow",
    "today",
    "next week",
    "this week",
];

static SLOT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}[/\-]\d{1,2}(?:[/\-]\d{2,4})?\b").expect("hard-coded pattern compiles")
});

pub struct PreferredDateRule;

impl ExtractionRule for PreferredDateRule {
    fn field(&self) -> FieldKind {
        FieldKind::PreferredDate
    }

    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        let lower = text.to_lowercase();
        if let Some(day) = DAY_KEYWORDS.iter().find(|d| lower.contains(**d)) {
            return Some(Extracted::trusted(*day));
        }
        SLOT_DATE_RE
            .find(text)
            .map(|m| Extracted::trusted(m.as_str()))
    }

    fn extract_loose(&self, text: &str) -> Option<String> {
        // Numeric dates outside the scheduling step are too ambiguous; only
        // day words are picked up opportunistically.
        let lower = text.to_lowercase();
        DAY_KEYWORDS
            .iter()
            .find(|d| lower.contains(**d))
            .map(|d| d.to_string())
    }
}

const TIME_KEYWORDS: &[&str] = &["morning", "afternoon", "evening", "noon", "midday"];

static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:am|pm)\b").expect("hard-coded pattern compiles")
});

pub struct PreferredTimeRule;

impl ExtractionRule for PreferredTimeRule {
    fn field(&self) -> FieldKind {
        FieldKind::PreferredTime
    }

    fn extract_focused(&self, text: &str) -> Option<Extracted> {
        self.extract_loose(text).map(Extracted::trusted)
    }

    fn extract_loose(&self, text: &str) -> Option<String> {
        let lower = text.to_lowercase();
        if let Some(slot) = TIME_KEYWORDS.iter().find(|t| lower.contains(**t)) {
            return Some(slot.to_string());
        }
        CLOCK_RE.find(text).map(|m| m.as_str().to_lowercase())
    }
}

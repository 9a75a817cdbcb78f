//! Field extraction from user messages.
//!
//! Each turn runs a single ordered pass over the rule set. A rule can act in
//! three modes, tried in this order:
//!
//! 1. **Focused** - the current state asked for this rule's field, so the
//!    whole message is candidate input. Focused matches may overwrite and may
//!    store low-confidence values as tentative.
//! 2. **Explicit** - the caller anchored the value ("my name is ...",
//!    "my number is ..."). Explicit matches are trusted and may overwrite
//!    regardless of state; this is how corrections land.
//! 3. **Loose** - the value merely appeared somewhere in the message. Loose
//!    matches are fill-only: they never replace a value already collected.

pub mod confirmation;
pub mod rules;

pub use confirmation::{correction_target, parse_confirmation};

use crate::domain::booking::fields::{BookingFields, FieldKind};
use crate::domain::booking::state::ConversationState;

/// A value pulled out of a message, with a confidence marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub value: String,
    /// Low-confidence; stored for later re-confirmation, never trusted.
    pub tentative: bool,
}

impl Extracted {
    pub fn trusted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tentative: false,
        }
    }

    pub fn tentative(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tentative: true,
        }
    }
}

/// One field's extraction logic.
pub trait ExtractionRule: Send + Sync {
    /// The field this rule populates.
    fn field(&self) -> FieldKind;

    /// Whether the given state is actively asking for this field.
    fn applies_to(&self, state: ConversationState) -> bool {
        ConversationState::collecting_state_for(self.field()) == Some(state)
    }

    /// Extraction when the current state asked for this field.
    fn extract_focused(&self, text: &str) -> Option<Extracted>;

    /// Extraction from an anchoring phrase, valid in any state.
    fn extract_explicit(&self, _text: &str) -> Option<String> {
        None
    }

    /// Opportunistic extraction from any message. Fill-only.
    fn extract_loose(&self, _text: &str) -> Option<String> {
        None
    }
}

/// The ordered rule set applied to every user message.
pub struct ExtractionPipeline {
    rules: Vec<Box<dyn ExtractionRule>>,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionPipeline {
    /// The standard rule order. Deterministic: a message always touches
    /// fields in the same sequence.
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(rules::PatientTypeRule),
                Box::new(rules::ServiceRule),
                Box::new(rules::UrgencyRule),
                Box::new(rules::NameRule),
                Box::new(rules::PhoneRule),
                Box::new(rules::DobRule),
                Box::new(rules::InsuranceRule),
                Box::new(rules::PreferredDateRule),
                Box::new(rules::PreferredTimeRule),
            ],
        }
    }

    /// Runs one pass over the message, mutating `fields` in place.
    ///
    /// Returns the fields that were actually written this turn, in rule
    /// order. Each field is visited at most once per pass.
    pub fn run(
        &self,
        state: ConversationState,
        text: &str,
        fields: &mut BookingFields,
    ) -> Vec<FieldKind> {
        let mut touched = Vec::new();
        for rule in &self.rules {
            let kind = rule.field();

            if rule.applies_to(state) {
                if let Some(extracted) = rule.extract_focused(text) {
                    let stored = if extracted.tentative {
                        fields.store_tentative(kind, &extracted.value)
                    } else {
                        fields.overwrite(kind, &extracted.value)
                    };
                    if stored {
                        touched.push(kind);
                    }
                    continue;
                }
            }

            if let Some(value) = rule.extract_explicit(text) {
                if fields.overwrite(kind, &value) {
                    touched.push(kind);
                }
                continue;
            }

            if let Some(value) = rule.extract_loose(text) {
                if fields.fill(kind, &value) {
                    touched.push(kind);
                }
            }
        }
        touched
    }
}

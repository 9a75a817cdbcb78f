//! Structured booking fields collected over the conversation.
//!
//! Writes go through [`BookingFields::fill`] and [`BookingFields::overwrite`]:
//! `fill` never clobbers an existing value, `overwrite` is reserved for the
//! state-specific extraction pass and explicit corrections. Malformed values
//! are stored tentatively and re-surfaced at the verification step instead of
//! being rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::qualification::UrgencyLevel;

/// The booking fields the conversation can populate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Name,
    Phone,
    DateOfBirth,
    Insurance,
    Service,
    PreferredDate,
    PreferredTime,
    PatientType,
    Urgency,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Phone => "phone",
            FieldKind::DateOfBirth => "date_of_birth",
            FieldKind::Insurance => "insurance",
            FieldKind::Service => "service",
            FieldKind::PreferredDate => "preferred_date",
            FieldKind::PreferredTime => "preferred_time",
            FieldKind::PatientType => "patient_type",
            FieldKind::Urgency => "urgency",
        }
    }

    /// Caller-facing label for re-prompts and missing-field reports.
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Name => "full name",
            FieldKind::Phone => "phone number",
            FieldKind::DateOfBirth => "date of birth",
            FieldKind::Insurance => "insurance information",
            FieldKind::Service => "service needed",
            FieldKind::PreferredDate => "preferred date",
            FieldKind::PreferredTime => "preferred time",
            FieldKind::PatientType => "new or existing patient",
            FieldKind::Urgency => "how soon you need to be seen",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields the clinic requires before an appointment can be booked.
pub const REQUIRED_FIELDS: &[FieldKind] = &[
    FieldKind::Name,
    FieldKind::Phone,
    FieldKind::DateOfBirth,
    FieldKind::Service,
    FieldKind::Insurance,
];

/// Collected booking data for one session.
///
/// All fields start empty and are filled by the extraction pipeline. The
/// fields are private so every write passes the fill/overwrite guard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingFields {
    name: Option<String>,
    phone: Option<String>,
    date_of_birth: Option<String>,
    insurance: Option<String>,
    service: Option<String>,
    preferred_date: Option<String>,
    preferred_time: Option<String>,
    is_new_patient: Option<bool>,
    urgency: Option<UrgencyLevel>,
    #[serde(default)]
    emergency: bool,
    /// Fields stored with dubious values, pending re-confirmation.
    #[serde(default)]
    tentative: BTreeSet<FieldKind>,
}

impl BookingFields {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn date_of_birth(&self) -> Option<&str> {
        self.date_of_birth.as_deref()
    }

    pub fn insurance(&self) -> Option<&str> {
        self.insurance.as_deref()
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn preferred_date(&self) -> Option<&str> {
        self.preferred_date.as_deref()
    }

    pub fn preferred_time(&self) -> Option<&str> {
        self.preferred_time.as_deref()
    }

    pub fn is_new_patient(&self) -> Option<bool> {
        self.is_new_patient
    }

    pub fn urgency(&self) -> Option<UrgencyLevel> {
        self.urgency
    }

    pub fn emergency(&self) -> bool {
        self.emergency
    }

    /// Marks the session as an emergency and pins urgency to the top level.
    pub fn flag_emergency(&mut self) {
        self.emergency = true;
        self.urgency = Some(UrgencyLevel::Emergency);
    }

    /// Returns the stored value for a field, stringified for display.
    pub fn get(&self, kind: FieldKind) -> Option<String> {
        match kind {
            FieldKind::Name => self.name.clone(),
            FieldKind::Phone => self.phone.clone(),
            FieldKind::DateOfBirth => self.date_of_birth.clone(),
            FieldKind::Insurance => self.insurance.clone(),
            FieldKind::Service => self.service.clone(),
            FieldKind::PreferredDate => self.preferred_date.clone(),
            FieldKind::PreferredTime => self.preferred_time.clone(),
            FieldKind::PatientType => self
                .is_new_patient
                .map(|new| if new { "new" } else { "existing" }.to_string()),
            FieldKind::Urgency => self.urgency.map(|u| u.as_str().to_string()),
        }
    }

    /// Returns true when the field holds a value (tentative or not).
    pub fn is_set(&self, kind: FieldKind) -> bool {
        self.get(kind).is_some()
    }

    /// Writes a field only when it is currently empty or tentative.
    ///
    /// Returns true when the value was written. This is the guard that keeps
    /// the general extraction pass from clobbering validated answers.
    pub fn fill(&mut self, kind: FieldKind, value: &str) -> bool {
        if self.is_set(kind) && !self.is_tentative(kind) {
            return false;
        }
        self.store(kind, value)
    }

    /// Writes a field unconditionally.
    ///
    /// Only the state-specific extraction pass and explicit corrections may
    /// use this.
    pub fn overwrite(&mut self, kind: FieldKind, value: &str) -> bool {
        self.store(kind, value)
    }

    /// Stores a dubious value and flags it for re-confirmation.
    ///
    /// Never replaces a value that is already present and trusted.
    pub fn store_tentative(&mut self, kind: FieldKind, value: &str) -> bool {
        if self.is_set(kind) && !self.is_tentative(kind) {
            return false;
        }
        if self.store(kind, value) {
            self.tentative.insert(kind);
            true
        } else {
            false
        }
    }

    pub fn is_tentative(&self, kind: FieldKind) -> bool {
        self.tentative.contains(&kind)
    }

    /// Fields awaiting re-confirmation at the verification step.
    pub fn tentative_fields(&self) -> Vec<FieldKind> {
        self.tentative.iter().copied().collect()
    }

    /// Required fields that are still empty.
    pub fn missing_required(&self) -> Vec<FieldKind> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|kind| !self.is_set(*kind))
            .collect()
    }

    /// True when every required field holds a value.
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    fn store(&mut self, kind: FieldKind, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let written = match kind {
            FieldKind::Name => {
                self.name = Some(value.to_string());
                true
            }
            FieldKind::Phone => {
                self.phone = Some(value.to_string());
                true
            }
            FieldKind::DateOfBirth => {
                self.date_of_birth = Some(value.to_string());
                true
            }
            FieldKind::Insurance => {
                self.insurance = Some(value.to_string());
                true
            }
            FieldKind::Service => {
                self.service = Some(value.to_string());
                true
            }
            FieldKind::PreferredDate => {
                self.preferred_date = Some(value.to_string());
                true
            }
            FieldKind::PreferredTime => {
                self.preferred_time = Some(value.to_string());
                true
            }
            FieldKind::PatientType => match value {
                "new" | "new_patient" => {
                    self.is_new_patient = Some(true);
                    true
                }
                "existing" | "returning" => {
                    self.is_new_patient = Some(false);
                    true
                }
                _ => false,
            },
            FieldKind::Urgency => match value.parse::<UrgencyLevel>() {
                Ok(level) => {
                    self.urgency = Some(level);
                    true
                }
                Err(()) => false,
            },
        };
        if written {
            self.tentative.remove(&kind);
        }
        written
    }
}

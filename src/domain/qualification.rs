//! Patient qualification rules for the clinic.
//!
//! Fixed vocabularies (emergency keywords, accepted insurance, valid
//! services) plus a weighted completeness score over the collected booking
//! fields. The urgency scan is deliberately biased toward flagging: a false
//! positive costs a re-route, a false negative costs patient safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::booking::fields::{BookingFields, FieldKind};

/// Sentinel insurance value for patients paying out of pocket.
pub const CASH_PAY: &str = "cash_pay";

/// Keywords that force the emergency short-circuit.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "emergency",
    "urgent",
    "severe pain",
    "bleeding",
    "swelling",
    "broken tooth",
    "knocked out tooth",
    "accident",
    "trauma",
    "can't eat",
    "can't sleep",
    "can't breathe",
    "difficulty breathing",
    "unbearable",
    "excruciating",
    "abscess",
];

const SAME_DAY_KEYWORDS: &[&str] = &[
    "today",
    "right now",
    "asap",
    "immediately",
    "as soon as possible",
];

const THIS_WEEK_KEYWORDS: &[&str] = &["this week", "within a week", "few days"];

/// Insurance providers the clinic is in network with.
pub const ACCEPTED_INSURANCE: &[&str] = &[
    "aetna",
    "blue cross",
    "blue shield",
    "cigna",
    "delta dental",
    "guardian",
    "humana",
    "metlife",
    "united healthcare",
    "medicare",
    "medicaid",
];

/// Phrases indicating the caller will pay without insurance.
pub const CASH_PAY_PHRASES: &[&str] = &[
    "no insurance",
    "cash",
    "self pay",
    "self-pay",
    "out of pocket",
    "paying myself",
    "don't have insurance",
];

/// Services the clinic offers, matched as substrings.
pub const VALID_SERVICES: &[&str] = &[
    // Routine
    "cleaning",
    "checkup",
    "exam",
    "consultation",
    "x-ray",
    "screening",
    // Restorative
    "filling",
    "cavity",
    "crown",
    "bridge",
    "root canal",
    "extraction",
    "implant",
    // Cosmetic
    "whitening",
    "veneers",
    "bonding",
    // Orthodontics
    "braces",
    "invisalign",
    "retainer",
    // Problems
    "pain",
    "toothache",
    "broken tooth",
    "infection",
];

/// Synonym -> canonical service mappings applied before the vocabulary scan.
pub const SERVICE_SYNONYMS: &[(&str, &str)] = &[
    ("teeth cleaning", "cleaning"),
    ("dental cleaning", "cleaning"),
    ("check up", "checkup"),
    ("check-up", "checkup"),
    ("hurt", "pain"),
    ("ache", "pain"),
];

/// How soon the patient needs to be seen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    #[default]
    Routine,
    Urgent,
    SameDay,
    Emergency,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Routine => "routine",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::SameDay => "same_day",
            UrgencyLevel::Emergency => "emergency",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "routine" => Ok(UrgencyLevel::Routine),
            "urgent" => Ok(UrgencyLevel::Urgent),
            "same_day" => Ok(UrgencyLevel::SameDay),
            "emergency" => Ok(UrgencyLevel::Emergency),
            _ => Err(()),
        }
    }
}

/// Returns true when the message contains any emergency keyword.
///
/// Case-insensitive substring match. Pure function of the text.
pub fn is_emergency(text: &str) -> bool {
    let text = text.to_lowercase();
    EMERGENCY_KEYWORDS.iter().any(|kw| text.contains(kw))
}

/// Classifies how soon the patient wants to be seen.
pub fn urgency_level(text: &str) -> UrgencyLevel {
    let text = text.to_lowercase();
    if EMERGENCY_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return UrgencyLevel::Emergency;
    }
    if SAME_DAY_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return UrgencyLevel::SameDay;
    }
    if THIS_WEEK_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return UrgencyLevel::Urgent;
    }
    UrgencyLevel::Routine
}

/// Whether the clinic can bill the given insurance value.
///
/// Cash-pay patients are always accepted.
pub fn insurance_accepted(insurance: &str) -> bool {
    if insurance == CASH_PAY {
        return true;
    }
    let insurance = insurance.to_lowercase();
    ACCEPTED_INSURANCE.iter().any(|p| insurance.contains(p))
}

/// Outcome of qualifying the collected data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    /// All required information collected and acceptable.
    Qualified,
    /// Still collecting information.
    NeedsMoreInfo,
    /// Insurance is outside the clinic's network.
    NotQualified,
    /// Needs immediate attention; booking flow is bypassed.
    Emergency,
}

/// Weighted completeness report over the booking fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationReport {
    pub status: LeadStatus,
    /// 0-100 completeness score.
    pub score: u8,
    /// Required fields still empty.
    pub missing: Vec<FieldKind>,
    /// Human-readable scoring notes.
    pub reasons: Vec<String>,
}

/// Scores the collected fields and decides the lead status.
///
/// Weights follow the clinic's intake rules: phone and service matter most,
/// name and date of birth next, insurance and a known timeline round it out.
pub fn qualify(fields: &BookingFields) -> QualificationReport {
    let mut score: u8 = 0;
    let mut reasons = Vec::new();
    let missing = fields.missing_required();

    if fields.name().is_some() {
        score += 15;
        reasons.push("Patient name collected".to_string());
    }
    if fields.phone().is_some() {
        score += 20;
        reasons.push("Contact phone collected".to_string());
    }
    if fields.date_of_birth().is_some() {
        score += 15;
        reasons.push("Date of birth collected".to_string());
    }
    if let Some(service) = fields.service() {
        score += 20;
        reasons.push(format!("Service requested: {service}"));
    }

    if let Some(insurance) = fields.insurance() {
        if insurance_accepted(insurance) {
            score += 15;
            reasons.push(format!("Insurance accepted: {insurance}"));
        } else {
            reasons.push(format!("Insurance not in network: {insurance}"));
            return QualificationReport {
                status: LeadStatus::NotQualified,
                score,
                missing,
                reasons,
            };
        }
    }

    if fields.emergency() {
        reasons.push("Emergency flagged during conversation".to_string());
        return QualificationReport {
            status: LeadStatus::Emergency,
            score,
            missing,
            reasons,
        };
    }

    if let Some(urgency) = fields.urgency() {
        score += 15;
        reasons.push(format!("Timeline known: {urgency}"));
    }

    let status = if missing.is_empty() && score >= 85 {
        LeadStatus::Qualified
    } else {
        LeadStatus::NeedsMoreInfo
    };

    QualificationReport {
        status,
        score,
        missing,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod urgency {
        use super::*;

        #[test]
        fn detects_emergency_keywords() {
            assert!(is_emergency("I have severe pain in my jaw"));
            assert!(is_emergency("there's BLEEDING that won't stop"));
            assert!(is_emergency("my tooth got knocked out in an accident"));
            assert!(is_emergency("I can't breathe properly"));
        }

        #[test]
        fn routine_messages_are_not_emergencies() {
            assert!(!is_emergency("I'd like a cleaning next week"));
            assert!(!is_emergency("hello, can I book a checkup?"));
        }

        #[test]
        fn classifies_levels() {
            assert_eq!(urgency_level("severe pain"), UrgencyLevel::Emergency);
            assert_eq!(urgency_level("I need to come in today"), UrgencyLevel::SameDay);
            assert_eq!(urgency_level("sometime this week please"), UrgencyLevel::Urgent);
            assert_eq!(urgency_level("next month is fine"), UrgencyLevel::Routine);
        }

        #[test]
        fn emergency_outranks_same_day() {
            // "today" and "bleeding" in the same message
            assert_eq!(
                urgency_level("I'm bleeding, can you see me today?"),
                UrgencyLevel::Emergency
            );
        }

        #[test]
        fn level_ordering_matches_severity() {
            assert!(UrgencyLevel::Emergency > UrgencyLevel::SameDay);
            assert!(UrgencyLevel::SameDay > UrgencyLevel::Urgent);
            assert!(UrgencyLevel::Urgent > UrgencyLevel::Routine);
        }

        #[test]
        fn round_trips_through_str() {
            for level in [
                UrgencyLevel::Routine,
                UrgencyLevel::Urgent,
                UrgencyLevel::SameDay,
                UrgencyLevel::Emergency,
            ] {
                assert_eq!(level.as_str().parse::<UrgencyLevel>(), Ok(level));
            }
        }
    }

    mod insurance {
        use super::*;

        #[test]
        fn accepts_known_providers() {
            assert!(insurance_accepted("aetna"));
            assert!(insurance_accepted("Delta Dental"));
        }

        #[test]
        fn accepts_cash_pay() {
            assert!(insurance_accepted(CASH_PAY));
        }

        #[test]
        fn rejects_unknown_providers() {
            assert!(!insurance_accepted("acme discount dental"));
        }
    }

    mod scoring {
        use super::*;

        fn complete_fields() -> BookingFields {
            let mut fields = BookingFields::default();
            fields.overwrite(FieldKind::Name, "Jane Smith");
            fields.overwrite(FieldKind::Phone, "5551234567");
            fields.overwrite(FieldKind::DateOfBirth, "01/02/1990");
            fields.overwrite(FieldKind::Service, "cleaning");
            fields.overwrite(FieldKind::Insurance, "aetna");
            fields.overwrite(FieldKind::Urgency, "routine");
            fields
        }

        #[test]
        fn complete_fields_qualify() {
            let report = qualify(&complete_fields());
            assert_eq!(report.status, LeadStatus::Qualified);
            assert_eq!(report.score, 100);
            assert!(report.missing.is_empty());
        }

        #[test]
        fn empty_fields_need_more_info() {
            let report = qualify(&BookingFields::default());
            assert_eq!(report.status, LeadStatus::NeedsMoreInfo);
            assert_eq!(report.score, 0);
            assert_eq!(report.missing.len(), 5);
        }

        #[test]
        fn out_of_network_insurance_disqualifies() {
            let mut fields = complete_fields();
            fields.overwrite(FieldKind::Insurance, "acme discount dental");
            let report = qualify(&fields);
            assert_eq!(report.status, LeadStatus::NotQualified);
        }

        #[test]
        fn emergency_flag_dominates() {
            let mut fields = complete_fields();
            fields.flag_emergency();
            let report = qualify(&fields);
            assert_eq!(report.status, LeadStatus::Emergency);
        }
    }
}

//! End-to-end conversation flows through the conversation manager.

use std::sync::Arc;

use clinic_concierge::adapters::ai::MockReplyGenerator;
use clinic_concierge::adapters::sinks::{
    RecordingBookingSink, RecordingConversationStore, RecordingNotificationSink,
};
use clinic_concierge::adapters::storage::InMemorySessionStore;
use clinic_concierge::application::{ConversationManager, TurnOutcome};
use clinic_concierge::domain::booking::{BookingStatus, ConversationState, MessageSource};
use clinic_concierge::domain::qualification::LeadStatus;

struct Harness {
    manager: Arc<ConversationManager>,
    bookings: Arc<RecordingBookingSink>,
    notifications: Arc<RecordingNotificationSink>,
    conversations: Arc<RecordingConversationStore>,
}

fn harness() -> Harness {
    let bookings = Arc::new(RecordingBookingSink::new());
    let notifications = Arc::new(RecordingNotificationSink::new());
    let conversations = Arc::new(RecordingConversationStore::new());
    let manager = Arc::new(ConversationManager::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(MockReplyGenerator::new()),
        bookings.clone(),
        notifications.clone(),
        conversations.clone(),
    ));
    Harness {
        manager,
        bookings,
        notifications,
        conversations,
    }
}

async fn say(harness: &Harness, session: &str, text: &str) -> TurnOutcome {
    harness
        .manager
        .handle_message(session, text, MessageSource::Chat)
        .await
        .expect("turn should succeed")
}

/// Walks a session from greeting up to the verification step.
async fn reach_verification(harness: &Harness, session: &str) {
    say(harness, session, "hi, I'd like to book an appointment").await;
    say(harness, session, "I'm a new patient").await;
    say(harness, session, "just a cleaning").await;
    say(harness, session, "no rush at all").await;
    say(harness, session, "my name is Jane Smith").await;
    say(harness, session, "555-123-4567").await;
    say(harness, session, "03/14/1985").await;
    let outcome = say(harness, session, "I have Aetna").await;
    assert_eq!(outcome.state, ConversationState::VerifyInfo);
}

#[tokio::test]
async fn full_booking_conversation() {
    let harness = harness();
    reach_verification(&harness, "s-full").await;

    let verified = say(&harness, "s-full", "yes, that's all correct").await;
    assert_eq!(verified.state, ConversationState::CheckAvailability);
    assert!(verified.is_complete);
    assert_eq!(verified.qualification.status, LeadStatus::Qualified);

    let offered = say(&harness, "s-full", "Tuesday morning please").await;
    assert_eq!(offered.state, ConversationState::BookAppointment);

    let confirming = say(&harness, "s-full", "that works for me").await;
    assert_eq!(confirming.state, ConversationState::ConfirmBooking);

    let done = say(&harness, "s-full", "yes, book it!").await;
    assert_eq!(done.state, ConversationState::Completed);
    assert_eq!(done.fields.name(), Some("Jane Smith"));
    assert_eq!(done.fields.phone(), Some("5551234567"));
    assert_eq!(done.fields.insurance(), Some("aetna"));

    let statuses: Vec<BookingStatus> = harness
        .bookings
        .records()
        .iter()
        .map(|r| r.status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            BookingStatus::Pending,
            BookingStatus::AwaitingConfirmation,
            BookingStatus::Confirmed,
        ]
    );
    // Every record carried the collected phone, so three texts went out.
    assert_eq!(harness.notifications.sent().len(), 3);
    // One transcript save per turn.
    assert_eq!(harness.conversations.saves().len(), 12);
}

#[tokio::test]
async fn declining_the_slot_reoffers_without_duplicate_records() {
    let harness = harness();
    reach_verification(&harness, "s-retry").await;
    say(&harness, "s-retry", "yes").await;
    say(&harness, "s-retry", "Tuesday morning").await;
    say(&harness, "s-retry", "sounds good").await;

    // Decline at the final gate; the flow reopens availability.
    let declined = say(&harness, "s-retry", "no, that time is bad actually").await;
    assert_eq!(declined.state, ConversationState::CheckAvailability);

    let reoffered = say(&harness, "s-retry", "Wednesday afternoon then").await;
    assert_eq!(reoffered.state, ConversationState::BookAppointment);
    assert_eq!(
        reoffered.fields.get(clinic_concierge::domain::booking::FieldKind::PreferredDate),
        Some("wednesday".to_string())
    );

    say(&harness, "s-retry", "ok great").await;
    let done = say(&harness, "s-retry", "yes book it").await;
    assert_eq!(done.state, ConversationState::Completed);

    // Re-entering BookAppointment and ConfirmBooking must not re-emit.
    let records = harness.bookings.records();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records
            .iter()
            .filter(|r| r.status == BookingStatus::Confirmed)
            .count(),
        1
    );
}

#[tokio::test]
async fn correction_at_verification_routes_back_to_the_field() {
    let harness = harness();
    reach_verification(&harness, "s-fix").await;

    let rejected = say(&harness, "s-fix", "no, my name is wrong").await;
    assert_eq!(rejected.state, ConversationState::CollectName);
    // The rejection itself must not overwrite the name with garbage.
    assert_eq!(rejected.fields.name(), Some("Jane Smith"));

    let fixed = say(&harness, "s-fix", "it's actually Janet Smythe").await;
    assert_eq!(fixed.fields.name(), Some("Janet Smythe"));
    assert_eq!(fixed.state, ConversationState::CollectPhone);
}

#[tokio::test]
async fn emergency_cuts_through_mid_flow() {
    let harness = harness();
    say(&harness, "s-er", "hello").await;
    say(&harness, "s-er", "new patient").await;

    let outcome = say(&harness, "s-er", "actually my tooth broke and I'm in severe pain").await;
    assert_eq!(outcome.state, ConversationState::Emergency);
    assert!(outcome.fields.emergency());
    assert_eq!(outcome.qualification.status, LeadStatus::Emergency);
    assert!(outcome.reply.contains("emergency line"));

    // Terminal: further messages don't restart the flow or emit bookings.
    let after = say(&harness, "s-er", "so can I book a cleaning?").await;
    assert_eq!(after.state, ConversationState::Emergency);
    assert!(harness.bookings.records().is_empty());
    assert!(harness.notifications.sent().is_empty());
}

#[tokio::test]
async fn out_of_network_insurance_is_flagged_not_fatal() {
    let harness = harness();
    say(&harness, "s-oon", "hi").await;
    say(&harness, "s-oon", "first time").await;
    say(&harness, "s-oon", "checkup").await;
    say(&harness, "s-oon", "whenever").await;
    say(&harness, "s-oon", "my name is Bob Jones").await;
    say(&harness, "s-oon", "555-987-6543").await;
    say(&harness, "s-oon", "07/04/1990").await;

    let outcome = say(&harness, "s-oon", "my insurance is acme discount dental").await;
    assert_eq!(outcome.qualification.status, LeadStatus::NotQualified);
    // The conversation still proceeds; staff can sort the billing out.
    assert_eq!(outcome.state, ConversationState::VerifyInfo);
}

#[tokio::test]
async fn sessions_are_isolated_from_each_other() {
    let harness = harness();
    say(&harness, "alice", "my name is Alice Adams").await;
    say(&harness, "bob", "my name is Bob Brown").await;

    let alice = harness.manager.get_session("alice").await.unwrap().unwrap();
    let bob = harness.manager.get_session("bob").await.unwrap().unwrap();
    assert_eq!(alice.fields().name(), Some("Alice Adams"));
    assert_eq!(bob.fields().name(), Some("Bob Brown"));
    assert_eq!(harness.manager.session_count().await.unwrap(), 2);
}

#[tokio::test]
async fn concurrent_messages_to_one_session_are_serialized() {
    let harness = harness();
    let mut tasks = Vec::new();
    for i in 0..6 {
        let manager = harness.manager.clone();
        tasks.push(tokio::spawn(async move {
            manager
                .handle_message("s-race", &format!("message number {i}"), MessageSource::Chat)
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().expect("turn should succeed");
    }

    let session = harness.manager.get_session("s-race").await.unwrap().unwrap();
    // Six user turns plus six assistant replies, none lost to interleaving.
    assert_eq!(session.messages().len(), 12);
    assert_eq!(session.turn_count(), 12);
}

mod properties {
    use clinic_concierge::domain::booking::{
        next_state, BookingFields, ConversationState, TurnSignals,
    };
    use clinic_concierge::domain::booking::state::STATE_ORDER;
    use clinic_concierge::domain::extraction::{parse_confirmation, ExtractionPipeline};
    use proptest::prelude::*;

    fn any_state() -> impl Strategy<Value = ConversationState> {
        let mut states = STATE_ORDER.to_vec();
        states.push(ConversationState::Emergency);
        proptest::sample::select(states)
    }

    proptest! {
        #[test]
        fn emergency_signal_always_lands_in_emergency(state in any_state()) {
            let signals = TurnSignals { emergency: true, ..Default::default() };
            prop_assert_eq!(
                next_state(state, &BookingFields::default(), &signals),
                ConversationState::Emergency
            );
        }

        #[test]
        fn transitions_never_skip_ahead(state in any_state(), yes in any::<bool>()) {
            let mut fields = BookingFields::default();
            for kind in clinic_concierge::domain::booking::fields::REQUIRED_FIELDS {
                fields.overwrite(*kind, match kind {
                    clinic_concierge::domain::booking::FieldKind::Phone => "5551234567",
                    _ => "something",
                });
            }
            let signals = TurnSignals {
                confirmation: yes.then_some(
                    clinic_concierge::domain::booking::Confirmation::Affirmative,
                ),
                ..Default::default()
            };
            let next = next_state(state, &fields, &signals);
            if let (Some(from), Some(to)) = (state.order_index(), next.order_index()) {
                prop_assert!(to <= from + 1, "{} jumped to {}", state, next);
            }
        }

        #[test]
        fn confirmation_parser_handles_arbitrary_text(text in ".{0,200}") {
            let _ = parse_confirmation(&text);
        }

        #[test]
        fn extraction_pass_handles_arbitrary_text(state in any_state(), text in ".{0,200}") {
            let pipeline = ExtractionPipeline::new();
            let mut fields = BookingFields::default();
            let _ = pipeline.run(state, &text, &mut fields);
        }
    }
}

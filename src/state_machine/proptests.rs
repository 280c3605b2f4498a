//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

#![allow(clippy::collapsible_if)]

use super::state::*;
use super::transition::*;
use super::*;
use crate::session::{Comparison, InterviewType, JobBackground, SessionView, Summary, Turn};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_interview_type() -> impl Strategy<Value = InterviewType> {
    prop_oneof![
        Just(InterviewType::Technical),
        Just(InterviewType::Behavioral),
        Just(InterviewType::General),
    ]
}

fn arb_job_background() -> impl Strategy<Value = JobBackground> {
    ("[A-Za-z ]{0,20}", "[A-Za-z ]{0,40}").prop_map(|(title, desc)| JobBackground::new(title, desc))
}

fn arb_summary() -> impl Strategy<Value = Summary> {
    (
        "[a-zA-Z ]{0,30}",
        proptest::collection::vec(("[a-z]{1,8}", "[a-z]{1,8}", "[a-z]{1,8}"), 0..3),
    )
        .prop_map(|(suggestions, comparisons)| Summary {
            transcript: vec![],
            suggestions,
            comparisons: comparisons
                .into_iter()
                .map(|(question, user_answer, sample_answer)| Comparison {
                    question,
                    user_answer,
                    sample_answer,
                })
                .collect(),
        })
}

fn arb_start_event() -> impl Strategy<Value = Event> {
    (arb_interview_type(), arb_job_background()).prop_map(|(interview_type, job_background)| {
        Event::StartSession {
            interview_type,
            job_background,
        }
    })
}

fn arb_submit_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ]{1,30}".prop_map(|text| Event::SubmitUserMessage { text }),
        "[ \t\n]{0,5}".prop_map(|text| Event::SubmitUserMessage { text }),
    ]
}

fn arb_user_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_interview_type().prop_map(|interview_type| Event::ChooseInterviewType { interview_type }),
        Just(Event::ReturnToLanding),
        arb_start_event(),
        arb_submit_event(),
        Just(Event::EndSession),
        Just(Event::Restart),
    ]
}

fn arb_service_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-zA-Z ?]{1,30}".prop_map(|message| Event::InterviewerMessage { message }),
        arb_summary().prop_map(|summary| Event::InterviewSummary { summary }),
        "[a-zA-Z ]{1,30}".prop_map(|message| Event::ServiceError { message }),
        (0u64..8).prop_map(|id| Event::ReplyTimeout {
            request_id: RequestId(id)
        }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_user_event(), arb_service_event()]
}

/// States reachable from a fresh session
fn arb_reachable_state() -> impl Strategy<Value = SessionState> {
    proptest::collection::vec(arb_event(), 0..25).prop_map(|events| {
        let mut state = SessionState::new();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }
        state
    })
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn view_matches_phase(state: &SessionState) -> bool {
    match state.protocol {
        ProtocolState::Idle => matches!(
            state.view(),
            SessionView::Landing
                | SessionView::TechnicalIntake
                | SessionView::BehavioralIntake
                | SessionView::GeneralIntake
        ),
        ProtocolState::AwaitingReply { .. } | ProtocolState::Composing => {
            state.view() == SessionView::Chat
        }
        ProtocolState::Ending { .. } => state.view() == SessionView::Processing,
        ProtocolState::Ended => state.view() == SessionView::Summary && state.summary.is_some(),
    }
}

fn effects_are_valid(effects: &[Effect], new_state: &SessionState) -> bool {
    let has_send = effects.iter().any(|e| matches!(e, Effect::Send(_)));
    let has_arm = effects
        .iter()
        .any(|e| matches!(e, Effect::ArmReplyTimer { .. }));

    // Sends and timers only accompany a newly outstanding request
    if has_send || has_arm {
        if !new_state.protocol.is_waiting() {
            return false;
        }
    }

    // At most one outbound event per transition
    effects.iter().filter(|e| matches!(e, Effect::Send(_))).count() <= 1
}

/// Number of turns a successful transition should have appended
fn expected_growth(state: &SessionState, event: &Event) -> Option<usize> {
    match event {
        Event::StartSession { .. } | Event::Restart => None,
        Event::SubmitUserMessage { text } if !text.trim().is_empty() => Some(1),
        Event::InterviewerMessage { .. } | Event::ServiceError { .. } => Some(1),
        Event::ReplyTimeout { request_id } => {
            Some(usize::from(state.protocol.outstanding_request() == Some(*request_id)))
        }
        _ => Some(0),
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Views, effects and the pending indicator stay consistent
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();

        for event in events {
            match transition(&state, event) {
                Ok(result) => {
                    state = result.new_state;
                    prop_assert!(view_matches_phase(&state), "View/phase mismatch: {:?}", state);
                    prop_assert!(
                        effects_are_valid(&result.effects, &state),
                        "Invalid effects for state {:?}: {:?}",
                        state.protocol,
                        result.effects
                    );
                    prop_assert!(
                        !state.pending_response || state.protocol.is_waiting(),
                        "Pending indicator without an outstanding request: {:?}",
                        state.protocol
                    );
                    prop_assert!(
                        state.protocol.replies_due() == 0 || state.pending_response,
                        "Replies owed but no pending indicator: {:?}",
                        state.protocol
                    );
                }
                Err(_) => { /* Invalid transition is OK */ }
            }
        }
    }

    // Invariant 2: History only grows, one turn per accepted submission,
    // reply or recovered failure, in arrival order
    #[test]
    fn prop_history_counts_turns(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();

        for event in events {
            let before = state.history.len();
            let growth = expected_growth(&state, &event);
            if let Ok(result) = transition(&state, event) {
                let after = result.new_state.history.len();
                match growth {
                    Some(n) => {
                        prop_assert_eq!(after, before + n);
                        prop_assert_eq!(
                            &result.new_state.history.turns()[..before],
                            state.history.turns()
                        );
                    }
                    None => prop_assert_eq!(after, 0),
                }
                state = result.new_state;
            }
        }
    }

    // Invariant 3: Notify effect always emitted on state change
    #[test]
    fn prop_state_changes_notify(state in arb_reachable_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            if result.new_state != state {
                prop_assert!(
                    result.effects.iter().any(|e| matches!(e, Effect::Notify)),
                    "State changed but no Notify effect: {:?} -> {:?}",
                    state.protocol,
                    result.new_state.protocol
                );
            }
        }
    }

    // Invariant 4: Blank submissions never change anything
    #[test]
    fn prop_blank_submission_is_inert(state in arb_reachable_state(), text in "[ \t\n]{0,8}") {
        let result = transition(&state, Event::SubmitUserMessage { text });
        prop_assert!(result.is_ok());
        let result = result.unwrap();
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(result.effects.is_empty());
    }

    // Invariant 5: Starting always lands on an empty chat
    #[test]
    fn prop_start_resets_session(state in arb_reachable_state(), event in arb_start_event()) {
        if let Ok(result) = transition(&state, event) {
            prop_assert_eq!(result.new_state.view(), SessionView::Chat);
            prop_assert!(result.new_state.history.is_empty());
            prop_assert!(result.new_state.qa.is_empty());
            prop_assert!(result.new_state.summary.is_none());
        } else {
            prop_assert!(!matches!(state.protocol, ProtocolState::Idle | ProtocolState::Ended));
        }
    }

    // Invariant 6: A service error while waiting is always recoverable
    #[test]
    fn prop_error_always_recoverable(state in arb_reachable_state(), message in "[a-zA-Z ]{1,30}") {
        let waiting = state.protocol.is_waiting();
        let before = state.history.len();
        let result = transition(&state, Event::ServiceError { message });
        if waiting {
            let result = result.unwrap();
            let notice = Turn::interviewer(FAILURE_NOTICE);
            prop_assert_eq!(&result.new_state.protocol, &ProtocolState::Composing);
            prop_assert_eq!(result.new_state.history.len(), before + 1);
            prop_assert_eq!(result.new_state.history.last(), Some(&notice));
            prop_assert!(!result.new_state.pending_response);
        } else {
            prop_assert!(result.is_err());
        }
    }

    // Invariant 7: Stale timers are inert
    #[test]
    fn prop_stale_timeout_is_inert(state in arb_reachable_state(), id in 0u64..64) {
        let request_id = RequestId(id);
        if state.protocol.outstanding_request() != Some(request_id) {
            let result = transition(&state, Event::ReplyTimeout { request_id }).unwrap();
            prop_assert_eq!(&result.new_state, &state);
            prop_assert!(result.effects.is_empty());
        }
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

fn run(events: Vec<Event>) -> (SessionState, Vec<SessionView>) {
    let mut state = SessionState::new();
    let mut views = vec![state.view()];
    for event in events {
        state = transition(&state, event).unwrap().new_state;
        if views.last() != Some(&state.view()) {
            views.push(state.view());
        }
    }
    (state, views)
}

#[test]
fn test_full_interview_view_sequence() {
    let (state, views) = run(vec![
        Event::ChooseInterviewType {
            interview_type: InterviewType::Technical,
        },
        Event::StartSession {
            interview_type: InterviewType::Technical,
            job_background: JobBackground::new("Engineer", "Systems"),
        },
        Event::InterviewerMessage {
            message: "Tell me about yourself".to_string(),
        },
        Event::SubmitUserMessage {
            text: "I like Rust".to_string(),
        },
        Event::InterviewerMessage {
            message: "Why?".to_string(),
        },
        Event::EndSession,
        Event::InterviewSummary {
            summary: Summary::default(),
        },
    ]);

    assert_eq!(
        views,
        [
            SessionView::Landing,
            SessionView::TechnicalIntake,
            SessionView::Chat,
            SessionView::Processing,
            SessionView::Summary,
        ]
    );
    assert_eq!(state.history.len(), 3);
    assert_eq!(state.qa.len(), 2);
}

#[test]
fn test_submit_while_awaiting_reply_is_accepted() {
    let (state, _) = run(vec![
        Event::StartSession {
            interview_type: InterviewType::General,
            job_background: JobBackground::default(),
        },
        Event::SubmitUserMessage {
            text: "Hi, I'm ready".to_string(),
        },
    ]);

    assert_eq!(state.protocol.name(), "awaiting_reply");
    assert_eq!(state.history.turns(), [Turn::user("Hi, I'm ready")]);
}

#[test]
fn test_greeting_and_early_answer_both_land_in_history() {
    let (state, _) = run(vec![
        Event::StartSession {
            interview_type: InterviewType::Behavioral,
            job_background: JobBackground::default(),
        },
        Event::SubmitUserMessage {
            text: "Hi, I'm ready".to_string(),
        },
        Event::InterviewerMessage {
            message: "Welcome".to_string(),
        },
        Event::InterviewerMessage {
            message: "Tell me about a conflict".to_string(),
        },
    ]);

    assert_eq!(state.protocol, ProtocolState::Composing);
    assert_eq!(
        state.history.turns(),
        [
            Turn::user("Hi, I'm ready"),
            Turn::interviewer("Welcome"),
            Turn::interviewer("Tell me about a conflict"),
        ]
    );
}

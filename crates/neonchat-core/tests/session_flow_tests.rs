mod common;

use common::TestSession;
use neonchat_core::{Alignment, Message, SessionState, SubmitOutcome, Transcript};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

proptest! {
    #[test]
    fn reply_is_concatenation_of_fragments(
        prompt in "[a-z]{1,12}",
        fragments in prop::collection::vec(".{0,16}", 0..24),
    ) {
        let mut session = TestSession::new();
        prop_assert_eq!(session.controller.submit(&prompt), SubmitOutcome::Sent);
        let conn = session.expect_connect();

        session.stream(conn, &fragments);
        session.close_normally(conn);

        let transcript = session.controller.transcript();
        let expected: String = fragments.concat();
        if fragments.is_empty() {
            prop_assert_eq!(transcript.len(), 1);
        } else {
            prop_assert_eq!(transcript.len(), 2);
            let last = transcript.last().unwrap();
            prop_assert_eq!(last.alignment, Alignment::Incoming);
            prop_assert_eq!(&last.text, &expected);
        }
        let stored = session.stored();
        prop_assert_eq!(stored.as_ref(), Some(transcript));
    }

    #[test]
    fn blank_input_never_changes_anything(input in "[ \t\r\n]{0,10}") {
        let mut session = TestSession::new();
        prop_assert_eq!(session.controller.submit(&input), SubmitOutcome::Ignored);
        prop_assert!(session.controller.transcript().is_empty());
        prop_assert!(session.controller.poll_effects().is_empty());
        prop_assert_eq!(session.stored(), None);
    }
}

#[test]
fn test_conversation_over_several_turns() {
    let mut session = TestSession::new();

    session.controller.start();
    let greeting = session.expect_connect();
    session.stream(greeting, &["Hi".to_string(), " there!".to_string()]);
    session.close_normally(greeting);

    assert_eq!(
        session.stored(),
        Some(Transcript::from(vec![Message::incoming("Hi there!", "T1")]))
    );

    session.controller.submit("hello");
    let turn = session.expect_connect();
    session.stream(turn, &["Hey".to_string(), "!".to_string()]);
    session.close_normally(turn);

    let texts: Vec<&str> = session
        .controller
        .transcript()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Hi there!", "hello", "Hey!"]);
    assert_eq!(session.controller.state(), &SessionState::Idle);
}

#[test]
fn test_history_survives_a_new_controller() {
    let mut first = TestSession::new();
    first.controller.submit("remember me");
    let conn = first.expect_connect();
    first.stream(conn, &["Noted.".to_string()]);
    first.close_normally(conn);
    let saved = first.controller.transcript().clone();

    let mut second = TestSession::with_backend(first.backend.clone());
    second.controller.start();

    assert_eq!(second.controller.transcript(), &saved);
    assert!(!second.controller.is_busy());
    assert_ne!(second.controller.session_id(), first.controller.session_id());
}

#[test]
fn test_clear_then_reload_starts_empty() {
    let mut session = TestSession::new();
    session.controller.submit("hello");
    let conn = session.expect_connect();
    session.close_normally(conn);

    session.controller.clear();
    assert_eq!(session.stored(), None);

    // A fresh page load finds nothing and asks for a greeting
    let mut reloaded = TestSession::with_backend(session.backend.clone());
    reloaded.controller.start();
    assert!(reloaded.controller.transcript().is_empty());
    assert!(reloaded.controller.is_busy());
}

//! End-to-end session flow tests.
//!
//! Each test scripts the exact keystrokes a client would type and asserts on
//! the bytes the handler renders back, with no transport involved.

use std::sync::atomic::{AtomicUsize, Ordering};

use pollwire_core::{Answer, IdSource, Poll, PollStore, VoteStatus};
use pollwire_harness::ScriptedSession;
use pollwire_server::handle;

// Deterministic id source so tests can assert on displayed GUIDs.
#[derive(Default)]
struct SeqIds(AtomicUsize);

impl IdSource for SeqIds {
    fn next_id(&self) -> String {
        format!("id-{}", self.0.fetch_add(1, Ordering::Relaxed))
    }
}

fn lunch_poll(store_id: &str, multiselect: bool) -> Poll {
    Poll::new(
        store_id,
        "Lunch?",
        multiselect,
        "alice",
        vec![
            Answer::new("a-0", "Pizza"),
            Answer::new("a-1", "Ramen"),
            Answer::new("a-2", "Salad"),
        ],
    )
}

#[tokio::test]
async fn exit_from_main_menu_closes_session() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("alice", b"x");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert!(output.contains("Hello alice,"));
    assert!(output.contains("- (c)reate new poll"));
    assert!(output.ends_with("See you later...\n\n\n"));
    assert!(session.is_closed());
}

#[tokio::test]
async fn unknown_menu_key_silently_redraws() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("alice", b"zx");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert_eq!(output.matches("Hello alice,").count(), 2, "one redraw, no error text");
    assert!(!output.contains("Cannot read input"));
}

#[tokio::test]
async fn help_key_rerenders_menu() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("alice", b"hx");

    handle(&store, &ids, &mut session).await;

    // One render for 'h' plus the loop's own redraws.
    assert!(session.output_text().matches("Hello alice,").count() >= 2);
}

#[tokio::test]
async fn create_flow_stores_poll_and_shows_guid() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    // create; title; not multiselect; two answers; blank line; any key; exit.
    let mut session = ScriptedSession::new("alice", b"cMy Poll\rnPizza\rRamen\r\r x");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert!(output.contains("\nPoll Title: "));
    assert!(output.contains("\nMultiselect (y/n): No\n"));
    assert!(output.contains("Please Enter the answers one per line. Empty line ends creation phase.\n"));
    // Answer ids are drawn first (id-0, id-1), the poll id last.
    assert!(output.contains("\nCreated Poll \"My Poll\".\nGUID is id-2\n"));

    let poll = store.get("id-2").await.expect("poll was added");
    assert_eq!(poll.title(), "My Poll");
    assert!(!poll.multiselect());
    assert_eq!(poll.answer_count(), 2);
    assert_eq!(poll.created_by(), "alice");
}

#[tokio::test]
async fn create_flow_y_key_enables_multiselect() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("alice", b"cColors\ryRed\rBlue\r\r x");

    handle(&store, &ids, &mut session).await;

    assert!(session.output_text().contains("\nMultiselect (y/n): Yes\n"));
    let poll = store.get("id-2").await.expect("poll was added");
    assert!(poll.multiselect());
}

#[tokio::test]
async fn open_unknown_guid_returns_to_menu() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("bob", b"onope\rx");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert!(output.contains("No Poll with this GUID found. Returning to main menu.\n"));
    // Back at the menu, the final 'x' says goodbye.
    assert!(output.ends_with("See you later...\n\n\n"));
}

#[tokio::test]
async fn open_and_vote_single_select() {
    let store = PollStore::new();
    store.add(lunch_poll("guid-1", false)).await;
    let ids = SeqIds::default();
    // open; guid; vote for index 1; leave footer; exit.
    let mut session = ScriptedSession::new("bob", b"oguid-1\r1\rxx");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert!(output.contains("Please enter the number of your choice and confirm with enter.\n"));
    // First render shows zero votes, the post-vote render shows one.
    assert!(output.contains(" 1. Ramen (0 votes)\n"));
    assert!(output.contains(" 1. Ramen (1 votes)\n"));
    assert!(output.contains(" --- Press r to refresh or x to exit to the main menu ---\n"));

    let poll = store.get("guid-1").await.expect("poll exists");
    assert_eq!(poll.checkin("bob").await, VoteStatus::Voted);
}

#[tokio::test]
async fn open_and_vote_multiselect_with_duplicates_allowed() {
    let store = PollStore::new();
    store.add(lunch_poll("guid-1", true)).await;
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("bob", b"oguid-1\r0,2\rxx");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert!(output.contains("Multiple selections are possible."));

    let results = store.get("guid-1").await.expect("poll exists").results().await;
    let votes: Vec<u64> = results.answers.iter().map(|a| a.votes).collect();
    assert_eq!(votes, vec![1, 0, 1]);
}

#[tokio::test]
async fn invalid_vote_mutates_nothing_and_reaches_footer() {
    let store = PollStore::new();
    store.add(lunch_poll("guid-1", false)).await;
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("bob", b"oguid-1\r5\rxx");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert!(output.contains("5 is out of bounds"));
    // The flow still continues to the footer, not back to the menu.
    assert!(output.contains(" --- Press r to refresh or x to exit to the main menu ---\n"));

    let results = store.get("guid-1").await.expect("poll exists").results().await;
    assert!(results.answers.iter().all(|a| a.votes == 0));
}

#[tokio::test]
async fn non_numeric_vote_is_rejected_in_full() {
    let store = PollStore::new();
    store.add(lunch_poll("guid-1", true)).await;
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("bob", b"oguid-1\r0,abc\rxx");

    handle(&store, &ids, &mut session).await;

    assert!(session.output_text().contains("abc is no valid number: "));
    let results = store.get("guid-1").await.expect("poll exists").results().await;
    assert!(results.answers.iter().all(|a| a.votes == 0), "all-or-nothing");
}

#[tokio::test]
async fn second_visit_shows_results_without_prompting() {
    let store = PollStore::new();
    let poll = store.add(lunch_poll("guid-1", false)).await;
    poll.cast_vote("bob", vec![0]).await.expect("seed vote");
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("bob", b"oguid-1\rxx");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert!(output.contains("You already voted, so here are the results\n"));
    assert!(!output.contains("Please enter the number of your choice"));
}

#[tokio::test]
async fn footer_r_key_refreshes_results() {
    let store = PollStore::new();
    let poll = store.add(lunch_poll("guid-1", false)).await;
    poll.cast_vote("bob", vec![2]).await.expect("seed vote");
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("bob", b"oguid-1\rrxx");

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert_eq!(output.matches(" 2. Salad (1 votes)\n").count(), 2, "initial render plus refresh");
}

#[tokio::test]
async fn creator_sees_voter_names_others_see_count() {
    let store = PollStore::new();
    let poll = store.add(lunch_poll("guid-1", false)).await;
    poll.cast_vote("bob", vec![0]).await.expect("seed vote");
    poll.cast_vote("carol", vec![1]).await.expect("seed vote");

    let ids = SeqIds::default();
    let mut creator = ScriptedSession::new("alice", b"oguid-1\r2\rxx");
    handle(&store, &ids, &mut creator).await;
    assert!(creator.output_text().contains("The following users have voted: bob, carol"));

    let mut visitor = ScriptedSession::new("dave", b"oguid-1\r2\rxx");
    handle(&store, &ids, &mut visitor).await;
    let output = visitor.output_text();
    assert!(output.contains("3 users have voted\n"), "first render: bob, carol, alice");
    assert!(!output.contains("The following users have voted"));
}

#[tokio::test]
async fn disconnect_mid_flow_aborts_with_notice() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    // Script ends right after entering the create flow.
    let mut session = ScriptedSession::new("alice", b"c");

    handle(&store, &ids, &mut session).await;

    assert!(session.output_text().contains("Cannot read input: could not read from session: "));
    assert!(store.is_empty().await, "no half-created poll");
}

#[tokio::test]
async fn paging_uses_window_size_when_present() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("alice", b"x").with_window(4, 2);

    handle(&store, &ids, &mut session).await;

    let output = session.output_text();
    assert!(output.starts_with("    \n    \n"), "two blank lines of window width");
    assert!(!output.contains('\x0c'));
}

#[tokio::test]
async fn paging_falls_back_to_form_feed_without_window() {
    let store = PollStore::new();
    let ids = SeqIds::default();
    let mut session = ScriptedSession::new("alice", b"x");

    handle(&store, &ids, &mut session).await;

    assert!(session.output_text().starts_with("\u{c}Hello alice,"));
}

//! Per-session menu and poll flows.
//!
//! One call to [`handle`] drives a whole session: a loop on the main menu
//! that dispatches into the create and open sub-flows, each of which reads
//! keys/lines through the session protocol and reads/mutates the shared
//! poll store. The poll registry is threaded in as an argument - one store
//! per server instance, no globals.
//!
//! Unrecognized menu and footer keys silently redraw the current screen;
//! that is the state machine's deliberate no-op default, not an omission.
//! Any stream failure unwinds the handler for this session only: the error
//! text is written back if the stream will still take it, and the caller
//! closes the underlying connection.

use pollwire_core::{Answer, IdSource, Poll, PollStore, VoteStatus, parse_selection};
use pollwire_proto::{Session, SessionError, new_page, read_key, read_line};

/// Handle one session from login to disconnect.
///
/// Returns when the client exits via the menu or the stream fails.
pub async fn handle<S: Session>(store: &PollStore, ids: &dyn IdSource, session: &mut S) {
    if let Err(err) = main_menu(store, ids, session).await {
        // Best effort: the stream is likely already gone.
        let notice = format!("Cannot read input: {err}\n");
        let _ = session.write_all(notice.as_bytes()).await;
        tracing::debug!(username = session.username(), %err, "session handler aborted");
    }
}

/// Main menu loop: render, read one key, dispatch.
async fn main_menu<S: Session>(
    store: &PollStore,
    ids: &dyn IdSource,
    session: &mut S,
) -> Result<(), SessionError> {
    loop {
        write_main_menu(session).await?;
        match read_key(session).await? {
            b'c' => create_flow(store, ids, session).await?,
            b'o' => open_flow(store, session).await?,
            b'h' => write_main_menu(session).await?,
            b'x' => {
                write_bye(session).await?;
                session.close().await;
                return Ok(());
            },
            _ => {},
        }
    }
}

/// Create flow: title, multiselect, answers until a blank line, then store.
async fn create_flow<S: Session>(
    store: &PollStore,
    ids: &dyn IdSource,
    session: &mut S,
) -> Result<(), SessionError> {
    write(session, b"\nPoll Title: ").await?;
    let title = read_line(session).await?;

    write(session, b"\nMultiselect (y/n): ").await?;
    let multiselect = read_key(session).await? == b'y';
    write(session, if multiselect { b"Yes\n".as_slice() } else { b"No\n".as_slice() }).await?;

    write(session, b"Please Enter the answers one per line. Empty line ends creation phase.\n")
        .await?;
    let mut answers = Vec::new();
    loop {
        let text = read_line(session).await?;
        if text.is_empty() {
            break;
        }
        answers.push(Answer::new(ids.next_id(), text));
    }

    let poll = Poll::new(ids.next_id(), title, multiselect, session.username(), answers);
    let poll = store.add(poll).await;
    tracing::info!(poll = %poll.id(), creator = session.username(), "poll created");

    let summary = format!(
        "\nCreated Poll \"{}\".\nGUID is {}\nGive this GUID to others so they can answer your \
         poll.\nPress any key to go back to the main menu.\n",
        poll.title(),
        poll.id()
    );
    write(session, summary.as_bytes()).await?;
    read_key(session).await?;
    Ok(())
}

/// Open flow: look up a poll, vote if the viewer hasn't, then the
/// refresh/exit footer loop.
async fn open_flow<S: Session>(store: &PollStore, session: &mut S) -> Result<(), SessionError> {
    write(session, b"\nPlease enter Poll-GUID: ").await?;
    let guid = read_line(session).await?;

    let Some(poll) = store.get(&guid).await else {
        // A miss is a normal outcome, back to the main menu.
        write(session, b"No Poll with this GUID found. Returning to main menu.\n").await?;
        return Ok(());
    };

    write_poll(session, &poll).await?;

    match poll.checkin(session.username()).await {
        VoteStatus::Unvoted => {
            collect_vote(session, &poll).await?;
            write_poll(session, &poll).await?;
        },
        VoteStatus::Voted => {
            write(session, b"You already voted, so here are the results\n").await?;
        },
    }

    loop {
        write(session, b" --- Press r to refresh or x to exit to the main menu ---\n").await?;
        match read_key(session).await? {
            b'r' => write_poll(session, &poll).await?,
            b'x' => return Ok(()),
            _ => {},
        }
    }
}

/// Prompt for and apply one vote attempt.
///
/// A validation failure writes the error text and returns without touching
/// any count; the caller continues to the footer either way.
async fn collect_vote<S: Session>(session: &mut S, poll: &Poll) -> Result<(), SessionError> {
    if poll.multiselect() {
        write(
            session,
            b"Multiple selections are possible. Please enter the numbers of your choices as \
              separated by commas and confirm with enter.\n",
        )
        .await?;
    } else {
        write(session, b"Please enter the number of your choice and confirm with enter.\n").await?;
    }

    let input = read_line(session).await?;
    let selection = match parse_selection(&input, poll.multiselect(), poll.answer_count()) {
        Ok(selection) => selection,
        Err(err) => {
            write(session, err.to_string().as_bytes()).await?;
            return Ok(());
        },
    };

    if let Err(err) = poll.cast_vote(session.username(), selection).await {
        write(session, err.to_string().as_bytes()).await?;
    }
    Ok(())
}

/// Render a poll: banner, answers with counts, voter list or voter count.
///
/// The creator sees every username that has opened the poll; everyone else
/// sees only how many.
async fn write_poll<S: Session>(session: &mut S, poll: &Poll) -> Result<(), SessionError> {
    new_page(session).await?;

    let results = poll.results().await;
    let mut screen = format!(
        "******************************************************\nTitle: {}\nCreated by {}\n\n",
        results.title, results.created_by
    );
    for (index, answer) in results.answers.iter().enumerate() {
        screen.push_str(&format!(" {index}. {} ({} votes)\n", answer.text, answer.votes));
    }
    if session.username() == results.created_by {
        screen
            .push_str(&format!("The following users have voted: {}\n", results.voters.join(", ")));
    } else {
        screen.push_str(&format!("{} users have voted\n", results.voters.len()));
    }
    screen.push('\n');

    write(session, screen.as_bytes()).await
}

/// Render the greeting and command list.
async fn write_main_menu<S: Session>(session: &mut S) -> Result<(), SessionError> {
    new_page(session).await?;
    let menu = format!(
        "Hello {},\navailable commands are:\n- (c)reate new poll\n- (o)pen existing poll\n- \
         (h)elp\n- e(x)it\n\n",
        session.username()
    );
    write(session, menu.as_bytes()).await
}

/// Render the farewell screen.
async fn write_bye<S: Session>(session: &mut S) -> Result<(), SessionError> {
    new_page(session).await?;
    write(session, b"See you later...\n\n\n").await
}

/// Write helper mapping stream failures into [`SessionError`].
async fn write<S: Session>(session: &mut S, data: &[u8]) -> Result<(), SessionError> {
    session.write_all(data).await.map_err(SessionError::Write)
}

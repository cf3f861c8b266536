//! Background receive loop.
//!
//! Spawned once after handshake success and running for the lifetime of the
//! connection. Each iteration pulls one chunk from the transport, feeds the
//! framer, and maps every complete line to exactly one [`SessionEvent`]
//! through [`handle_line`] - the pure classification + transition step that
//! the unit tests drive directly, without any socket.
//!
//! Termination is observable three ways: the session's alive flag flips, a
//! terminal [`SessionEvent::Disconnected`] is emitted, and the returned
//! [`JoinHandle`] completes. Connection loss is never retried.

use std::sync::Arc;

use patter_proto::{LineFramer, ServerLine};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

use crate::{
    event::{DisconnectReason, SessionEvent},
    session::Session,
    transport::Transport,
};

/// Read size per iteration, matching the relay's line-oriented traffic.
const CHUNK_SIZE: usize = 1024;

/// Spawn the receiver task.
///
/// `framer` is taken over from the handshake so reply-adjacent bytes carry
/// across. Events go out on `events`; if the front end drops the receiving
/// end, the task stops quietly.
pub fn spawn(
    transport: Arc<Transport>,
    session: Arc<Session>,
    framer: LineFramer,
    events: UnboundedSender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(run(transport, session, framer, events))
}

async fn run(
    transport: Arc<Transport>,
    session: Arc<Session>,
    mut framer: LineFramer,
    events: UnboundedSender<SessionEvent>,
) {
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        match transport.recv_chunk(&mut buf).await {
            Ok(Some(n)) => {
                framer.push(&buf[..n]);
                while let Some(line) = framer.next_line() {
                    let event = handle_line(&session, &line);
                    if events.send(event).is_err() {
                        tracing::debug!("event channel closed; receiver stopping");
                        return;
                    }
                }
            },
            Ok(None) => {
                session.mark_dead();
                tracing::debug!("relay closed the connection; receiver stopping");
                let _ = events
                    .send(SessionEvent::Disconnected { reason: DisconnectReason::ServerClosed });
                return;
            },
            Err(e) => {
                session.mark_dead();
                tracing::warn!("receive failed: {e}");
                let _ = events.send(SessionEvent::Disconnected {
                    reason: DisconnectReason::ReceiveFailed(e.to_string()),
                });
                return;
            },
        }
    }
}

/// Classify one server line and apply its state transition.
///
/// - `FROM`: reported; the current target is never auto-switched
/// - `SYS END` and the unavailable-user errors: target-restore rule for the
///   named peer
/// - everything else (including malformed near-misses of the above):
///   reported verbatim, no state change
pub fn handle_line(session: &Session, line: &str) -> SessionEvent {
    match ServerLine::parse(line) {
        ServerLine::From { sender, text } => SessionEvent::Message { sender, text },
        ServerLine::SysEnd { peer } => {
            let disposition = session.close_target(&peer);
            SessionEvent::ConversationEnded { peer, disposition }
        },
        ServerLine::Unavailable { peer } => {
            let disposition = session.close_target(&peer);
            SessionEvent::PeerUnavailable { peer, disposition, line: line.to_string() }
        },
        ServerLine::Ok(line) | ServerLine::Err(line) | ServerLine::Other(line) => {
            SessionEvent::Server { line }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EndDisposition;

    fn session_with_targets(targets: &[&str]) -> Session {
        let session = Session::new();
        session.activate("me");
        for target in targets {
            session.open_target(target);
        }
        session
    }

    #[test]
    fn inbound_messages_never_switch_the_target() {
        let session = session_with_targets(&[]);

        let first = handle_line(&session, "FROM A hi");
        let second = handle_line(&session, "FROM B yo");

        assert_eq!(first, SessionEvent::Message { sender: "A".into(), text: "hi".into() });
        assert_eq!(second, SessionEvent::Message { sender: "B".into(), text: "yo".into() });
        assert_eq!(session.current_target(), None);
    }

    #[test]
    fn inbound_message_with_active_conversation_keeps_it() {
        let session = session_with_targets(&["A"]);

        handle_line(&session, "FROM B yo");
        assert_eq!(session.current_target(), Some("A".into()));
    }

    #[test]
    fn sys_end_with_empty_history_clears_target() {
        let session = session_with_targets(&["A"]);

        let event = handle_line(&session, "SYS END A");
        assert_eq!(event, SessionEvent::ConversationEnded {
            peer: "A".into(),
            disposition: EndDisposition::Cleared
        });
        assert_eq!(session.current_target(), None);
    }

    #[test]
    fn sys_end_restores_previous_conversation() {
        let session = session_with_targets(&["B", "A"]);

        let event = handle_line(&session, "SYS END A");
        assert_eq!(event, SessionEvent::ConversationEnded {
            peer: "A".into(),
            disposition: EndDisposition::ReturnedTo("B".into())
        });
        assert_eq!(session.current_target(), Some("B".into()));
        assert!(session.target_history().is_empty());
    }

    #[test]
    fn sys_end_for_other_peer_is_report_only() {
        let session = session_with_targets(&["A"]);

        let event = handle_line(&session, "SYS END C");
        assert_eq!(event, SessionEvent::ConversationEnded {
            peer: "C".into(),
            disposition: EndDisposition::NotCurrent
        });
        assert_eq!(session.current_target(), Some("A".into()));
    }

    #[test]
    fn unavailable_current_target_restores_through_history() {
        let session = session_with_targets(&["B", "C", "A"]);

        let event = handle_line(&session, "ERR User 'A' not found");
        assert_eq!(event, SessionEvent::PeerUnavailable {
            peer: "A".into(),
            disposition: EndDisposition::ReturnedTo("C".into()),
            line: "ERR User 'A' not found".into()
        });
        assert_eq!(session.current_target(), Some("C".into()));
        assert_eq!(session.target_history(), ["B"]);
    }

    #[test]
    fn unavailable_disconnected_behaves_like_not_found() {
        let session = session_with_targets(&["A"]);

        handle_line(&session, "ERR User 'A' disconnected");
        assert_eq!(session.current_target(), None);
    }

    #[test]
    fn malformed_unavailable_line_degrades_to_generic() {
        let session = session_with_targets(&["A"]);

        let event = handle_line(&session, "ERR User 'A is gone' maybe");
        assert_eq!(event, SessionEvent::Server { line: "ERR User 'A is gone' maybe".into() });
        assert_eq!(session.current_target(), Some("A".into()));
    }

    #[test]
    fn unrecognized_lines_are_reported_verbatim() {
        let session = session_with_targets(&[]);

        let event = handle_line(&session, "MOTD be excellent to each other");
        assert_eq!(event, SessionEvent::Server {
            line: "MOTD be excellent to each other".into()
        });
    }
}

//! Notifications from the engine to the front end.
//!
//! The receiver task and (indirectly) the dispatcher produce these; the front
//! end renders them however it likes. The set is closed: every server line
//! maps to exactly one event, already past classification and any state
//! transition it triggered.

use crate::session::EndDisposition;

/// Why the receiver task stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The relay closed the connection cleanly (end of stream).
    ServerClosed,

    /// A network fault broke the read side.
    ReceiveFailed(String),
}

/// Notifications delivered to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Inbound message. The current target is deliberately NOT switched; the
    /// user must explicitly reopen the conversation with the sender to reply.
    Message {
        /// Display name of the sender.
        sender: String,
        /// Message text.
        text: String,
    },

    /// A peer ended a conversation (`SYS END`).
    ConversationEnded {
        /// Peer that ended the conversation.
        peer: String,
        /// How the restore rule affected the current target.
        disposition: EndDisposition,
    },

    /// The relay reported a peer as not found or disconnected.
    PeerUnavailable {
        /// The unavailable peer.
        peer: String,
        /// How the restore rule affected the current target.
        disposition: EndDisposition,
        /// The raw server line, reported verbatim alongside the notice.
        line: String,
    },

    /// Any other server line, verbatim. No state change.
    Server {
        /// The raw line.
        line: String,
    },

    /// The connection is gone; the session is dead and the receiver task has
    /// terminated. Terminal: no further events follow.
    Disconnected {
        /// What ended the connection.
        reason: DisconnectReason,
    },
}

//! Command dispatcher: user intents to protocol sends.
//!
//! The front end calls these methods from its input loop. Outcomes are typed
//! so the front end decides the wording; the dispatcher decides the state
//! transitions and the wire traffic. Any failed send marks the session dead
//! before the error surfaces - the caller is expected to terminate.

use std::sync::Arc;

use patter_proto::ClientLine;

use crate::{
    error::ClientError,
    session::{EndDisposition, Session, TargetSwitch},
    transport::Transport,
};

/// Outcome of opening a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The target is now the current conversation.
    Opened {
        /// The new current target.
        target: String,
    },

    /// The target already was the current conversation; nothing changed.
    AlreadyActive {
        /// The unchanged current target.
        target: String,
    },
}

/// Outcome of sending to the current target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The message went out to the current target.
    Sent {
        /// Recipient of the message.
        target: String,
    },

    /// No conversation is active; nothing was sent. The front end should
    /// point the user at `TO <target>`.
    NoTarget,
}

/// Outcome of ending the current conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndOutcome {
    /// `END` was sent and the local restore rule applied.
    Ended {
        /// The peer whose conversation ended.
        peer: String,
        /// How the restore rule affected the current target.
        disposition: EndDisposition,
    },

    /// No conversation was active; successful no-op.
    NoActiveConversation,
}

/// Translates user intents into protocol commands.
#[derive(Debug)]
pub struct Dispatcher {
    transport: Arc<Transport>,
    session: Arc<Session>,
}

impl Dispatcher {
    /// Build a dispatcher over the shared transport and session.
    pub fn new(transport: Arc<Transport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    /// Open a conversation with `target`. Applies the target-switch rule;
    /// no network I/O.
    pub fn open(&self, target: &str) -> OpenOutcome {
        match self.session.open_target(target) {
            TargetSwitch::Opened => OpenOutcome::Opened { target: target.to_string() },
            TargetSwitch::AlreadyActive => {
                OpenOutcome::AlreadyActive { target: target.to_string() }
            },
        }
    }

    /// Send `text` to the current conversation target.
    ///
    /// With no active target this is [`SendOutcome::NoTarget`] and nothing
    /// touches the wire.
    ///
    /// # Errors
    ///
    /// [`ClientError::Send`] if the connection broke; the session is already
    /// marked dead when this returns.
    pub async fn send_to_current(&self, text: &str) -> Result<SendOutcome, ClientError> {
        let Some(target) = self.session.current_target() else {
            return Ok(SendOutcome::NoTarget);
        };

        self.send(ClientLine::To { target: target.clone(), text: text.to_string() }).await?;
        Ok(SendOutcome::Sent { target })
    }

    /// Send a one-off message to `target` without touching the current
    /// conversation state.
    ///
    /// # Errors
    ///
    /// [`ClientError::Send`] if the connection broke.
    pub async fn send_one_off(&self, target: &str, text: &str) -> Result<(), ClientError> {
        self.send(ClientLine::To { target: target.to_string(), text: text.to_string() }).await
    }

    /// End the current conversation on both sides.
    ///
    /// Sends `END <target>` and then applies the same restore rule the
    /// receiver uses for `SYS END`. The local transition happens regardless
    /// of whether the relay acknowledges; ending with no active conversation
    /// is a reported no-op.
    ///
    /// # Errors
    ///
    /// [`ClientError::Send`] if the connection broke before `END` went out;
    /// no local transition is applied in that case (the dead session has no
    /// conversational state anyway).
    pub async fn end_current(&self) -> Result<EndOutcome, ClientError> {
        let Some(peer) = self.session.current_target() else {
            return Ok(EndOutcome::NoActiveConversation);
        };

        self.send(ClientLine::End { target: peer.clone() }).await?;
        let disposition = self.session.close_target(&peer);
        Ok(EndOutcome::Ended { peer, disposition })
    }

    async fn send(&self, line: ClientLine) -> Result<(), ClientError> {
        if let Err(e) = self.transport.send_line(&line.to_string()).await {
            self.session.mark_dead();
            tracing::warn!("send failed, session is dead: {e}");
            return Err(e);
        }
        Ok(())
    }
}

//! Name-registration handshake.
//!
//! Drives one registration attempt to a terminal outcome. The caller owns the
//! retry loop: on [`Registration::Retry`] it asks the user for another name
//! and calls [`register`] again; on an error the session is over.
//!
//! ```text
//! Start ──HELLO──> AwaitingReply ──OK──────────> Accepted
//!   │                   │ └────────ERR─────────> Retry (caller loops)
//!   │                   └──────send/recv fault─> fatal
//!   └──empty name (no I/O)─────────────────────> Retry
//! ```

use patter_proto::{ClientLine, LineFramer, ServerLine};

use crate::{error::ClientError, session::Session, transport::Transport};

/// Terminal outcome of one registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The relay accepted the name; the session is now alive and the display
    /// name recorded.
    Accepted {
        /// The relay's acceptance line, for display.
        reply: String,
    },

    /// The name was not accepted; retry with a different one.
    Retry {
        /// The relay's reply, for display. `None` when the name was rejected
        /// locally (empty after trimming) without contacting the relay.
        reply: Option<String>,
    },
}

/// Attempt to register `name` with the relay.
///
/// On acceptance the session's display name is recorded and the session
/// marked alive. The reply is read through `framer` - the same framer later
/// handed to the receiver task - so any bytes the relay sent beyond the reply
/// line are not lost.
///
/// # Errors
///
/// - [`ClientError::Send`] / [`ClientError::Receive`]: transport broke
/// - [`ClientError::RegistrationEof`]: relay closed before replying
/// - [`ClientError::ServerFull`]: relay at capacity (the transport is closed
///   before returning)
pub async fn register(
    transport: &Transport,
    session: &Session,
    framer: &mut LineFramer,
    name: &str,
) -> Result<Registration, ClientError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(Registration::Retry { reply: None });
    }

    let hello = ClientLine::Hello { name: name.to_string() };
    transport.send_line(&hello.to_string()).await?;

    let reply = read_reply_line(transport, framer).await?;
    tracing::debug!("registration reply: {reply}");

    let classified = ServerLine::parse(&reply);
    if classified.is_server_full() {
        transport.close().await;
        return Err(ClientError::ServerFull(reply));
    }

    match classified {
        ServerLine::Ok(_) => {
            session.activate(name);
            Ok(Registration::Accepted { reply })
        },
        // Any other rejection, and any unrecognized reply: ask for a new
        // name rather than crash on protocol drift.
        _ => Ok(Registration::Retry { reply: Some(reply) }),
    }
}

/// Block for a single reply line.
async fn read_reply_line(
    transport: &Transport,
    framer: &mut LineFramer,
) -> Result<String, ClientError> {
    let mut buf = [0u8; 1024];
    loop {
        if let Some(line) = framer.next_line() {
            return Ok(line);
        }
        match transport.recv_chunk(&mut buf).await? {
            Some(n) => framer.push(&buf[..n]),
            None => return Err(ClientError::RegistrationEof),
        }
    }
}

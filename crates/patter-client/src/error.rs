//! Error taxonomy for the session engine.
//!
//! Every variant here is fatal for the session: transport failures are never
//! retried, and the session flips to not-alive the moment one surfaces. The
//! recoverable handshake outcome (name rejected, pick another) is not an
//! error at all - see [`crate::Registration::Retry`]. Protocol drift in
//! server lines is not represented here either; unrecognized lines degrade to
//! verbatim reporting instead of failing.

use std::io;

use thiserror::Error;

/// Fatal session errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The TCP connection could not be established.
    #[error("connection failed: {0}")]
    Connect(io::Error),

    /// A write failed mid-session; the connection is considered broken.
    #[error("send failed: {0}")]
    Send(io::Error),

    /// A read failed mid-session; the connection is considered broken.
    #[error("receive failed: {0}")]
    Receive(io::Error),

    /// The relay closed the connection before answering the registration.
    #[error("server closed the connection during registration")]
    RegistrationEof,

    /// The relay is at capacity; nothing to do but leave.
    #[error("server full: {0}")]
    ServerFull(String),
}

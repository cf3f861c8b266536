//! Session protocol engine for the patter chat relay client.
//!
//! One persistent TCP connection, two concurrent tasks: the interactive
//! command loop (via [`Dispatcher`]) and the background [`receiver`] task.
//! Both share the [`Session`] state and the [`Transport`], and nothing else.
//!
//! # Components
//!
//! - [`Transport`]: owns the socket; line sends, chunk receives, idempotent
//!   close
//! - [`handshake`]: drives name registration to accepted / retry / fatal
//! - [`Session`]: lock-guarded conversation state (alive flag, current
//!   target, target history stack)
//! - [`receiver`]: concurrent loop classifying server-pushed lines and
//!   applying target transitions
//! - [`Dispatcher`]: translates user intents into protocol sends
//!
//! Front ends consume [`SessionEvent`] notifications and render them; this
//! crate performs no terminal I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dispatcher;
mod error;
mod event;
pub mod handshake;
pub mod receiver;
mod session;
mod transport;

pub use dispatcher::{Dispatcher, EndOutcome, OpenOutcome, SendOutcome};
pub use error::ClientError;
pub use event::{DisconnectReason, SessionEvent};
pub use handshake::Registration;
pub use session::{EndDisposition, Session, TargetSwitch};
pub use transport::Transport;

//! Wire protocol for the patter chat relay.
//!
//! The relay speaks newline-terminated UTF-8 text lines over a single TCP
//! stream. This crate owns the two halves of that boundary:
//!
//! - [`LineFramer`]: reassembles complete lines from raw read chunks
//! - [`ClientLine`] / [`ServerLine`]: the closed sets of outbound and inbound
//!   line shapes, with a total classifier that never fails on protocol drift
//!
//! No I/O happens here; the client crate drives the framer with whatever the
//! socket delivers.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod framer;
mod line;

pub use framer::LineFramer;
pub use line::{ClientLine, ServerLine};

//! Fuzz target for inbound line classification
//!
//! The receiver feeds every server line through `ServerLine::parse` before
//! any state transition runs, so the classifier is the client's first line of
//! defense against protocol drift.
//!
//! # Invariants
//!
//! - Classification is total: NEVER panic on arbitrary input
//! - `Unavailable` only fires for lines with the exact `ERR User '` lead-in
//!   and one of the two suffix phrases, and the extracted peer sits directly
//!   between the quotes
//! - `From` only fires with a non-empty sender

#![no_main]

use libfuzzer_sys::fuzz_target;
use patter_proto::ServerLine;

fuzz_target!(|line: &str| {
    let classified = ServerLine::parse(line);

    match &classified {
        ServerLine::Unavailable { peer } => {
            assert!(!peer.is_empty());
            assert!(line.starts_with("ERR User '"));
            assert!(line.contains("' not found") || line.contains("' disconnected"));
            assert!(line["ERR User '".len()..].starts_with(peer.as_str()));
        }
        ServerLine::From { sender, .. } => {
            assert!(!sender.is_empty());
            assert!(line.starts_with("FROM "));
        }
        ServerLine::SysEnd { peer } => {
            assert!(!peer.is_empty());
            assert!(line.starts_with("SYS END "));
        }
        ServerLine::Ok(raw) | ServerLine::Err(raw) | ServerLine::Other(raw) => {
            assert_eq!(raw, line);
        }
    }
});

//! The closed sets of protocol line shapes.
//!
//! Classification is total: every inbound line maps to exactly one
//! [`ServerLine`] variant, and anything the relay sends that this client does
//! not understand degrades to [`ServerLine::Other`] instead of failing. State
//! transitions happen elsewhere, against the already-classified variant.

use std::fmt;

/// Lines this client sends to the relay.
///
/// The `Display` impl renders the exact wire form, without the trailing
/// newline (the transport appends it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLine {
    /// Register a display name: `HELLO <name>`.
    Hello {
        /// Requested display name.
        name: String,
    },

    /// Deliver a message to a named user: `TO <target> <text>`.
    To {
        /// Recipient display name.
        target: String,
        /// Message text.
        text: String,
    },

    /// Terminate the conversation with a user on both sides: `END <target>`.
    End {
        /// Peer whose conversation ends.
        target: String,
    },
}

impl fmt::Display for ClientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hello { name } => write!(f, "HELLO {name}"),
            Self::To { target, text } => write!(f, "TO {target} {text}"),
            Self::End { target } => write!(f, "END {target}"),
        }
    }
}

/// Lines the relay pushes to this client, classified by verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine {
    /// Positive reply, `OK ...`. Meaningful during registration; generic
    /// afterwards.
    Ok(String),

    /// Error reply, `ERR ...`, other than the availability form below.
    Err(String),

    /// Inbound message: `FROM <sender> <text>`.
    From {
        /// Display name of the sender.
        sender: String,
        /// Message text (may be empty).
        text: String,
    },

    /// A conversation ended on the peer's side: `SYS END <name>`.
    SysEnd {
        /// Peer that ended the conversation.
        peer: String,
    },

    /// The relay reports a user as gone: `ERR User '<name>' not found` or
    /// `ERR User '<name>' disconnected`.
    Unavailable {
        /// The unavailable user, extracted from between the quotes.
        peer: String,
    },

    /// Anything unrecognized. Reported verbatim, never acted on.
    Other(String),
}

impl ServerLine {
    /// Classify one trimmed inbound line.
    ///
    /// Total function: malformed variants of a known verb (empty sender,
    /// missing quote) degrade to the generic classification for the line
    /// rather than failing.
    pub fn parse(line: &str) -> Self {
        if let Some(rest) = line.strip_prefix("FROM ") {
            let mut parts = rest.splitn(2, ' ');
            let sender = parts.next().unwrap_or_default();
            if !sender.is_empty() {
                return Self::From {
                    sender: sender.to_string(),
                    text: parts.next().unwrap_or_default().trim_start().to_string(),
                };
            }
        }

        if let Some(rest) = line.strip_prefix("SYS END ") {
            let peer = rest.trim();
            if !peer.is_empty() {
                return Self::SysEnd { peer: peer.to_string() };
            }
        }

        if let Some(peer) = unavailable_peer(line) {
            return Self::Unavailable { peer };
        }

        if line.starts_with("OK") {
            return Self::Ok(line.to_string());
        }
        if line.starts_with("ERR") {
            return Self::Err(line.to_string());
        }

        Self::Other(line.to_string())
    }

    /// Whether this line is the relay's capacity rejection.
    pub fn is_server_full(&self) -> bool {
        match self {
            Self::Ok(line) | Self::Err(line) | Self::Other(line) => line.contains("Server full"),
            Self::From { .. } | Self::SysEnd { .. } | Self::Unavailable { .. } => false,
        }
    }
}

/// Extract the quoted user from an availability error.
///
/// Only lines beginning `ERR User '` and carrying one of the two suffix
/// phrases qualify; anything else is `None` and classifies as a plain error.
fn unavailable_peer(line: &str) -> Option<String> {
    let rest = line.strip_prefix("ERR User '")?;
    if !line.contains("' not found") && !line.contains("' disconnected") {
        return None;
    }

    let peer = rest.split('\'').next().unwrap_or_default();
    if peer.is_empty() { None } else { Some(peer.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_lines_render_wire_form() {
        let hello = ClientLine::Hello { name: "alice".into() };
        let to = ClientLine::To { target: "bob".into(), text: "hi there".into() };
        let end = ClientLine::End { target: "bob".into() };

        assert_eq!(hello.to_string(), "HELLO alice");
        assert_eq!(to.to_string(), "TO bob hi there");
        assert_eq!(end.to_string(), "END bob");
    }

    #[test]
    fn from_line_splits_sender_and_text() {
        assert_eq!(ServerLine::parse("FROM alice hello there"), ServerLine::From {
            sender: "alice".into(),
            text: "hello there".into()
        });
    }

    #[test]
    fn from_line_without_text_has_empty_message() {
        assert_eq!(ServerLine::parse("FROM alice"), ServerLine::From {
            sender: "alice".into(),
            text: String::new()
        });
    }

    #[test]
    fn from_line_with_empty_sender_is_generic() {
        assert_eq!(ServerLine::parse("FROM  x"), ServerLine::Other("FROM  x".into()));
    }

    #[test]
    fn sys_end_extracts_peer() {
        assert_eq!(ServerLine::parse("SYS END alice"), ServerLine::SysEnd {
            peer: "alice".into()
        });
    }

    #[test]
    fn sys_end_without_peer_is_generic() {
        // The framer trims lines, so a bare verb arrives without the
        // trailing space and misses the prefix entirely.
        assert_eq!(ServerLine::parse("SYS END"), ServerLine::Other("SYS END".into()));
    }

    #[test]
    fn unavailable_not_found() {
        assert_eq!(ServerLine::parse("ERR User 'carol' not found"), ServerLine::Unavailable {
            peer: "carol".into()
        });
    }

    #[test]
    fn unavailable_disconnected() {
        assert_eq!(ServerLine::parse("ERR User 'carol' disconnected"), ServerLine::Unavailable {
            peer: "carol".into()
        });
    }

    #[test]
    fn unavailable_requires_exact_lead_in() {
        // Wrong prefix casing or missing quote must not match the
        // availability form.
        assert_eq!(
            ServerLine::parse("ERR user 'carol' not found"),
            ServerLine::Err("ERR user 'carol' not found".into())
        );
        assert_eq!(
            ServerLine::parse("ERR User carol not found"),
            ServerLine::Err("ERR User carol not found".into())
        );
    }

    #[test]
    fn unavailable_with_empty_name_is_plain_error() {
        assert_eq!(
            ServerLine::parse("ERR User '' not found"),
            ServerLine::Err("ERR User '' not found".into())
        );
    }

    #[test]
    fn unavailable_without_suffix_phrase_is_plain_error() {
        assert_eq!(
            ServerLine::parse("ERR User 'carol' is busy"),
            ServerLine::Err("ERR User 'carol' is busy".into())
        );
    }

    #[test]
    fn ok_and_err_prefixes() {
        assert!(matches!(ServerLine::parse("OK Welcome alice"), ServerLine::Ok(_)));
        assert!(matches!(ServerLine::parse("ERR Name already taken"), ServerLine::Err(_)));
    }

    #[test]
    fn anything_else_is_other() {
        assert!(matches!(ServerLine::parse("SENT bob"), ServerLine::Other(_)));
        assert!(matches!(ServerLine::parse("banner of the day"), ServerLine::Other(_)));
    }

    #[test]
    fn server_full_detection() {
        assert!(ServerLine::parse("ERR Server full (try again later)").is_server_full());
        assert!(!ServerLine::parse("ERR Name already taken").is_server_full());
        assert!(!ServerLine::parse("FROM bob Server full").is_server_full());
    }
}

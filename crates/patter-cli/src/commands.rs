//! User input grammar.
//!
//! The command verbs mirror the wire protocol on purpose (`TO`, `END`), so
//! what the user types is what the relay would see. Parsing is separate from
//! dispatch; the repl decides what each command does.

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `TO <target>`: open a conversation with the target.
    Open {
        /// Peer to converse with.
        target: String,
    },

    /// `TO <target> <message>`: one-off send, leaving the current
    /// conversation untouched.
    OneOff {
        /// Recipient.
        target: String,
        /// Message text.
        text: String,
    },

    /// `END`: end the current conversation on both sides.
    End,

    /// `exit` / `quit`: leave the client.
    Quit,

    /// Anything else: a message for the current conversation.
    Say {
        /// Message text.
        text: String,
    },
}

/// Parse one input line. `None` for blank input.
pub fn parse(input: &str) -> Option<Command> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
        return Some(Command::Quit);
    }
    if input.eq_ignore_ascii_case("end") {
        return Some(Command::End);
    }

    if let Some(rest) = strip_verb(input, "TO ") {
        let rest = rest.trim_start();
        return Some(match rest.split_once(char::is_whitespace) {
            None => Command::Open { target: rest.to_string() },
            Some((target, text)) => Command::OneOff {
                target: target.to_string(),
                text: text.trim_start().to_string(),
            },
        });
    }

    Some(Command::Say { text: input.to_string() })
}

/// Case-insensitive verb prefix match.
fn strip_verb<'a>(input: &'a str, verb: &str) -> Option<&'a str> {
    let head = input.get(..verb.len())?;
    head.eq_ignore_ascii_case(verb).then_some(&input[verb.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_nothing() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn quit_in_any_case() {
        assert_eq!(parse("exit"), Some(Command::Quit));
        assert_eq!(parse("QUIT"), Some(Command::Quit));
    }

    #[test]
    fn end_in_any_case() {
        assert_eq!(parse("END"), Some(Command::End));
        assert_eq!(parse("end"), Some(Command::End));
    }

    #[test]
    fn to_with_target_opens_a_conversation() {
        assert_eq!(parse("TO bob"), Some(Command::Open { target: "bob".into() }));
        assert_eq!(parse("to bob"), Some(Command::Open { target: "bob".into() }));
        assert_eq!(parse("  TO bob  "), Some(Command::Open { target: "bob".into() }));
    }

    #[test]
    fn to_with_message_is_a_one_off() {
        assert_eq!(
            parse("TO bob hi there"),
            Some(Command::OneOff { target: "bob".into(), text: "hi there".into() })
        );
    }

    #[test]
    fn extra_spacing_around_the_target_is_tolerated() {
        assert_eq!(
            parse("TO  bob   hi"),
            Some(Command::OneOff { target: "bob".into(), text: "hi".into() })
        );
    }

    #[test]
    fn bare_to_is_just_a_message() {
        assert_eq!(parse("TO"), Some(Command::Say { text: "TO".into() }));
    }

    #[test]
    fn plain_text_goes_to_the_current_conversation() {
        assert_eq!(parse("hello world"), Some(Command::Say { text: "hello world".into() }));
    }
}

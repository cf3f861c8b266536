//! Chunk-to-line reassembly.
//!
//! TCP reads deliver arbitrary byte chunks: a chunk may hold zero, one, or
//! many newlines, and a logical line may span several chunks. [`LineFramer`]
//! buffers raw bytes and hands back one complete line at a time.

/// Reassembles newline-terminated lines from raw byte chunks.
///
/// Buffering happens in bytes, not text, so a multibyte UTF-8 sequence split
/// across two reads is decoded intact once its line completes. Each completed
/// line is decoded lossily and trimmed; empty lines are discarded silently.
///
/// The framer is not seekable; the only way to restart it is [`Self::clear`],
/// which discards buffered partial input.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8>,
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw chunk read from the transport.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next complete line, trimmed and non-empty.
    ///
    /// Returns `None` once only a partial line (or nothing) remains buffered.
    /// Lines that are empty after trimming are skipped.
    pub fn next_line(&mut self) -> Option<String> {
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..pos]);
            let line = line.trim();
            if !line.is_empty() {
                return Some(line.to_string());
            }
        }
        None
    }

    /// Number of buffered bytes still waiting for a newline.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Discard buffered partial input.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn drain(framer: &mut LineFramer) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = framer.next_line() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn single_line_per_chunk() {
        let mut framer = LineFramer::new();
        framer.push(b"FROM A hi\n");
        framer.push(b"FROM B yo\n");

        assert_eq!(drain(&mut framer), ["FROM A hi", "FROM B yo"]);
    }

    #[test]
    fn line_split_across_chunks() {
        let mut framer = LineFramer::new();
        framer.push(b"SYS EN");
        assert_eq!(framer.next_line(), None);

        framer.push(b"D alice\nOK");
        assert_eq!(framer.next_line(), Some("SYS END alice".into()));
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.pending(), 2);

        framer.push(b" Welcome\n");
        assert_eq!(framer.next_line(), Some("OK Welcome".into()));
    }

    #[test]
    fn many_lines_in_one_chunk() {
        let mut framer = LineFramer::new();
        framer.push(b"a\nb\nc\n");

        assert_eq!(drain(&mut framer), ["a", "b", "c"]);
    }

    #[test]
    fn empty_and_whitespace_lines_are_discarded() {
        let mut framer = LineFramer::new();
        framer.push(b"\n\r\n   \nhello\n\n");

        assert_eq!(drain(&mut framer), ["hello"]);
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        let mut framer = LineFramer::new();
        framer.push(b"OK Welcome bob\r\n");

        assert_eq!(framer.next_line(), Some("OK Welcome bob".into()));
    }

    #[test]
    fn multibyte_char_split_across_chunks_survives() {
        let snowman = "\u{2603}".as_bytes();
        let mut framer = LineFramer::new();
        framer.push(&snowman[..1]);
        framer.push(&snowman[1..]);
        framer.push(b"\n");

        assert_eq!(framer.next_line(), Some("\u{2603}".into()));
    }

    #[test]
    fn clear_discards_partial_input() {
        let mut framer = LineFramer::new();
        framer.push(b"partial");
        framer.clear();
        framer.push(b"\n");

        assert_eq!(framer.next_line(), None);
    }

    proptest! {
        /// Arbitrary chunk boundaries never change which lines come out.
        #[test]
        fn prop_chunking_is_transparent(
            lines in prop::collection::vec("[a-zA-Z0-9 ]{1,20}", 0..10),
            cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
        ) {
            let mut stream = String::new();
            for line in &lines {
                stream.push_str(line);
                stream.push('\n');
            }
            let bytes = stream.as_bytes();

            let mut offsets: Vec<usize> = cuts.iter().map(|ix| ix.index(bytes.len() + 1)).collect();
            offsets.push(0);
            offsets.push(bytes.len());
            offsets.sort_unstable();

            let mut framer = LineFramer::new();
            let mut got = Vec::new();
            for pair in offsets.windows(2) {
                framer.push(&bytes[pair[0]..pair[1]]);
                while let Some(line) = framer.next_line() {
                    got.push(line);
                }
            }

            let want: Vec<String> =
                lines.iter().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect();
            prop_assert_eq!(got, want);
            prop_assert_eq!(framer.pending(), 0);
        }
    }
}

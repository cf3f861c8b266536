//! Fuzz target for line framing across arbitrary chunk boundaries
//!
//! TCP decides where reads split; the framer must not care.
//!
//! # Invariants
//!
//! - NEVER panic, whatever the bytes or the chunking
//! - Chunk boundaries are invisible: the same bytes fed in one chunk or many
//!   yield the same lines
//! - Every yielded line is trimmed and non-empty

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use patter_proto::LineFramer;

#[derive(Debug, Arbitrary)]
struct Input {
    data: Vec<u8>,
    cuts: Vec<u16>,
}

fuzz_target!(|input: Input| {
    let mut whole = LineFramer::new();
    whole.push(&input.data);
    let mut want = Vec::new();
    while let Some(line) = whole.next_line() {
        want.push(line);
    }

    let mut offsets: Vec<usize> =
        input.cuts.iter().map(|&cut| (cut as usize) % (input.data.len() + 1)).collect();
    offsets.push(0);
    offsets.push(input.data.len());
    offsets.sort_unstable();

    let mut chunked = LineFramer::new();
    let mut got = Vec::new();
    for pair in offsets.windows(2) {
        chunked.push(&input.data[pair[0]..pair[1]]);
        while let Some(line) = chunked.next_line() {
            got.push(line);
        }
    }

    assert_eq!(got, want);
    assert_eq!(chunked.pending(), whole.pending());
    for line in &got {
        assert!(!line.is_empty());
        assert_eq!(line.trim(), line);
    }
});

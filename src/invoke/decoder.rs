// src/invoke/decoder.rs

//! Incremental UTF-8 decoding for chunked pipe output.
//!
//! A pipe read can end in the middle of a multi-byte character. Decoding
//! each chunk on its own would turn both halves into U+FFFD, so the decoder
//! keeps the incomplete tail of one chunk and prepends it to the next.

use std::str;

/// Longest possible UTF-8 sequence; bounds the carry-over buffer.
const MAX_UTF8_LEN: usize = 4;

/// Per-stream decoder with a small carry-over buffer.
///
/// Bytes that can never form valid UTF-8 are replaced with U+FFFD, the same
/// way `String::from_utf8_lossy` does. An incomplete sequence still pending
/// when the stream ends is emitted as U+FFFD by [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of undecoded bytes carried over to the next chunk.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Decode `chunk` and append the complete characters to `out`.
    pub fn decode_into(&mut self, chunk: &[u8], out: &mut String) {
        if chunk.is_empty() {
            return;
        }

        let joined;
        let mut input: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            let mut buf = std::mem::take(&mut self.pending);
            buf.extend_from_slice(chunk);
            joined = buf;
            &joined
        };

        loop {
            match str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    // `valid_up_to` guarantees this prefix is well-formed.
                    out.push_str(str::from_utf8(valid).unwrap_or_default());

                    match err.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[bad..];
                        }
                        None => {
                            // Incomplete but possibly valid sequence at the end.
                            debug_assert!(rest.len() < MAX_UTF8_LEN);
                            self.pending.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Convenience wrapper returning the decoded text of one chunk.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut out = String::new();
        self.decode_into(chunk, &mut out);
        out
    }

    /// Flush whatever is still pending at end of stream.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}

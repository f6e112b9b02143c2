//! Streaming UTF-8 decoding of received chunks.

/// Longest UTF-8 encoding of a single scalar value.
const MAX_UTF8_LEN: usize = 4;

/// Decodes a byte stream that arrives in arbitrary chunks.
///
/// A multi-byte sequence cut by the chunk boundary is held back and completed
/// by the next chunk. Bytes that can never form valid UTF-8 are replaced with
/// U+FFFD, as `String::from_utf8_lossy` does.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, prefixed by whatever the previous call held back.
    ///
    /// May return an empty string when the whole input is an incomplete sequence.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let keep = incomplete_suffix_len(&bytes);
        self.pending = bytes.split_off(bytes.len() - keep);

        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Flush held-back bytes at end of stream.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    /// Number of bytes currently held back
    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Length of a trailing, valid-but-incomplete UTF-8 sequence (0 if none).
fn incomplete_suffix_len(bytes: &[u8]) -> usize {
    let start = bytes.len().saturating_sub(MAX_UTF8_LEN - 1);
    for i in (start..bytes.len()).rev() {
        if !is_continuation_byte(bytes[i]) {
            return match std::str::from_utf8(&bytes[i..]) {
                Err(e) if e.valid_up_to() == 0 && e.error_len().is_none() => bytes.len() - i,
                _ => 0,
            };
        }
    }
    0
}

fn is_continuation_byte(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

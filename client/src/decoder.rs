use encoding_rs::{CoderResult, Decoder, UTF_8};

/// Incremental UTF-8 decoder for a chunked response body.
///
/// Bytes of a character split across chunks are held until the rest of the
/// character arrives. Malformed input becomes U+FFFD and a leading UTF-8 BOM
/// is dropped. A UTF-16 byte order mark is just malformed input.
pub struct StreamDecoder {
    inner: Decoder,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            inner: UTF_8.new_decoder_with_bom_removal(),
        }
    }

    /// Decodes `chunk` and appends the complete characters to `out`.
    pub fn decode_into(&mut self, chunk: &[u8], out: &mut String) {
        let mut input = chunk;
        loop {
            self.reserve_for(input.len(), out);
            let (result, read, _had_replacements) = self.inner.decode_to_string(input, out, false);
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }

    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut out = String::new();
        self.decode_into(chunk, &mut out);
        out
    }

    fn reserve_for(&self, input_len: usize, out: &mut String) {
        let needed = self
            .inner
            .max_utf8_buffer_length(input_len)
            .unwrap_or(input_len.saturating_mul(3).saturating_add(4));
        out.reserve(needed);
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

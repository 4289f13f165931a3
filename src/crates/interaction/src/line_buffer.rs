//! Newline framing over a chunked byte stream.

use log::warn;

/// Accumulates raw bytes and yields complete text lines.
///
/// Bytes are buffered until a terminator arrives, so a multi-byte UTF-8
/// sequence split across chunk boundaries stays intact. The unterminated
/// trailing fragment survives across pushes; [`LineBuffer::finish`] drains
/// it at end of stream so no data is dropped at EOF.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(decode(line));
        }
        lines
    }

    /// Drain the unterminated tail, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        Some(decode(std::mem::take(&mut self.pending)))
    }
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => {
            warn!("line contains invalid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every chunking of the input must decode to the same line sequence.
    fn lines_for_splits(input: &[u8], split_at: usize) -> Vec<String> {
        let mut buffer = LineBuffer::new();
        let mut lines = buffer.push(&input[..split_at]);
        lines.extend(buffer.push(&input[split_at..]));
        if let Some(tail) = buffer.finish() {
            lines.push(tail);
        }
        lines
    }

    #[test]
    fn single_chunk_yields_complete_lines() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"one\ntwo\n"), vec!["one", "two"]);
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn partial_line_is_retained_across_pushes() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"hel"), Vec::<String>::new());
        assert_eq!(buffer.push(b"lo\nwor"), vec!["hello"]);
        assert_eq!(buffer.push(b"ld\n"), vec!["world"]);
    }

    #[test]
    fn unterminated_tail_is_flushed_at_eof() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"alpha\nbeta"), vec!["alpha"]);
        assert_eq!(buffer.finish(), Some("beta".to_string()));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b"one\r\ntwo\r\n"), vec!["one", "two"]);
    }

    #[test]
    fn every_split_of_one_line_decodes_identically() {
        let input = "caf\u{e9} na\u{ef}ve \u{4f60}\u{597d}\n".as_bytes();
        for split_at in 0..=input.len() {
            assert_eq!(
                lines_for_splits(input, split_at),
                vec!["caf\u{e9} na\u{ef}ve \u{4f60}\u{597d}"],
                "split at byte {split_at}"
            );
        }
    }

    #[test]
    fn split_inside_a_multibyte_character_decodes_correctly() {
        // U+1F409 is four bytes; cut it in half.
        let input = "a\u{1F409}b\n".as_bytes();
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(&input[..3]), Vec::<String>::new());
        assert_eq!(buffer.push(&input[3..]), vec!["a\u{1F409}b"]);
    }

    #[test]
    fn split_exactly_at_the_terminator() {
        let input = b"first\nsecond\n";
        let newline = 5;
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(&input[..=newline]), vec!["first"]);
        assert_eq!(buffer.push(&input[newline + 1..]), vec!["second"]);
    }

    #[test]
    fn empty_push_yields_nothing() {
        let mut buffer = LineBuffer::new();
        assert_eq!(buffer.push(b""), Vec::<String>::new());
        assert_eq!(buffer.finish(), None);
    }
}

use serde_json::Value;

const DATA_PREFIX: &str = "data: ";
const DONE_PAYLOAD: &str = "[DONE]";

/// One incremental fragment extracted from a stream record. A single record
/// may yield both a content and a reasoning delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamDelta {
    Content(String),
    Reasoning(String),
}

/// Incremental decoder for line-delimited SSE chat-completion streams.
///
/// Raw bytes are buffered until a terminating newline arrives, so a delta is
/// never parsed from a truncated record and a multi-byte character split
/// across network chunks is reassembled intact, regardless of how the
/// transport chunks the payload.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    /// Feed arbitrary bytes into the decoder and drain complete records.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamDelta> {
        self.buffer.extend_from_slice(bytes);
        let mut deltas = Vec::new();

        // A newline byte never occurs inside a multi-byte UTF-8 sequence, so
        // splitting on it keeps every drained line decodable whole.
        while let Some(split) = self.buffer.iter().position(|&byte| byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(0..=split).collect();
            let line = String::from_utf8_lossy(&line[..split]);
            decode_line(&line, &mut deltas);
        }

        deltas
    }

    /// Flush pass after end-of-input: some servers omit the final newline, so
    /// a complete `data: ` record may still sit in the buffer.
    pub fn finish(&mut self) -> Vec<StreamDelta> {
        let remainder = std::mem::take(&mut self.buffer);
        let remainder = String::from_utf8_lossy(&remainder);
        let mut deltas = Vec::new();
        if let Some(payload) = remainder.strip_prefix(DATA_PREFIX) {
            let payload = payload.trim();
            if !payload.is_empty() && payload != DONE_PAYLOAD {
                decode_record(payload, &mut deltas);
            }
        }
        deltas
    }

    #[must_use]
    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.iter().all(u8::is_ascii_whitespace)
    }

    /// Decode a complete SSE payload string in one shot.
    pub fn decode_all(input: &str) -> Vec<StreamDelta> {
        let mut decoder = Self::default();
        let mut deltas = decoder.feed(input.as_bytes());
        deltas.extend(decoder.finish());
        deltas
    }
}

fn decode_line(line: &str, deltas: &mut Vec<StreamDelta>) {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return;
    };
    if payload == DONE_PAYLOAD {
        return;
    }
    decode_record(payload, deltas);
}

fn decode_record(payload: &str, deltas: &mut Vec<StreamDelta>) {
    // Malformed records must never abort the stream; they are dropped here.
    let Ok(record) = serde_json::from_str::<Value>(payload) else {
        return;
    };
    let Some(delta) = record
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("delta"))
    else {
        return;
    };

    if let Some(content) = delta.get("content").and_then(Value::as_str) {
        deltas.push(StreamDelta::Content(content.to_owned()));
    }

    // Reasoning arrives under either of two field names depending on the
    // provider; `thinking_content` wins when both are present.
    let reasoning = delta
        .get("thinking_content")
        .and_then(Value::as_str)
        .or_else(|| delta.get("reasoning").and_then(Value::as_str));
    if let Some(reasoning) = reasoning {
        deltas.push(StreamDelta::Reasoning(reasoning.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::{SseLineDecoder, StreamDelta};

    #[test]
    fn decode_waits_for_terminating_newline() {
        let mut decoder = SseLineDecoder::default();

        let first = decoder.feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel");
        assert!(first.is_empty());

        let second = decoder.feed(b"lo\"}}]}\n");
        assert_eq!(second, vec![StreamDelta::Content("Hello".to_owned())]);
        assert!(decoder.is_empty_buffer());
    }

    #[test]
    fn done_marker_is_dropped_without_parsing() {
        let mut decoder = SseLineDecoder::default();
        assert!(decoder.feed(b"data: [DONE]\n").is_empty());
        assert!(decoder.is_empty_buffer());
    }
}

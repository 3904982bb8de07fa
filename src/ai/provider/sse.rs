//! Server-Sent Event decoding for streamed chat completions
//!
//! Frames look like `data: {json}\n\n` and the stream ends with
//! `data: [DONE]`. Network chunks split frames at arbitrary byte offsets, so
//! the decoder buffers bytes and only interprets complete lines.

use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::TextStream;
use crate::types::{ErrorCategory, ErrorClassifier, LlmError, Result};

const DATA_PREFIX: &str = "data:";
const DONE_MARKER: &str = "[DONE]";

/// One decoded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// `choices[0].delta.content` of one frame
    Delta(String),
    /// The `[DONE]` terminator
    Done,
}

/// Incremental line decoder; feed bytes, then pull events until `None`.
#[derive(Debug)]
pub struct SseDecoder {
    provider: String,
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            buffer: Vec::new(),
            done: false,
        }
    }

    /// Append raw body bytes
    pub fn feed(&mut self, chunk: &[u8]) {
        if !self.done {
            self.buffer.extend_from_slice(chunk);
        }
    }

    /// Flush a trailing line that was not newline-terminated
    pub fn close(&mut self) {
        if !self.buffer.is_empty() && self.buffer.last() != Some(&b'\n') {
            self.buffer.push(b'\n');
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Next complete event, or `None` when more bytes are needed.
    pub fn next_event(&mut self) -> Result<Option<SseEvent>> {
        while !self.done {
            let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') else {
                return Ok(None);
            };
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            // Complete lines never end inside a multi-byte sequence
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(event) = self.decode_line(line)? {
                if event == SseEvent::Done {
                    self.done = true;
                    self.buffer.clear();
                }
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    fn decode_line(&self, line: &str) -> Result<Option<SseEvent>> {
        // Blank separators, comments/keep-alives and non-data fields
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return Ok(None);
        };
        let payload = payload.trim();
        if payload.is_empty() {
            return Ok(None);
        }
        if payload == DONE_MARKER {
            debug!("[{}] stream finished", self.provider);
            return Ok(Some(SseEvent::Done));
        }

        let frame: StreamFrame = match serde_json::from_str(payload) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("[{}] skipping undecodable frame: {}", self.provider, e);
                return Ok(None);
            }
        };

        if let Some(error) = frame.error {
            return Err(self.frame_error(&error).into());
        }

        let delta = frame
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|text| !text.is_empty());

        Ok(delta.map(SseEvent::Delta))
    }

    fn frame_error(&self, error: &Value) -> LlmError {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());

        match error.get("code").and_then(Value::as_u64) {
            Some(code @ 400..=599) => {
                ErrorClassifier::classify_http_status(code as u16, &message, &self.provider)
            }
            _ => LlmError::with_provider(ErrorCategory::Transient, message, &self.provider),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamFrame {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

struct DecodeState<S> {
    bytes: S,
    decoder: SseDecoder,
    finished: bool,
}

/// Turn a body byte stream into a stream of text deltas.
///
/// Ends at `[DONE]` (without reading further) or when the body ends. The
/// first error is yielded once and terminates the stream.
pub fn decode_sse_stream<S, B>(bytes: S, provider: impl Into<String>) -> TextStream
where
    S: Stream<Item = Result<B>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = DecodeState {
        bytes,
        decoder: SseDecoder::new(provider),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            match state.decoder.next_event() {
                Ok(Some(SseEvent::Delta(text))) => return Some((Ok(text), state)),
                Ok(Some(SseEvent::Done)) => return None,
                Ok(None) if state.finished => return None,
                Ok(None) => {}
                Err(e) => {
                    state.finished = true;
                    state.decoder.done = true;
                    return Some((Err(e), state));
                }
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.decoder.feed(chunk.as_ref()),
                Some(Err(e)) => {
                    state.finished = true;
                    state.decoder.done = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.finished = true;
                    state.decoder.close();
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MasteryError;

    fn frame(text: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({"choices": [{"delta": {"content": text}}]})
        )
    }

    fn drain(decoder: &mut SseDecoder) -> Vec<SseEvent> {
        let mut events = Vec::new();
        while let Some(event) = decoder.next_event().unwrap() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let body = format!("{}{}data: [DONE]\n\n", frame("Hel"), frame("lo"));
        let (a, b) = body.as_bytes().split_at(13);

        let mut decoder = SseDecoder::new("test");
        decoder.feed(a);
        assert!(drain(&mut decoder).is_empty());
        decoder.feed(b);

        assert_eq!(
            drain(&mut decoder),
            vec![
                SseEvent::Delta("Hel".into()),
                SseEvent::Delta("lo".into()),
                SseEvent::Done
            ]
        );
        assert!(decoder.is_done());
    }

    #[test]
    fn test_ignores_comments_blank_lines_and_role_frames() {
        let body = format!(
            ": keep-alive\n\r\ndata: {}\r\n\r\n{}",
            serde_json::json!({"choices": [{"delta": {"role": "assistant"}}]}),
            frame("x")
        );
        let mut decoder = SseDecoder::new("test");
        decoder.feed(body.as_bytes());
        assert_eq!(drain(&mut decoder), vec![SseEvent::Delta("x".into())]);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let body = frame("₹500");
        let bytes = body.as_bytes();
        let split = body.find('₹').unwrap() + 1;

        let mut decoder = SseDecoder::new("test");
        decoder.feed(&bytes[..split]);
        assert!(drain(&mut decoder).is_empty());
        decoder.feed(&bytes[split..]);
        assert_eq!(drain(&mut decoder), vec![SseEvent::Delta("₹500".into())]);
    }

    #[test]
    fn test_nothing_after_done() {
        let body = format!("data: [DONE]\n\n{}", frame("late"));
        let mut decoder = SseDecoder::new("test");
        decoder.feed(body.as_bytes());
        assert_eq!(drain(&mut decoder), vec![SseEvent::Done]);
        decoder.feed(frame("later").as_bytes());
        assert!(drain(&mut decoder).is_empty());
    }

    #[test]
    fn test_error_frame_is_transport_error() {
        let body = format!(
            "{}data: {}\n\n",
            frame("partial"),
            serde_json::json!({"error": {"message": "overloaded", "code": 503}})
        );
        let mut decoder = SseDecoder::new("xai");
        decoder.feed(body.as_bytes());

        assert_eq!(
            decoder.next_event().unwrap(),
            Some(SseEvent::Delta("partial".into()))
        );
        match decoder.next_event() {
            Err(MasteryError::Llm(err)) => {
                assert_eq!(err.category, ErrorCategory::Transient);
                assert_eq!(err.status, Some(503));
                assert!(err.message.contains("overloaded"));
            }
            other => panic!("expected LLM error, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_last_line_flushed_on_close() {
        let body = frame("tail");
        let mut decoder = SseDecoder::new("test");
        decoder.feed(body.trim_end().as_bytes());
        assert!(drain(&mut decoder).is_empty());
        decoder.close();
        assert_eq!(drain(&mut decoder), vec![SseEvent::Delta("tail".into())]);
    }

    #[tokio::test]
    async fn test_decode_sse_stream_collects_deltas() {
        let body = format!("{}{}data: [DONE]\n\n", frame("{\"sec"), frame("tions\""));
        let chunks: Vec<Result<Vec<u8>>> = body
            .as_bytes()
            .chunks(7)
            .map(|c| Ok(c.to_vec()))
            .collect();

        let deltas: Vec<String> = decode_sse_stream(stream::iter(chunks), "test")
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(deltas.concat(), "{\"sections\"");
    }

    #[tokio::test]
    async fn test_decode_sse_stream_error_is_terminal() {
        let chunks: Vec<Result<Vec<u8>>> = vec![
            Ok(frame("one").into_bytes()),
            Err(LlmError::new(ErrorCategory::Network, "reset").into()),
            Ok(frame("two").into_bytes()),
        ];

        let items: Vec<Result<String>> =
            decode_sse_stream(stream::iter(chunks), "test").collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "one");
        assert!(items[1].is_err());
    }
}

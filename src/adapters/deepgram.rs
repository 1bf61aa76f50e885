// adapters/deepgram.rs
//
// Deepgram streaming results carry the transcript under
// `channel.alternatives[0]` together with word-level timings and speaker
// tags. Interim results resend the whole in-progress utterance each time;
// `is_final` locks the text in.

use super::{AdapterResult, ProviderAdapter};
use crate::error::SttError;
use crate::types::{Provider, SttWord};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct DeepgramMessage {
    #[serde(default)]
    channel: Option<Channel>,
    #[serde(default)]
    is_final: bool,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    words: Vec<SttWord>,
}

pub struct DeepgramAdapter;

impl ProviderAdapter for DeepgramAdapter {
    fn provider(&self) -> Provider {
        Provider::Deepgram
    }

    fn translate(&self, raw: &Value) -> Result<AdapterResult, SttError> {
        let message: DeepgramMessage = serde_json::from_value(raw.clone())
            .map_err(|e| SttError::MalformedMessage(e.to_string()))?;

        let Some(alternative) = message
            .channel
            .and_then(|c| c.alternatives.into_iter().next())
        else {
            return Ok(AdapterResult::Ignored);
        };

        let text = alternative.transcript;
        if text.trim().is_empty() {
            return Ok(AdapterResult::Ignored);
        }

        let words = alternative.words;
        Ok(match (message.is_final, words.is_empty()) {
            (true, false) => AdapterResult::FinalDiarized { text, words },
            (true, true) => AdapterResult::FinalText(text),
            (false, false) => AdapterResult::PartialDiarized { text, words },
            (false, true) => AdapterResult::PartialText(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(is_final: bool, transcript: &str, words: Value) -> Value {
        json!({
            "is_final": is_final,
            "channel": {"alternatives": [{"transcript": transcript, "words": words}]}
        })
    }

    #[test]
    fn test_final_with_words_is_diarized() {
        let raw = message(
            true,
            "hello world",
            json!([
                {"word": "hello", "start": 0.0, "end": 1.0, "speaker": 0, "confidence": 0.9},
                {"word": "world", "start": 1.0, "end": 1.2, "speaker": 0, "confidence": 0.8}
            ]),
        );
        match DeepgramAdapter.translate(&raw).unwrap() {
            AdapterResult::FinalDiarized { text, words } => {
                assert_eq!(text, "hello world");
                assert_eq!(words.len(), 2);
                assert_eq!(words[1].end, 1.2);
            }
            other => panic!("expected FinalDiarized, got {:?}", other),
        }
    }

    #[test]
    fn test_interim_with_words_is_partial_diarized() {
        let raw = message(
            false,
            "hello",
            json!([{"word": "hello", "start": 0.0, "end": 0.8, "speaker": 1, "confidence": 0.7}]),
        );
        assert!(matches!(
            DeepgramAdapter.translate(&raw).unwrap(),
            AdapterResult::PartialDiarized { .. }
        ));
    }

    #[test]
    fn test_no_words_falls_back_to_plain_variants() {
        let raw = message(false, "hello", json!([]));
        assert_eq!(
            DeepgramAdapter.translate(&raw).unwrap(),
            AdapterResult::PartialText("hello".to_string())
        );
        let raw = message(true, "hello", json!([]));
        assert_eq!(
            DeepgramAdapter.translate(&raw).unwrap(),
            AdapterResult::FinalText("hello".to_string())
        );
    }

    #[test]
    fn test_blank_transcript_and_control_frames_ignored() {
        assert_eq!(
            DeepgramAdapter.translate(&message(true, "   ", json!([]))).unwrap(),
            AdapterResult::Ignored
        );
        // Metadata frames have no channel at all
        assert_eq!(
            DeepgramAdapter.translate(&json!({"type": "Metadata"})).unwrap(),
            AdapterResult::Ignored
        );
    }

    #[test]
    fn test_malformed_words_rejected() {
        let raw = json!({
            "is_final": true,
            "channel": {"alternatives": [{"transcript": "hi there", "words": [{"start": "zero"}]}]}
        });
        assert!(matches!(
            DeepgramAdapter.translate(&raw).unwrap_err(),
            SttError::MalformedMessage(_)
        ));
    }
}

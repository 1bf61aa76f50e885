// adapters/openai.rs
//
// OpenAI realtime transcription events are discriminated by their `type`
// field: `*.delta` carries an incremental fragment, `*.completed` the final
// utterance text. Deltas occasionally leak internal audio tokens
// (`vq_lbr_audio_*`); those are dropped as noise.

use super::{AdapterResult, ProviderAdapter};
use crate::error::SttError;
use crate::types::Provider;
use serde::Deserialize;
use serde_json::Value;

const DELTA_TYPE: &str = "conversation.item.input_audio_transcription.delta";
const COMPLETED_TYPE: &str = "conversation.item.input_audio_transcription.completed";

/// Substring marking an internal audio token, never real speech
const INTERNAL_AUDIO_TOKEN: &str = "vq_lbr_audio_";

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    delta: Option<String>,
    #[serde(default)]
    alternatives: Vec<OpenAiAlternative>,
}

#[derive(Debug, Deserialize)]
struct OpenAiAlternative {
    #[serde(default)]
    transcript: Option<String>,
}

impl OpenAiMessage {
    /// The transcript text, wherever this message variant put it
    fn text(&self) -> String {
        self.transcript
            .clone()
            .or_else(|| self.delta.clone())
            .or_else(|| self.alternatives.first().and_then(|a| a.transcript.clone()))
            .unwrap_or_default()
    }
}

pub struct OpenAiAdapter;

impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn translate(&self, raw: &Value) -> Result<AdapterResult, SttError> {
        let message: OpenAiMessage = serde_json::from_value(raw.clone())
            .map_err(|e| SttError::MalformedMessage(e.to_string()))?;

        match message.kind.as_deref() {
            Some(DELTA_TYPE) => {
                let text = message.text();
                if text.is_empty() {
                    Ok(AdapterResult::Ignored)
                } else if text.contains(INTERNAL_AUDIO_TOKEN) {
                    Ok(AdapterResult::Noise)
                } else {
                    Ok(AdapterResult::PartialText(text))
                }
            }
            Some(COMPLETED_TYPE) => {
                let text = message.text();
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Ok(AdapterResult::Ignored)
                } else {
                    Ok(AdapterResult::FinalText(trimmed.to_string()))
                }
            }
            // Session control frames, audio buffer acks, etc.
            _ => Ok(AdapterResult::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delta_is_partial() {
        let raw = json!({"type": DELTA_TYPE, "delta": "hel"});
        assert_eq!(
            OpenAiAdapter.translate(&raw).unwrap(),
            AdapterResult::PartialText("hel".to_string())
        );
    }

    #[test]
    fn test_internal_audio_token_is_noise() {
        let raw = json!({"type": DELTA_TYPE, "delta": "vq_lbr_audio_8231"});
        assert_eq!(OpenAiAdapter.translate(&raw).unwrap(), AdapterResult::Noise);
    }

    #[test]
    fn test_completed_is_trimmed_final() {
        let raw = json!({"type": COMPLETED_TYPE, "transcript": " hello world "});
        assert_eq!(
            OpenAiAdapter.translate(&raw).unwrap(),
            AdapterResult::FinalText("hello world".to_string())
        );
    }

    #[test]
    fn test_completed_without_text_ignored() {
        let raw = json!({"type": COMPLETED_TYPE, "transcript": "  "});
        assert_eq!(OpenAiAdapter.translate(&raw).unwrap(), AdapterResult::Ignored);
    }

    #[test]
    fn test_text_fallback_to_alternatives() {
        let raw = json!({
            "type": COMPLETED_TYPE,
            "alternatives": [{"transcript": "from alternatives"}]
        });
        assert_eq!(
            OpenAiAdapter.translate(&raw).unwrap(),
            AdapterResult::FinalText("from alternatives".to_string())
        );
    }

    #[test]
    fn test_control_frames_ignored() {
        let raw = json!({"type": "input_audio_buffer.speech_started"});
        assert_eq!(OpenAiAdapter.translate(&raw).unwrap(), AdapterResult::Ignored);
        assert_eq!(OpenAiAdapter.translate(&json!({})).unwrap(), AdapterResult::Ignored);
    }
}

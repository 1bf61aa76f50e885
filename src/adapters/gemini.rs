// adapters/gemini.rs
//
// Gemini live messages nest transcription under `serverContent`. The provider
// never signals finality on a chunk; the only end-of-utterance marker is the
// `turnComplete` flag, which forces an immediate flush.

use super::{AdapterResult, ProviderAdapter};
use crate::error::SttError;
use crate::noise::is_gemini_noise;
use crate::types::Provider;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct GeminiMessage {
    #[serde(rename = "serverContent", default)]
    server_content: Option<ServerContent>,
}

#[derive(Debug, Deserialize)]
struct ServerContent {
    #[serde(rename = "turnComplete", default)]
    turn_complete: bool,
    #[serde(rename = "inputTranscription", default)]
    input_transcription: Option<InputTranscription>,
}

#[derive(Debug, Deserialize)]
struct InputTranscription {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiAdapter;

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn translate(&self, raw: &Value) -> Result<AdapterResult, SttError> {
        let message: GeminiMessage = serde_json::from_value(raw.clone())
            .map_err(|e| SttError::MalformedMessage(e.to_string()))?;

        let Some(content) = message.server_content else {
            return Ok(AdapterResult::Ignored);
        };

        // turnComplete wins over any text carried in the same message
        if content.turn_complete {
            return Ok(AdapterResult::TurnComplete);
        }

        let Some(text) = content.input_transcription.and_then(|t| t.text) else {
            return Ok(AdapterResult::Ignored);
        };

        if is_gemini_noise(text.trim()) {
            return Ok(AdapterResult::Noise);
        }

        // Keep the chunk unmodified: Gemini streams its own spacing, so the
        // accumulator concatenates chunks without a separator.
        Ok(AdapterResult::PartialText(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chunk_is_partial_and_unmodified() {
        let raw = json!({"serverContent": {"inputTranscription": {"text": "hel"}}});
        assert_eq!(
            GeminiAdapter.translate(&raw).unwrap(),
            AdapterResult::PartialText("hel".to_string())
        );
    }

    #[test]
    fn test_turn_complete_ignores_text() {
        let raw = json!({
            "serverContent": {
                "turnComplete": true,
                "inputTranscription": {"text": "leftover"}
            }
        });
        assert_eq!(GeminiAdapter.translate(&raw).unwrap(), AdapterResult::TurnComplete);
    }

    #[test]
    fn test_noise_token_and_whitespace_filtered() {
        let noise = json!({"serverContent": {"inputTranscription": {"text": " <noise> "}}});
        assert_eq!(GeminiAdapter.translate(&noise).unwrap(), AdapterResult::Noise);

        let blank = json!({"serverContent": {"inputTranscription": {"text": "   "}}});
        assert_eq!(GeminiAdapter.translate(&blank).unwrap(), AdapterResult::Noise);
    }

    #[test]
    fn test_control_frames_ignored() {
        assert_eq!(GeminiAdapter.translate(&json!({})).unwrap(), AdapterResult::Ignored);
        let model_turn = json!({"serverContent": {"modelTurn": {"parts": []}}});
        assert_eq!(GeminiAdapter.translate(&model_turn).unwrap(), AdapterResult::Ignored);
    }
}

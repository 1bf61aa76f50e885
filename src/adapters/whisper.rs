// adapters/whisper.rs
//
// Whisper emits flat `transcription` events with a single `text` field.
// There is no partial/streaming granularity: every usable message is final.

use super::{AdapterResult, ProviderAdapter};
use crate::error::SttError;
use crate::noise::is_whisper_noise;
use crate::types::Provider;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct WhisperMessage {
    #[serde(default)]
    text: Option<String>,
}

pub struct WhisperAdapter;

impl ProviderAdapter for WhisperAdapter {
    fn provider(&self) -> Provider {
        Provider::Whisper
    }

    fn translate(&self, raw: &Value) -> Result<AdapterResult, SttError> {
        let message: WhisperMessage = serde_json::from_value(raw.clone())
            .map_err(|e| SttError::MalformedMessage(e.to_string()))?;

        let Some(text) = message.text else {
            return Ok(AdapterResult::Ignored);
        };

        let final_text = text.trim();
        if final_text.is_empty() {
            return Ok(AdapterResult::Ignored);
        }
        if is_whisper_noise(final_text) {
            return Ok(AdapterResult::Noise);
        }

        Ok(AdapterResult::FinalText(final_text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WHISPER_NOISE_PATTERNS;
    use serde_json::json;

    #[test]
    fn test_plain_text_is_final() {
        let result = WhisperAdapter.translate(&json!({"text": "  hello world  "})).unwrap();
        assert_eq!(result, AdapterResult::FinalText("hello world".to_string()));
    }

    #[test]
    fn test_noise_patterns_filtered() {
        for pattern in WHISPER_NOISE_PATTERNS {
            let result = WhisperAdapter.translate(&json!({ "text": pattern })).unwrap();
            assert_eq!(result, AdapterResult::Noise, "pattern not filtered: {}", pattern);
        }
    }

    #[test]
    fn test_short_text_is_noise() {
        let result = WhisperAdapter.translate(&json!({"text": "ok"})).unwrap();
        assert_eq!(result, AdapterResult::Noise);
    }

    #[test]
    fn test_missing_or_blank_text_ignored() {
        assert_eq!(WhisperAdapter.translate(&json!({})).unwrap(), AdapterResult::Ignored);
        assert_eq!(
            WhisperAdapter.translate(&json!({"text": "   "})).unwrap(),
            AdapterResult::Ignored
        );
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let err = WhisperAdapter.translate(&json!({"text": 42})).unwrap_err();
        assert!(matches!(err, SttError::MalformedMessage(_)));
    }
}

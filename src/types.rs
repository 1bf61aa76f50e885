// types.rs
//
// Core data types for the unification layer: providers, words, speaker
// attribution, and the unified event emitted to the presenter.

use serde::{Deserialize, Serialize};

/// STT providers with distinct wire message shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Deepgram,
    Whisper,
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Deepgram => "deepgram",
            Provider::Whisper => "whisper",
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of a unified transcript event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnifiedEventKind {
    Partial,
    Final,
    Error,
}

/// Normalized transcript event emitted to the presenter.
///
/// Within one session, `sequence_id` is strictly increasing and events are
/// emitted in the order the underlying provider messages were processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedEvent {
    pub kind: UnifiedEventKind,
    /// Display label: "Me", "Them", or a resolved participant identity
    pub speaker: String,
    /// Stable per-diarization-cluster id within a session
    pub speaker_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
    pub text: String,
    pub sequence_id: u64,
    /// Epoch millis
    pub timestamp: i64,
}

/// One word-level result from a diarizing provider (Deepgram)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SttWord {
    #[serde(default)]
    pub word: String,
    pub start: f64,
    pub end: f64,
    /// Diarization cluster id; 0 when the provider omitted it
    #[serde(default)]
    pub speaker: u32,
    #[serde(default)]
    pub confidence: f64,
}

impl SttWord {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Resolved speaker identity for one batch of word-level results.
/// Ephemeral: computed per batch, never stored by this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerAttribution {
    pub speaker_id: u32,
    /// "Me" or "Them"
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_user: bool,
}

impl SpeakerAttribution {
    /// Default attribution when diarization is unavailable: the session owner
    pub fn user_default() -> Self {
        Self {
            speaker_id: 0,
            label: "Me".to_string(),
            name: None,
            is_user: true,
        }
    }
}

impl Default for SpeakerAttribution {
    fn default() -> Self {
        Self::user_default()
    }
}

/// Final diarized segment handed to the persistence sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub session_id: String,
    pub speaker_id: u32,
    pub text: String,
    /// Seconds from stream start (first word's start)
    pub start_time: f64,
    /// Seconds from stream start (last word's end)
    pub end_time: f64,
    /// Average word confidence over the segment
    pub confidence: f64,
    pub is_final: bool,
}

/// Current wall-clock time in epoch millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

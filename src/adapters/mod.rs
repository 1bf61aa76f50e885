// adapters/mod.rs
//
// Provider adapters: one per STT provider, translating provider-specific
// message shapes into a common AdapterResult.
//
// Module structure:
// - whisper.rs: flat `text` messages, always final, no streaming granularity
// - gemini.rs: `serverContent` chunks + turnComplete signal
// - deepgram.rs: `channel.alternatives[0]` with word-level speaker tags
// - openai.rs: realtime `*.delta` / `*.completed` message types
//
// Adapters are stateless; one static instance per provider is selected once
// at session creation and never re-matched per message.

use crate::error::SttError;
use crate::types::{Provider, SttWord};
use serde_json::Value;

pub mod deepgram;
pub mod gemini;
pub mod openai;
pub mod whisper;

pub use deepgram::DeepgramAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
pub use whisper::WhisperAdapter;

/// Outcome of translating one raw provider message
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterResult {
    /// Content matched a noise/filler pattern or was empty after trimming
    Noise,
    /// Message shape not relevant to transcription (control frames, etc.)
    Ignored,
    /// Incremental transcript fragment; merge semantics depend on the
    /// session's provider strategy
    PartialText(String),
    /// Utterance complete; force-flush the accumulator
    FinalText(String),
    /// Interim result carrying word-level speaker tags (Deepgram)
    PartialDiarized { text: String, words: Vec<SttWord> },
    /// Final result carrying word-level speaker tags (Deepgram)
    FinalDiarized { text: String, words: Vec<SttWord> },
    /// Provider signalled end of turn; flush any pending debounce immediately
    /// regardless of text content (Gemini)
    TurnComplete,
}

/// Translation from one provider's wire shape to [`AdapterResult`]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Translate one raw message. Errors are absorbed (and logged) by the
    /// router; they never terminate the session.
    fn translate(&self, raw: &Value) -> Result<AdapterResult, SttError>;
}

static DEEPGRAM: DeepgramAdapter = DeepgramAdapter;
static GEMINI: GeminiAdapter = GeminiAdapter;
static OPENAI: OpenAiAdapter = OpenAiAdapter;
static WHISPER: WhisperAdapter = WhisperAdapter;

/// Resolve the adapter for a provider. Called once at session creation.
pub fn adapter_for(provider: Provider) -> &'static dyn ProviderAdapter {
    match provider {
        Provider::Deepgram => &DEEPGRAM,
        Provider::Gemini => &GEMINI,
        Provider::OpenAi => &OPENAI,
        Provider::Whisper => &WHISPER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_for_matches_provider() {
        for provider in [
            Provider::Deepgram,
            Provider::Gemini,
            Provider::OpenAi,
            Provider::Whisper,
        ] {
            assert_eq!(adapter_for(provider).provider(), provider);
        }
    }
}

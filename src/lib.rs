// meeting-stt - Real-time STT stream unification for a local meeting assistant
//
// Normalizes heterogeneous speech-to-text provider protocols (Deepgram,
// Whisper, Gemini, OpenAI-realtime) into one coherent event stream with
// debounced utterance completion, speaker diarization attribution, and
// partial/final update semantics. Audio capture, network transport, and
// model selection live elsewhere; this crate starts where a raw provider
// message arrives and ends at the presenter/persistence seams.

// Global state
pub mod globals;

// Core modules
pub mod accumulator;
pub mod adapters;
pub mod config;
pub mod error;
pub mod manager;
pub mod noise;
pub mod router;
pub mod session;
pub mod speaker;
pub mod types;

// Re-export commonly used types
pub use accumulator::{MergeStrategy, UtteranceBuffer};
pub use adapters::{adapter_for, AdapterResult, ProviderAdapter};
pub use config::SttConfig;
pub use error::SttError;
pub use manager::SttSessionManager;
pub use router::{
    CompletionCallback, PersistenceSink, Presenter, StatusCallback, UnifiedMessageRouter,
};
pub use session::{Session, SessionState};
pub use speaker::{dominant_speaker, SpeakerAttributionService, SpeakerResolver};
pub use types::{
    Provider, SegmentRecord, SpeakerAttribution, SttWord, UnifiedEvent, UnifiedEventKind,
};

// config.rs
//
// Tunables for the unification layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reduced from 2000ms to 1200ms for faster transcription completion.
/// This allows quicker turn-taking detection while still batching speech segments.
pub const COMPLETION_DEBOUNCE_MS: u64 = 1200;

/// Configuration for the STT router
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// Quiet interval (ms) after the last partial before an utterance is
    /// considered complete and flushed as a Final event
    pub completion_debounce_ms: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            completion_debounce_ms: COMPLETION_DEBOUNCE_MS,
        }
    }
}

impl SttConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.completion_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_debounce() {
        let config = SttConfig::default();
        assert_eq!(config.completion_debounce_ms, 1200);
        assert_eq!(config.debounce(), Duration::from_millis(1200));
    }

    #[test]
    fn test_deserialize_from_settings_json() {
        let config: SttConfig =
            serde_json::from_str(r#"{"completion_debounce_ms": 800}"#).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(800));
    }
}

// accumulator.rs
//
// Per-session utterance buffer. Coalesces rapid partial updates into a single
// completion, with merge semantics chosen per provider:
//
// - Delta (OpenAI): each message carries only the new fragment; append.
// - Replace (Deepgram): each interim resends the whole in-progress utterance;
//   the latest one wins.
// - Chunk (Whisper, Gemini): text goes straight into the completion buffer.
//   Gemini streams its own spacing so chunks concatenate without a separator;
//   everything else joins with a single space.
//
// The buffer holds no timers. Debounce scheduling lives in the router, which
// calls `take_final` when the quiet interval elapses or a forced flush
// (is_final, turnComplete) arrives.

use crate::types::Provider;

/// How partial text from a provider merges into the in-flight utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Fragments are deltas; append to the in-flight utterance
    Delta,
    /// Each interim carries the whole utterance; replace the in-flight text
    Replace,
    /// Fragments accumulate directly in the completion buffer
    Chunk,
}

impl MergeStrategy {
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::OpenAi => MergeStrategy::Delta,
            Provider::Deepgram => MergeStrategy::Replace,
            Provider::Whisper | Provider::Gemini => MergeStrategy::Chunk,
        }
    }
}

/// Debounce buffer state for one session
#[derive(Debug)]
pub struct UtteranceBuffer {
    strategy: MergeStrategy,
    /// Chunk separator: empty for Gemini, single space otherwise
    separator: &'static str,
    /// Fragments confirmed for the pending completion
    completion_buffer: String,
    /// In-progress utterance still being revised by the provider
    current_utterance: String,
}

impl UtteranceBuffer {
    pub fn new(provider: Provider) -> Self {
        Self {
            strategy: MergeStrategy::for_provider(provider),
            separator: if provider == Provider::Gemini { "" } else { " " },
            completion_buffer: String::new(),
            current_utterance: String::new(),
        }
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Append a confirmed fragment to the completion buffer
    pub fn buffer_chunk(&mut self, text: &str) {
        if !self.completion_buffer.is_empty() {
            self.completion_buffer.push_str(self.separator);
        }
        self.completion_buffer.push_str(text);
    }

    /// Merge a partial fragment into the in-flight utterance per the
    /// provider's strategy
    pub fn hold_partial(&mut self, text: &str) {
        match self.strategy {
            MergeStrategy::Delta => self.current_utterance.push_str(text),
            MergeStrategy::Replace => {
                self.current_utterance.clear();
                self.current_utterance.push_str(text);
            }
            // Chunk providers never hold an in-flight utterance
            MergeStrategy::Chunk => self.buffer_chunk(text),
        }
    }

    /// Drop the in-flight utterance (a provider-final supersedes it)
    pub fn clear_current(&mut self) {
        self.current_utterance.clear();
    }

    /// Display text for partial events: buffered completion plus the
    /// in-flight utterance
    pub fn continuous_text(&self) -> String {
        if self.completion_buffer.is_empty() {
            return self.current_utterance.trim().to_string();
        }
        if self.current_utterance.is_empty() {
            return self.completion_buffer.trim().to_string();
        }
        format!("{} {}", self.completion_buffer, self.current_utterance)
            .trim()
            .to_string()
    }

    /// Take the completed utterance text, clearing all state.
    /// Returns None when there is nothing to flush (empty flush is a no-op).
    pub fn take_final(&mut self) -> Option<String> {
        let text = self.continuous_text();
        self.completion_buffer.clear();
        self.current_utterance.clear();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completion_buffer.is_empty() && self.current_utterance.is_empty()
    }

    /// Reset all buffered text (session close)
    pub fn clear(&mut self) {
        self.completion_buffer.clear();
        self.current_utterance.clear();
    }
}

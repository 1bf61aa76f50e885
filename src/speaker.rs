// speaker.rs
//
// Speaker resolution for diarized (Deepgram-style) results: reduce a batch of
// word-level speaker tags to one dominant speaker by spoken duration, then
// delegate identity lookup to the external attribution service.

use crate::types::{SpeakerAttribution, SttWord};
use log::debug;
use std::sync::Arc;

/// External diarization/identity lookup. Internals are out of scope for this
/// layer; implementations typically keep per-session speaker profiles.
pub trait SpeakerAttributionService: Send + Sync {
    /// Resolve a dominant speaker id (plus its word batch) to an identity
    fn identify(&self, words: &[SttWord], dominant_speaker_id: u32) -> SpeakerAttribution;

    /// Persist a name for a non-user speaker so future lookups resolve it
    fn rename(&self, session_id: &str, speaker_id: u32, name: &str);
}

/// Dominant speaker of a word batch: the speaker id with the largest total
/// spoken duration. Tie-break is deterministic: scanning words in original
/// order, a later speaker only takes the lead on a strictly greater total, so
/// the first speaker to reach the (tied) maximum wins.
pub fn dominant_speaker(words: &[SttWord]) -> Option<u32> {
    if words.is_empty() {
        return None;
    }

    // First-encounter order matters for the tie-break, so no HashMap here
    let mut durations: Vec<(u32, f64)> = Vec::new();
    for word in words {
        match durations.iter_mut().find(|(id, _)| *id == word.speaker) {
            Some((_, total)) => *total += word.duration(),
            None => durations.push((word.speaker, word.duration())),
        }
    }

    let mut leader = durations[0];
    for &(id, total) in &durations[1..] {
        if total > leader.1 {
            leader = (id, total);
        }
    }
    Some(leader.0)
}

/// Resolves word batches to speaker identities
pub struct SpeakerResolver {
    service: Arc<dyn SpeakerAttributionService>,
}

impl SpeakerResolver {
    pub fn new(service: Arc<dyn SpeakerAttributionService>) -> Self {
        Self { service }
    }

    /// Resolve the dominant speaker of a batch. With no words there is
    /// nothing to diarize; the session owner is assumed and the external
    /// service is not consulted.
    pub fn resolve(&self, words: &[SttWord]) -> SpeakerAttribution {
        let Some(dominant_id) = dominant_speaker(words) else {
            return SpeakerAttribution::user_default();
        };

        let attribution = self.service.identify(words, dominant_id);
        debug!(
            "Resolved dominant speaker {} -> {} (user: {})",
            dominant_id, attribution.label, attribution.is_user
        );
        attribution
    }

    pub fn service(&self) -> &Arc<dyn SpeakerAttributionService> {
        &self.service
    }
}

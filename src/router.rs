// router.rs
//
// UnifiedMessageRouter: single entry point for raw provider messages. Gates
// on session liveness, dispatches to the session's adapter, merges adapter
// output with the utterance buffer and speaker resolver, and emits unified
// events to the presenter. The router is the failure boundary: one malformed
// message must never kill a live transcription session.

use crate::accumulator::MergeStrategy;
use crate::adapters::AdapterResult;
use crate::config::SttConfig;
use crate::error::SttError;
use crate::globals::next_sequence_id;
use crate::session::{Session, SessionInner, SessionState};
use crate::speaker::{SpeakerAttributionService, SpeakerResolver};
use crate::types::{now_millis, SegmentRecord, SpeakerAttribution, SttWord, UnifiedEvent, UnifiedEventKind};
use async_trait::async_trait;
use log::{debug, error, info};
use serde_json::Value;
use std::sync::Arc;

/// UI/IPC layer receiving unified events. Fire-and-forget: implementations
/// must not block.
pub trait Presenter: Send + Sync {
    fn emit(&self, event: UnifiedEvent);
}

/// Storage for final diarized segments
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn record_segment(&self, segment: SegmentRecord) -> Result<(), SttError>;
}

/// Called once per Final event with (speaker label, final text).
/// Used by downstream features such as post-call note generation.
pub type CompletionCallback = Box<dyn Fn(&str, &str) + Send + Sync>;

/// Called with a short status line after each completed utterance
pub type StatusCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Emission half of the router, shared with debounce timer tasks
struct Emitter {
    presenter: Arc<dyn Presenter>,
    on_transcription_complete: Option<CompletionCallback>,
    on_status_update: Option<StatusCallback>,
}

impl Emitter {
    /// Emit the completed utterance as a Final event and notify callbacks.
    /// Empty buffer is a valid no-op. Caller holds the session lock.
    fn flush_locked(&self, inner: &mut SessionInner) {
        let Some(text) = inner.buffer.take_final() else {
            return;
        };
        let attribution =
            std::mem::replace(&mut inner.last_attribution, SpeakerAttribution::user_default());

        info!("Utterance complete ({}): \"{}\"", attribution.label, text);

        self.presenter.emit(UnifiedEvent {
            kind: UnifiedEventKind::Final,
            speaker: attribution.label.clone(),
            speaker_id: attribution.speaker_id,
            speaker_name: attribution.name.clone(),
            text: text.clone(),
            sequence_id: next_sequence_id(),
            timestamp: now_millis(),
        });

        if let Some(callback) = &self.on_transcription_complete {
            callback(&attribution.label, &text);
        }
        if let Some(callback) = &self.on_status_update {
            callback("Listening...");
        }
    }

    /// Debounce timer body: flush unless the timer was superseded or the
    /// session closed while it slept
    async fn flush_after_quiet(&self, session: &Session, epoch: u64) {
        let mut inner = session.inner.lock().await;
        if inner.state != SessionState::Open {
            debug!(
                "Debounce fired after close for session {}, dropping",
                session.id()
            );
            return;
        }
        if inner.flush_epoch != epoch {
            // Superseded by a newer append or forced flush
            return;
        }
        inner.pending_flush = None;
        self.flush_locked(&mut inner);
    }
}

pub struct UnifiedMessageRouter {
    config: SttConfig,
    sink: Arc<dyn PersistenceSink>,
    resolver: SpeakerResolver,
    emitter: Arc<Emitter>,
}

impl UnifiedMessageRouter {
    pub fn new(
        config: SttConfig,
        presenter: Arc<dyn Presenter>,
        sink: Arc<dyn PersistenceSink>,
        attribution: Arc<dyn SpeakerAttributionService>,
    ) -> Self {
        Self {
            config,
            sink,
            resolver: SpeakerResolver::new(attribution),
            emitter: Arc::new(Emitter {
                presenter,
                on_transcription_complete: None,
                on_status_update: None,
            }),
        }
    }

    /// Set the per-utterance completion callback. Builder-style; must be
    /// called before the router starts handling messages.
    pub fn on_transcription_complete(mut self, callback: CompletionCallback) -> Self {
        Arc::get_mut(&mut self.emitter)
            .expect("callbacks must be set before the router is shared")
            .on_transcription_complete = Some(callback);
        self
    }

    /// Set the status-line callback. Builder-style, same constraint as
    /// [`Self::on_transcription_complete`].
    pub fn on_status_update(mut self, callback: StatusCallback) -> Self {
        Arc::get_mut(&mut self.emitter)
            .expect("callbacks must be set before the router is shared")
            .on_status_update = Some(callback);
        self
    }

    /// Handle one raw provider message for a session.
    ///
    /// Never fails from the caller's perspective: processing errors are
    /// logged with the full payload and absorbed, and the session stays Open.
    /// Messages arriving after closure are silently dropped; provider streams
    /// may deliver in-flight messages after a close request races network
    /// latency.
    pub async fn handle_message(&self, session: &Arc<Session>, raw: &Value) {
        let mut inner = session.inner.lock().await;
        if inner.state != SessionState::Open {
            debug!(
                "Ignoring message for session {} - already closed or closing",
                session.id()
            );
            return;
        }

        if let Err(e) = self.process(session, &mut inner, raw).await {
            error!(
                "Error processing {} message for session {}: {}",
                session.provider(),
                session.id(),
                e
            );
            error!("Full message that caused error: {}", raw);
            // Session stays Open; subsequent messages process normally
        }

        // A top-level error field is a session-level notification regardless
        // of whether the rest of the message was processed
        if let Some(provider_error) = raw.get("error") {
            error!("[{}] STT session error: {}", session.id(), provider_error);
            let attribution = inner.last_attribution.clone();
            self.emitter.presenter.emit(UnifiedEvent {
                kind: UnifiedEventKind::Error,
                speaker: attribution.label,
                speaker_id: attribution.speaker_id,
                speaker_name: attribution.name,
                text: provider_error.to_string(),
                sequence_id: next_sequence_id(),
                timestamp: now_millis(),
            });
        }
    }

    async fn process(
        &self,
        session: &Arc<Session>,
        inner: &mut SessionInner,
        raw: &Value,
    ) -> Result<(), SttError> {
        match session.adapter().translate(raw)? {
            AdapterResult::Noise => {
                debug!("[{}-{}] Filtered noise", session.provider(), session.id());
            }
            AdapterResult::Ignored => {}
            AdapterResult::PartialText(text) => {
                self.handle_partial(session, inner, &text, None);
            }
            AdapterResult::FinalText(text) => {
                self.handle_final(inner, &text, None);
            }
            AdapterResult::PartialDiarized { text, words } => {
                let attribution = self.resolver.resolve(&words);
                self.handle_partial(session, inner, &text, Some(attribution));
            }
            AdapterResult::FinalDiarized { text, words } => {
                let attribution = self.resolver.resolve(&words);
                self.persist_segment(session, &text, &words, &attribution).await;
                self.handle_final(inner, &text, Some(attribution));
            }
            AdapterResult::TurnComplete => {
                // Force-flush only when a debounce is actually pending
                if inner.pending_flush.is_some() {
                    inner.cancel_pending();
                    self.emitter.flush_locked(inner);
                }
            }
        }
        Ok(())
    }

    /// Merge a partial fragment and emit a Partial event. Buffered (Chunk)
    /// providers reset the debounce window; delta/replace providers hold the
    /// in-flight utterance until the provider's own final arrives.
    fn handle_partial(
        &self,
        session: &Arc<Session>,
        inner: &mut SessionInner,
        text: &str,
        attribution: Option<SpeakerAttribution>,
    ) {
        if let Some(attribution) = attribution {
            inner.last_attribution = attribution;
        }

        match inner.buffer.strategy() {
            MergeStrategy::Chunk => {
                inner.buffer.buffer_chunk(text);
                self.schedule_flush(session, inner);
            }
            MergeStrategy::Delta | MergeStrategy::Replace => {
                // The provider will send its own final; a quiet-window flush
                // mid-utterance would split it
                inner.cancel_pending();
                inner.buffer.hold_partial(text);
            }
        }

        let attribution = inner.last_attribution.clone();
        self.emitter.presenter.emit(UnifiedEvent {
            kind: UnifiedEventKind::Partial,
            speaker: attribution.label,
            speaker_id: attribution.speaker_id,
            speaker_name: attribution.name,
            text: inner.buffer.continuous_text(),
            sequence_id: next_sequence_id(),
            timestamp: now_millis(),
        });
    }

    /// A provider-final supersedes the in-flight utterance and force-flushes
    /// the accumulator
    fn handle_final(
        &self,
        inner: &mut SessionInner,
        text: &str,
        attribution: Option<SpeakerAttribution>,
    ) {
        if let Some(attribution) = attribution {
            inner.last_attribution = attribution;
        }
        inner.buffer.clear_current();
        inner.buffer.buffer_chunk(text);
        inner.cancel_pending();
        self.emitter.flush_locked(inner);
    }

    /// Arm the debounce timer: a cancelable task that flushes after the quiet
    /// interval unless superseded. The callback re-checks liveness and epoch
    /// under the session lock, so a timer racing a cancel or close is a no-op.
    fn schedule_flush(&self, session: &Arc<Session>, inner: &mut SessionInner) {
        let (token, epoch) = inner.arm_flush();
        let emitter = Arc::clone(&self.emitter);
        let session = Arc::clone(session);
        let quiet = self.config.debounce();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(quiet) => {
                    emitter.flush_after_quiet(&session, epoch).await;
                }
            }
        });
    }

    /// Store a final diarized segment, and persist the name mapping for
    /// non-user speakers. Failures are logged, never propagated.
    async fn persist_segment(
        &self,
        session: &Arc<Session>,
        text: &str,
        words: &[SttWord],
        attribution: &SpeakerAttribution,
    ) {
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            return;
        };
        let confidence =
            words.iter().map(|w| w.confidence).sum::<f64>() / words.len() as f64;

        let record = SegmentRecord {
            session_id: session.id().to_string(),
            speaker_id: attribution.speaker_id,
            text: text.to_string(),
            start_time: first.start,
            end_time: last.end,
            confidence,
            is_final: true,
        };

        if let Err(e) = self.sink.record_segment(record).await {
            error!("Error storing segment for session {}: {}", session.id(), e);
        }

        if !attribution.is_user {
            if let Some(name) = &attribution.name {
                self.resolver
                    .service()
                    .rename(session.id(), attribution.speaker_id, name);
            }
        }
    }
}

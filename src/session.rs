// session.rs
//
// Per-stream session state. All mutable state lives behind one tokio Mutex,
// which is the serialization point required between message handling and
// debounce timer callbacks: no two operations on the same session interleave.

use crate::accumulator::UtteranceBuffer;
use crate::adapters::{adapter_for, ProviderAdapter};
use crate::types::{Provider, SpeakerAttribution};
use log::debug;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Lifecycle state of a transcription session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting provider messages
    Open,
    /// Close requested; in-flight work is being cancelled
    Closing,
    /// No further messages may mutate this session
    Closed,
}

/// One live transcription stream
pub struct Session {
    id: String,
    provider: Provider,
    /// Resolved once at creation; never re-matched per message
    adapter: &'static dyn ProviderAdapter,
    pub(crate) inner: Mutex<SessionInner>,
}

pub(crate) struct SessionInner {
    pub state: SessionState,
    pub buffer: UtteranceBuffer,
    /// Cancels the pending debounce task, if any
    pub pending_flush: Option<CancellationToken>,
    /// Bumped on every timer cancel/re-arm. A timer callback that already
    /// left its sleep before `cancel()` landed observes a stale epoch under
    /// the session lock and becomes a no-op.
    pub flush_epoch: u64,
    /// Attribution carried by the most recent partial; a timer-driven flush
    /// must not contradict it
    pub last_attribution: SpeakerAttribution,
}

impl Session {
    pub fn new(id: impl Into<String>, provider: Provider) -> Self {
        let id = id.into();
        debug!("Creating STT session {} (provider: {})", id, provider);
        Self {
            id,
            provider,
            adapter: adapter_for(provider),
            inner: Mutex::new(SessionInner {
                state: SessionState::Open,
                buffer: UtteranceBuffer::new(provider),
                pending_flush: None,
                flush_epoch: 0,
                last_attribution: SpeakerAttribution::user_default(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn adapter(&self) -> &'static dyn ProviderAdapter {
        self.adapter
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    pub async fn is_open(&self) -> bool {
        self.state().await == SessionState::Open
    }

    /// Close the session: cancel any pending debounce timer and drop buffered
    /// text. Both transitions happen inside one critical section, so no
    /// message or timer callback can observe a half-closed session.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == SessionState::Closed {
            return;
        }
        inner.state = SessionState::Closing;
        inner.cancel_pending();
        inner.buffer.clear();
        inner.last_attribution = SpeakerAttribution::user_default();
        inner.state = SessionState::Closed;
        debug!("STT session {} closed", self.id);
    }
}

impl SessionInner {
    /// Cancel the pending debounce timer (if armed) and invalidate any timer
    /// callback already past its sleep
    pub fn cancel_pending(&mut self) {
        if let Some(token) = self.pending_flush.take() {
            token.cancel();
        }
        self.flush_epoch += 1;
    }

    /// Arm a fresh debounce timer, cancelling any previous one. Returns the
    /// token the timer task should race against and the epoch it must
    /// re-check before flushing.
    pub fn arm_flush(&mut self) -> (CancellationToken, u64) {
        self.cancel_pending();
        let token = CancellationToken::new();
        self.pending_flush = Some(token.clone());
        (token, self.flush_epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_session_is_open() {
        let session = Session::new("s1", Provider::Deepgram);
        assert_eq!(session.state().await, SessionState::Open);
        assert!(session.is_open().await);
        assert_eq!(session.provider(), Provider::Deepgram);
    }

    #[tokio::test]
    async fn test_close_cancels_pending_timer_and_clears_buffer() {
        let session = Session::new("s1", Provider::Gemini);
        let token = {
            let mut inner = session.inner.lock().await;
            inner.buffer.buffer_chunk("pending text");
            let (token, _) = inner.arm_flush();
            token
        };

        session.close().await;

        assert!(token.is_cancelled());
        let inner = session.inner.lock().await;
        assert_eq!(inner.state, SessionState::Closed);
        assert!(inner.buffer.is_empty());
        assert!(inner.pending_flush.is_none());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let session = Session::new("s1", Provider::Whisper);
        session.close().await;
        session.close().await;
        assert_eq!(session.state().await, SessionState::Closed);
    }

    #[tokio::test]
    async fn test_rearming_invalidates_previous_epoch() {
        let session = Session::new("s1", Provider::Gemini);
        let mut inner = session.inner.lock().await;

        let (first_token, first_epoch) = inner.arm_flush();
        let (_second_token, second_epoch) = inner.arm_flush();

        assert!(first_token.is_cancelled());
        assert_ne!(first_epoch, second_epoch);
        assert_eq!(inner.flush_epoch, second_epoch);
    }
}

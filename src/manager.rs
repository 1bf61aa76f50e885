// manager.rs
//
// Session registry: owns the live sessions and routes messages by id.
// Sessions are fully independent; the sharded map gives cross-session
// parallelism with no shared mutable state between them.

use crate::error::SttError;
use crate::router::UnifiedMessageRouter;
use crate::session::Session;
use crate::types::Provider;
use anyhow::Result;
use dashmap::DashMap;
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub struct SttSessionManager {
    router: Arc<UnifiedMessageRouter>,
    sessions: DashMap<String, Arc<Session>>,
}

impl SttSessionManager {
    pub fn new(router: Arc<UnifiedMessageRouter>) -> Self {
        Self {
            router,
            sessions: DashMap::new(),
        }
    }

    pub fn router(&self) -> &Arc<UnifiedMessageRouter> {
        &self.router
    }

    /// Open a session with a generated id
    pub fn open_session(&self, provider: Provider) -> Arc<Session> {
        let id = Uuid::new_v4().to_string();
        // Freshly generated v4 ids never collide with live sessions
        self.open_session_with_id(&id, provider)
            .expect("uuid collision")
    }

    /// Open a session under a caller-provided id (e.g. a conversation id)
    pub fn open_session_with_id(&self, id: &str, provider: Provider) -> Result<Arc<Session>> {
        if self.sessions.contains_key(id) {
            anyhow::bail!("STT session already exists: {}", id);
        }
        let session = Arc::new(Session::new(id, provider));
        self.sessions.insert(id.to_string(), session.clone());
        info!("Opened STT session {} (provider: {})", id, provider);
        Ok(session)
    }

    pub fn session(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Route one raw provider message to a session by id.
    ///
    /// An unknown id is a caller bug and reported as an error; everything
    /// that can go wrong *inside* a live session is absorbed by the router.
    pub async fn handle_message(&self, session_id: &str, raw: &Value) -> Result<()> {
        let Some(session) = self.session(session_id) else {
            warn!("Message for unknown STT session {}", session_id);
            return Err(SttError::SessionNotFound(session_id.to_string()).into());
        };
        self.router.handle_message(&session, raw).await;
        Ok(())
    }

    /// Close one session: cancel its pending work and drop it from the
    /// registry. Messages still in flight for it will be silently dropped.
    pub async fn close_session(&self, session_id: &str) -> Result<()> {
        let Some((_, session)) = self.sessions.remove(session_id) else {
            return Err(SttError::SessionNotFound(session_id.to_string()).into());
        };
        session.close().await;
        info!("Closed STT session {}", session_id);
        Ok(())
    }

    /// Close every live session (conversation ended)
    pub async fn close_all(&self) {
        let ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            if let Some((_, session)) = self.sessions.remove(&id) {
                session.close().await;
            }
        }
        info!("All STT sessions closed");
    }
}

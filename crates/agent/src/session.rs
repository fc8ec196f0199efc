//! In-memory conversation store.

use std::collections::HashMap;
use std::sync::Arc;

use aocook_core::session::{ChatSession, ConversationId};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default cap on live sessions.
pub const MAX_SESSIONS: usize = 1000;

struct SessionEntry {
    /// Insertion order; the smallest is evicted first.
    seq: u64,
    session: Arc<Mutex<ChatSession>>,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<ConversationId, SessionEntry>,
    next_seq: u64,
}

/// Sessions keyed by conversation id.
///
/// Each session sits behind its own mutex: turns in one conversation run one
/// at a time, different conversations proceed independently. When full, the
/// oldest session is dropped to make room.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<Sessions>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(Sessions::default())),
            capacity: capacity.max(1),
        }
    }

    /// Look up a session, creating it when `id` is `None` or unknown.
    pub async fn get_or_create(&self, id: Option<ConversationId>) -> Arc<Mutex<ChatSession>> {
        let mut sessions = self.sessions.lock().await;

        if let Some(entry) = id.as_ref().and_then(|id| sessions.entries.get(id)) {
            return entry.session.clone();
        }

        if sessions.entries.len() >= self.capacity {
            let oldest = sessions
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                debug!(conversation_id = %oldest, "Evicting oldest session");
                sessions.entries.remove(&oldest);
            }
        }

        let session = ChatSession::with_id(id.unwrap_or_default());
        let id = session.id.clone();
        let entry = SessionEntry {
            seq: sessions.next_seq,
            session: Arc::new(Mutex::new(session)),
        };
        sessions.next_seq += 1;
        let handle = entry.session.clone();
        sessions.entries.insert(id.clone(), entry);
        info!(conversation_id = %id, live = sessions.entries.len(), "Session created");
        handle
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

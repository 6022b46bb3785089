use log::debug;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Which candidates one voter has already backed. Never persisted.
#[derive(Debug, Clone)]
pub struct VoterSession {
    id: Uuid,
    voted_for: HashSet<String>,
}

impl VoterSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            voted_for: HashSet::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn has_voted(&self, candidate_name: &str) -> bool {
        self.voted_for.contains(candidate_name)
    }

    pub fn mark_voted(&mut self, candidate_name: &str) {
        self.voted_for.insert(candidate_name.to_string());
    }
}

impl Default for VoterSession {
    fn default() -> Self {
        Self::new()
    }
}

/// One session per voter key (a Discord user id), created on first use.
///
/// Each session has its own lock; hold it across the whole vote so two
/// concurrent clicks from the same voter cannot both pass the guard.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Mutex<VoterSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_for(&self, voter_key: &str) -> Arc<Mutex<VoterSession>> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.entry(voter_key.to_string()).or_insert_with(|| {
            let session = VoterSession::new();
            debug!("Started session {} for voter {}", session.id(), voter_key);
            Arc::new(Mutex::new(session))
        });
        Arc::clone(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_voted_is_idempotent() {
        let mut session = VoterSession::new();
        assert!(!session.has_voted("Kduss"));

        session.mark_voted("Kduss");
        session.mark_voted("Kduss");
        assert!(session.has_voted("Kduss"));
        assert!(!session.has_voted("SGunner"));
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(VoterSession::new().id(), VoterSession::new().id());
    }

    #[tokio::test]
    async fn test_registry_reuses_session_per_voter() {
        let registry = SessionRegistry::new();

        let first = registry.session_for("user-1").await;
        first.lock().await.mark_voted("Kduss");

        let again = registry.session_for("user-1").await;
        assert!(Arc::ptr_eq(&first, &again));
        assert!(again.lock().await.has_voted("Kduss"));

        let other = registry.session_for("user-2").await;
        assert!(!other.lock().await.has_voted("Kduss"));
        assert!(!Arc::ptr_eq(&first, &other));
    }
}

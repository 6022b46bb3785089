use crate::db::Database;
use crate::models::CandidateRegistry;
use crate::voting::SessionRegistry;

/// Everything an interaction handler needs, passed explicitly down the call chain.
pub struct AppState {
    pub database: Database,
    pub registry: CandidateRegistry,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(database: Database, registry: CandidateRegistry) -> Self {
        Self {
            database,
            registry,
            sessions: SessionRegistry::new(),
        }
    }
}

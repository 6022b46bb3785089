pub mod ranking;
pub mod session;
pub mod stats;

use crate::error::VoteError;
use crate::models::Comment;
use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;

pub use session::{SessionRegistry, VoterSession};

/// Point-in-time read of every vote count, keyed by candidate name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteSnapshot {
    counts: HashMap<String, i64>,
}

impl VoteSnapshot {
    pub fn count(&self, candidate_name: &str) -> i64 {
        self.counts.get(candidate_name).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &HashMap<String, i64> {
        &self.counts
    }
}

impl FromIterator<(String, i64)> for VoteSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Durable tallies and comments.
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Ensure a zero-count record exists for each name. Existing counts are kept.
    async fn seed(&self, candidate_names: &[String]) -> Result<(), VoteError>;

    /// Atomically add one vote and return the new count.
    async fn increment(&self, candidate_name: &str) -> Result<i64, VoteError>;

    async fn snapshot(&self) -> Result<VoteSnapshot, VoteError>;

    /// Store a comment. Blank text is ignored and yields `None`.
    async fn append_comment(&self, candidate_name: &str, text: &str) -> Result<Option<i64>, VoteError>;

    /// Comments for one candidate in insertion order.
    async fn comments_for(&self, candidate_name: &str) -> Result<Vec<Comment>, VoteError>;

    /// Increment plus optional comment for one vote action. Both are applied
    /// or neither is; on `Err` the count must be unchanged.
    async fn record_vote(&self, candidate_name: &str, comment: Option<&str>) -> Result<i64, VoteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    Recorded {
        candidate: String,
        new_count: i64,
        comment_saved: bool,
    },
    AlreadyVoted,
}

/// Cast one vote for `candidate_name` on behalf of `session`.
///
/// The session is only marked once the ledger has accepted the vote, so a
/// failed store call leaves the session free to try again.
pub async fn submit_vote<L>(
    ledger: &L,
    session: &mut VoterSession,
    candidate_name: &str,
    comment: Option<&str>,
) -> Result<VoteOutcome, VoteError>
where
    L: VoteLedger + ?Sized,
{
    if session.has_voted(candidate_name) {
        debug!("Session {} already voted for {}", session.id(), candidate_name);
        return Ok(VoteOutcome::AlreadyVoted);
    }

    let comment = comment.map(str::trim).filter(|text| !text.is_empty());
    let new_count = ledger.record_vote(candidate_name, comment).await?;
    session.mark_voted(candidate_name);

    info!(
        "Session {} voted for {} (now {} votes{})",
        session.id(),
        candidate_name,
        new_count,
        if comment.is_some() { ", with comment" } else { "" }
    );

    Ok(VoteOutcome::Recorded {
        candidate: candidate_name.to_string(),
        new_count,
        comment_saved: comment.is_some(),
    })
}

//! Short-lived server-side drafts for the two-step upload flow.
//!
//! An upload is first *staged*: the decoded, normalized text is held here under
//! a random token and nothing is scored. The client then *commits* it through
//! the extract endpoint, which takes the draft out of the map and runs the
//! check. Drafts belong to the user who staged them and expire after a TTL.
//!
//! - `DraftsState`: clonable handle shared as `web::Data` across workers.
//! - `Draft`: the staged submission.

use common::model::tool::Tool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Draft {
    pub owner_id: i64,
    pub tool: Tool,
    pub filename: String,
    /// Normalized source text.
    pub text: String,
    pub fingerprint: String,
    pub staged_at: Instant,
}

impl Draft {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.staged_at.elapsed() > ttl
    }
}

#[derive(Clone)]
pub struct DraftsState {
    /// Token to draft. Writes happen on stage and take; expired entries are
    /// dropped whenever a new draft is staged.
    pub drafts: Arc<RwLock<HashMap<String, Draft>>>,
    ttl: Duration,
}

impl DraftsState {
    pub fn new(ttl: Duration) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores `draft` and returns its token.
    pub async fn stage(&self, draft: Draft) -> String {
        let token = Uuid::new_v4().to_string();
        let mut drafts = self.drafts.write().await;
        let ttl = self.ttl;
        drafts.retain(|_, staged| !staged.is_expired(ttl));
        drafts.insert(token.clone(), draft);
        token
    }

    /// Removes and returns the draft if it exists, is unexpired, belongs to
    /// `owner_id` and was staged for `tool`. A draft requested by someone else
    /// is left in place.
    pub async fn take(&self, token: &str, owner_id: i64, tool: Tool) -> Option<Draft> {
        let mut drafts = self.drafts.write().await;
        let usable = match drafts.get(token) {
            Some(draft) => draft.owner_id == owner_id && draft.tool == tool,
            None => false,
        };
        if !usable {
            return None;
        }
        drafts
            .remove(token)
            .filter(|draft| !draft.is_expired(self.ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(owner_id: i64) -> Draft {
        Draft {
            owner_id,
            tool: Tool::Comment,
            filename: "camp.py".into(),
            text: "# hello there everyone\n".into(),
            fingerprint: "f".into(),
            staged_at: Instant::now(),
        }
    }

    #[tokio::test]
    async fn staged_draft_is_taken_once_by_its_owner() {
        let state = DraftsState::new(Duration::from_secs(60));
        let token = state.stage(draft(5)).await;

        assert!(state.take(&token, 6, Tool::Comment).await.is_none());
        assert!(state.take(&token, 5, Tool::Debug).await.is_none());
        let taken = state.take(&token, 5, Tool::Comment).await.expect("draft");
        assert_eq!(taken.filename, "camp.py");
        assert!(state.take(&token, 5, Tool::Comment).await.is_none());
    }

    #[tokio::test]
    async fn expired_drafts_are_not_returned_and_get_evicted() {
        let state = DraftsState::new(Duration::from_millis(0));
        let mut old = draft(5);
        old.staged_at = Instant::now() - Duration::from_millis(50);
        let token = state.stage(old).await;
        assert!(state.take(&token, 5, Tool::Comment).await.is_none());

        let mut stale = draft(5);
        stale.staged_at = Instant::now() - Duration::from_millis(50);
        state.drafts.write().await.insert("stale".into(), stale);
        state.stage(draft(9)).await;
        assert!(!state.drafts.read().await.contains_key("stale"));
    }
}

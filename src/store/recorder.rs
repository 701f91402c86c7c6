//! Fire-and-forget score saving
//!
//! A save is a detached tokio task. Failures are logged and reported on the
//! outcome channel, never retried and never surfaced as errors to the caller.

use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::{ScoreKey, ScoreRecord, ScoreStore};
use crate::auth::AuthState;

/// How a detached save ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { key: ScoreKey, user_name: String },
    Failed { key: ScoreKey, error: String },
}

pub struct ScoreRecorder {
    store: Arc<dyn ScoreStore>,
    auth: watch::Receiver<AuthState>,
    outcomes: mpsc::UnboundedSender<SaveOutcome>,
}

impl ScoreRecorder {
    /// Create a recorder plus the receiving end of its outcome channel
    pub fn new(
        store: Arc<dyn ScoreStore>,
        auth: watch::Receiver<AuthState>,
    ) -> (Self, mpsc::UnboundedReceiver<SaveOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        (
            Self {
                store,
                auth,
                outcomes,
            },
            rx,
        )
    }

    /// Start saving `score` for the signed-in user and return immediately
    ///
    /// Returns `None` (after logging) when nobody is signed in. The handle may
    /// be dropped; the task runs to completion either way.
    pub fn save_detached(&self, score: u32, user_name: &str) -> Option<JoinHandle<()>> {
        let user = match self.auth.borrow().user() {
            Some(user) => user.clone(),
            None => {
                tracing::error!(score, "user is not authenticated, score not saved");
                return None;
            }
        };

        let now = SystemTime::now();
        let key = ScoreKey::at(user.as_str(), now);
        let record = ScoreRecord::new(user_name, score, now);
        let store = Arc::clone(&self.store);
        let outcomes = self.outcomes.clone();

        tracing::debug!(key = %key, store = %store.describe(), "saving score");

        Some(tokio::spawn(async move {
            let write_key = key.clone();
            let user_name = record.user_name.clone();
            let result =
                tokio::task::spawn_blocking(move || store.write(&write_key, &record)).await;

            let outcome = match result {
                Ok(Ok(())) => {
                    tracing::info!(key = %key, score, "score saved");
                    SaveOutcome::Saved { key, user_name }
                }
                Ok(Err(e)) => {
                    tracing::error!(key = %key, "error saving score: {e:#}");
                    SaveOutcome::Failed {
                        key,
                        error: format!("{e:#}"),
                    }
                }
                Err(e) => {
                    tracing::error!(key = %key, "score save task failed: {e}");
                    SaveOutcome::Failed {
                        key,
                        error: e.to_string(),
                    }
                }
            };

            // Nobody listening any more is fine.
            let _ = outcomes.send(outcome);
        }))
    }
}

//! Lock-free registry of live matches, keyed by match id. Each entry is just
//! a cheap-to-clone [`MatchHandle`]; the match task itself lives behind it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::engine::{spawn_match, EngineConfig, MatchHandle};
use crate::error::AppError;

pub struct MatchRegistry {
    matches: DashMap<u64, MatchHandle>,
    next_id: AtomicU64,
    config: EngineConfig,
}

impl MatchRegistry {
    pub fn new(config: EngineConfig) -> Arc<Self> {
        Arc::new(MatchRegistry {
            matches: DashMap::new(),
            next_id: AtomicU64::new(1),
            config,
        })
    }

    /// Start a fresh match, register it, and arrange for its entry to be
    /// dropped once the match task itself finishes.
    pub fn create(self: &Arc<Self>) -> MatchHandle {
        let match_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (handle, join) = spawn_match(match_id, self.config.clone());
        self.matches.insert(match_id, handle.clone());

        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let _ = join.await;
            registry.matches.remove(&match_id);
            info!(match_id, "match task finished; removed from registry");
        });

        handle
    }

    pub fn get(&self, match_id: u64) -> Result<MatchHandle, AppError> {
        self.matches.get(&match_id).map(|entry| entry.clone()).ok_or(AppError::MatchNotFound(match_id))
    }

    pub fn active_match_count(&self) -> usize {
        self.matches.len()
    }
}

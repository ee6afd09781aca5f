//! # Session Policy Store
//!
//! Explicit, caller-owned map from stable session identifiers to ladder
//! policies. Construct-on-first-use and eviction belong to the owning
//! process; there is no global registry and no interior locking — the owner
//! must guarantee at-most-one concurrent mutation per session.

use crate::ladder::{LadderPolicy, PolicyConfig};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    config: PolicyConfig,
    policies: HashMap<String, LadderPolicy>,
}

impl PolicyStore {
    /// A store whose sessions all share one immutable config.
    pub fn new(config: PolicyConfig) -> Self {
        PolicyStore { config, policies: HashMap::new() }
    }

    /// Fetch the session's policy, constructing it on first use.
    pub fn get_or_create(&mut self, session_id: &str) -> &mut LadderPolicy {
        let config = self.config;
        self.policies.entry(session_id.to_string()).or_insert_with(|| LadderPolicy::new(config))
    }

    /// Drop a finished session, handing its final state back to the caller
    /// (e.g. for persistence before teardown).
    pub fn evict(&mut self, session_id: &str) -> Option<LadderPolicy> {
        self.policies.remove(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.policies.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

//! Top contributor role unlocking.

use crate::error::BoardError;
use crate::types::{BoardConfig, ReputationEntry};

/// Promotes an entry once its reputation meets the board threshold.
///
/// Any caller may trigger an unlock; the decision depends only on the
/// entry's own reputation.
#[derive(Debug, Clone, Copy)]
pub struct RoleUnlocker<'a> {
    config: &'a BoardConfig,
}

impl<'a> RoleUnlocker<'a> {
    pub fn new(config: &'a BoardConfig) -> Self {
        Self { config }
    }

    /// Return the promoted entry and whether the flag changed.
    ///
    /// Unlocking an entry that is already a top contributor succeeds and
    /// reports `false`.
    pub fn unlock(&self, mut entry: ReputationEntry) -> Result<(ReputationEntry, bool), BoardError> {
        if !self.config.meets_threshold(entry.reputation) {
            return Err(BoardError::InsufficientReputation {
                have: entry.reputation,
                need: self.config.top_contributor_threshold,
            });
        }
        let newly_unlocked = !entry.is_top_contributor;
        entry.is_top_contributor = true;
        Ok((entry, newly_unlocked))
    }
}

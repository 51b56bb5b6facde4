//! Authority-only score reset.

use crate::error::BoardError;
use crate::types::{BoardConfig, Identity, ReputationEntry};

#[derive(Debug, Clone, Copy)]
pub struct ScoreResetter<'a> {
    config: &'a BoardConfig,
}

impl<'a> ScoreResetter<'a> {
    pub fn new(config: &'a BoardConfig) -> Self {
        Self { config }
    }

    /// Check `caller` against the board authority.
    ///
    /// The returned [`AuthorizedReset`] is the only way to reset an entry.
    pub fn authorize(&self, caller: &Identity) -> Result<AuthorizedReset, BoardError> {
        if !self.config.is_authority(caller) {
            return Err(BoardError::NotAuthorized);
        }
        Ok(AuthorizedReset { authority: *caller })
    }
}

/// A reset cleared by the authority check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizedReset {
    authority: Identity,
}

impl AuthorizedReset {
    pub fn authority(&self) -> Identity {
        self.authority
    }

    /// Zero the score and drop the role. Vote records are left alone, so
    /// pending cooldowns on the target still apply.
    pub fn reset(self, mut entry: ReputationEntry) -> ReputationEntry {
        entry.reputation = 0;
        entry.is_top_contributor = false;
        entry
    }
}

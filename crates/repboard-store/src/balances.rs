//! Token balances read from a ledger export.
//!
//! The token ledger itself is external. Operators export holder balances
//! for the board's token as JSON and point the CLI at the file:
//!
//! ```json
//! {
//!   "token": "<base58 token id>",
//!   "balances": { "<base58 holder>": 100 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use repboard_core::error::OracleError;
use repboard_core::traits::BalanceOracle;
use repboard_core::types::{Identity, TokenId};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("reading balance snapshot: {0}")] Io(#[from] std::io::Error),
    #[error("parsing balance snapshot: {0}")] Parse(#[from] serde_json::Error),
}

/// Balances of a single token at export time.
///
/// An empty snapshot (no token) reports zero for every query.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub token: Option<TokenId>,
    #[serde(default)]
    pub balances: HashMap<Identity, u64>,
}

impl BalanceSnapshot {
    pub fn new(token: TokenId) -> Self {
        Self {
            token: Some(token),
            balances: HashMap::new(),
        }
    }

    pub fn with_balance(mut self, owner: Identity, amount: u64) -> Self {
        self.balances.insert(owner, amount);
        self
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let snapshot: Self = serde_json::from_str(&raw)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            holders = snapshot.balances.len(),
            "loaded balance snapshot"
        );
        Ok(snapshot)
    }
}

impl BalanceOracle for BalanceSnapshot {
    fn balance_of(&self, owner: &Identity, token: &TokenId) -> Result<u64, OracleError> {
        match self.token {
            None => Ok(0),
            Some(t) if t == *token => Ok(self.balances.get(owner).copied().unwrap_or(0)),
            Some(_) => Err(OracleError::UnknownToken(*token)),
        }
    }
}

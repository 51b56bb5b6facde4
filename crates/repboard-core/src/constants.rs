//! Scoreboard constants.

/// Length of an [`Identity`](crate::types::Identity) in bytes.
pub const IDENTITY_LEN: usize = 32;

/// Role name reported when an entry is promoted.
pub const ROLE_TOP_CONTRIBUTOR: &str = "top_contributor";

/// Reputation delta applied by a single accepted vote.
pub const VOTE_DELTA: i64 = 1;

/// Minimum token balance a voter must hold. Any non-zero balance qualifies.
pub const MIN_VOTER_BALANCE: u64 = 1;

/// Cooldown used by the CLI when `--cooldown` is not given, in seconds.
pub const DEFAULT_COOLDOWN_SECS: i64 = 60;

/// Threshold used by the CLI when `--threshold` is not given.
pub const DEFAULT_TOP_CONTRIBUTOR_THRESHOLD: i64 = 10;

/// Events a [`Scoreboard`](crate::scoreboard::Scoreboard) retains before
/// dropping the oldest.
pub const MAX_EVENTS: usize = 1024;

//! Vote validation and application.
//!
//! Pure computation over records already loaded from the store. The
//! caller commits the returned records; on error nothing is returned and
//! nothing should be written.

use crate::constants::MIN_VOTER_BALANCE;
use crate::error::BoardError;
use crate::types::{BoardConfig, Identity, ReputationEntry, VoteDirection, VoteRecord};

/// A single upvote or downvote request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteRequest {
    pub voter: Identity,
    pub target: Identity,
    pub direction: VoteDirection,
    /// Unix seconds at which the vote is cast.
    pub current_time: i64,
}

/// Applies the eligibility, cooldown, and arithmetic rules of a vote.
#[derive(Debug, Clone, Copy)]
pub struct VoteProcessor<'a> {
    config: &'a BoardConfig,
}

impl<'a> VoteProcessor<'a> {
    pub fn new(config: &'a BoardConfig) -> Self {
        Self { config }
    }

    /// Reject voters without any balance of the board's token.
    pub fn check_eligibility(&self, balance: u64) -> Result<(), BoardError> {
        if balance < MIN_VOTER_BALANCE {
            return Err(BoardError::InsufficientTokenBalance);
        }
        Ok(())
    }

    /// Reject a vote cast before the pair's cooldown has elapsed.
    ///
    /// A `current_time` earlier than the last vote yields a negative
    /// elapsed time and is rejected, keeping the record monotonic.
    pub fn check_cooldown(&self, record: &VoteRecord, current_time: i64) -> Result<(), BoardError> {
        let Some(last) = record.last_vote_at else {
            return Ok(());
        };
        let elapsed = current_time.saturating_sub(last);
        if elapsed < self.config.cooldown_seconds {
            return Err(BoardError::CooldownNotElapsed {
                remaining: self.config.cooldown_seconds.saturating_sub(elapsed),
            });
        }
        Ok(())
    }

    /// Validate `request` and return the updated entry and vote record.
    ///
    /// Checks run in order: eligibility, cooldown, arithmetic. A voter with
    /// zero balance therefore sees `InsufficientTokenBalance` regardless of
    /// cooldown state.
    pub fn process(
        &self,
        request: &VoteRequest,
        balance: u64,
        mut entry: ReputationEntry,
        mut record: VoteRecord,
    ) -> Result<(ReputationEntry, VoteRecord), BoardError> {
        debug_assert_eq!(entry.subject, request.target);
        debug_assert_eq!((record.voter, record.target), (request.voter, request.target));

        self.check_eligibility(balance)?;
        self.check_cooldown(&record, request.current_time)?;

        entry.reputation = entry
            .reputation
            .checked_add(request.direction.delta())
            .ok_or(BoardError::ArithmeticOverflow)?;
        record.last_vote_at = Some(request.current_time);

        Ok((entry, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(seed: u8) -> Identity {
        Identity([seed; 32])
    }

    fn config(cooldown: i64) -> BoardConfig {
        BoardConfig::new(id(0xAA), id(0xEE), cooldown, 3).unwrap()
    }

    fn request(direction: VoteDirection, at: i64) -> VoteRequest {
        VoteRequest {
            voter: id(1),
            target: id(2),
            direction,
            current_time: at,
        }
    }

    fn fresh() -> (ReputationEntry, VoteRecord) {
        (ReputationEntry::new(id(2)), VoteRecord::new(id(1), id(2)))
    }

    #[test]
    fn first_upvote_increments_and_stamps() {
        let cfg = config(5);
        let (entry, record) = fresh();
        let (entry, record) = VoteProcessor::new(&cfg)
            .process(&request(VoteDirection::Up, 100), 1, entry, record)
            .unwrap();
        assert_eq!(entry.reputation, 1);
        assert_eq!(record.last_vote_at, Some(100));
    }

    #[test]
    fn downvote_goes_negative_without_clamp() {
        let cfg = config(0);
        let (entry, record) = fresh();
        let (entry, _) = VoteProcessor::new(&cfg)
            .process(&request(VoteDirection::Down, 0), 1, entry, record)
            .unwrap();
        assert_eq!(entry.reputation, -1);
    }

    #[test]
    fn zero_balance_rejected_before_cooldown() {
        let cfg = config(5);
        let (entry, mut record) = fresh();
        record.last_vote_at = Some(99);
        let err = VoteProcessor::new(&cfg)
            .process(&request(VoteDirection::Up, 100), 0, entry, record)
            .unwrap_err();
        assert_eq!(err, BoardError::InsufficientTokenBalance);
    }

    #[test]
    fn cooldown_boundary_is_inclusive() {
        let cfg = config(5);
        let processor = VoteProcessor::new(&cfg);
        let record = VoteRecord {
            last_vote_at: Some(10),
            ..VoteRecord::new(id(1), id(2))
        };
        assert_eq!(
            processor.check_cooldown(&record, 14),
            Err(BoardError::CooldownNotElapsed { remaining: 1 })
        );
        assert!(processor.check_cooldown(&record, 15).is_ok());
    }

    #[test]
    fn vote_at_time_zero_starts_cooldown() {
        let cfg = config(5);
        let processor = VoteProcessor::new(&cfg);
        let (entry, record) = fresh();
        let (entry, record) = processor
            .process(&request(VoteDirection::Up, 0), 1, entry, record)
            .unwrap();
        let err = processor
            .process(&request(VoteDirection::Up, 2), 1, entry, record)
            .unwrap_err();
        assert_eq!(err, BoardError::CooldownNotElapsed { remaining: 3 });
    }

    #[test]
    fn time_before_last_vote_is_rejected_even_without_cooldown() {
        let cfg = config(0);
        let record = VoteRecord {
            last_vote_at: Some(50),
            ..VoteRecord::new(id(1), id(2))
        };
        assert!(matches!(
            VoteProcessor::new(&cfg).check_cooldown(&record, 49),
            Err(BoardError::CooldownNotElapsed { .. })
        ));
    }

    #[test]
    fn zero_cooldown_allows_same_second_votes() {
        let cfg = config(0);
        let processor = VoteProcessor::new(&cfg);
        let (entry, record) = fresh();
        let (entry, record) = processor
            .process(&request(VoteDirection::Up, 7), 1, entry, record)
            .unwrap();
        let (entry, _) = processor
            .process(&request(VoteDirection::Up, 7), 1, entry, record)
            .unwrap();
        assert_eq!(entry.reputation, 2);
    }

    #[test]
    fn overflow_is_an_error() {
        let cfg = config(0);
        let (mut entry, record) = fresh();
        entry.reputation = i64::MAX;
        assert_eq!(
            VoteProcessor::new(&cfg)
                .process(&request(VoteDirection::Up, 1), 1, entry, record)
                .unwrap_err(),
            BoardError::ArithmeticOverflow
        );
    }

    #[test]
    fn extreme_timestamps_do_not_panic() {
        let cfg = config(5);
        let record = VoteRecord {
            last_vote_at: Some(i64::MAX),
            ..VoteRecord::new(id(1), id(2))
        };
        assert!(VoteProcessor::new(&cfg).check_cooldown(&record, i64::MIN).is_err());
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn cooldown_rejects_iff_elapsed_short(
            cooldown in 0i64..100_000,
            last in -1_000_000i64..1_000_000,
            now in -1_000_000i64..1_000_000,
        ) {
            let cfg = config(cooldown);
            let record = VoteRecord {
                last_vote_at: Some(last),
                ..VoteRecord::new(id(1), id(2))
            };
            let result = VoteProcessor::new(&cfg).check_cooldown(&record, now);
            if now - last < cooldown {
                let remaining = cooldown - (now - last);
                prop_assert_eq!(result, Err(BoardError::CooldownNotElapsed { remaining }));
            } else {
                prop_assert_eq!(result, Ok(()));
            }
        }

        #[test]
        fn zero_balance_never_passes(at in any::<i64>(), up in any::<bool>()) {
            let cfg = config(0);
            let (entry, record) = fresh();
            let direction = if up { VoteDirection::Up } else { VoteDirection::Down };
            prop_assert_eq!(
                VoteProcessor::new(&cfg).process(&request(direction, at), 0, entry, record),
                Err(BoardError::InsufficientTokenBalance)
            );
        }
    }
}

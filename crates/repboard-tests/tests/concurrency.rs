//! Concurrent access to one scoreboard behind a mutex.
//!
//! Every operation runs to completion under the lock, so the final state
//! must equal some serial ordering of the accepted operations.

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use repboard_core::error::BoardError;
use repboard_tests::helpers::{id, memory_board, AUTHORITY};

const THREADS: u8 = 8;

#[test]
fn distinct_voters_on_one_target() {
    let voters: Vec<_> = (1..=THREADS).map(id).collect();
    let (board, _balances) = memory_board(60, 5, &voters);
    let board = Arc::new(Mutex::new(board));
    let target = id(0x80);

    thread::scope(|s| {
        for voter in &voters {
            let board = Arc::clone(&board);
            s.spawn(move || {
                board.lock().upvote(*voter, target, 0).unwrap();
                // Second vote from the same voter lands inside the cooldown.
                let err = board.lock().upvote(*voter, target, 30).unwrap_err();
                assert!(matches!(
                    err.board_error(),
                    Some(BoardError::CooldownNotElapsed { remaining: 30 })
                ));
            });
        }
    });

    let mut board = board.lock();
    let entry = board.entry(&target).unwrap().unwrap();
    assert_eq!(entry.reputation, i64::from(THREADS));
    assert!(board.unlock_role(target).unwrap().is_top_contributor);

    let voted = board.events().iter().filter(|e| e.name() == "voted").count();
    assert_eq!(voted, usize::from(THREADS));
}

#[test]
fn one_voter_racing_itself_is_accepted_once() {
    let voter = id(1);
    let (board, _balances) = memory_board(60, 5, &[voter]);
    let board = Arc::new(Mutex::new(board));
    let target = id(0x80);

    let accepted: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let board = Arc::clone(&board);
                s.spawn(move || board.lock().upvote(voter, target, 10).is_ok())
            })
            .collect();
        handles.into_iter().map(|h| usize::from(h.join().unwrap())).sum()
    });

    assert_eq!(accepted, 1);
    let board = board.lock();
    assert_eq!(board.entry(&target).unwrap().unwrap().reputation, 1);
    assert_eq!(
        board.vote_record(&voter, &target).unwrap().unwrap().last_vote_at,
        Some(10)
    );
}

#[test]
fn distinct_targets_in_parallel() {
    let voter = id(1);
    let (board, _balances) = memory_board(0, 3, &[voter]);
    let board = Arc::new(Mutex::new(board));

    thread::scope(|s| {
        for n in 0..THREADS {
            let board = Arc::clone(&board);
            s.spawn(move || {
                let target = id(0x40 + n);
                for t in 0..i64::from(n) {
                    board.lock().upvote(voter, target, t).unwrap();
                }
            });
        }
    });

    let board = board.lock();
    for n in 0..THREADS {
        let entry = board.entry(&id(0x40 + n)).unwrap();
        match n {
            0 => assert_eq!(entry, None),
            _ => assert_eq!(entry.unwrap().reputation, i64::from(n)),
        }
    }
    let top = board.leaderboard(1).unwrap();
    assert_eq!(top[0].subject, id(0x40 + THREADS - 1));
}

#[test]
fn resets_interleaved_with_votes() {
    let voters: Vec<_> = (1..=THREADS).map(id).collect();
    let (board, _balances) = memory_board(0, 3, &voters);
    let board = Arc::new(Mutex::new(board));
    let target = id(0x80);
    board.lock().upvote(voters[0], target, 0).unwrap();

    thread::scope(|s| {
        for voter in &voters {
            let board = Arc::clone(&board);
            s.spawn(move || {
                for t in 1..=10 {
                    board.lock().upvote(*voter, target, t).unwrap();
                }
            });
        }
        let board = Arc::clone(&board);
        s.spawn(move || {
            for _ in 0..10 {
                board.lock().reset_score(AUTHORITY, target).unwrap();
            }
        });
    });

    // The score is the number of votes after the last reset.
    let board = board.lock();
    let events = board.events();
    let last_reset = events
        .iter()
        .rposition(|e| e.name() == "score_reset")
        .unwrap();
    let after = events
        .iter()
        .skip(last_reset)
        .filter(|e| e.name() == "voted")
        .count();
    let entry = board.entry(&target).unwrap().unwrap();
    assert_eq!(entry.reputation, after as i64);
}

//! Criterion benchmarks for repboard-core hot paths.
//!
//! Covers: the pure vote rule check, a full vote through the in-memory
//! store, and leaderboard sorting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use repboard_core::scoreboard::Scoreboard;
use repboard_core::store::{MemoryBalances, MemoryStore};
use repboard_core::types::{BoardConfig, Identity, ReputationEntry, VoteDirection, VoteRecord};
use repboard_core::vote::{VoteProcessor, VoteRequest};

const AUTHORITY: Identity = Identity([0xAA; 32]);
const TOKEN: Identity = Identity([0xEE; 32]);

fn identity(n: u32) -> Identity {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&n.to_le_bytes());
    Identity(bytes)
}

fn bench_vote_processor(c: &mut Criterion) {
    let config = BoardConfig::new(AUTHORITY, TOKEN, 60, 10).unwrap();
    let processor = VoteProcessor::new(&config);
    let request = VoteRequest {
        voter: identity(1),
        target: identity(2),
        direction: VoteDirection::Up,
        current_time: 1_700_000_000,
    };

    c.bench_function("vote_processor_process", |b| {
        b.iter(|| {
            let entry = ReputationEntry::new(identity(2));
            let record = VoteRecord {
                last_vote_at: Some(1_699_999_000),
                ..VoteRecord::new(identity(1), identity(2))
            };
            black_box(processor.process(black_box(&request), 1, entry, record))
        })
    });
}

fn bench_scoreboard_vote(c: &mut Criterion) {
    c.bench_function("scoreboard_vote_memory", |b| {
        let voter = identity(1);
        let balances = MemoryBalances::new().with_balance(voter, TOKEN, 1);
        let mut board = Scoreboard::new(MemoryStore::new(), balances);
        board.initialize(AUTHORITY, TOKEN, 0, 10).unwrap();
        let mut now = 0i64;
        b.iter(|| {
            now += 1;
            black_box(board.upvote(voter, identity(2), now).unwrap());
        });
    });
}

fn bench_leaderboard(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaderboard");
    for targets in [100u32, 1_000, 10_000] {
        let voter = identity(0);
        let balances = MemoryBalances::new().with_balance(voter, TOKEN, 1);
        let mut board = Scoreboard::new(MemoryStore::new(), balances);
        board.initialize(AUTHORITY, TOKEN, 0, 10).unwrap();
        for t in 1..=targets {
            board.upvote(voter, identity(t), 0).unwrap();
        }
        group.bench_with_input(BenchmarkId::from_parameter(targets), &board, |b, board| {
            b.iter(|| black_box(board.leaderboard(10).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_vote_processor, bench_scoreboard_vote, bench_leaderboard);
criterion_main!(benches);

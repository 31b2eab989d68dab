//! Concurrency correctness for the vote ledger
//!
//! Racing writers must never double-count a voter or lose a tally update.

use ballot::types::{Candidate, VoterProfile};
use ballot::{ElectionLedger, VoteOutcome, VoteRejection};
use std::sync::{Arc, Barrier};
use std::thread;

fn seeded(voters: &[String]) -> (Arc<ElectionLedger>, i64) {
    let ledger = Arc::new(ElectionLedger::new());
    let election = ledger.create_election("Stress").unwrap();
    ledger
        .add_candidate_to_election(
            election,
            Candidate {
                id: "A".to_string(),
                name: "Alice".to_string(),
                manifesto: "m".to_string(),
            },
        )
        .unwrap();
    for voter in voters {
        ledger
            .register_voter(VoterProfile {
                id: voter.clone(),
                first_name: "Evelyn".to_string(),
                last_name: "Boyd".to_string(),
                phone: "0800-200".to_string(),
            })
            .unwrap();
    }
    ledger.register_identities(voters.iter().cloned()).unwrap();
    (ledger, election)
}

#[test]
fn distinct_voters_never_lose_an_update() {
    const VOTERS: usize = 32;
    let ids: Vec<String> = (0..VOTERS).map(|i| format!("V{i}")).collect();
    let (ledger, election) = seeded(&ids);

    let barrier = Arc::new(Barrier::new(VOTERS));
    let handles: Vec<_> = ids
        .iter()
        .map(|voter| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            let voter = voter.clone();
            thread::spawn(move || {
                barrier.wait();
                ledger.cast_vote(election, &voter, "A").unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_accepted());
    }

    let summary = ledger.summarize(election).unwrap();
    assert_eq!(summary.total_votes, VOTERS as u64);
    assert_eq!(summary.results[0].vote_count, VOTERS as u64);
}

#[test]
fn same_voter_racers_yield_exactly_one_acceptance() {
    const RACERS: usize = 16;
    let ids = vec!["V1".to_string()];
    let (ledger, election) = seeded(&ids);

    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                ledger.cast_vote(election, "V1", "A").unwrap()
            })
        })
        .collect();

    let outcomes: Vec<VoteOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
    let duplicates = outcomes
        .iter()
        .filter(|o| matches!(o.rejection(), Some(VoteRejection::DuplicateVote { .. })))
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, RACERS - 1);

    let summary = ledger.summarize(election).unwrap();
    assert_eq!(summary.total_votes, 1);
    assert_eq!(summary.results[0].vote_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn readers_observe_consistent_snapshots_under_writes() {
    const VOTERS: usize = 24;
    let ids: Vec<String> = (0..VOTERS).map(|i| format!("V{i}")).collect();
    let (ledger, election) = seeded(&ids);

    let mut writers = tokio::task::JoinSet::new();
    for voter in ids {
        let ledger = Arc::clone(&ledger);
        writers.spawn_blocking(move || {
            ledger.cast_vote(election, &voter, "A").unwrap();
        });
    }

    // Interleaved readers: a summary's total must always equal the sum of
    // its entries, never a half-applied vote.
    let reader_ledger = Arc::clone(&ledger);
    let reader = tokio::task::spawn_blocking(move || {
        for _ in 0..200 {
            let summary = reader_ledger.summarize(election).unwrap();
            let counted: u64 = summary.results.iter().map(|r| r.vote_count).sum();
            assert_eq!(summary.total_votes, counted);
        }
    });

    while let Some(result) = writers.join_next().await {
        result.unwrap();
    }
    reader.await.unwrap();

    let summary = ledger.summarize(election).unwrap();
    assert_eq!(summary.total_votes, VOTERS as u64);
}

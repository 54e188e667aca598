//! Tests for the SQLite-backed ledger.

use std::sync::Arc;
use strictly_arena::{EntryKind, Ledger, LedgerError, MatchManager, MatchStatus, SqliteLedger};
use strictly_checkers::Player;
use tempfile::NamedTempFile;

/// Returns the temp file handle (must stay in scope to keep the file alive)
/// and a migrated ledger.
fn setup_test_ledger() -> (NamedTempFile, SqliteLedger) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let ledger = SqliteLedger::open(&db_path).expect("Failed to open ledger");
    (db_file, ledger)
}

#[tokio::test]
async fn test_unknown_player_has_zero_balance() {
    let (_db, ledger) = setup_test_ledger();
    assert_eq!(ledger.balance("nobody").await, Ok(0));
}

#[tokio::test]
async fn test_deposit_then_deduct() {
    let (_db, ledger) = setup_test_ledger();
    ledger.deposit("alice", 100).await.expect("deposit");
    ledger.deposit("alice", 25).await.expect("second deposit");
    ledger.deduct("alice", 40).await.expect("deduct");
    assert_eq!(ledger.balance("alice").await, Ok(85));

    let kinds: Vec<EntryKind> = ledger
        .entries("alice")
        .await
        .expect("entries")
        .iter()
        .map(|entry| entry.parse_kind().expect("known kind"))
        .collect();
    assert_eq!(
        kinds,
        vec![EntryKind::Deposit, EntryKind::Deposit, EntryKind::Deduct]
    );
}

#[tokio::test]
async fn test_overdraw_is_rejected_without_change() {
    let (_db, ledger) = setup_test_ledger();
    ledger.deposit("bob", 10).await.expect("deposit");

    let err = ledger.deduct("bob", 20).await.expect_err("overdraw");
    assert_eq!(
        err,
        LedgerError::InsufficientFunds {
            player: "bob".to_string(),
            balance: 10,
            requested: 20,
        }
    );
    assert_eq!(ledger.balance("bob").await, Ok(10));
    assert_eq!(ledger.entries("bob").await.expect("entries").len(), 1);
}

#[tokio::test]
async fn test_balances_survive_reopen() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let ledger = SqliteLedger::open(&db_path).expect("open");
    ledger.deposit("carol", 70).await.expect("deposit");
    ledger.payout("carol", 30).await.expect("payout");
    drop(ledger);

    let reopened = SqliteLedger::open(&db_path).expect("reopen");
    assert_eq!(reopened.balance("carol").await, Ok(100));
}

#[tokio::test]
async fn test_match_escrow_against_sqlite() {
    let (_db, ledger) = setup_test_ledger();
    ledger.deposit("alice", 50).await.expect("deposit");
    ledger.deposit("bob", 50).await.expect("deposit");
    let ledger = Arc::new(ledger);
    let manager = MatchManager::new(ledger.clone());

    manager.create_match("m1".to_string(), 20).await.expect("created");
    manager.join("m1", Player::Red, "alice").await.expect("red seat");
    let m = manager
        .join("m1", Player::White, "bob")
        .await
        .expect("white seat");

    assert_eq!(*m.status(), MatchStatus::Active);
    assert_eq!(ledger.balance("alice").await, Ok(30));
    assert_eq!(ledger.balance("bob").await, Ok(30));
}

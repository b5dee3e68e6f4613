//! Repository integration tests against real PostgreSQL
//!
//! These run the SQL that carries the money-movement guarantees: the
//! `FOR UPDATE` wallet debit and the conditional settlement update. One
//! shared container serves the whole file; tests isolate themselves by
//! operating on their own user rows.
//!
//! Requires a Docker daemon.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use uuid::Uuid;

use infra_db::repositories::{InvestmentRepository, NewInvestmentRow};
use infra_db::DatabaseError;
use test_utils::get_shared_test_database;

async fn seed_user(pool: &PgPool, balance: Decimal) -> Uuid {
    let user_id = Uuid::now_v7();
    sqlx::query("INSERT INTO users (user_id, balance) VALUES ($1, $2)")
        .bind(user_id)
        .bind(balance)
        .execute(pool)
        .await
        .expect("seed user row");
    user_id
}

fn starter_row(user_id: Uuid, amount: Decimal, end_time: DateTime<Utc>) -> NewInvestmentRow {
    NewInvestmentRow {
        investment_id: Uuid::now_v7(),
        user_id,
        fund_name: "Starter".to_string(),
        amount,
        rate_percent: dec!(2.3),
        duration_days: 10,
        start_time: end_time - Duration::days(10),
        end_time,
        wallet_type: "main".to_string(),
    }
}

#[tokio::test]
async fn test_create_debits_wallet_and_persists_row() {
    let db = get_shared_test_database().await;
    let repo = InvestmentRepository::new(db.pool().clone());
    let user = seed_user(db.pool(), dec!(1000)).await;

    let row = starter_row(user, dec!(100), Utc::now() + Duration::days(10));
    let balance = repo.create(&row).await.expect("create investment");
    assert_eq!(balance, dec!(900));

    let stored = repo.find_by_id(row.investment_id).await.expect("find");
    assert_eq!(stored.status, "active");
    assert!(!stored.paid_out);
    assert_eq!(stored.amount, dec!(100));

    assert_eq!(repo.wallet_balance(user).await.unwrap(), dec!(900));
}

#[tokio::test]
async fn test_create_insufficient_funds_persists_nothing() {
    let db = get_shared_test_database().await;
    let repo = InvestmentRepository::new(db.pool().clone());
    let user = seed_user(db.pool(), dec!(50)).await;

    let row = starter_row(user, dec!(100), Utc::now() + Duration::days(10));
    let result = repo.create(&row).await;
    assert!(matches!(
        result,
        Err(DatabaseError::InsufficientFunds { .. })
    ));

    // The rollback covers the row insert and the ledger entry
    let lookup = repo.find_by_id(row.investment_id).await;
    assert!(lookup.is_err_and(|e| e.is_not_found()));
    assert_eq!(repo.wallet_balance(user).await.unwrap(), dec!(50));
}

#[tokio::test]
async fn test_settle_credits_wallet_exactly_once() {
    let db = get_shared_test_database().await;
    let repo = InvestmentRepository::new(db.pool().clone());
    let user = seed_user(db.pool(), dec!(1000)).await;

    let row = starter_row(user, dec!(100), Utc::now() - Duration::days(1));
    repo.create(&row).await.expect("create investment");

    let now = Utc::now();
    let settled = repo
        .settle(row.investment_id, dec!(123), "completed", "payout_credit", now)
        .await
        .expect("settle");
    assert_eq!(settled, Some((user, dec!(1023))));

    let stored = repo.find_by_id(row.investment_id).await.expect("find");
    assert_eq!(stored.status, "completed");
    assert!(stored.paid_out);
    assert_eq!(stored.total_earned, Some(dec!(123)));

    // The conditional update sees the settled row and applies no credit
    let again = repo
        .settle(row.investment_id, dec!(123), "completed", "payout_credit", now)
        .await
        .expect("second settle attempt");
    assert_eq!(again, None);
    assert_eq!(repo.wallet_balance(user).await.unwrap(), dec!(1023));
}

#[tokio::test]
async fn test_concurrent_settlement_pays_one_winner() {
    let db = get_shared_test_database().await;
    let repo = InvestmentRepository::new(db.pool().clone());
    let user = seed_user(db.pool(), dec!(1000)).await;

    let row = starter_row(user, dec!(100), Utc::now() - Duration::days(1));
    repo.create(&row).await.expect("create investment");

    let now = Utc::now();
    let (a, b) = tokio::join!(
        repo.settle(row.investment_id, dec!(123), "completed", "payout_credit", now),
        repo.settle(row.investment_id, dec!(123), "completed", "payout_credit", now),
    );
    let winners = [a.expect("settle"), b.expect("settle")]
        .into_iter()
        .flatten()
        .count();
    assert_eq!(winners, 1);

    assert_eq!(repo.wallet_balance(user).await.unwrap(), dec!(1023));
}

#[tokio::test]
async fn test_find_matured_respects_inclusive_boundary() {
    let db = get_shared_test_database().await;
    let repo = InvestmentRepository::new(db.pool().clone());
    let user = seed_user(db.pool(), dec!(1000)).await;

    let now = Utc::now();
    let at_boundary = starter_row(user, dec!(100), now);
    let still_running = starter_row(user, dec!(100), now + Duration::days(1));
    repo.create(&at_boundary).await.expect("create matured");
    repo.create(&still_running).await.expect("create running");

    let matured: Vec<Uuid> = repo
        .find_matured(now)
        .await
        .expect("scan")
        .into_iter()
        .map(|r| r.investment_id)
        .collect();

    assert!(matured.contains(&at_boundary.investment_id));
    assert!(!matured.contains(&still_running.investment_id));
}

#[tokio::test]
async fn test_cancellation_refunds_principal_via_same_conditional_update() {
    let db = get_shared_test_database().await;
    let repo = InvestmentRepository::new(db.pool().clone());
    let user = seed_user(db.pool(), dec!(500)).await;

    let row = starter_row(user, dec!(200), Utc::now() + Duration::days(10));
    repo.create(&row).await.expect("create investment");
    assert_eq!(repo.wallet_balance(user).await.unwrap(), dec!(300));

    let now = Utc::now();
    let cancelled = repo
        .settle(row.investment_id, dec!(200), "cancelled", "refund_credit", now)
        .await
        .expect("cancel");
    assert_eq!(cancelled, Some((user, dec!(500))));

    let stored = repo.find_by_id(row.investment_id).await.expect("find");
    assert_eq!(stored.status, "cancelled");
    assert!(stored.paid_out);
}

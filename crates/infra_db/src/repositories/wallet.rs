//! Wallet balance mutation
//!
//! The single SQL implementation of the ledger primitive. It executes on
//! the caller's open transaction (it never opens its own), so the balance
//! change commits or rolls back together with the state change it funds.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Applies a signed delta to a user's wallet balance and records a ledger
/// entry, all on the caller's transaction
///
/// The balance row is locked (`FOR UPDATE`) before the check-then-act so
/// concurrent debits against the same wallet serialize instead of racing.
///
/// # Arguments
///
/// * `tx` - The caller's open transaction
/// * `user_id` - The wallet owner
/// * `delta` - Signed amount: negative debits, positive credits
/// * `reason` - Ledger reason tag (e.g. `investment_debit`)
/// * `reference_id` - The entity that caused the movement
///
/// # Returns
///
/// The post-mutation balance
///
/// # Errors
///
/// - `DatabaseError::NotFound` if the user has no wallet row
/// - `DatabaseError::InsufficientFunds` if a debit would go negative;
///   nothing has been written when this is returned
pub async fn apply_wallet_delta(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    delta: Decimal,
    reason: &str,
    reference_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Decimal, DatabaseError> {
    let balance: Option<(Decimal,)> =
        sqlx::query_as("SELECT balance FROM users WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(DatabaseError::from_sqlx)?;

    let balance = balance
        .ok_or_else(|| DatabaseError::not_found("User", user_id))?
        .0;

    if balance + delta < Decimal::ZERO {
        return Err(DatabaseError::InsufficientFunds {
            required: delta.abs(),
            available: balance,
        });
    }

    let (new_balance,): (Decimal,) = sqlx::query_as(
        "UPDATE users SET balance = balance + $2, updated_at = $3 \
         WHERE user_id = $1 \
         RETURNING balance",
    )
    .bind(user_id)
    .bind(delta)
    .bind(now)
    .fetch_one(&mut **tx)
    .await
    .map_err(DatabaseError::from_sqlx)?;

    sqlx::query(
        "INSERT INTO ledger_entries (entry_id, user_id, amount, reason, reference_id, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(delta)
    .bind(reason)
    .bind(reference_id)
    .bind(now)
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::from_sqlx)?;

    Ok(new_balance)
}

//! Order Repository

use super::RepoResult;
use shared::models::{Order, OrderCreate, OrderStatus};
use shared::util::snowflake_id;
use sqlx::{SqliteExecutor, SqlitePool, types::Json};

const COLUMNS: &str = "id, no, holder_id, book_id, lock_id, status, total_amount, paid_amount, \
     payment_method, payment_time, transaction_id, guest_name, guest_phone, guest_id_card, \
     arrival_time, items, total_count, remark, cancel_time, created_at, updated_at";

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Order>>
where
    E: SqliteExecutor<'e>,
{
    let order =
        sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM reserve_order WHERE id = ?"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
    Ok(order)
}

/// The holder's unpaid order, if any (one-pending-order rule)
pub async fn find_pending_by_holder(pool: &SqlitePool, holder_id: &str) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM reserve_order WHERE holder_id = ? AND status = ? LIMIT 1"
    ))
    .bind(holder_id)
    .bind(OrderStatus::PendingPayment)
    .fetch_optional(pool)
    .await?;
    Ok(order)
}

pub async fn find_by_holder(
    pool: &SqlitePool,
    holder_id: &str,
    status: Option<OrderStatus>,
) -> RepoResult<Vec<Order>> {
    let orders = match status {
        Some(status) => {
            sqlx::query_as::<_, Order>(&format!(
                "SELECT {COLUMNS} FROM reserve_order WHERE holder_id = ? AND status = ? ORDER BY created_at DESC"
            ))
            .bind(holder_id)
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Order>(&format!(
                "SELECT {COLUMNS} FROM reserve_order WHERE holder_id = ? ORDER BY created_at DESC"
            ))
            .bind(holder_id)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(orders)
}

/// Does an order with this order number already exist?
pub async fn exists_no<'e, E>(executor: E, no: &str) -> RepoResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reserve_order WHERE no = ?")
        .bind(no)
        .fetch_one(executor)
        .await?;
    Ok(count > 0)
}

/// Insert a PENDING_PAYMENT order. A colliding order number surfaces as
/// `RepoError::Duplicate` via the UNIQUE constraint on `no`.
pub async fn create<'e, E>(executor: E, data: OrderCreate, now: i64) -> RepoResult<Order>
where
    E: SqliteExecutor<'e>,
{
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO reserve_order (id, no, holder_id, book_id, lock_id, status, total_amount, paid_amount, guest_name, guest_phone, guest_id_card, arrival_time, items, total_count, remark, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.no)
    .bind(&data.holder_id)
    .bind(data.book_id)
    .bind(data.lock_id)
    .bind(OrderStatus::PendingPayment)
    .bind(data.total_amount)
    .bind(&data.guest_name)
    .bind(&data.guest_phone)
    .bind(&data.guest_id_card)
    .bind(data.arrival_time)
    .bind(Json(&data.items))
    .bind(data.total_count)
    .bind(&data.remark)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(Order {
        id,
        no: data.no,
        holder_id: data.holder_id,
        book_id: data.book_id,
        lock_id: data.lock_id,
        status: OrderStatus::PendingPayment,
        total_amount: data.total_amount,
        paid_amount: 0.0,
        payment_method: None,
        payment_time: None,
        transaction_id: None,
        guest_name: data.guest_name,
        guest_phone: data.guest_phone,
        guest_id_card: data.guest_id_card,
        arrival_time: data.arrival_time,
        items: data.items,
        total_count: data.total_count,
        remark: data.remark,
        cancel_time: None,
        created_at: now,
        updated_at: now,
    })
}

/// Flip a PENDING_PAYMENT order to CANCELLED. Returns false when the order
/// is not in PENDING_PAYMENT (already cancelled, already paid, or missing).
pub async fn cancel<'e, E>(executor: E, id: i64, now: i64) -> RepoResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "UPDATE reserve_order SET status = ?, cancel_time = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(OrderStatus::Cancelled)
    .bind(now)
    .bind(now)
    .bind(id)
    .bind(OrderStatus::PendingPayment)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Flip a PENDING_PAYMENT order to PAID, recording payment metadata.
pub async fn mark_paid<'e, E>(
    executor: E,
    id: i64,
    paid_amount: f64,
    payment_method: &str,
    transaction_id: &str,
    now: i64,
) -> RepoResult<bool>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "UPDATE reserve_order SET status = ?, paid_amount = ?, payment_method = ?, payment_time = ?, transaction_id = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(OrderStatus::Paid)
    .bind(paid_amount)
    .bind(payment_method)
    .bind(now)
    .bind(transaction_id)
    .bind(now)
    .bind(id)
    .bind(OrderStatus::PendingPayment)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}

//! Order Model

use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    PendingPayment,
    Paid,
    Cancelled,
}

/// Cart line for a walk-in order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub name: String,
    /// Price in currency unit
    pub price: f64,
    pub quantity: i32,
    pub note: Option<String>,
}

/// Order entity
///
/// A reservation order links a booking (`book_id`); a walk-in order links a
/// lock (`lock_id`). The order exclusively owns the decision of when its
/// linked claim records become invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Human-facing order number, unique
    pub no: String,
    pub holder_id: String,
    pub book_id: Option<i64>,
    pub lock_id: Option<i64>,
    pub status: OrderStatus,
    /// Total amount in currency unit
    pub total_amount: f64,
    /// Paid amount in currency unit
    pub paid_amount: f64,
    pub payment_method: Option<String>,
    pub payment_time: Option<i64>,
    pub transaction_id: Option<String>,
    /// Party info (reservation orders)
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_id_card: Option<String>,
    /// Reserved arrival instant (reservation orders), Unix millis
    pub arrival_time: Option<i64>,
    /// Cart snapshot (walk-in orders; empty for reservations)
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderItem>,
    pub total_count: Option<i32>,
    pub remark: Option<String>,
    pub cancel_time: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload (repository-level)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub no: String,
    pub holder_id: String,
    pub book_id: Option<i64>,
    pub lock_id: Option<i64>,
    pub total_amount: f64,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_id_card: Option<String>,
    pub arrival_time: Option<i64>,
    pub items: Vec<OrderItem>,
    pub total_count: Option<i32>,
    pub remark: Option<String>,
}

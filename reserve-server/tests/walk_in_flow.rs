//! 堂食路径集成测试
//!
//! 覆盖：锁定+订单创建、单一待支付订单规则、订单号唯一性/耗尽、
//! 以及关键的补偿契约 — 订单创建失败后不得留下孤儿锁。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use reserve_server::db::repository::{
    order as order_repo, seat as seat_repo, seat_lock as lock_repo,
};
use reserve_server::seating::{
    CreateWalkInRequest, OrderNoGenerator, OrderNoSource, ReservationCoordinator, SeatingError,
};
use reserve_server::utils::time;
use reserve_server::{Config, ServerState};
use shared::models::{OrderItem, Seat, SeatCreate, SeatType};
use tempfile::TempDir;

async fn setup() -> (TempDir, ServerState) {
    let dir = TempDir::new().expect("temp dir");
    let config = Config::with_overrides(dir.path().to_str().unwrap(), 0);
    let state = ServerState::initialize(&config).await.expect("state");
    (dir, state)
}

async fn seed_seat(state: &ServerState, code: &str) -> Seat {
    seat_repo::create(
        state.pool(),
        SeatCreate {
            name: code.to_string(),
            description: None,
            seat_type: SeatType::Open,
            capacity: Some(2),
        },
    )
    .await
    .expect("seed seat")
}

fn cart() -> Vec<OrderItem> {
    vec![
        OrderItem {
            name: "金汤力".to_string(),
            price: 48.0,
            quantity: 2,
            note: None,
        },
        OrderItem {
            name: "薯条".to_string(),
            price: 22.0,
            quantity: 1,
            note: Some("少盐".to_string()),
        },
    ]
}

fn walk_in_request(seat_code: &str, holder: &str) -> CreateWalkInRequest {
    CreateWalkInRequest {
        seat_code: seat_code.to_string(),
        holder_id: holder.to_string(),
        items: cart(),
        total_amount: 118.0,
        total_count: Some(3),
        remark: None,
    }
}

#[tokio::test]
async fn walk_in_creates_lock_and_linked_order() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "W1").await;

    let outcome = state
        .coordinator
        .create_walk_in(walk_in_request("W1", "holder-a"))
        .await
        .expect("walk-in succeeds");

    let order = order_repo::find_by_id(state.pool(), outcome.order_id)
        .await
        .unwrap()
        .expect("order persisted");
    assert_eq!(order.lock_id, Some(outcome.lock_id));
    assert_eq!(order.book_id, None);
    assert_eq!(order.items, cart());
    assert_eq!(order.total_count, Some(3));

    let bucket = time::today_bucket(state.config.venue_tz);
    let locks = lock_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].id, outcome.lock_id);
    assert_eq!(locks[0].holder_id, "holder-a");
}

#[tokio::test]
async fn holder_with_pending_order_cannot_open_another() {
    let (_dir, state) = setup().await;
    seed_seat(&state, "W2").await;
    seed_seat(&state, "W3").await;

    let first = state
        .coordinator
        .create_walk_in(walk_in_request("W2", "holder-a"))
        .await
        .expect("first walk-in");

    // Same holder, even on another seat
    let err = state
        .coordinator
        .create_walk_in(walk_in_request("W3", "holder-a"))
        .await
        .expect_err("second pending order must be rejected");
    match err {
        SeatingError::AlreadyPending { order_no, .. } => assert_eq!(order_no, first.order_no),
        other => panic!("expected AlreadyPending, got {other:?}"),
    }

    // After cancelling, a new walk-in is allowed
    state
        .lifecycle
        .cancel_order(first.order_id, "holder-a")
        .await
        .expect("cancel pending order");
    state
        .coordinator
        .create_walk_in(walk_in_request("W3", "holder-a"))
        .await
        .expect("walk-in after cancel");
}

#[tokio::test]
async fn cancelling_walk_in_invalidates_its_lock() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "W4").await;

    let outcome = state
        .coordinator
        .create_walk_in(walk_in_request("W4", "holder-a"))
        .await
        .unwrap();

    state
        .lifecycle
        .cancel_order(outcome.order_id, "holder-a")
        .await
        .unwrap();

    let bucket = time::today_bucket(state.config.venue_tz);
    let locks = lock_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert!(locks.is_empty(), "lock must be invalidated with its order");
}

/// Candidate source that always yields the same number — forces the
/// generator to exhaust its budget once that number is taken.
struct FixedSource(&'static str);

impl OrderNoSource for FixedSource {
    fn candidate(&self) -> String {
        self.0.to_string()
    }
}

#[tokio::test]
async fn failed_walk_in_leaves_no_orphan_lock() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "W5").await;
    seed_seat(&state, "W6").await;

    let narrowed = ReservationCoordinator::new(
        state.pool().clone(),
        state.config.venue_tz,
        OrderNoGenerator::with_source(Box::new(FixedSource("20250101000001")), 3),
    );

    // First walk-in takes the only candidate number
    narrowed
        .create_walk_in(walk_in_request("W6", "holder-a"))
        .await
        .expect("first walk-in claims the fixed number");

    // Second walk-in: the lock is created, then order-number generation
    // exhausts — the compensation step must remove the lock
    let err = narrowed
        .create_walk_in(walk_in_request("W5", "holder-b"))
        .await
        .expect_err("generation must exhaust");
    assert!(matches!(err, SeatingError::IdExhausted), "got {err:?}");

    let bucket = time::today_bucket(state.config.venue_tz);
    let locks = lock_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert!(
        locks.is_empty(),
        "compensation must leave zero active locks, found {locks:?}"
    );
}

/// Cycles through a tiny candidate space to exercise collision retries.
struct NarrowSource {
    counter: AtomicUsize,
    space: Vec<String>,
}

impl NarrowSource {
    fn new(space: &[&str]) -> Self {
        Self {
            counter: AtomicUsize::new(0),
            space: space.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl OrderNoSource for NarrowSource {
    fn candidate(&self) -> String {
        let i = self.counter.fetch_add(1, Ordering::Relaxed);
        self.space[i % self.space.len()].clone()
    }
}

#[tokio::test]
async fn narrowed_id_space_never_yields_duplicates() {
    let (_dir, state) = setup().await;
    seed_seat(&state, "W7").await;
    seed_seat(&state, "W8").await;
    seed_seat(&state, "W9").await;

    let narrowed = ReservationCoordinator::new(
        state.pool().clone(),
        state.config.venue_tz,
        OrderNoGenerator::with_source(Box::new(NarrowSource::new(&["NO-1", "NO-1", "NO-2"])), 4),
    );

    let a = narrowed
        .create_walk_in(walk_in_request("W7", "holder-a"))
        .await
        .expect("first order");
    let b = narrowed
        .create_walk_in(walk_in_request("W8", "holder-b"))
        .await
        .expect("second order retries past the collision");
    assert_ne!(a.order_no, b.order_no, "duplicate order number issued");

    // Space exhausted: must surface IdExhausted, never a duplicate
    let err = narrowed
        .create_walk_in(walk_in_request("W9", "holder-c"))
        .await
        .expect_err("exhausted space");
    assert!(matches!(err, SeatingError::IdExhausted), "got {err:?}");
}

#[tokio::test]
async fn concurrent_walk_ins_get_distinct_order_numbers() {
    let (_dir, state) = setup().await;
    for i in 0..8 {
        seed_seat(&state, &format!("C{i}")).await;
    }

    let tasks = (0..8).map(|i| {
        let coordinator = Arc::clone(&state.coordinator);
        tokio::spawn(async move {
            coordinator
                .create_walk_in(CreateWalkInRequest {
                    seat_code: format!("C{i}"),
                    holder_id: format!("holder-{i}"),
                    items: vec![OrderItem {
                        name: "啤酒".to_string(),
                        price: 12.0,
                        quantity: 1,
                        note: None,
                    }],
                    total_amount: 12.0,
                    total_count: Some(1),
                    remark: None,
                })
                .await
        })
    });

    let mut numbers = Vec::new();
    for result in futures::future::join_all(tasks).await {
        let outcome = result.unwrap().expect("walk-in succeeds");
        numbers.push(outcome.order_no);
    }
    let mut deduped = numbers.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), numbers.len(), "duplicate order numbers: {numbers:?}");
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_write() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "W10").await;

    let err = state
        .coordinator
        .create_walk_in(CreateWalkInRequest {
            seat_code: "W10".to_string(),
            holder_id: "holder-a".to_string(),
            items: vec![],
            total_amount: 0.0,
            total_count: None,
            remark: None,
        })
        .await
        .expect_err("empty cart");
    assert!(matches!(err, SeatingError::Validation(_)));

    let bucket = time::today_bucket(state.config.venue_tz);
    let locks = lock_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert!(locks.is_empty());
}

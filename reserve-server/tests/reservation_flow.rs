//! 预订路径集成测试 - 真实 SQLite 落盘
//!
//! 覆盖：原子创建、同日冲突、并发互斥、取消幂等、支付与积分。

use std::sync::Arc;

use reserve_server::db::repository::{
    order as order_repo, seat as seat_repo, seat_booking as booking_repo, seat_lock as lock_repo,
};
use reserve_server::seating::{CreateBookingRequest, SeatingError};
use reserve_server::utils::time;
use reserve_server::{Config, ServerState};
use shared::models::{ClaimStatus, OrderStatus, Seat, SeatCreate, SeatLockCreate, SeatType};
use shared::util::now_millis;
use tempfile::TempDir;

const HOUR: i64 = 60 * 60 * 1000;

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
            description: Some("测试卡座".to_string()),
            seat_type: SeatType::Booth,
            capacity: Some(4),
        },
    )
    .await
    .expect("seed seat")
}

fn booking_request(seat_id: i64, holder: &str, arrival: i64) -> CreateBookingRequest {
    CreateBookingRequest {
        seat_id,
        holder_id: holder.to_string(),
        arrival_time: arrival,
        guest_name: Some("张三".to_string()),
        guest_phone: Some("13800000000".to_string()),
        guest_id_card: None,
        total_amount: 388.0,
    }
}

#[tokio::test]
async fn create_booking_links_booking_and_order() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "A1").await;
    let arrival = now_millis() + 26 * HOUR;

    let outcome = state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-a", arrival))
        .await
        .expect("booking should succeed");

    let order = order_repo::find_by_id(state.pool(), outcome.order_id)
        .await
        .unwrap()
        .expect("order persisted");
    assert_eq!(order.no, outcome.order_no);
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.book_id, Some(outcome.book_id));
    assert_eq!(order.lock_id, None);
    assert_eq!(order.arrival_time, Some(arrival));
    assert_eq!(order.total_amount, 388.0);

    let bucket = time::date_bucket(arrival, state.config.venue_tz);
    let bookings = booking_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, outcome.book_id);
    assert_eq!(bookings[0].holder_id, "holder-a");
}

#[tokio::test]
async fn second_booking_same_day_is_rejected_without_partial_writes() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "A2").await;
    let arrival = now_millis() + 26 * HOUR;

    state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-a", arrival))
        .await
        .expect("first booking");

    // Later the same day, different holder
    let err = state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-b", arrival + 2 * HOUR))
        .await
        .expect_err("second booking must conflict");
    assert!(matches!(err, SeatingError::SeatConflict), "got {err:?}");

    // No second booking row, no orphan order
    let bucket = time::date_bucket(arrival, state.config.venue_tz);
    let bookings = booking_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
    let orders = order_repo::find_by_holder(state.pool(), "holder-b", None)
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn concurrent_bookings_exactly_one_wins() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "A3").await;
    let arrival = now_millis() + 26 * HOUR;

    let c1 = Arc::clone(&state.coordinator);
    let c2 = Arc::clone(&state.coordinator);
    let req1 = booking_request(seat.id, "holder-a", arrival);
    let req2 = booking_request(seat.id, "holder-b", arrival + HOUR);

    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { c1.create_booking(req1).await }),
        tokio::spawn(async move { c2.create_booking(req2).await }),
    );
    let results = [r1.unwrap(), r2.unwrap()];

    let wins = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(SeatingError::SeatConflict)))
        .count();
    assert_eq!(wins, 1, "exactly one claim must win: {results:?}");
    assert_eq!(conflicts, 1, "the loser must see a conflict: {results:?}");

    let bucket = time::date_bucket(arrival, state.config.venue_tz);
    let bookings = booking_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn bookings_on_different_days_coexist() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "A4").await;
    let arrival = now_millis() + 26 * HOUR;

    state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-a", arrival))
        .await
        .expect("day one");
    state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-b", arrival + 24 * HOUR))
        .await
        .expect("day two must not conflict");
}

#[tokio::test]
async fn active_lock_blocks_booking_for_same_day() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "A5").await;
    let arrival = now_millis() + 26 * HOUR;
    let bucket = time::date_bucket(arrival, state.config.venue_tz);

    lock_repo::create(
        state.pool(),
        SeatLockCreate {
            seat_id: seat.id,
            holder_id: "walk-in-holder".to_string(),
            date_bucket: bucket,
        },
        now_millis(),
    )
    .await
    .unwrap();

    let err = state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-a", arrival))
        .await
        .expect_err("lock must block the claim");
    assert!(matches!(err, SeatingError::SeatConflict));
}

#[tokio::test]
async fn unknown_seat_is_a_validation_error() {
    let (_dir, state) = setup().await;
    let err = state
        .coordinator
        .create_booking(booking_request(999, "holder-a", now_millis() + 26 * HOUR))
        .await
        .expect_err("unknown seat");
    assert!(matches!(err, SeatingError::Validation(_)));
}

#[tokio::test]
async fn cancel_invalidates_linked_booking_exactly_once() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "B1").await;
    let arrival = now_millis() + 26 * HOUR;
    let bucket = time::date_bucket(arrival, state.config.venue_tz);

    let outcome = state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-a", arrival))
        .await
        .unwrap();

    state
        .lifecycle
        .cancel_order(outcome.order_id, "holder-a")
        .await
        .expect("first cancel succeeds");

    let order = order_repo::find_by_id(state.pool(), outcome.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(order.cancel_time.is_some());

    let bookings = booking_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert!(bookings.is_empty(), "booking must be invalidated");

    // Second cancel: INVALID_STATE, nothing touched again
    let err = state
        .lifecycle
        .cancel_order(outcome.order_id, "holder-a")
        .await
        .expect_err("second cancel must fail");
    assert!(matches!(err, SeatingError::InvalidState(_)));

    // Seat is claimable again after the cancel
    state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-b", arrival + HOUR))
        .await
        .expect("seat released by cancellation");
}

#[tokio::test]
async fn cancel_by_wrong_holder_is_rejected() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "B2").await;

    let outcome = state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-a", now_millis() + 26 * HOUR))
        .await
        .unwrap();

    let err = state
        .lifecycle
        .cancel_order(outcome.order_id, "holder-b")
        .await
        .expect_err("foreign cancel");
    assert!(matches!(err, SeatingError::InvalidState(_)));

    let order = order_repo::find_by_id(state.pool(), outcome.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::PendingPayment);
}

#[tokio::test]
async fn payment_records_metadata_and_keeps_claim_active() {
    let (_dir, state) = setup().await;
    let seat = seed_seat(&state, "B3").await;
    let arrival = now_millis() + 26 * HOUR;
    let bucket = time::date_bucket(arrival, state.config.venue_tz);

    let outcome = state
        .coordinator
        .create_booking(booking_request(seat.id, "holder-a", arrival))
        .await
        .unwrap();

    let payment = state
        .lifecycle
        .complete_payment(outcome.order_id, "holder-a", 388.0, "ONLINE")
        .await
        .expect("payment succeeds");
    assert_eq!(payment.order_no, outcome.order_no);
    assert!(payment.transaction_id.starts_with("TID"));

    let order = order_repo::find_by_id(state.pool(), outcome.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.paid_amount, 388.0);
    assert_eq!(order.payment_method.as_deref(), Some("ONLINE"));
    assert!(order.payment_time.is_some());

    // The seat stays claimed after payment
    let bookings = booking_repo::find_active_in_bucket(state.pool(), seat.id, &bucket)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].status, ClaimStatus::Active);

    // Loyalty collaborator was called once with the paid amount
    assert_eq!(state.loyalty.points_of("holder-a"), 388);

    // Paid orders can be neither paid again nor cancelled
    let err = state
        .lifecycle
        .complete_payment(outcome.order_id, "holder-a", 388.0, "ONLINE")
        .await
        .expect_err("double pay");
    assert!(matches!(err, SeatingError::InvalidState(_)));
    let err = state
        .lifecycle
        .cancel_order(outcome.order_id, "holder-a")
        .await
        .expect_err("cancel after pay");
    assert!(matches!(err, SeatingError::InvalidState(_)));
    assert_eq!(state.loyalty.points_of("holder-a"), 388, "points credited once");
}

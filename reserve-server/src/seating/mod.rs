//! Seating domain core
//!
//! Availability resolution, claim transactions, and claim-record lifecycle.
//!
//! ```text
//! seating/
//! ├── availability.rs  # pure precedence rules → SeatStatus
//! ├── coordinator.rs   # create_booking (atomic) / create_walk_in (compensated)
//! ├── lifecycle.rs     # cancel_order / complete_payment
//! ├── order_no.rs      # bounded check-then-use order numbers
//! ├── guard.rs         # per-(seat, day) claim serialization
//! └── error.rs         # domain error taxonomy
//! ```

pub mod availability;
pub mod coordinator;
pub mod error;
pub mod guard;
pub mod lifecycle;
pub mod order_no;

pub use coordinator::{
    CreateBookingOutcome, CreateBookingRequest, CreateWalkInOutcome, CreateWalkInRequest,
    ReservationCoordinator,
};
pub use error::SeatingError;
pub use lifecycle::{LockLifecycle, PaymentOutcome};
pub use order_no::{OrderNoGenerator, OrderNoSource, TimestampSource};

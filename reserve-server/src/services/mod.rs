//! External collaborators
//!
//! Systems the seating core calls into but does not own.

pub mod loyalty;

pub use loyalty::{LoyaltyError, LoyaltyService, SimulatedLoyalty};

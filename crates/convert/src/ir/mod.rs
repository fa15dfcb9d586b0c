//! Intermediate representation shared by every format adapter
//!
//! The IR is created fresh by an inbound adapter, fully populated before an
//! outbound adapter reads it, and discarded after the emit call. It carries no
//! identity beyond a single conversion.

mod schema;
mod validation;

pub use schema::*;
pub use validation::*;

//! Requirement fulfillment orchestration.

pub mod fulfill;

pub use fulfill::{FulfillSummary, Fulfillment};

//! HTTP handlers for coffeepush-service.

pub mod health;
pub mod index;
pub mod push;

pub use health::{health_check, metrics, readiness_check};
pub use index::{index, not_found};
pub use push::{relay_purchase, relay_purchase_without_recipient};

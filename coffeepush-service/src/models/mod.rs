pub mod purchase;

pub use purchase::{PurchaseEvent, PurchaseParseError, ANONYMOUS_SUPPORTER};

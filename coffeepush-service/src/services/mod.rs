pub mod metrics;
pub mod providers;

pub use metrics::{get_metrics, init_metrics, record_notification};
pub use providers::{
    MockPushProvider, ProviderError, ProviderResponse, PushMessage, PushProvider,
    PushoverProvider,
};

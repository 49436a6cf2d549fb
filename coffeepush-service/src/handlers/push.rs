//! Purchase webhook relay.
//!
//! `/push/{recipient}` (any method): decode the purchase, word it as a single line and
//! hand it to the push provider addressed to `{recipient}`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use service_core::error::AppError;

use crate::models::PurchaseEvent;
use crate::services::{record_notification, PushMessage};
use crate::startup::AppState;

#[tracing::instrument(name = "relay_purchase", skip_all)]
pub async fn relay_purchase(
    State(state): State<AppState>,
    Path(recipient): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    relay(&state, recipient, &body).await
}

/// `/push/` with nothing after it: the recipient is empty and delivery is
/// left to fail upstream.
#[tracing::instrument(name = "relay_purchase", skip_all)]
pub async fn relay_purchase_without_recipient(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    relay(&state, String::new(), &body).await
}

async fn relay(state: &AppState, recipient: String, body: &[u8]) -> Result<StatusCode, AppError> {
    // TODO: authenticate the recipient token; any caller that knows the URL can push.

    let event = PurchaseEvent::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "error decoding purchase webhook");
        record_notification("rejected");
        AppError::BadRequest(e.into())
    })?;

    let push = PushMessage {
        recipient,
        message: event.notification_text(),
    };

    if let Err(e) = state.push_provider.send(&push).await {
        tracing::error!(error = %e, kind = e.kind(), "error sending push");
        record_notification("failed");
        return Err(AppError::BadGateway(e.to_string()));
    }

    record_notification("sent");
    Ok(StatusCode::OK)
}

use askama::Template;
use axum::response::IntoResponse;
use service_core::error::AppError;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {}

pub async fn index() -> impl IntoResponse {
    IndexTemplate {}
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("no route for request"))
}

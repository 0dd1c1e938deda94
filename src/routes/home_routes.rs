use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::models::{ApiOk, AppState};

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health() -> Json<ApiOk<Health>> {
    Json(ApiOk {
        data: Health { status: "ok" },
    })
}

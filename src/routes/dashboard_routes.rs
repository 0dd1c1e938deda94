// src/routes/dashboard_routes.rs

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    error::ApiError,
    models::{ApiOk, AppState},
    pipeline::dashboard::{dashboard, Dashboard},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<Dashboard>>, ApiError> {
    let Some(summary) = state.backend.dashboard().await? else {
        return Err(ApiError::Upstream(
            "DASHBOARD_UNAVAILABLE",
            "backend did not report a summary".into(),
        ));
    };

    Ok(Json(ApiOk {
        data: dashboard(&summary),
    }))
}

// src/routes/calendar_routes.rs

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::{
    error::ApiError,
    models::{ApiOk, AppState},
    pipeline::calendar::{day_grid, DayGrid},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/calendar", get(day_calendar))
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub date: Option<NaiveDate>,
}

pub async fn day_calendar(
    State(state): State<AppState>,
    Query(q): Query<CalendarQuery>,
) -> Result<Json<ApiOk<DayGrid>>, ApiError> {
    let date = q.date.unwrap_or_else(|| Local::now().date_naive());

    let (schedule, directory) = tokio::join!(
        state.backend.day_schedule(date),
        state.backend.fetch_employees()
    );

    // either half failing still renders the grid, just emptier
    let schedule = schedule.unwrap_or_else(|e| {
        tracing::error!(%date, error = %e, "calendar fetch failed");
        Default::default()
    });
    let directory = directory.unwrap_or_else(|e| {
        tracing::error!(%date, error = %e, "employee directory fetch failed");
        Default::default()
    });

    Ok(Json(ApiOk {
        data: day_grid(date, &directory, &schedule),
    }))
}

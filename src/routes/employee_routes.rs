// src/routes/employee_routes.rs

use axum::{extract::State, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    models::{ApiOk, AppState, BookingRequest, EmployeeCard},
    pipeline::{clients::available_workers, format::to_24_hour},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees))
        .route("/bookings/available-workers", post(list_available_workers))
        .route("/bookings", post(create_booking))
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingBody {
    pub employee_id: String,
    #[serde(flatten)]
    pub booking: BookingRequest,
}

#[derive(Debug, Serialize)]
pub struct BookingCreated {
    pub phone: String,
    pub employee_id: String,
}

fn ensure_booking(booking: &BookingRequest) -> Result<(), ApiError> {
    if booking.name.trim().is_empty() || booking.phone.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "MISSING_CLIENT",
            "name and phone are required".into(),
        ));
    }
    if booking.time.trim().is_empty() {
        return Err(ApiError::BadRequest("MISSING_TIME", "time is required".into()));
    }
    if to_24_hour(&booking.time).is_empty() {
        return Err(ApiError::BadRequest(
            "INVALID_TIME",
            format!("'{}' is not a time of day", booking.time),
        ));
    }
    Ok(())
}

pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<Vec<EmployeeCard>>>, ApiError> {
    let directory = state.backend.fetch_employees().await?;
    Ok(Json(ApiOk { data: directory.cards() }))
}

pub async fn list_available_workers(
    State(state): State<AppState>,
    Json(booking): Json<BookingRequest>,
) -> Result<Json<ApiOk<Vec<EmployeeCard>>>, ApiError> {
    ensure_booking(&booking)?;

    let (ids, directory) = tokio::join!(
        state.backend.available_employees(&booking),
        state.backend.fetch_employees()
    );
    let workers = available_workers(&ids?, &directory?);

    tracing::info!(date = %booking.date, time = %booking.time, offered = workers.len(), "available workers resolved");
    Ok(Json(ApiOk { data: workers }))
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(body): Json<CreateBookingBody>,
) -> Result<Json<ApiOk<BookingCreated>>, ApiError> {
    ensure_booking(&body.booking)?;
    if body.employee_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "MISSING_EMPLOYEE",
            "employee_id is required".into(),
        ));
    }

    state
        .backend
        .create_appointment(&body.booking, &body.employee_id)
        .await?;

    tracing::info!(phone = %body.booking.phone, employee_id = %body.employee_id, "appointment booked");
    Ok(Json(ApiOk {
        data: BookingCreated {
            phone: body.booking.phone,
            employee_id: body.employee_id,
        },
    }))
}

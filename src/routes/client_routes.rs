// src/routes/client_routes.rs

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    error::ApiError,
    models::{ApiOk, AppState},
    pipeline::clients::{client_rows, ClientRow},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/clients/{phone}/services", get(client_services))
}

#[derive(Debug, Serialize)]
pub struct ServiceHistory {
    pub phone: String,
    pub services: Vec<String>,
}

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<Vec<ClientRow>>>, ApiError> {
    let records = state.backend.fetch_clients().await?;
    Ok(Json(ApiOk { data: client_rows(&records) }))
}

pub async fn client_services(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<ApiOk<ServiceHistory>>, ApiError> {
    let Some(services) = state.backend.client_services(&phone).await? else {
        return Err(ApiError::NotFound(
            "CLIENT_NOT_FOUND",
            format!("no history for client '{phone}'"),
        ));
    };

    Ok(Json(ApiOk {
        data: ServiceHistory { phone, services },
    }))
}

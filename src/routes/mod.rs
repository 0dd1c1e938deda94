use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod calendar_routes;
pub mod client_routes;
pub mod dashboard_routes;
pub mod employee_routes;
pub mod home_routes;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(appointment_routes::router())
        .merge(employee_routes::router())
        .merge(client_routes::router())
        .merge(calendar_routes::router())
        .merge(dashboard_routes::router());

    Router::new()
        .nest("/api/v1", api)
        .merge(home_routes::router())
        .with_state(state)
}

// src/routes/appointment_routes.rs

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    models::{ApiOk, AppState, CheckInPreview},
    pipeline::{
        dispatch::{Mutation, MutationDispatcher, MutationOutcome},
        normalize::ViewKind,
        view::{AppointmentView, ViewSnapshot},
    },
};

pub fn router() -> Router<AppState> {
    // views and appointments share the `{id}` segment
    Router::new()
        .route("/appointments/{id}", get(refresh_view))
        .route("/appointments/{id}/current", get(current_view))
        .route("/appointments/{id}/cancel", post(cancel))
        .route("/appointments/{id}/assign", post(assign))
        .route("/appointments/{id}/check-in", post(check_in))
        .route("/appointments/{id}/payment", post(confirm_payment))
        .route("/check-in/lookup", post(check_in_lookup))
        .route("/check-in/manual", post(manual_check_in))
}

/* ============================================================
   Request DTOs
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct AssignBody {
    pub employee_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentBody {
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckInBody {
    pub appt_id: String,
}

#[derive(Debug, Serialize)]
pub struct MutationResult {
    pub appt_id: String,
    /// The list after the splice; `None` when it was never opened.
    pub view: Option<ViewSnapshot>,
}

/* ============================================================
   Views
   ============================================================ */

fn view_kind(segment: &str) -> Result<ViewKind, ApiError> {
    ViewKind::from_path(segment).ok_or_else(|| ApiError::unknown_view(segment))
}

pub async fn refresh_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Json<ApiOk<ViewSnapshot>>, ApiError> {
    let kind = view_kind(&view)?;

    let loaded = AppointmentView::load(state.backend.as_ref(), kind).await;
    let snapshot = loaded.snapshot();
    state.views.lock().await.insert(kind, loaded);

    Ok(Json(ApiOk { data: snapshot }))
}

pub async fn current_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
) -> Result<Json<ApiOk<ViewSnapshot>>, ApiError> {
    let kind = view_kind(&view)?;

    let views = state.views.lock().await;
    let snapshot = match views.get(&kind) {
        Some(mounted) => mounted.snapshot(),
        None => AppointmentView::empty(kind).snapshot(),
    };

    Ok(Json(ApiOk { data: snapshot }))
}

/* ============================================================
   Mutations
   ============================================================ */

/// Send `mutation` without holding the view lock, then splice the result
/// into the view it was issued from if that view is mounted.
async fn run_mutation(
    state: &AppState,
    mutation: Mutation,
) -> Result<Json<ApiOk<MutationResult>>, ApiError> {
    let kind = mutation.view();

    let directory = {
        let views = state.views.lock().await;
        views
            .get(&kind)
            .map(|v| v.directory().clone())
            .unwrap_or_default()
    };

    let outcome = MutationDispatcher::new(state.backend.as_ref())
        .execute(kind, &mutation, &directory)
        .await;

    match outcome {
        MutationOutcome::Applied(effect) => {
            let mut views = state.views.lock().await;
            let view = views.get_mut(&kind).map(|view| {
                view.apply(&effect);
                view.snapshot()
            });
            if view.is_none() {
                tracing::debug!(?kind, "view not mounted, nothing to splice");
            }

            Ok(Json(ApiOk {
                data: MutationResult {
                    appt_id: mutation.appt_id().to_string(),
                    view,
                },
            }))
        }
        MutationOutcome::Rejected(reason) => Err(ApiError::Conflict("ILLEGAL_TRANSITION", reason)),
        MutationOutcome::Failed(reason) => Err(ApiError::Upstream("MUTATION_FAILED", reason)),
    }
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(appt_id): Path<String>,
) -> Result<Json<ApiOk<MutationResult>>, ApiError> {
    run_mutation(&state, Mutation::Cancel { appt_id }).await
}

pub async fn assign(
    State(state): State<AppState>,
    Path(appt_id): Path<String>,
    Json(body): Json<AssignBody>,
) -> Result<Json<ApiOk<MutationResult>>, ApiError> {
    run_mutation(
        &state,
        Mutation::Assign {
            appt_id,
            employee_id: body.employee_id,
        },
    )
    .await
}

pub async fn check_in(
    State(state): State<AppState>,
    Path(appt_id): Path<String>,
) -> Result<Json<ApiOk<MutationResult>>, ApiError> {
    run_mutation(&state, Mutation::CheckIn { appt_id }).await
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(appt_id): Path<String>,
    Json(body): Json<PaymentBody>,
) -> Result<Json<ApiOk<MutationResult>>, ApiError> {
    run_mutation(
        &state,
        Mutation::ConfirmPayment {
            appt_id,
            payment_method: body.payment_method,
        },
    )
    .await
}

/* ============================================================
   Front-desk check-in
   ============================================================ */

pub async fn check_in_lookup(
    State(state): State<AppState>,
    Json(body): Json<CheckInBody>,
) -> Result<Json<ApiOk<CheckInPreview>>, ApiError> {
    let appt_id = body.appt_id.trim();
    if appt_id.is_empty() {
        return Err(ApiError::BadRequest("MISSING_APPT_ID", "appt_id is required".into()));
    }

    match state.backend.check_in_info(appt_id).await? {
        Some(preview) => Ok(Json(ApiOk { data: preview })),
        None => Err(ApiError::NotFound(
            "APPOINTMENT_NOT_FOUND",
            format!("no appointment '{appt_id}' to check in"),
        )),
    }
}

pub async fn manual_check_in(
    State(state): State<AppState>,
    Json(body): Json<CheckInBody>,
) -> Result<Json<ApiOk<MutationResult>>, ApiError> {
    run_mutation(
        &state,
        Mutation::ManualCheckIn {
            appt_id: body.appt_id.trim().to_string(),
        },
    )
    .await
}

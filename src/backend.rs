// src/backend.rs

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::{
    config::Endpoints,
    error::BackendError,
    models::{
        keyed_entries, reports_success, AppointmentRecord, BookingRequest, CheckInPreview,
        ClientRecord, DashboardSummary, DaySchedule, EmployeeDirectory, EmployeeProfile,
    },
    pipeline::{
        format::{backend_date, to_24_hour},
        normalize::ViewKind,
    },
};

/// Everything the dashboard needs from the remote booking service.
///
/// Collections come back as `(id, record)` pairs in backend order. Records
/// are decoded leniently, so only transport, status and top-level shape
/// problems surface as errors.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn fetch_appointments(
        &self,
        kind: ViewKind,
    ) -> Result<Vec<(String, AppointmentRecord)>, BackendError>;

    async fn fetch_employees(&self) -> Result<EmployeeDirectory, BackendError>;

    async fn cancel_appointment(&self, appt_id: &str) -> Result<(), BackendError>;

    async fn assign_employee(&self, appt_id: &str, employee_id: &str) -> Result<(), BackendError>;

    /// Marks the appointment checked in and returns the updated record.
    async fn check_in(&self, appt_id: &str) -> Result<AppointmentRecord, BackendError>;

    /// `None` when the backend does not know the id.
    async fn check_in_info(&self, appt_id: &str) -> Result<Option<CheckInPreview>, BackendError>;

    async fn confirm_payment(&self, appt_id: &str, payment_method: &str) -> Result<(), BackendError>;

    async fn fetch_clients(&self) -> Result<Vec<(String, ClientRecord)>, BackendError>;

    /// Services from every past appointment of the client; `None` when unknown.
    async fn client_services(&self, phone: &str) -> Result<Option<Vec<String>>, BackendError>;

    async fn day_schedule(&self, date: NaiveDate) -> Result<DaySchedule, BackendError>;

    /// Ids of employees free for the requested slot.
    async fn available_employees(&self, booking: &BookingRequest) -> Result<Vec<String>, BackendError>;

    async fn create_appointment(
        &self,
        booking: &BookingRequest,
        employee_id: &str,
    ) -> Result<(), BackendError>;

    /// `None` when the backend flags the summary as unsuccessful.
    async fn dashboard(&self) -> Result<Option<DashboardSummary>, BackendError>;
}

/* ============================================================
   HTTP adapter
   ============================================================ */

pub struct HttpBackend {
    client: reqwest::Client,
    endpoints: Endpoints,
    timeout_secs: u64,
}

impl HttpBackend {
    pub fn new(endpoints: Endpoints, timeout_secs: u64) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BackendError::Transport {
                url: String::new(),
                message: format!("cannot build http client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoints,
            timeout_secs,
        })
    }

    fn appointments_url(&self, kind: ViewKind) -> &str {
        match kind {
            ViewKind::Pending => &self.endpoints.pending_appointments,
            ViewKind::Confirmed => &self.endpoints.confirmed_appointments,
            ViewKind::CheckedIn => &self.endpoints.checked_in_appointments,
            ViewKind::Paid => &self.endpoints.paid_appointments,
            ViewKind::All => &self.endpoints.all_appointments,
        }
    }

    /// Send and return the raw body of a 2xx response.
    async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await.map_err(|e| BackendError::Transport {
            url: url.to_string(),
            message: if e.is_timeout() {
                format!("request timed out after {}s", self.timeout_secs)
            } else {
                e.to_string()
            },
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| BackendError::Transport {
            url: url.to_string(),
            message: format!("reading body: {e}"),
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn get_json(&self, url: &str) -> Result<Value, BackendError> {
        let body = self.send(url, self.client.get(url)).await?;
        decode(url, &body)
    }

    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value, BackendError> {
        let body = self.send(url, self.client.post(url).json(payload)).await?;
        decode(url, &body)
    }

    /// POST where only the status matters; the body may be JSON, text or empty.
    async fn post_status(&self, url: &str, payload: &Value) -> Result<(), BackendError> {
        self.send(url, self.client.post(url).json(payload)).await?;
        Ok(())
    }
}

fn decode(url: &str, body: &str) -> Result<Value, BackendError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| BackendError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn expect_object(url: &str, body: Value) -> Result<Value, BackendError> {
    if body.is_object() {
        Ok(body)
    } else {
        Err(BackendError::Decode {
            url: url.to_string(),
            message: "expected a JSON object".into(),
        })
    }
}

fn booking_payload(booking: &BookingRequest, date: String) -> Value {
    let mut payload = booking.extra.clone();
    payload.insert("name".into(), json!(booking.name));
    payload.insert("phone".into(), json!(booking.phone));
    payload.insert("services".into(), json!(booking.services));
    payload.insert("date".into(), json!(date));
    payload.insert("time".into(), json!(to_24_hour(&booking.time)));
    Value::Object(payload)
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn fetch_appointments(
        &self,
        kind: ViewKind,
    ) -> Result<Vec<(String, AppointmentRecord)>, BackendError> {
        let url = self.appointments_url(kind);
        let body = expect_object(url, self.get_json(url).await?)?;
        Ok(keyed_entries(body, "appointments"))
    }

    async fn fetch_employees(&self) -> Result<EmployeeDirectory, BackendError> {
        let url = &self.endpoints.employees;
        let body = expect_object(url, self.get_json(url).await?)?;
        Ok(EmployeeDirectory::from_entries(keyed_entries::<EmployeeProfile>(
            body,
            "employees",
        )))
    }

    async fn cancel_appointment(&self, appt_id: &str) -> Result<(), BackendError> {
        self.post_status(&self.endpoints.cancel_appointment, &json!({ "apptId": appt_id }))
            .await
    }

    async fn assign_employee(&self, appt_id: &str, employee_id: &str) -> Result<(), BackendError> {
        self.post_status(
            &self.endpoints.assign_appointment,
            &json!({ "apptId": appt_id, "prefEmployee": employee_id }),
        )
        .await
    }

    async fn check_in(&self, appt_id: &str) -> Result<AppointmentRecord, BackendError> {
        let url = &self.endpoints.check_in;
        let body = self
            .send(url, self.client.post(url).json(&json!({ "apptId": appt_id })))
            .await?;
        // Some deployments answer with a bare status; treat that as an empty record.
        let record = serde_json::from_str::<AppointmentRecord>(&body).unwrap_or_default();
        Ok(record)
    }

    async fn check_in_info(&self, appt_id: &str) -> Result<Option<CheckInPreview>, BackendError> {
        let url = &self.endpoints.check_in_info;
        let body = self.post_json(url, &json!({ "apptId": appt_id })).await?;
        if !reports_success(&body) {
            return Ok(None);
        }
        let record = serde_json::from_value::<AppointmentRecord>(body).unwrap_or_default();
        Ok(Some(CheckInPreview {
            client_name: record.name,
            assigned_employee: record.assigned_employee,
        }))
    }

    async fn confirm_payment(&self, appt_id: &str, payment_method: &str) -> Result<(), BackendError> {
        self.post_status(
            &self.endpoints.confirm_payment,
            &json!({ "apptId": appt_id, "pymntMethod": payment_method }),
        )
        .await
    }

    async fn fetch_clients(&self) -> Result<Vec<(String, ClientRecord)>, BackendError> {
        let url = &self.endpoints.clients;
        let body = expect_object(url, self.get_json(url).await?)?;
        Ok(keyed_entries(body, "clients"))
    }

    async fn client_services(&self, phone: &str) -> Result<Option<Vec<String>>, BackendError> {
        let url = &self.endpoints.client_info;
        let body = self.post_json(url, &json!({ "phone": phone })).await?;
        if !reports_success(&body) {
            return Ok(None);
        }
        let services = keyed_entries::<AppointmentRecord>(body, "client history")
            .into_iter()
            .flat_map(|(_, record)| record.services)
            .collect();
        Ok(Some(services))
    }

    async fn day_schedule(&self, date: NaiveDate) -> Result<DaySchedule, BackendError> {
        let url = &self.endpoints.calendar;
        let body = self
            .post_json(url, &json!({ "date": backend_date(date) }))
            .await?;
        Ok(DaySchedule::from_value(&body))
    }

    async fn available_employees(&self, booking: &BookingRequest) -> Result<Vec<String>, BackendError> {
        let url = &self.endpoints.available_employees;
        let payload = booking_payload(booking, backend_date(booking.date));
        match self.post_json(url, &payload).await? {
            Value::Array(ids) => Ok(ids
                .iter()
                .map(crate::models::lenient::as_text)
                .filter(|id| !id.is_empty())
                .collect()),
            _ => Err(BackendError::Decode {
                url: url.to_string(),
                message: "expected a list of employee ids".into(),
            }),
        }
    }

    async fn create_appointment(
        &self,
        booking: &BookingRequest,
        employee_id: &str,
    ) -> Result<(), BackendError> {
        let mut payload = booking_payload(booking, booking.date.format("%Y-%m-%d").to_string());
        if let Value::Object(map) = &mut payload {
            map.insert("prefEmployee".into(), json!(employee_id));
        }
        self.post_status(&self.endpoints.create_appointment, &payload)
            .await
    }

    async fn dashboard(&self) -> Result<Option<DashboardSummary>, BackendError> {
        let url = &self.endpoints.dashboard;
        let body = self.get_json(url).await?;
        if !reports_success(&body) {
            return Ok(None);
        }
        serde_json::from_value(body)
            .map(Some)
            .map_err(|e| BackendError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Json,
        http::StatusCode,
        routing::{get, post},
        Router,
    };
    use pretty_assertions::assert_eq;

    /// Serve `app` on an ephemeral port and point every endpoint at it.
    async fn upstream(app: Router) -> HttpBackend {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let endpoints = Endpoints::from_env(&format!("http://{addr}"));
        HttpBackend::new(endpoints, 5).unwrap()
    }

    #[tokio::test]
    async fn fetches_keyed_appointments_in_backend_order() {
        let app = Router::new().route(
            "/appointments/confirmed",
            get(|| async {
                Json(json!({
                    "success": true,
                    "z-9": {"name": "Zoya", "assignedEmployee": "E2"},
                    "a-1": {"name": "Asha", "duration": 90},
                    "gone": null
                }))
            }),
        );
        let backend = upstream(app).await;

        let records = backend.fetch_appointments(ViewKind::Confirmed).await.unwrap();

        let ids: Vec<&str> = records.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(ids, vec!["z-9", "a-1"]);
        assert_eq!(records[0].1.assigned_employee, "E2");
        assert_eq!(records[1].1.duration, 90);
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let app = Router::new().route(
            "/employees",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let backend = upstream(app).await;

        let err = backend.fetch_employees().await.unwrap_err();

        match err {
            BackendError::Status { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mutations_accept_a_bare_status_body() {
        let app = Router::new().route(
            "/appointments/delete",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({ "apptId": "A1" }));
                "OK"
            }),
        );
        let backend = upstream(app).await;

        backend.cancel_appointment("A1").await.unwrap();
    }

    #[tokio::test]
    async fn bare_check_in_reply_never_lists_a_blank_row() {
        use crate::pipeline::dispatch::{Effect, Mutation, MutationDispatcher, MutationOutcome};

        let app = Router::new().route("/appointments/checkin", post(|| async { "OK" }));
        let backend = upstream(app).await;

        let record = backend.check_in("A1").await.unwrap();
        assert_eq!(record, AppointmentRecord::default());

        let outcome = MutationDispatcher::new(&backend)
            .execute(
                ViewKind::Confirmed,
                &Mutation::ManualCheckIn { appt_id: "A1".into() },
                &EmployeeDirectory::default(),
            )
            .await;

        assert_eq!(outcome, MutationOutcome::Applied(Effect::Removed { appt_id: "A1".into() }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // port 9 (discard) is not listening on loopback in test environments
        let backend = HttpBackend::new(Endpoints::from_env("http://127.0.0.1:9"), 2).unwrap();

        let err = backend.fetch_clients().await.unwrap_err();
        assert!(matches!(err, BackendError::Transport { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn check_in_info_respects_the_success_flag() {
        let app = Router::new().route(
            "/appointments/checkin/info",
            post(|Json(body): Json<Value>| async move {
                if body["apptId"] == "known" {
                    Json(json!({ "sucess": true, "name": "Asha", "assignedEmployee": "E1" }))
                } else {
                    Json(json!({ "sucess": false }))
                }
            }),
        );
        let backend = upstream(app).await;

        let preview = backend.check_in_info("known").await.unwrap();
        assert_eq!(
            preview,
            Some(CheckInPreview {
                client_name: "Asha".into(),
                assigned_employee: "E1".into(),
            })
        );
        assert_eq!(backend.check_in_info("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn available_employees_sends_backend_date_and_24h_time() {
        let app = Router::new().route(
            "/employees/available",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["date"], "01-05-2024");
                assert_eq!(body["time"], "14:30");
                assert_eq!(body["gender"], "F");
                Json(json!(["E1", "E2"]))
            }),
        );
        let backend = upstream(app).await;
        let booking: BookingRequest = serde_json::from_value(json!({
            "name": "Asha",
            "phone": "9998887771",
            "date": "2024-05-01",
            "time": "2:30 PM",
            "services": ["hair-cut"],
            "gender": "F"
        }))
        .unwrap();

        let ids = backend.available_employees(&booking).await.unwrap();
        assert_eq!(ids, vec!["E1", "E2"]);
    }

    #[tokio::test]
    async fn client_services_are_concatenated() {
        let app = Router::new().route(
            "/clients/info",
            post(|| async {
                Json(json!({
                    "sucess": true,
                    "a-1": {"services": ["hair-cut"]},
                    "a-2": {"services": ["blow-dry", "beard-grooming"]}
                }))
            }),
        );
        let backend = upstream(app).await;

        let services = backend.client_services("9998887771").await.unwrap();
        assert_eq!(
            services,
            Some(vec![
                "hair-cut".to_string(),
                "blow-dry".to_string(),
                "beard-grooming".to_string()
            ])
        );
    }
}

//! In-memory booking backend for exercising views and routes without a network.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::{
    backend::BookingBackend,
    error::BackendError,
    models::{
        keyed_entries, reports_success, AppointmentRecord, BookingRequest, CheckInPreview, ClientRecord,
        DashboardSummary, DaySchedule, EmployeeDirectory,
    },
    pipeline::normalize::ViewKind,
};

#[derive(Default)]
pub struct FakeBackend {
    appointments: HashMap<ViewKind, Vec<(String, AppointmentRecord)>>,
    employees: EmployeeDirectory,
    clients: Vec<(String, ClientRecord)>,
    client_history: HashMap<String, Vec<String>>,
    schedule: DaySchedule,
    available: Vec<String>,
    dashboard: Option<DashboardSummary>,
    appointments_down: bool,
    employees_down: bool,
    mutations_down: bool,
    calls: Mutex<Vec<String>>,
}

fn offline(what: &str) -> BackendError {
    BackendError::Transport {
        url: format!("fake://{what}"),
        message: "connection refused".into(),
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// `body` is a keyed backend payload, exactly as the remote would send it.
    pub fn with_appointments(mut self, kind: ViewKind, body: Value) -> Self {
        self.appointments.insert(kind, keyed_entries(body, "appointments"));
        self
    }

    pub fn with_employees(mut self, body: Value) -> Self {
        self.employees = EmployeeDirectory::from_entries(keyed_entries(body, "employees"));
        self
    }

    pub fn with_clients(mut self, body: Value) -> Self {
        self.clients = keyed_entries(body, "clients");
        self
    }

    pub fn with_client_history(mut self, phone: &str, services: &[&str]) -> Self {
        self.client_history.insert(
            phone.to_string(),
            services.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_schedule(mut self, body: Value) -> Self {
        self.schedule = DaySchedule::from_value(&body);
        self
    }

    pub fn with_available(mut self, ids: &[&str]) -> Self {
        self.available = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_dashboard(mut self, body: Value) -> Self {
        self.dashboard = reports_success(&body)
            .then(|| serde_json::from_value(body).ok())
            .flatten();
        self
    }

    pub fn appointments_down(mut self) -> Self {
        self.appointments_down = true;
        self
    }

    pub fn employees_down(mut self) -> Self {
        self.employees_down = true;
        self
    }

    pub fn mutations_down(mut self) -> Self {
        self.mutations_down = true;
        self
    }

    /// Remote calls made so far, e.g. `"cancel A1"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record_call(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn mutate(&self, call: String) -> Result<(), BackendError> {
        self.record_call(call);
        if self.mutations_down {
            return Err(offline("mutation"));
        }
        Ok(())
    }

    fn find_record(&self, appt_id: &str) -> Option<AppointmentRecord> {
        self.appointments
            .values()
            .flatten()
            .find(|(id, _)| id == appt_id)
            .map(|(_, r)| r.clone())
    }
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn fetch_appointments(
        &self,
        kind: ViewKind,
    ) -> Result<Vec<(String, AppointmentRecord)>, BackendError> {
        self.record_call(format!("fetch {kind:?}"));
        if self.appointments_down {
            return Err(offline("appointments"));
        }
        Ok(self.appointments.get(&kind).cloned().unwrap_or_default())
    }

    async fn fetch_employees(&self) -> Result<EmployeeDirectory, BackendError> {
        self.record_call("fetch employees".into());
        if self.employees_down {
            return Err(offline("employees"));
        }
        Ok(self.employees.clone())
    }

    async fn cancel_appointment(&self, appt_id: &str) -> Result<(), BackendError> {
        self.mutate(format!("cancel {appt_id}"))
    }

    async fn assign_employee(&self, appt_id: &str, employee_id: &str) -> Result<(), BackendError> {
        self.mutate(format!("assign {appt_id} {employee_id}"))
    }

    async fn check_in(&self, appt_id: &str) -> Result<AppointmentRecord, BackendError> {
        self.mutate(format!("check-in {appt_id}"))?;
        self.find_record(appt_id).ok_or_else(|| BackendError::Status {
            url: "fake://check-in".into(),
            status: 404,
            body: "no such appointment".into(),
        })
    }

    async fn check_in_info(&self, appt_id: &str) -> Result<Option<CheckInPreview>, BackendError> {
        self.record_call(format!("check-in info {appt_id}"));
        Ok(self.find_record(appt_id).map(|r| CheckInPreview {
            client_name: r.name,
            assigned_employee: r.assigned_employee,
        }))
    }

    async fn confirm_payment(&self, appt_id: &str, payment_method: &str) -> Result<(), BackendError> {
        self.mutate(format!("pay {appt_id} {payment_method}"))
    }

    async fn fetch_clients(&self) -> Result<Vec<(String, ClientRecord)>, BackendError> {
        Ok(self.clients.clone())
    }

    async fn client_services(&self, phone: &str) -> Result<Option<Vec<String>>, BackendError> {
        Ok(self.client_history.get(phone).cloned())
    }

    async fn day_schedule(&self, date: NaiveDate) -> Result<DaySchedule, BackendError> {
        self.record_call(format!("schedule {date}"));
        Ok(self.schedule.clone())
    }

    async fn available_employees(&self, booking: &BookingRequest) -> Result<Vec<String>, BackendError> {
        self.record_call(format!("available {} {}", booking.date, booking.time));
        Ok(self.available.clone())
    }

    async fn create_appointment(
        &self,
        booking: &BookingRequest,
        employee_id: &str,
    ) -> Result<(), BackendError> {
        self.mutate(format!("create {} {employee_id}", booking.phone))
    }

    async fn dashboard(&self) -> Result<Option<DashboardSummary>, BackendError> {
        Ok(self.dashboard.clone())
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    dispatch::Effect,
    filter::{retain_complete, Filtered},
    normalize::{normalize, DisplayRow, ViewKind},
};
use crate::{
    backend::BookingBackend,
    models::{AppointmentRecord, EmployeeDirectory},
};

/// State of one mounted appointment list: the rows on screen plus the
/// directory they were resolved against.
#[derive(Debug, Clone)]
pub struct AppointmentView {
    kind: ViewKind,
    rows: Vec<DisplayRow>,
    directory: EmployeeDirectory,
    dropped: usize,
    warnings: Vec<String>,
    loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ViewSnapshot {
    pub view: ViewKind,
    pub rows: Vec<DisplayRow>,
    pub dropped: usize,
    pub warnings: Vec<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl AppointmentView {
    /// A view that has not been loaded yet.
    pub fn empty(kind: ViewKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            directory: EmployeeDirectory::default(),
            dropped: 0,
            warnings: Vec::new(),
            loaded_at: None,
        }
    }

    /// One refresh cycle. Appointments and the directory are fetched
    /// concurrently; a failed fetch is logged and the view renders with
    /// whatever did arrive.
    pub async fn load(backend: &dyn BookingBackend, kind: ViewKind) -> Self {
        let (records, directory) =
            tokio::join!(backend.fetch_appointments(kind), backend.fetch_employees());

        let mut warnings = Vec::new();

        let records = match records {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(?kind, error = %e, "appointment fetch failed");
                warnings.push(format!("appointments unavailable: {e}"));
                Vec::new()
            }
        };
        let directory = match directory {
            Ok(directory) => directory,
            Err(e) => {
                tracing::error!(?kind, error = %e, "employee directory fetch failed");
                warnings.push(format!("employee names unavailable: {e}"));
                EmployeeDirectory::default()
            }
        };

        let mut view = Self::from_records(kind, &records, directory);
        view.warnings = warnings;
        view
    }

    /// Normalize, filter and order `records` for `kind`.
    pub fn from_records(
        kind: ViewKind,
        records: &[(String, AppointmentRecord)],
        directory: EmployeeDirectory,
    ) -> Self {
        let normalized = records
            .iter()
            .map(|(id, record)| normalize(id, record, kind, &directory))
            .collect();
        let Filtered { mut rows, dropped } = retain_complete(normalized, kind);
        if kind.newest_first() {
            rows.reverse();
        }

        tracing::info!(
            ?kind,
            shown = rows.len(),
            dropped,
            employees = directory.len(),
            "appointment view refreshed"
        );

        Self {
            kind,
            rows,
            directory,
            dropped,
            warnings: Vec::new(),
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    /// Take the row out of the list. Returns whether it was present.
    pub fn remove(&mut self, appt_id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.appt_id != appt_id);
        self.rows.len() != before
    }

    pub fn prepend(&mut self, row: DisplayRow) {
        self.rows.insert(0, row);
    }

    pub fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Removed { appt_id } => {
                if !self.remove(appt_id) {
                    tracing::debug!(kind = ?self.kind, appt_id = %appt_id, "row was not on screen");
                }
            }
            Effect::Prepended(row) => {
                self.remove(&row.appt_id);
                self.prepend(row.clone());
            }
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view: self.kind,
            rows: self.rows.clone(),
            dropped: self.dropped,
            warnings: self.warnings.clone(),
            loaded_at: self.loaded_at,
        }
    }
}

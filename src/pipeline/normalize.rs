use serde::Serialize;

use super::{
    format::{date_time, to_hours_minutes},
    status::{status_color, Stage},
};
use crate::models::{AppointmentRecord, EmployeeDirectory};

pub const CHECK_IN_LABEL: &str = "Check in";
pub const CHECKED_IN_LABEL: &str = "Checked in";

/// One appointment list screen. Each view renders a single stage's
/// collection, except `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    Pending,
    Confirmed,
    CheckedIn,
    Paid,
    All,
}

/// Which worker field must be filled for a row to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerRule {
    /// The raw employee id is present (name may still be unresolved).
    Id,
    /// The id resolved to a non-empty name in the directory.
    ResolvedName,
}

impl ViewKind {
    #[cfg(test)]
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Pending,
        ViewKind::Confirmed,
        ViewKind::CheckedIn,
        ViewKind::Paid,
        ViewKind::All,
    ];

    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "pending" => Some(ViewKind::Pending),
            "confirmed" => Some(ViewKind::Confirmed),
            "checked-in" | "checkedIn" | "checkedin" => Some(ViewKind::CheckedIn),
            "paid" => Some(ViewKind::Paid),
            "all" => Some(ViewKind::All),
            _ => None,
        }
    }

    /// The stage whose rows this view lists; `All` mixes stages.
    pub fn stage(self) -> Option<Stage> {
        match self {
            ViewKind::Pending => Some(Stage::Pending),
            ViewKind::Confirmed => Some(Stage::Confirmed),
            ViewKind::CheckedIn => Some(Stage::CheckedIn),
            ViewKind::Paid => Some(Stage::Paid),
            ViewKind::All => None,
        }
    }

    pub fn worker_rule(self) -> WorkerRule {
        match self {
            ViewKind::All => WorkerRule::ResolvedName,
            _ => WorkerRule::Id,
        }
    }

    /// Confirmed appointments are listed newest first.
    pub fn newest_first(self) -> bool {
        self == ViewKind::Confirmed
    }

    fn worker_id(self, record: &AppointmentRecord) -> &str {
        match self {
            ViewKind::Pending => &record.pref_employee,
            _ => &record.assigned_employee,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeOption {
    pub id: String,
    pub name: String,
}

/// Per-view column that differs between the appointment screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StageDetail {
    Pending { assign_options: Vec<EmployeeOption> },
    Confirmed { check_in: String },
    CheckedIn { payment: f64 },
    Paid { payment: String },
    All { status: String, color: &'static str },
}

/// Display-ready appointment row. Built fresh on every refresh, never stored
/// back to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub appt_id: String,
    pub service_name: Vec<String>,
    pub client_name: String,
    pub contact: String,
    pub date_time: String,
    pub worker_id: String,
    pub worker_assigned: String,
    pub duration: String,
    #[serde(flatten)]
    pub detail: StageDetail,
}

/// Map one raw record into the row shape of `kind`. Total: missing fields
/// become empty values, unknown employees become empty names.
pub fn normalize(
    appt_id: &str,
    record: &AppointmentRecord,
    kind: ViewKind,
    directory: &EmployeeDirectory,
) -> DisplayRow {
    let worker_id = kind.worker_id(record).to_string();
    let worker_assigned = directory.name_of(&worker_id).to_string();

    let detail = match kind {
        ViewKind::Pending => StageDetail::Pending {
            assign_options: record
                .available_employees
                .iter()
                .map(|id| EmployeeOption {
                    id: id.clone(),
                    name: directory.name_of(id).to_string(),
                })
                .collect(),
        },
        ViewKind::Confirmed => StageDetail::Confirmed {
            check_in: CHECK_IN_LABEL.to_string(),
        },
        ViewKind::CheckedIn => StageDetail::CheckedIn {
            payment: record.total_bill,
        },
        ViewKind::Paid => StageDetail::Paid {
            payment: record.payment_method.clone(),
        },
        ViewKind::All => StageDetail::All {
            status: record.status.clone(),
            color: status_color(&record.status),
        },
    };

    DisplayRow {
        appt_id: appt_id.to_string(),
        service_name: record.services.clone(),
        client_name: record.name.clone(),
        contact: record.phone.clone(),
        date_time: date_time(&record.date, &record.time),
        worker_id,
        worker_assigned,
        duration: to_hours_minutes(record.duration),
        detail,
    }
}

/// Row for an appointment checked in by id from the front desk.
pub fn manual_check_in_row(
    appt_id: &str,
    record: &AppointmentRecord,
    directory: &EmployeeDirectory,
) -> DisplayRow {
    DisplayRow {
        detail: StageDetail::Confirmed {
            check_in: CHECKED_IN_LABEL.to_string(),
        },
        ..normalize(appt_id, record, ViewKind::Confirmed, directory)
    }
}

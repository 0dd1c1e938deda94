use serde::Serialize;

use crate::models::{ClientRecord, EmployeeCard, EmployeeDirectory};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub pincode: String,
}

fn gender_label(code: &str) -> &'static str {
    match code.trim() {
        "M" | "m" => "Male",
        "F" | "f" => "Female",
        _ => "",
    }
}

pub fn client_row(record: &ClientRecord) -> ClientRow {
    ClientRow {
        name: record.name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        gender: gender_label(&record.gender).to_string(),
        pincode: record.pincode.clone(),
    }
}

/// Client directory rows; a client is listed only when every column is filled.
pub fn client_rows(records: &[(String, ClientRecord)]) -> Vec<ClientRow> {
    let rows: Vec<ClientRow> = records
        .iter()
        .map(|(_, record)| client_row(record))
        .filter(|c| {
            !c.name.is_empty()
                && !c.email.is_empty()
                && !c.phone.is_empty()
                && !c.gender.is_empty()
                && !c.pincode.is_empty()
        })
        .collect();

    let dropped = records.len() - rows.len();
    if dropped > 0 {
        tracing::warn!(dropped, total = records.len(), "incomplete clients hidden from directory");
    }
    rows
}

/// Profiles for the employees the backend offered for a slot, skipping any
/// without a name, designation or phone.
pub fn available_workers(ids: &[String], directory: &EmployeeDirectory) -> Vec<EmployeeCard> {
    ids.iter()
        .map(|id| directory.card(id))
        .filter(|e| !e.name.is_empty() && !e.designation.is_empty() && !e.phone.is_empty())
        .collect()
}

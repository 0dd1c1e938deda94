use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::{
    backend::BookingBackend,
    pipeline::{normalize::ViewKind, view::AppointmentView},
};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BookingBackend>,
    /// One mounted view per appointment list; replaced on every refresh.
    pub views: Arc<Mutex<HashMap<ViewKind, AppointmentView>>>,
}

impl AppState {
    pub fn new(backend: Arc<dyn BookingBackend>) -> Self {
        Self {
            backend,
            views: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

/* -------------------------
   Backend wire records
--------------------------*/

/// Raw appointment as the booking backend stores it. Every field is
/// optional on the wire; absent or oddly typed values decode to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub services: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    /// `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    /// `HH:MM`, 24h
    #[serde(default, deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient::minutes")]
    pub duration: u32,
    #[serde(default, deserialize_with = "lenient::text")]
    pub assigned_employee: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pref_employee: String,
    #[serde(default, rename = "available_employees", deserialize_with = "lenient::text_list")]
    pub available_employees: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_bill: f64,
    #[serde(default, rename = "pymntMethod", deserialize_with = "lenient::text")]
    pub payment_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub designation: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub img_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pincode: String,
}

/// Summary counters behind the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub todays_booking: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub weekly_booking: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub all_sales: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub weekly_sales: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub pending_amount: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub confirmed_sales: f64,
    #[serde(default, rename = "checkedIn_sales", deserialize_with = "lenient::amount")]
    pub checked_in_sales: f64,
    #[serde(default, deserialize_with = "lenient::object")]
    pub items_overview: Map<String, Value>,
    #[serde(default, rename = "weeklyRecord")]
    pub weekly_record: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInPreview {
    pub client_name: String,
    pub assigned_employee: String,
}

/// Booking form submitted from the front desk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingRequest {
    pub name: String,
    pub phone: String,
    pub date: NaiveDate,
    /// Slot as picked in the form, e.g. `"2:30 PM"`.
    pub time: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bookings for one day: time slot → employee id → service id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaySchedule {
    pub slots: HashMap<String, HashMap<String, String>>,
}

impl DaySchedule {
    pub fn from_value(body: &Value) -> Self {
        let mut slots = HashMap::new();
        if let Value::Object(map) = body {
            for (slot, bookings) in map {
                let Value::Object(bookings) = bookings else {
                    continue;
                };
                let by_employee = bookings
                    .iter()
                    .map(|(employee, service)| (employee.clone(), lenient::as_text(service)))
                    .filter(|(_, service)| !service.is_empty())
                    .collect::<HashMap<_, _>>();
                slots.insert(slot.clone(), by_employee);
            }
        }
        Self { slots }
    }

    pub fn service_at(&self, slot: &str, employee_id: &str) -> Option<&str> {
        self.slots
            .get(slot)
            .and_then(|m| m.get(employee_id))
            .map(String::as_str)
    }
}

/* -------------------------
   Employee directory
--------------------------*/

/// Employee id → profile, in the order the backend listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeDirectory {
    entries: Vec<(String, EmployeeProfile)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCard {
    pub id: String,
    pub name: String,
    pub designation: String,
    pub phone: String,
    pub img_url: String,
}

impl EmployeeDirectory {
    pub fn from_entries(entries: Vec<(String, EmployeeProfile)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&EmployeeProfile> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, p)| p)
    }

    /// Display name for an id. Unknown ids (or an unloaded directory) give `""`.
    pub fn name_of(&self, id: &str) -> &str {
        self.get(id).map(|p| p.name.as_str()).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmployeeProfile)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn card(&self, id: &str) -> EmployeeCard {
        let profile = self.get(id).cloned().unwrap_or_default();
        EmployeeCard {
            id: id.to_string(),
            name: profile.name,
            designation: profile.designation,
            phone: profile.phone,
            img_url: profile.img_url,
        }
    }

    pub fn cards(&self) -> Vec<EmployeeCard> {
        self.entries.iter().map(|(id, _)| self.card(id)).collect()
    }
}

/* -------------------------
   Helpers
--------------------------*/

/// Keys the backend mixes into keyed collections as status flags.
/// `sucess` is how several endpoints spell it.
pub const SUCCESS_KEYS: [&str; 2] = ["success", "sucess"];

/// True when the payload carries a truthy success flag.
pub fn reports_success(body: &Value) -> bool {
    SUCCESS_KEYS.iter().any(|k| match body.get(*k) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Split a backend object keyed by id into `(id, record)` pairs, keeping
/// backend order. Status flags are skipped; null or non-object entries are
/// logged and skipped.
pub fn keyed_entries<T: DeserializeOwned>(body: Value, what: &str) -> Vec<(String, T)> {
    let Value::Object(map) = body else {
        tracing::warn!(what, "expected a keyed object, got something else");
        return Vec::new();
    };

    map.into_iter()
        .filter(|(key, _)| !SUCCESS_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            if value.is_null() {
                tracing::warn!(what, key = %key, "entry is null, skipping");
                return None;
            }
            match serde_json::from_value::<T>(value) {
                Ok(record) => Some((key, record)),
                Err(e) => {
                    tracing::warn!(what, key = %key, error = %e, "entry is not a record, skipping");
                    None
                }
            }
        })
        .collect()
}

/// Field decoders that coerce instead of failing.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    pub fn as_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(as_text(&Value::deserialize(d)?))
    }

    pub fn text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .iter()
                .map(as_text)
                .filter(|s| !s.is_empty())
                .collect(),
            Value::String(s) if !s.is_empty() => vec![s],
            _ => Vec::new(),
        })
    }

    pub fn minutes<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = Value::deserialize(d)?;
        let minutes = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(minutes
            .filter(|m| m.is_finite() && *m > 0.0)
            .map(|m| m.min(u32::MAX as f64) as u32)
            .unwrap_or(0))
    }

    pub fn object<'de, D: Deserializer<'de>>(d: D) -> Result<Map<String, Value>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => map,
            _ => Map::new(),
        })
    }

    pub fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(d)?;
        let amount = match &value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(amount.filter(|a| a.is_finite()).unwrap_or(0.0))
    }
}

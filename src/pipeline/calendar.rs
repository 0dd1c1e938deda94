//! Day view: one column per employee, one row per half-hour slot.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use super::format::to_12_hour;
use crate::models::{DaySchedule, EmployeeDirectory};

pub const DEFAULT_SERVICE_STYLE: &str = "default-service";

const FIRST_SLOT: (u32, u32) = (9, 0);
const LAST_SLOT: (u32, u32) = (20, 30);
const SLOT_MINUTES: i64 = 30;

/// Service ids the salon offers, with the style key the calendar shows.
const SERVICE_CATALOG: [(&str, &str); 5] = [
    ("1721372236692ch786543", "hair-colouring"),
    ("1721372178803ch786543", "beard-grooming"),
    ("1721294571091Da786543", "blow-dry"),
    ("1721298452876Dh786543", "balinese-massage"),
    ("1721372872117hu786543", "hair-cut"),
];

pub fn service_name(service_id: &str) -> Option<&'static str> {
    SERVICE_CATALOG
        .iter()
        .find(|(id, _)| *id == service_id)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlot {
    /// `HH:MM` as the backend keys it.
    pub time: String,
    pub label: String,
}

/// `09:00`, `09:30`, … `20:30`.
pub fn time_slots() -> Vec<TimeSlot> {
    let (Some(first), Some(last)) = (
        NaiveTime::from_hms_opt(FIRST_SLOT.0, FIRST_SLOT.1, 0),
        NaiveTime::from_hms_opt(LAST_SLOT.0, LAST_SLOT.1, 0),
    ) else {
        return Vec::new();
    };

    let mut slots = Vec::new();
    let mut at = first;
    while at <= last {
        let time = at.format("%H:%M").to_string();
        slots.push(TimeSlot {
            label: to_12_hour(&time),
            time,
        });
        at += Duration::minutes(SLOT_MINUTES);
    }
    slots
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub slot: String,
    pub label: String,
    pub service_id: String,
    /// Catalog name, empty when the id is not in the catalog.
    pub service: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeColumn {
    pub employee_id: String,
    pub name: String,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGrid {
    pub date: NaiveDate,
    pub previous: Option<NaiveDate>,
    pub next: Option<NaiveDate>,
    pub slots: Vec<TimeSlot>,
    pub columns: Vec<EmployeeColumn>,
}

pub fn day_grid(date: NaiveDate, directory: &EmployeeDirectory, schedule: &DaySchedule) -> DayGrid {
    let slots = time_slots();

    let columns = directory
        .iter()
        .map(|(employee_id, profile)| EmployeeColumn {
            employee_id: employee_id.to_string(),
            name: profile.name.clone(),
            bookings: slots
                .iter()
                .filter_map(|slot| {
                    let service_id = schedule.service_at(&slot.time, employee_id)?;
                    let service = service_name(service_id);
                    Some(Booking {
                        slot: slot.time.clone(),
                        label: slot.label.clone(),
                        service_id: service_id.to_string(),
                        service: service.unwrap_or_default().to_string(),
                        style: service.unwrap_or(DEFAULT_SERVICE_STYLE).to_string(),
                    })
                })
                .collect(),
        })
        .collect();

    DayGrid {
        date,
        previous: date.pred_opt(),
        next: date.succ_opt(),
        slots,
        columns,
    }
}

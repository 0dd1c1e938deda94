use super::normalize::{DisplayRow, ViewKind, WorkerRule};

/// What `" - "` (no date, no time) trims down to.
pub const EMPTY_DATE_TIME: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    ClientName,
    Contact,
    DateTime,
    Worker,
}

/// The first required field that `row` lacks for `kind`, if any.
pub fn missing_field(row: &DisplayRow, kind: ViewKind) -> Option<MissingField> {
    if row.client_name.is_empty() {
        return Some(MissingField::ClientName);
    }
    if row.contact.is_empty() {
        return Some(MissingField::Contact);
    }
    if row.date_time.trim() == EMPTY_DATE_TIME {
        return Some(MissingField::DateTime);
    }
    let worker = match kind.worker_rule() {
        WorkerRule::Id => &row.worker_id,
        WorkerRule::ResolvedName => &row.worker_assigned,
    };
    if worker.is_empty() {
        return Some(MissingField::Worker);
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub rows: Vec<DisplayRow>,
    pub dropped: usize,
}

/// Keep complete rows in order. Incomplete ones are counted and logged.
pub fn retain_complete(rows: Vec<DisplayRow>, kind: ViewKind) -> Filtered {
    let total = rows.len();
    let mut kept = Vec::with_capacity(total);

    for row in rows {
        match missing_field(&row, kind) {
            None => kept.push(row),
            Some(field) => {
                tracing::debug!(appt_id = %row.appt_id, ?field, ?kind, "dropping incomplete appointment");
            }
        }
    }

    let dropped = total - kept.len();
    if dropped > 0 {
        tracing::warn!(?kind, dropped, total, "incomplete appointments hidden from view");
    }

    Filtered {
        rows: kept,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::StageDetail;
    use rstest::{fixture, rstest};

    #[fixture]
    fn complete() -> DisplayRow {
        DisplayRow {
            appt_id: "A1".into(),
            service_name: vec!["hair-cut".into()],
            client_name: "Asha".into(),
            contact: "9998887771".into(),
            date_time: "2024-05-01 - 2:30 PM".into(),
            worker_id: "E1".into(),
            worker_assigned: "Raj".into(),
            duration: "1h 30m".into(),
            detail: StageDetail::Confirmed {
                check_in: "Check in".into(),
            },
        }
    }

    #[rstest]
    fn complete_row_is_kept_in_every_view(complete: DisplayRow) {
        for kind in ViewKind::ALL {
            assert_eq!(missing_field(&complete, kind), None, "{kind:?}");
        }
    }

    #[rstest]
    fn empty_contact_is_always_excluded(complete: DisplayRow) {
        let row = DisplayRow {
            contact: String::new(),
            ..complete
        };
        for kind in ViewKind::ALL {
            assert_eq!(missing_field(&row, kind), Some(MissingField::Contact));
        }
    }

    #[rstest]
    #[case(" - ", Some(MissingField::DateTime))]
    #[case("-", Some(MissingField::DateTime))]
    #[case("2024-05-01 - ", None)]
    #[case(" - 2:30 PM", None)]
    fn date_time_sentinel(
        complete: DisplayRow,
        #[case] date_time: &str,
        #[case] expected: Option<MissingField>,
    ) {
        let row = DisplayRow {
            date_time: date_time.into(),
            ..complete
        };
        assert_eq!(missing_field(&row, ViewKind::Paid), expected);
    }

    #[rstest]
    fn all_view_needs_a_resolved_name(complete: DisplayRow) {
        let unresolved = DisplayRow {
            worker_assigned: String::new(),
            ..complete
        };

        assert_eq!(missing_field(&unresolved, ViewKind::Confirmed), None);
        assert_eq!(
            missing_field(&unresolved, ViewKind::All),
            Some(MissingField::Worker)
        );
    }

    #[rstest]
    fn missing_worker_id_is_excluded(complete: DisplayRow) {
        let row = DisplayRow {
            worker_id: String::new(),
            ..complete
        };
        assert_eq!(missing_field(&row, ViewKind::CheckedIn), Some(MissingField::Worker));
    }

    #[rstest]
    fn retain_complete_is_an_ordered_subset(complete: DisplayRow) {
        let rows = vec![
            DisplayRow { appt_id: "A1".into(), ..complete.clone() },
            DisplayRow { appt_id: "A2".into(), client_name: String::new(), ..complete.clone() },
            DisplayRow { appt_id: "A3".into(), ..complete.clone() },
            DisplayRow { appt_id: "A4".into(), contact: String::new(), ..complete },
        ];

        let filtered = retain_complete(rows.clone(), ViewKind::Confirmed);
        let ids: Vec<&str> = filtered.rows.iter().map(|r| r.appt_id.as_str()).collect();

        assert_eq!(ids, vec!["A1", "A3"]);
        assert_eq!(filtered.dropped, 2);
        assert!(filtered.rows.iter().all(|r| rows.contains(r)));
    }
}

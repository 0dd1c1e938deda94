use super::{
    filter::missing_field,
    normalize::{manual_check_in_row, DisplayRow, ViewKind},
    status::Stage,
};
use crate::{backend::BookingBackend, models::EmployeeDirectory};

/// A state change requested from one of the appointment lists.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Cancel { appt_id: String },
    Assign { appt_id: String, employee_id: String },
    CheckIn { appt_id: String },
    /// Check-in by id typed at the front desk; the row is added, not removed.
    ManualCheckIn { appt_id: String },
    ConfirmPayment { appt_id: String, payment_method: String },
}

impl Mutation {
    pub fn appt_id(&self) -> &str {
        match self {
            Mutation::Cancel { appt_id }
            | Mutation::Assign { appt_id, .. }
            | Mutation::CheckIn { appt_id }
            | Mutation::ManualCheckIn { appt_id }
            | Mutation::ConfirmPayment { appt_id, .. } => appt_id,
        }
    }

    /// The list this mutation is issued from.
    pub fn view(&self) -> ViewKind {
        match self {
            Mutation::Cancel { .. } | Mutation::Assign { .. } => ViewKind::Pending,
            Mutation::CheckIn { .. } | Mutation::ManualCheckIn { .. } => ViewKind::Confirmed,
            Mutation::ConfirmPayment { .. } => ViewKind::CheckedIn,
        }
    }

    pub fn transition(&self) -> (Stage, Stage) {
        match self {
            Mutation::Cancel { .. } => (Stage::Pending, Stage::Cancelled),
            Mutation::Assign { .. } => (Stage::Pending, Stage::Confirmed),
            Mutation::CheckIn { .. } | Mutation::ManualCheckIn { .. } => {
                (Stage::Confirmed, Stage::CheckedIn)
            }
            Mutation::ConfirmPayment { .. } => (Stage::CheckedIn, Stage::Paid),
        }
    }

    fn validate(&self, kind: ViewKind) -> Result<(), String> {
        let (from, to) = self.transition();
        if kind.stage() != Some(from) || !from.can_transition_to(to) {
            return Err(format!(
                "{} -> {} is not allowed from the {kind:?} view",
                from.as_str(),
                to.as_str()
            ));
        }
        if self.appt_id().trim().is_empty() {
            return Err("appointment id is required".into());
        }
        match self {
            Mutation::Assign { employee_id, .. } if employee_id.trim().is_empty() => {
                Err("employee id is required".into())
            }
            Mutation::ConfirmPayment { payment_method, .. } if payment_method.trim().is_empty() => {
                Err("payment method is required".into())
            }
            _ => Ok(()),
        }
    }
}

/// How a successful mutation changes the list on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Removed { appt_id: String },
    Prepended(DisplayRow),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Applied(Effect),
    /// Refused locally; nothing was sent.
    Rejected(String),
    /// The backend call failed; the list is left as it was.
    Failed(String),
}

pub struct MutationDispatcher<'a> {
    backend: &'a dyn BookingBackend,
}

impl<'a> MutationDispatcher<'a> {
    pub fn new(backend: &'a dyn BookingBackend) -> Self {
        Self { backend }
    }

    /// Validate and send `mutation`. Never fails; errors come back as
    /// `Rejected` or `Failed`. `directory` resolves names for added rows.
    pub async fn execute(
        &self,
        kind: ViewKind,
        mutation: &Mutation,
        directory: &EmployeeDirectory,
    ) -> MutationOutcome {
        if let Err(reason) = mutation.validate(kind) {
            tracing::warn!(?mutation, %reason, "mutation rejected");
            return MutationOutcome::Rejected(reason);
        }

        let appt_id = mutation.appt_id();
        let sent = match mutation {
            Mutation::Cancel { .. } => self.backend.cancel_appointment(appt_id).await.map(|_| None),
            Mutation::Assign { employee_id, .. } => self
                .backend
                .assign_employee(appt_id, employee_id)
                .await
                .map(|_| None),
            Mutation::CheckIn { .. } => self.backend.check_in(appt_id).await.map(|_| None),
            Mutation::ManualCheckIn { .. } => self.backend.check_in(appt_id).await.map(Some),
            Mutation::ConfirmPayment { payment_method, .. } => self
                .backend
                .confirm_payment(appt_id, payment_method)
                .await
                .map(|_| None),
        };

        match sent {
            Ok(None) => {
                tracing::info!(?mutation, "mutation applied");
                MutationOutcome::Applied(Effect::Removed {
                    appt_id: appt_id.to_string(),
                })
            }
            Ok(Some(record)) => {
                let row = manual_check_in_row(appt_id, &record, directory);
                if let Some(field) = missing_field(&row, ViewKind::Confirmed) {
                    // the check-in went through; only the row is withheld
                    tracing::warn!(?mutation, ?field, "checked-in record is incomplete, not listing it");
                    return MutationOutcome::Applied(Effect::Removed {
                        appt_id: appt_id.to_string(),
                    });
                }
                tracing::info!(?mutation, "manual check-in applied");
                MutationOutcome::Applied(Effect::Prepended(row))
            }
            Err(e) => {
                tracing::error!(?mutation, error = %e, "mutation failed, list left unchanged");
                MutationOutcome::Failed(e.to_string())
            }
        }
    }
}

use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#000";

/// Lifecycle stage of an appointment as the backend reports it.
///
/// `Pending → Confirmed → CheckedIn → Paid`, and `Pending → Cancelled`.
/// Transitions happen on the backend; the dashboard only checks that a
/// requested mutation is one of these edges before sending it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Pending,
    Confirmed,
    CheckedIn,
    Paid,
    Cancelled,
}

impl Stage {
    pub fn parse(status: &str) -> Option<Self> {
        match status.trim() {
            "pending" => Some(Stage::Pending),
            "confirmed" => Some(Stage::Confirmed),
            "checkedIn" => Some(Stage::CheckedIn),
            "paid" => Some(Stage::Paid),
            "cancelled" => Some(Stage::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Pending => "pending",
            Stage::Confirmed => "confirmed",
            Stage::CheckedIn => "checkedIn",
            Stage::Paid => "paid",
            Stage::Cancelled => "cancelled",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Stage::Pending => "#FF6F6F",
            Stage::Confirmed => "#75ABFB",
            Stage::CheckedIn => "#D3DE51",
            Stage::Paid => "#16A458",
            Stage::Cancelled => DEFAULT_COLOR,
        }
    }

    pub fn can_transition_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Pending, Stage::Confirmed)
                | (Stage::Pending, Stage::Cancelled)
                | (Stage::Confirmed, Stage::CheckedIn)
                | (Stage::CheckedIn, Stage::Paid)
        )
    }
}

/// Display color for a raw status string; unknown statuses get [`DEFAULT_COLOR`].
pub fn status_color(status: &str) -> &'static str {
    Stage::parse(status).map(Stage::color).unwrap_or(DEFAULT_COLOR)
}

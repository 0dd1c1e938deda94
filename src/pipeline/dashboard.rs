use serde::Serialize;
use serde_json::Value;

use crate::models::{lenient, DashboardSummary};

/// Colors cycled across the per-service sales list.
const SERVICE_PALETTE: [&str; 6] = ["#8280FF", "#FEC53D", "#4AD991", "#A6B5FF", "#FF9066", "#75ABFB"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCard {
    pub title: &'static str,
    pub count: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceSales {
    pub service: String,
    pub amount: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub panels: Vec<Panel>,
    pub stages: Vec<StageCard>,
    pub services: Vec<ServiceSales>,
    pub weekly_record: Value,
}

pub fn dashboard(summary: &DashboardSummary) -> Dashboard {
    let panels = vec![
        Panel { title: "Today Booking", value: summary.todays_booking },
        Panel { title: "Week Booking", value: summary.weekly_booking },
        Panel { title: "Total Sales", value: summary.all_sales },
        Panel { title: "Weekly Sales", value: summary.weekly_sales },
    ];

    let stages = vec![
        StageCard { title: "Pending Appointment", count: summary.pending_amount, color: "#8280FF" },
        StageCard { title: "Confirmed Appointment", count: summary.confirmed_sales, color: "#FEC53D" },
        StageCard { title: "Checkin Appointment", count: summary.checked_in_sales, color: "#4AD991" },
        StageCard { title: "Paid Appointment", count: summary.all_sales, color: "#A6B5FF" },
    ];

    let services = summary
        .items_overview
        .iter()
        .zip(SERVICE_PALETTE.iter().cycle())
        .map(|((service, amount), color)| ServiceSales {
            service: service.clone(),
            amount: lenient::as_text(amount).trim().parse().unwrap_or(0.0),
            color: *color,
        })
        .collect();

    Dashboard {
        panels,
        stages,
        services,
        weekly_record: summary.weekly_record.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn summary_fills_panels_and_stage_cards() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "success": true,
            "todays_booking": 4,
            "weekly_booking": "21",
            "all_sales": 12000,
            "weekly_sales": 3100.5,
            "confirmed_sales": 7,
            "items_overview": {"hair-cut": 1500, "blow-dry": "800", "beard-grooming": null},
            "weeklyRecord": {"mon": 3}
        }))
        .unwrap();

        let view = dashboard(&summary);

        let values: Vec<f64> = view.panels.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![4.0, 21.0, 12000.0, 3100.5]);

        // missing counters read as zero
        assert_eq!(view.stages[0].count, 0.0);
        assert_eq!(view.stages[1].count, 7.0);
        assert_eq!(view.stages[2].color, "#4AD991");

        assert_eq!(
            view.services,
            vec![
                ServiceSales { service: "hair-cut".into(), amount: 1500.0, color: "#8280FF" },
                ServiceSales { service: "blow-dry".into(), amount: 800.0, color: "#FEC53D" },
                ServiceSales { service: "beard-grooming".into(), amount: 0.0, color: "#4AD991" },
            ]
        );
        assert_eq!(view.weekly_record, json!({"mon": 3}));
    }
}

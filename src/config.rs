use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub backend_timeout_secs: u64,
    pub endpoints: Endpoints,
}

/// Absolute URLs of every booking-backend call the dashboard makes.
#[derive(Clone, Debug)]
pub struct Endpoints {
    pub pending_appointments: String,
    pub confirmed_appointments: String,
    pub checked_in_appointments: String,
    pub paid_appointments: String,
    pub all_appointments: String,
    pub employees: String,
    pub cancel_appointment: String,
    pub assign_appointment: String,
    pub check_in: String,
    pub check_in_info: String,
    pub confirm_payment: String,
    pub clients: String,
    pub client_info: String,
    pub calendar: String,
    pub available_employees: String,
    pub create_appointment: String,
    pub dashboard: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let base_url =
            env::var("BACKEND_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
        let backend_timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(15);

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            anyhow::bail!("BACKEND_BASE_URL must be an http(s) URL, got {base_url}");
        }

        Ok(Self {
            bind_addr,
            backend_timeout_secs,
            endpoints: Endpoints::from_env(&base_url),
        })
    }
}

impl Endpoints {
    /// Every endpoint defaults to a path under `base_url` and can be
    /// overridden with its own absolute URL.
    pub fn from_env(base_url: &str) -> Self {
        Self::resolve(base_url, |key| env::var(key).ok())
    }

    fn resolve(base_url: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = base_url.trim_end_matches('/');
        let pick = |key: &str, path: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| format!("{base}{path}"))
        };

        Self {
            pending_appointments: pick("API_PENDING_APPOINTMENTS", "/appointments/pending"),
            confirmed_appointments: pick("API_CONFIRMED_APPOINTMENTS", "/appointments/confirmed"),
            checked_in_appointments: pick("API_CHECKED_IN_APPOINTMENTS", "/appointments/checkedin"),
            paid_appointments: pick("API_PAID_APPOINTMENTS", "/appointments/paid"),
            all_appointments: pick("API_ALL_APPOINTMENTS", "/appointments/all"),
            employees: pick("API_EMPLOYEES", "/employees"),
            cancel_appointment: pick("API_CANCEL_APPOINTMENT", "/appointments/delete"),
            assign_appointment: pick("API_ASSIGN_APPOINTMENT", "/appointments/assign"),
            check_in: pick("API_CHECK_IN", "/appointments/checkin"),
            check_in_info: pick("API_CHECK_IN_INFO", "/appointments/checkin/info"),
            confirm_payment: pick("API_CONFIRM_PAYMENT", "/appointments/pay"),
            clients: pick("API_CLIENTS", "/clients"),
            client_info: pick("API_CLIENT_INFO", "/clients/info"),
            calendar: pick("API_CALENDAR", "/calendar/slots"),
            available_employees: pick("API_AVAILABLE_EMPLOYEES", "/employees/available"),
            create_appointment: pick("API_CREATE_APPOINTMENT", "/appointments/create"),
            dashboard: pick("API_DASHBOARD", "/dashboard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn endpoints_default_under_base_url() {
        let endpoints = Endpoints::resolve("http://booking.local/", |_| None);

        assert_eq!(endpoints.pending_appointments, "http://booking.local/appointments/pending");
        assert_eq!(endpoints.dashboard, "http://booking.local/dashboard");
    }

    #[test]
    fn explicit_endpoint_overrides_base_url() {
        let overrides = HashMap::from([
            ("API_EMPLOYEES", "https://staff.example/api/all"),
            ("API_CHECK_IN", "   "),
        ]);
        let endpoints =
            Endpoints::resolve("http://booking.local", |k| overrides.get(k).map(|v| v.to_string()));

        assert_eq!(endpoints.employees, "https://staff.example/api/all");
        // blank overrides fall back to the default path
        assert_eq!(endpoints.check_in, "http://booking.local/appointments/checkin");
    }
}

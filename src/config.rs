use std::env;

use chrono::{FixedOffset, Local};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub booking_api_url: String,
    pub booking_api_token: Option<String>,
    pub local_storage_path: String,
    pub request_timeout_secs: u64,
    pub display_utc_offset_minutes: Option<i32>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            booking_api_url: env::var("BOOKING_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            booking_api_token: env::var("BOOKING_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "chargehive.db".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            display_utc_offset_minutes: env::var("DISPLAY_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Offset slot times are rendered in. Falls back to the machine's local
    /// offset when unset or out of range.
    pub fn display_offset(&self) -> FixedOffset {
        self.display_utc_offset_minutes
            .and_then(|m| m.checked_mul(60))
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| *Local::now().offset())
    }
}

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;

use super::BookingApi;
use crate::errors::AppError;
use crate::models::{RawBooking, UserId};

pub struct HttpBookingApi {
    base_url: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpBookingApi {
    pub fn new(
        base_url: String,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("invalid booking API URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "booking API URL cannot take a path: {base_url}"
            )));
        }

        Ok(Self {
            base_url,
            token,
            client,
        })
    }

    fn bookings_url(&self, user_id: &UserId) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`, the base always accepts path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "bookings", "user"])
                .push(user_id.as_str());
        }
        url
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn get_bookings_for_user(&self, user_id: &UserId) -> anyhow::Result<Vec<RawBooking>> {
        let mut req = self.client.get(self.bookings_url(user_id));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.context("failed to call booking API")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Api(format!("{status}: {body}")).into());
        }

        // the API answers `null` for users it has never seen
        let bookings: Option<Vec<RawBooking>> = resp
            .json()
            .await
            .context("failed to parse booking API response")?;

        Ok(bookings.unwrap_or_default())
    }
}

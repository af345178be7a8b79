use crate::domain::model::{BookingInterval, DaySchedule};
use crate::domain::ports::{BookingSource, HoursSource, TokenProvider};
use crate::utils::error::{BoardError, Result};
use crate::utils::logger;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// First (and only relevant) element of the hours payload: a `dates` map
/// keyed by ISO date.
#[derive(Debug, Deserialize)]
struct LocationHours {
    #[serde(default)]
    dates: HashMap<String, DaySchedule>,
}

async fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body = logger::truncated(&body);
    tracing::error!("Upstream {} returned status {}: {}", url, status, body);
    Err(BoardError::UpstreamError {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Hours source backed by the upstream location-hours API.
pub struct HttpHoursSource<T: TokenProvider> {
    client: Client,
    base_url: String,
    location_id: String,
    tokens: Arc<T>,
}

impl<T: TokenProvider> HttpHoursSource<T> {
    pub fn new(client: Client, base_url: String, location_id: String, tokens: Arc<T>) -> Self {
        Self {
            client,
            base_url,
            location_id,
            tokens,
        }
    }
}

#[async_trait]
impl<T: TokenProvider> HoursSource for HttpHoursSource<T> {
    async fn day_schedule(&self, date: NaiveDate) -> Result<Option<DaySchedule>> {
        let url = format!(
            "{}/locations/{}/hours",
            self.base_url.trim_end_matches('/'),
            self.location_id
        );
        let token = self.tokens.bearer_token().await?;

        tracing::debug!("Fetching hours from {} for {}", url, date);
        let response = self
            .client
            .get(&url)
            .query(&[("date", date.to_string())])
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(response, &url).await?;

        let mut payload: Vec<LocationHours> = response.json().await?;
        if payload.is_empty() {
            return Ok(None);
        }
        Ok(payload.remove(0).dates.remove(&date.to_string()))
    }
}

/// Booking source backed by the upstream resource-bookings API.
pub struct HttpBookingSource<T: TokenProvider> {
    client: Client,
    base_url: String,
    resource_id: String,
    tokens: Arc<T>,
}

impl<T: TokenProvider> HttpBookingSource<T> {
    pub fn new(client: Client, base_url: String, resource_id: String, tokens: Arc<T>) -> Self {
        Self {
            client,
            base_url,
            resource_id,
            tokens,
        }
    }
}

#[async_trait]
impl<T: TokenProvider> BookingSource for HttpBookingSource<T> {
    async fn bookings_for(&self, date: NaiveDate) -> Result<Vec<BookingInterval>> {
        let url = format!(
            "{}/resources/{}/bookings",
            self.base_url.trim_end_matches('/'),
            self.resource_id
        );
        let token = self.tokens.bearer_token().await?;

        tracing::debug!("Fetching bookings from {} for {}", url, date);
        let response = self
            .client
            .get(&url)
            .query(&[("date", date.to_string())])
            .bearer_auth(token)
            .send()
            .await?;
        let response = check_status(response, &url).await?;

        Ok(response.json().await?)
    }
}

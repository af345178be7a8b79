use crate::domain::model::Credential;
use crate::domain::ports::TokenProvider;
use crate::utils::error::{BoardError, Result};
use crate::utils::logger;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Single-slot bearer credential cache over a client-credentials grant.
///
/// The slot is replaced wholesale on refresh, never field-by-field.
/// Overlapping requests may both refresh; the last write wins.
pub struct TokenCache {
    client: Client,
    auth_base_url: String,
    token_paths: Vec<String>,
    client_id: String,
    client_secret: String,
    safety_margin_secs: i64,
    cached: RwLock<Option<Credential>>,
}

impl TokenCache {
    pub fn new(
        client: Client,
        auth_base_url: String,
        token_paths: Vec<String>,
        client_id: String,
        client_secret: String,
        safety_margin_secs: i64,
    ) -> Self {
        Self {
            client,
            auth_base_url,
            token_paths,
            client_id,
            client_secret,
            safety_margin_secs,
            cached: RwLock::new(None),
        }
    }

    /// Request a fresh credential, trying each candidate token path in order
    /// and keeping the last-seen error if every one fails.
    async fn fetch_credential(&self) -> Result<Credential> {
        let mut last_error: Option<BoardError> = None;

        for path in &self.token_paths {
            let url = format!("{}{}", self.auth_base_url.trim_end_matches('/'), path);
            let params = [
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ];

            tracing::debug!("Requesting access token from {}", url);
            match self.client.post(&url).form(&params).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.json::<TokenResponse>().await {
                        Ok(body) => {
                            let lifetime =
                                Duration::seconds(body.expires_in - self.safety_margin_secs);
                            return Ok(Credential {
                                token: body.access_token,
                                expires_at: Utc::now() + lifetime,
                            });
                        }
                        Err(e) => {
                            tracing::warn!("Malformed token response from {}: {}", url, e);
                            last_error = Some(e.into());
                        }
                    }
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    tracing::warn!(
                        "Token endpoint {} returned status {}: {}",
                        url,
                        status,
                        logger::truncated(&body)
                    );
                    last_error = Some(BoardError::UpstreamError {
                        url,
                        status,
                        body: logger::truncated(&body),
                    });
                }
                Err(e) => {
                    tracing::warn!("Token request to {} failed: {}", url, e);
                    last_error = Some(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| BoardError::TokenError {
            message: "no token endpoints configured".to_string(),
        }))
    }
}

#[async_trait]
impl TokenProvider for TokenCache {
    async fn bearer_token(&self) -> Result<String> {
        {
            let cached = self.cached.read().await;
            if let Some(credential) = cached.as_ref() {
                if credential.is_valid_at(Utc::now()) {
                    return Ok(credential.token.clone());
                }
            }
        }

        let fresh = self.fetch_credential().await?;
        let token = fresh.token.clone();
        *self.cached.write().await = Some(fresh);
        Ok(token)
    }
}

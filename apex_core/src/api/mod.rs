pub mod models;

use crate::{
    config::{redact, ExporterConfig, Platform, PlayerSelector},
    error::{ApexError, Result},
    stats::{MapRotation, PlayerStats},
};
use models::{upstream_error, RawMapRotation, RawPlayerStats};
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde_json::Value;
use tracing::debug;

pub const MAP_ROTATION_ENDPOINT: &str = "maprotation";
pub const PLAYER_STATS_ENDPOINT: &str = "bridge";

/// Upper bound on how much of an error body ends up in an error message.
const MAX_ERROR_BODY: usize = 256;

/// Client for the stats API, bound to one player.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    player: PlayerSelector,
    platform: Option<Platform>,
}

impl ApiClient {
    pub fn new(config: &ExporterConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("apex-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            player: config.player.clone(),
            platform: config.platform,
        })
    }

    pub async fn get_map_rotation(&self) -> Result<MapRotation> {
        let value = self.get_json(MAP_ROTATION_ENDPOINT, &[]).await?;
        let raw: RawMapRotation = serde_json::from_value(value)?;
        Ok(raw.into())
    }

    pub async fn get_player_stats(&self) -> Result<PlayerStats> {
        let mut query = vec![self.player.query_pair()];
        if let Some(platform) = &self.platform {
            query.push(("platform", platform.as_str()));
        }

        let value = self.get_json(PLAYER_STATS_ENDPOINT, &query).await?;
        let raw: RawPlayerStats = serde_json::from_value(value)?;
        Ok(raw.into())
    }

    async fn get_json(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, api_key = %redact(&self.api_key), "Collecting from upstream");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        classify_response(status, &body)
    }
}

/// Maps a raw upstream response onto either its JSON document or the
/// matching [`ApexError`].
pub fn classify_response(status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        let message = error_message(body);
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ApexError::Unauthorized(format!("HTTP {}: {}", status.as_u16(), message))
            }
            StatusCode::TOO_MANY_REQUESTS => ApexError::RateLimited(message),
            StatusCode::NOT_FOUND => ApexError::PlayerNotFound(message),
            _ if mentions_missing_player(&message) => ApexError::PlayerNotFound(message),
            _ if mentions_api_key(&message) => {
                ApexError::Unauthorized(format!("HTTP {}: {}", status.as_u16(), message))
            }
            _ => ApexError::UnexpectedStatus {
                status: status.as_u16(),
                body: message,
            },
        });
    }

    let value: Value = serde_json::from_str(body)?;
    if let Some(message) = upstream_error(&value) {
        return Err(if mentions_missing_player(&message) {
            ApexError::PlayerNotFound(message)
        } else if mentions_api_key(&message) {
            ApexError::Unauthorized(message)
        } else {
            ApexError::Upstream(message)
        });
    }

    Ok(value)
}

fn error_message(body: &str) -> String {
    if let Some(message) = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(upstream_error)
    {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

fn mentions_missing_player(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("not found") || lower.contains("never played")
}

fn mentions_api_key(message: &str) -> bool {
    message.to_lowercase().contains("api key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth_failures() {
        let err = classify_response(StatusCode::FORBIDDEN, "Invalid API key").unwrap_err();
        assert!(matches!(err, ApexError::Unauthorized(_)));

        let err = classify_response(StatusCode::OK, r#"{"Error": "Invalid API key"}"#).unwrap_err();
        assert!(matches!(err, ApexError::Unauthorized(_)));
    }

    #[test]
    fn test_classify_missing_player() {
        let err = classify_response(
            StatusCode::BAD_REQUEST,
            r#"{"Error": "Player exists but has never played Apex Legends"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ApexError::PlayerNotFound(_)));

        let err = classify_response(StatusCode::OK, r#"{"Error": "Player not found. Try again?"}"#)
            .unwrap_err();
        assert!(matches!(err, ApexError::PlayerNotFound(_)));
    }

    #[test]
    fn test_classify_other_failures() {
        let err = classify_response(StatusCode::TOO_MANY_REQUESTS, "").unwrap_err();
        assert!(matches!(err, ApexError::RateLimited(_)));

        let long_body = "x".repeat(1000);
        match classify_response(StatusCode::BAD_GATEWAY, &long_body).unwrap_err() {
            ApexError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 502);
                assert!(body.len() < 300);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = classify_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, ApexError::Decode(_)));

        let err = classify_response(StatusCode::OK, r#"{"Error": "Internal error"}"#).unwrap_err();
        assert!(matches!(err, ApexError::Upstream(_)));
    }

    #[test]
    fn test_classify_success() {
        let value = classify_response(StatusCode::OK, r#"{"current": {"map": "Olympus"}}"#).unwrap();
        assert_eq!(value["current"]["map"], "Olympus");
    }
}

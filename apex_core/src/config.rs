use crate::error::{ApexError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.mozambiquehe.re";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How the tracked player is looked up upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSelector {
    Uid(String),
    Name(String),
}

impl PlayerSelector {
    /// Query parameter pair sent to the player endpoint.
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            PlayerSelector::Uid(uid) => ("uid", uid),
            PlayerSelector::Name(name) => ("player_name", name),
        }
    }

    pub fn description(&self) -> String {
        match self {
            PlayerSelector::Uid(uid) => format!("uid {}", uid),
            PlayerSelector::Name(name) => format!("player '{}'", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Pc,
    Ps4,
    X1,
    Switch,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Pc => "PC",
            Platform::Ps4 => "PS4",
            Platform::X1 => "X1",
            Platform::Switch => "SWITCH",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ApexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "PC" => Ok(Platform::Pc),
            "PS4" | "PS5" | "PLAYSTATION" => Ok(Platform::Ps4),
            "X1" | "XBOX" => Ok(Platform::X1),
            "SWITCH" => Ok(Platform::Switch),
            other => Err(ApexError::InvalidConfig(format!(
                "Unknown platform '{}' (expected PC, PS4, X1 or SWITCH)",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct ExporterConfig {
    pub api_key: String,
    pub player: PlayerSelector,
    pub platform: Option<Platform>,
    pub listen_addr: SocketAddr,
    pub poll_interval: Duration,
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("api_key", &redact(&self.api_key))
            .field("player", &self.player)
            .field("platform", &self.platform)
            .field("listen_addr", &self.listen_addr)
            .field("poll_interval", &self.poll_interval)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Keeps the first four characters of a secret for log correlation.
pub fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

impl ExporterConfig {
    pub fn builder() -> ExporterConfigBuilder {
        ExporterConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ApexError::InvalidConfig("API_KEY must be set".to_string()));
        }

        let id = match &self.player {
            PlayerSelector::Uid(id) | PlayerSelector::Name(id) => id,
        };
        if id.trim().is_empty() {
            return Err(ApexError::InvalidConfig(
                "Either USER_ID or PLAYER_NAME must be set".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ApexError::InvalidConfig(
                "Poll interval must be > 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ApexError::InvalidConfig(
                "Request timeout must be > 0".to_string(),
            ));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ApexError::InvalidConfig(format!(
                "API base URL '{}' must start with http:// or https://",
                self.api_base_url
            )));
        }

        Ok(())
    }
}

/// Collects raw, possibly-empty settings (as they come from flags or the
/// environment) and turns them into a validated [`ExporterConfig`].
#[derive(Default)]
pub struct ExporterConfigBuilder {
    api_key: Option<String>,
    user_id: Option<String>,
    player_name: Option<String>,
    platform: Option<String>,
    listen_addr: Option<SocketAddr>,
    poll_interval: Option<Duration>,
    api_base_url: Option<String>,
    request_timeout: Option<Duration>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ExporterConfigBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn user_id(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn player_name(mut self, player_name: Option<String>) -> Self {
        self.player_name = player_name;
        self
    }

    pub fn platform(mut self, platform: Option<String>) -> Self {
        self.platform = platform;
        self
    }

    pub fn listen_addr(mut self, listen_addr: SocketAddr) -> Self {
        self.listen_addr = Some(listen_addr);
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }

    pub fn api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = Some(api_base_url.into());
        self
    }

    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = Some(request_timeout);
        self
    }

    pub fn build(self) -> Result<ExporterConfig> {
        let api_key = non_blank(self.api_key)
            .ok_or_else(|| ApexError::InvalidConfig("API_KEY must be set".to_string()))?;

        let player = match (non_blank(self.user_id), non_blank(self.player_name)) {
            (Some(_), Some(_)) => {
                return Err(ApexError::InvalidConfig(
                    "Both USER_ID and PLAYER_NAME cannot be set".to_string(),
                ))
            }
            (Some(uid), None) => PlayerSelector::Uid(uid),
            (None, Some(name)) => PlayerSelector::Name(name),
            (None, None) => {
                return Err(ApexError::InvalidConfig(
                    "Either USER_ID or PLAYER_NAME must be set".to_string(),
                ))
            }
        };

        let platform = non_blank(self.platform)
            .map(|p| p.parse::<Platform>())
            .transpose()?;

        let listen_addr = match self.listen_addr {
            Some(addr) => addr,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .map_err(|e| ApexError::InvalidConfig(format!("Invalid listen address: {}", e)))?,
        };

        let api_base_url = non_blank(self.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = ExporterConfig {
            api_key,
            player,
            platform,
            listen_addr,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            api_base_url,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        };

        config.validate()?;
        Ok(config)
    }
}

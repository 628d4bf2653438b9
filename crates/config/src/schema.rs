/// Config schema types (server, webex, controller, logging, alerts, upload).
use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetpulseConfig {
    pub server: ServerConfig,
    pub webex: WebexConfig,
    pub controller: ControllerConfig,
    pub logging: LoggingConfig,
    pub alerts: AlertsConfig,
    pub upload: UploadConfig,
}

/// HTTP listener for the alert and bot endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 7071,
        }
    }
}

/// Webex bot account.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebexConfig {
    /// Bot access token.
    #[serde(serialize_with = "serialize_secret")]
    pub access_token: Secret<String>,

    /// Title of the group room that receives alerts.
    pub room_name: String,

    /// REST base URL.
    pub api_base_url: String,

    /// Public base URL of this service, used as the webhook target
    /// (`{public_url}/webexbot`). When unset, a local ngrok tunnel is probed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,

    /// Probe the local ngrok API for a public URL when `public_url` is unset.
    pub discover_tunnel: bool,

    /// Re-register webhooks when the server starts.
    pub sync_webhooks_on_start: bool,
}

impl std::fmt::Debug for WebexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebexConfig")
            .field("access_token", &"[REDACTED]")
            .field("room_name", &self.room_name)
            .field("api_base_url", &self.api_base_url)
            .field("public_url", &self.public_url)
            .field("discover_tunnel", &self.discover_tunnel)
            .field("sync_webhooks_on_start", &self.sync_webhooks_on_start)
            .finish()
    }
}

impl Default for WebexConfig {
    fn default() -> Self {
        Self {
            access_token: Secret::new(String::new()),
            room_name: String::new(),
            api_base_url: "https://webexapis.com/v1".into(),
            public_url: None,
            discover_tunnel: true,
            sync_webhooks_on_start: false,
        }
    }
}

/// Network controller (device inventory) credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub base_url: String,
    pub username: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: Secret<String>,
    /// Verify the controller's TLS certificate.
    pub verify_tls: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sandboxdnac.cisco.com:443".into(),
            username: String::new(),
            password: Secret::new(String::new()),
            verify_tls: true,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when neither `RUST_LOG` nor `--log-level` is set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// IANA zone for alert timestamps. Unset means the host's local zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl AlertsConfig {
    /// Parsed [`AlertsConfig::timezone`]; `Ok(None)` when unset.
    pub fn zone(&self) -> Result<Option<chrono_tz::Tz>, String> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name
                .parse::<chrono_tz::Tz>()
                .map(Some)
                .map_err(|e| format!("unknown timezone `{name}`: {e}")),
        }
    }
}

/// Retry budget for configuration file uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub attempts: u32,
    pub delay_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay_secs: 3,
        }
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

//! HTTP client for the controller's intent API.

use std::time::Duration;

use {
    async_trait::async_trait,
    netpulse_common::types::{DeviceDetail, DeviceSummary},
    netpulse_config::ControllerConfig,
    reqwest::{Response, StatusCode},
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    serde_json::Value,
    tracing::{debug, info, warn},
};

use crate::{
    ConfigResult, DeviceInventory,
    auth::Credentials,
    error::{Error, Result},
};

const DEVICES_PATH: &str = "/dna/intent/api/v1/network-device";

/// Status the controller returns when a device class cannot export its
/// configuration.
pub const UNSUPPORTED_CONFIG_STATUS: u16 = 501;

/// Every intent API response wraps its payload in `response`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct RawDevice {
    #[serde(default)]
    hostname: Option<String>,
    id: String,
}

pub struct DnacClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl DnacClient {
    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(
            http,
            &config.base_url,
            config.username.clone(),
            config.password.clone(),
        ))
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        username: String,
        password: Secret<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: Credentials::new(username, password),
        }
    }

    /// Authenticated GET. A 401 drops the cached token and retries once.
    async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{path}", self.base_url);
        let mut retried = false;
        loop {
            let token = self.credentials.token(&self.http, &self.base_url).await?;
            let resp = self
                .http
                .get(&url)
                .header("X-Auth-Token", token.expose_secret())
                .header("Accept", "application/json")
                .send()
                .await?;
            if resp.status() == StatusCode::UNAUTHORIZED && !retried {
                debug!(path, "controller token rejected, re-authenticating");
                self.credentials.invalidate().await;
                retried = true;
                continue;
            }
            return Ok(resp);
        }
    }

    async fn check(operation: &'static str, resp: Response) -> Result<Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        warn!(operation, status, "controller request failed");
        Err(Error::Api {
            operation,
            status,
            body,
        })
    }
}

fn device_path(device_id: &str) -> String {
    format!("{DEVICES_PATH}/{}", urlencoding::encode(device_id))
}

#[async_trait]
impl DeviceInventory for DnacClient {
    async fn list_devices(&self) -> Result<Vec<DeviceSummary>> {
        let resp = Self::check("list devices", self.get(DEVICES_PATH).await?).await?;
        let body: Envelope<Vec<RawDevice>> = resp.json().await?;
        let devices: Vec<DeviceSummary> = body
            .response
            .into_iter()
            .filter_map(|d| match d.hostname {
                Some(hostname) if !hostname.is_empty() => Some(DeviceSummary {
                    hostname,
                    id: d.id,
                }),
                _ => None,
            })
            .collect();
        info!(count = devices.len(), "listed controller devices");
        Ok(devices)
    }

    async fn device_details(&self, device_id: &str) -> Result<DeviceDetail> {
        let resp = Self::check("device details", self.get(&device_path(device_id)).await?).await?;
        let body: Envelope<Value> = resp.json().await?;
        Ok(DeviceDetail::from_value(body.response)?)
    }

    async fn device_config(&self, device_id: &str) -> Result<ConfigResult> {
        let path = format!("{}/config", device_path(device_id));
        let resp = self.get(&path).await?;
        if resp.status().as_u16() == UNSUPPORTED_CONFIG_STATUS {
            info!(device_id, "configuration not supported for device");
            return Ok(ConfigResult::Unsupported);
        }
        let resp = Self::check("device config", resp).await?;
        let body: Envelope<String> = resp.json().await?;
        Ok(ConfigResult::Available(body.response))
    }
}

use std::time::{Duration, Instant};

use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tokio::sync::Mutex,
    tracing::debug,
};

use crate::error::{Context, Error, Result};

pub const TOKEN_PATH: &str = "/dna/system/api/v1/auth/token";

/// Controller tokens live for an hour; refresh a little early.
const TOKEN_TTL: Duration = Duration::from_secs(55 * 60);

#[derive(Clone)]
pub struct CachedToken {
    pub token: Secret<String>,
    pub expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        self.expires_at > Instant::now()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: String,
}

/// Controller credentials plus the token cache they feed.
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
    cache: Mutex<Option<CachedToken>>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: Secret<String>) -> Self {
        Self {
            username: username.into(),
            password,
            cache: Mutex::new(None),
        }
    }

    /// Return the cached token, or exchange the credentials for a new one.
    pub async fn token(&self, http: &reqwest::Client, base_url: &str) -> Result<Secret<String>> {
        {
            let guard = self.cache.lock().await;
            if let Some(token) = guard.as_ref()
                && token.is_valid()
            {
                return Ok(token.token.clone());
            }
        }

        let resp = http
            .post(format!("{base_url}{TOKEN_PATH}"))
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                operation: "token request",
                status,
                body,
            });
        }

        let body: TokenResponse = resp.json().await?;
        let token = Some(body.token)
            .filter(|t| !t.is_empty())
            .context("controller returned an empty token")?;
        let cached = CachedToken {
            token: Secret::new(token),
            expires_at: Instant::now() + TOKEN_TTL,
        };
        let token = cached.token.clone();
        debug!(username = %self.username, "obtained controller token");

        let mut guard = self.cache.lock().await;
        *guard = Some(cached);
        Ok(token)
    }

    /// Drop the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        self.cache.lock().await.take();
    }
}

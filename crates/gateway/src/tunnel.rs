//! Webhook target resolution: a configured public URL, or the first tunnel
//! reported by a local ngrok agent.

use {
    netpulse_config::WebexConfig,
    serde::Deserialize,
    tracing::{debug, info, warn},
};

/// Local ngrok agent API.
pub const NGROK_TUNNELS_URL: &str = "http://127.0.0.1:4040/api/tunnels";

/// Path the bot handler is mounted on.
pub const BOT_PATH: &str = "/webexbot";

#[derive(Debug, Deserialize)]
struct TunnelList {
    #[serde(default)]
    tunnels: Vec<Tunnel>,
}

#[derive(Debug, Deserialize)]
struct Tunnel {
    public_url: String,
}

/// Public URL of the first tunnel, or `None` when the agent is unreachable
/// or has no tunnels.
pub async fn discover_public_url(http: &reqwest::Client, api_url: &str) -> Option<String> {
    let resp = match http.get(api_url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            debug!(error = %e, "no tunnel agent reachable");
            return None;
        },
    };
    if !resp.status().is_success() {
        warn!(status = resp.status().as_u16(), "tunnel agent returned an error");
        return None;
    }
    match resp.json::<TunnelList>().await {
        Ok(list) => list.tunnels.into_iter().next().map(|t| t.public_url),
        Err(e) => {
            warn!(error = %e, "unreadable tunnel list");
            None
        },
    }
}

pub fn webhook_target(public_url: &str) -> String {
    format!("{}{BOT_PATH}", public_url.trim_end_matches('/'))
}

/// Webhook target for this deployment, if one can be determined.
pub async fn resolve_webhook_target(
    config: &WebexConfig,
    http: &reqwest::Client,
    tunnel_api_url: &str,
) -> Option<String> {
    if let Some(url) = config.public_url.as_deref()
        && !url.trim().is_empty()
    {
        return Some(webhook_target(url));
    }
    if !config.discover_tunnel {
        return None;
    }
    let url = discover_public_url(http, tunnel_api_url).await?;
    info!(public_url = %url, "using tunnel URL for webhooks");
    Some(webhook_target(&url))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_tunnel_wins() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tunnels")
            .with_status(200)
            .with_body(
                r#"{"tunnels": [
                    {"name": "command_line", "public_url": "https://abc123.ngrok.io", "proto": "https"},
                    {"name": "second", "public_url": "http://abc123.ngrok.io", "proto": "http"}
                ], "uri": "/api/tunnels"}"#,
            )
            .create_async()
            .await;

        let url = format!("{}/api/tunnels", server.url());
        let found = discover_public_url(&reqwest::Client::new(), &url).await;
        assert_eq!(found.as_deref(), Some("https://abc123.ngrok.io"));
    }

    #[tokio::test]
    async fn empty_or_failing_agent_yields_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/empty")
            .with_status(200)
            .with_body(r#"{"tunnels": []}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/broken")
            .with_status(502)
            .create_async()
            .await;

        let http = reqwest::Client::new();
        assert!(discover_public_url(&http, &format!("{}/empty", server.url())).await.is_none());
        assert!(discover_public_url(&http, &format!("{}/broken", server.url())).await.is_none());
    }

    #[tokio::test]
    async fn configured_url_skips_discovery() {
        let mut config = WebexConfig::default();
        config.public_url = Some("https://bot.example.com/".into());
        let target =
            resolve_webhook_target(&config, &reqwest::Client::new(), "http://127.0.0.1:1/none")
                .await;
        assert_eq!(target.as_deref(), Some("https://bot.example.com/webexbot"));
    }

    #[tokio::test]
    async fn discovery_can_be_disabled() {
        let mut config = WebexConfig::default();
        config.discover_tunnel = false;
        let target =
            resolve_webhook_target(&config, &reqwest::Client::new(), "http://127.0.0.1:1/none")
                .await;
        assert!(target.is_none());
    }
}

use std::{net::SocketAddr, sync::Arc, time::Duration};

use {
    anyhow::Context,
    axum::{
        Router,
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    netpulse_config::{NetpulseConfig, WebexConfig},
    netpulse_inventory::DnacClient,
    netpulse_webex::{HttpWebexApi, RetryPolicy, SyncReport, WebexApi, WebexSession},
    tower_http::trace::TraceLayer,
    tracing::{info, warn},
};

use crate::{
    alerts::alert_handler,
    bot::bot_handler,
    state::{AlertZone, AppState, BotIdentity},
    tunnel::{BOT_PATH, NGROK_TUNNELS_URL, resolve_webhook_target},
};

/// Build the router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/alerts", post(alert_handler))
        .route(BOT_PATH, post(bot_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Webex client authenticated with the configured bot token.
pub fn webex_api(config: &WebexConfig) -> Arc<dyn WebexApi> {
    Arc::new(HttpWebexApi::with_base_url(
        reqwest::Client::new(),
        &config.api_base_url,
        config.access_token.clone(),
    ))
}

/// Resolve the default room and build the session with the configured
/// upload retry budget.
pub async fn connect_session(config: &NetpulseConfig) -> anyhow::Result<WebexSession> {
    let retry = RetryPolicy {
        attempts: config.upload.attempts,
        delay: Duration::from_secs(config.upload.delay_secs),
    };
    let session = WebexSession::connect(webex_api(&config.webex), &config.webex.room_name)
        .await
        .context("failed to resolve the Webex alert room")?;
    Ok(session.with_retry_policy(retry))
}

/// Everything the handlers need, built once at start-up.
pub async fn prepare_state(config: &NetpulseConfig) -> anyhow::Result<AppState> {
    let zone = config
        .alerts
        .zone()
        .map_err(anyhow::Error::msg)
        .context("invalid alerts.timezone")?;
    let session = connect_session(config).await?;
    let bot = match session.api().me().await {
        Ok(person) => BotIdentity::from(person),
        Err(e) => {
            warn!(error = %e, "could not look up the bot identity, skipping all bot accounts");
            BotIdentity::default()
        },
    };
    let inventory =
        DnacClient::from_config(&config.controller).context("failed to build controller client")?;

    Ok(AppState::new(
        Arc::new(session),
        Arc::new(inventory),
        AlertZone::from_option(zone),
        bot,
    ))
}

/// Replace the bot's webhooks with the canonical pair aimed at this
/// deployment. Returns `None` when no target URL could be determined.
pub async fn sync_webhooks(
    session: &WebexSession,
    config: &WebexConfig,
    target_override: Option<String>,
) -> anyhow::Result<Option<SyncReport>> {
    let target = match target_override {
        Some(url) => Some(url),
        None => resolve_webhook_target(config, &reqwest::Client::new(), NGROK_TUNNELS_URL).await,
    };
    let Some(target) = target else {
        warn!("no public URL configured or discovered, skipping webhook sync");
        return Ok(None);
    };
    let report = session
        .synchronize(&target)
        .await
        .with_context(|| format!("failed to synchronize webhooks to {target}"))?;
    Ok(Some(report))
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start_server(config: &NetpulseConfig) -> anyhow::Result<()> {
    let state = prepare_state(config).await?;

    if config.webex.sync_webhooks_on_start {
        sync_webhooks(&state.session, &config.webex, None).await?;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.bind, config.server.port
            )
        })?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "netpulse listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("netpulse stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

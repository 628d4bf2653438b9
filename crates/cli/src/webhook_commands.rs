use anyhow::Result;

use netpulse_config::NetpulseConfig;

/// Re-register the bot's webhooks and report what changed.
pub async fn sync_webhooks(config: &NetpulseConfig, target_url: Option<String>) -> Result<()> {
    let session = netpulse_gateway::server::connect_session(config).await?;
    match netpulse_gateway::sync_webhooks(&session, &config.webex, target_url).await? {
        Some(report) => {
            eprintln!(
                "Removed {} webhook(s), registered {}.",
                report.deleted, report.created
            );
        },
        None => {
            eprintln!(
                "No webhook target: set webex.public_url, pass --target-url, or start an ngrok tunnel."
            );
        },
    }
    Ok(())
}

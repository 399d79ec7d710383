use clap::Parser;

use crate::domain::value_objects::{
    ProviderConfig, ServerConfig, WebhookConfig, DEFAULT_SERVICE_NAME,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pipeline-live-input",
    version = "0.1.0",
    author = "Hawkeye Video Pipeline",
    about = "Single live-input manager with WHIP/WHEP URLs and webhook notifications"
)]
pub struct Config {
    /// HTTP API port
    #[arg(long, env = "HTTP_PORT", default_value = "8787")]
    pub port: u16,

    /// Stream provider account base URL (live inputs live under /live_inputs)
    #[arg(long, env = "STREAM_API_URL")]
    pub stream_api_url: String,

    /// Stream provider API token
    #[arg(long, env = "STREAM_API_TOKEN", hide_env_values = true)]
    pub stream_api_token: String,

    /// Webhook receiving live/ended events (disabled when unset)
    #[arg(long, env = "NOTIFY_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Bearer token for the webhook
    #[arg(long, env = "NOTIFY_WEBHOOK_TOKEN", hide_env_values = true)]
    pub webhook_token: Option<String>,

    /// Bearer token required on /stream/* (open when unset)
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Name reported in events and /ping
    #[arg(long, env = "SERVICE_NAME", default_value = DEFAULT_SERVICE_NAME)]
    pub service_name: String,

    /// Metrics server port
    #[arg(long, env = "METRICS_PORT", default_value = "9004")]
    pub metrics_port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Minimum allowed port (ports below 1024 are privileged)
const MIN_USER_PORT: u16 = 1024;

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        Self::validate_port(self.port, "HTTP")?;
        Self::validate_port(self.metrics_port, "metrics")?;

        if self.port == self.metrics_port {
            anyhow::bail!("HTTP port and metrics port cannot be the same");
        }

        self.to_provider_config()?;
        self.to_webhook_config()?;

        if self.service_name.trim().is_empty() {
            anyhow::bail!("Service name cannot be empty");
        }

        Ok(())
    }

    fn validate_port(port: u16, name: &str) -> anyhow::Result<()> {
        if port == 0 {
            anyhow::bail!("Invalid {} port: port cannot be 0", name);
        }
        if port < MIN_USER_PORT {
            anyhow::bail!(
                "Invalid {} port: {} is a privileged port (< {}). Use a port >= {}",
                name,
                port,
                MIN_USER_PORT,
                MIN_USER_PORT
            );
        }
        Ok(())
    }

    pub fn to_server_config(&self) -> anyhow::Result<ServerConfig> {
        Ok(ServerConfig::new(self.port)?
            .with_access_token(self.access_token.clone())
            .with_service_name(self.service_name.clone()))
    }

    pub fn to_provider_config(&self) -> anyhow::Result<ProviderConfig> {
        Ok(ProviderConfig::new(
            &self.stream_api_url,
            self.stream_api_token.clone(),
        )?)
    }

    /// `None` when no webhook is configured
    pub fn to_webhook_config(&self) -> anyhow::Result<Option<WebhookConfig>> {
        match &self.webhook_url {
            None => Ok(None),
            Some(url) => {
                let token = self.webhook_token.clone().unwrap_or_default();
                Ok(Some(WebhookConfig::new(url, token)?))
            }
        }
    }
}

use std::time::Duration;

use clap::Parser;

use crate::domain::value_objects::{NegotiatorConfig, SessionRole};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pipeline-webrtc-session",
    version = "0.1.0",
    author = "Hawkeye Video Pipeline",
    about = "WHIP publisher / WHEP viewer session probe"
)]
pub struct Config {
    /// Session role: publish (WHIP) or view (WHEP)
    #[arg(long, env = "SESSION_ROLE", default_value = "view")]
    pub role: String,

    /// WHIP or WHEP endpoint URL
    #[arg(long, env = "SIGNALING_URL")]
    pub signaling_url: String,

    /// Maximum time to wait for ICE gathering, in milliseconds
    #[arg(long, default_value = "5000")]
    pub ice_gathering_timeout_ms: u64,

    /// STUN/TURN server URL (repeatable)
    #[arg(long = "ice-server")]
    pub ice_servers: Vec<String>,

    /// Metrics server port
    #[arg(long, env = "METRICS_PORT", default_value = "9003")]
    pub metrics_port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Minimum allowed port (ports below 1024 are privileged)
const MIN_USER_PORT: u16 = 1024;

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.session_role()?;

        if !self.signaling_url.starts_with("http://") && !self.signaling_url.starts_with("https://")
        {
            anyhow::bail!("Signaling URL must start with http:// or https://");
        }

        if self.ice_gathering_timeout_ms == 0 {
            anyhow::bail!("ICE gathering timeout cannot be 0");
        }

        for server in &self.ice_servers {
            if !(server.starts_with("stun:") || server.starts_with("turn:") || server.starts_with("turns:")) {
                anyhow::bail!("ICE server must be a stun:, turn: or turns: URL, got {}", server);
            }
        }

        Self::validate_port(self.metrics_port, "metrics")?;

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

    pub fn session_role(&self) -> anyhow::Result<SessionRole> {
        self.role
            .parse::<SessionRole>()
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    pub fn to_negotiator_config(&self) -> anyhow::Result<NegotiatorConfig> {
        let config = NegotiatorConfig::new(self.session_role()?, &self.signaling_url)?
            .with_ice_gathering_timeout(Duration::from_millis(self.ice_gathering_timeout_ms))?
            .with_ice_servers(self.ice_servers.clone());
        Ok(config)
    }
}

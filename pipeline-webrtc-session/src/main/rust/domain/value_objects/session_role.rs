use std::fmt;
use std::str::FromStr;

/// Which side of the signaling exchange a session plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    /// WHIP ingestion
    Publish,
    /// WHEP egress
    View,
}

impl SessionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRole::Publish => "publish",
            SessionRole::View => "view",
        }
    }

    pub fn protocol(&self) -> &'static str {
        match self {
            SessionRole::Publish => "WHIP",
            SessionRole::View => "WHEP",
        }
    }
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "publish" | "whip" => Ok(SessionRole::Publish),
            "view" | "play" | "whep" => Ok(SessionRole::View),
            other => Err(format!("unknown session role: {}", other)),
        }
    }
}

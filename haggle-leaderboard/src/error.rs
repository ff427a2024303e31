/// Any failure reaching, reading, or writing the shared leaderboard.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("config error: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timeout: {0}")]
    Timeout(String),
    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("player name cannot be empty")]
    EmptyName,
}

impl From<reqwest::Error> for LeaderboardError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Timeout(value.to_string());
        }
        if value.is_decode() {
            return Self::Decode(value.to_string());
        }
        Self::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for LeaderboardError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

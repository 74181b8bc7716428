/// A balance or price read that could not complete.
///
/// Never fatal: the orchestrator records the `Display` text on the cell the
/// read owns and keeps going.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("empty eth_call result (no contract code or unsupported call)")]
    EmptyResult,

    #[error("balance does not fit in 128 bits")]
    Overflow,

    #[error("missing field '{0}' in response")]
    MissingField(String),

    #[error("invalid price {0}")]
    InvalidPrice(f64),
}

impl From<reqwest::Error> for ReadError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ReadError::Transport("request timed out".to_string())
        } else if let Some(status) = e.status() {
            ReadError::Status(status.as_u16())
        } else if e.is_decode() {
            ReadError::Malformed(e.to_string())
        } else {
            ReadError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ReadError {
    fn from(e: serde_json::Error) -> Self {
        ReadError::Malformed(e.to_string())
    }
}

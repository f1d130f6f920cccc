#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("token error: {0}")]
    Token(String),
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "client")]
    #[error("refresh error during {operation} (status {status:?}): {detail}")]
    Refresh {
        operation: &'static str,
        status: Option<u16>,
        detail: String,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

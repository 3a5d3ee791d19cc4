use arbiter_integration::error::SocketError;
use thiserror::Error;

/// All errors generated in `arbiter-data`.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("SocketError: {0}")]
    Socket(#[from] SocketError),

    #[error("connector ping timed out")]
    PingTimeout,

    #[error("remote connection closed while started")]
    RemoteClosed,

    #[error("unsupported candlestick interval: {0}s exceeds one week buckets")]
    UnsupportedInterval(u64),

    #[error("invalid connector configuration: {0}")]
    Config(String),

    #[error("connector is not started")]
    NotStarted,
}

use arbiter_integration::error::SocketError;
use thiserror::Error;

/// All errors generated in `arbiter-execution`.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("SocketError: {0}")]
    Socket(#[from] SocketError),

    #[error("login rejected by the venue")]
    LoginFailed,

    #[error("connector ping timed out")]
    PingTimeout,

    #[error("response timed out for the oldest in-flight command")]
    ResponseTimeout,

    #[error("remote connection closed while started")]
    RemoteClosed,

    #[error("invalid connector configuration: {0}")]
    Config(String),

    #[error("connector is not started")]
    NotStarted,
}

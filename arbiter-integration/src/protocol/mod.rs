/// Contains useful WebSocket types such as the duplex [`WsSession`](websocket::WsSession) and
/// its [`StreamHandler`](websocket::StreamHandler) callback contract.
pub mod websocket;

/// Timeout-aware [`RestClient`](http::RestClient) request transport.
pub mod http;

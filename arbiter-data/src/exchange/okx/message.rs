use arbiter_instrument::numeric::FixedNumber;
use serde::{Deserialize, Serialize};

/// Default streaming endpoint.
pub const WS_URL: &str = "wss://real.okex.com:10441/websocket";

/// Default REST endpoint.
pub const REST_URL: &str = "https://www.okex.com/api/v1";

/// Heartbeat frames dictated by the venue.
pub const PING_FRAME: &str = r#"{"event":"ping"}"#;
pub const PONG_FRAME: &str = r#"{"event":"pong"}"#;

/// Venue channel name for an instrument's streaming depth.
pub fn depth_channel(symbol: &str) -> String {
    format!("ok_sub_spot_{symbol}_depth")
}

/// Extract the exchange-format symbol from a streaming depth channel name.
pub fn symbol_from_depth_channel(channel: &str) -> Option<&str> {
    channel
        .strip_prefix("ok_sub_spot_")?
        .strip_suffix("_depth")
}

/// Outbound `addChannel` subscription frame.
#[derive(Debug, Serialize)]
pub struct SubscribeFrame {
    pub event: &'static str,
    pub channel: String,
}

impl SubscribeFrame {
    pub fn depth(symbol: &str) -> Self {
        Self {
            event: "addChannel",
            channel: depth_channel(symbol),
        }
    }
}

/// One element of the streaming message array.
#[derive(Debug, Deserialize)]
pub struct StreamEnvelope {
    pub channel: Option<String>,
    pub data: Option<DepthPayload>,
}

/// Depth levels carried by both streaming diffs and REST snapshots.
#[derive(Debug, Default, Deserialize)]
pub struct DepthPayload {
    #[serde(default)]
    pub asks: Vec<DepthLevel>,
    #[serde(default)]
    pub bids: Vec<DepthLevel>,
    pub timestamp: Option<i64>,
}

/// `[price, amount]` level pair.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct DepthLevel(pub FixedNumber, pub FixedNumber);

/// `[timestamp_ms, open, high, low, close, volume]` kline row.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct KlineRow(
    pub i64,
    pub FixedNumber,
    pub FixedNumber,
    pub FixedNumber,
    pub FixedNumber,
    pub FixedNumber,
);

/// Query string of the REST depth pull.
#[derive(Debug, Serialize)]
pub struct DepthQuery<'a> {
    pub market: &'a str,
    pub size: u32,
}

/// Query string of the REST kline pull.
#[derive(Debug, Serialize)]
pub struct KlineQuery<'a> {
    pub market: &'a str,
    #[serde(rename = "type")]
    pub interval: &'static str,
    pub size: u32,
    pub since: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_channel_round_trip() {
        let channel = depth_channel("btc_usdt");
        assert_eq!(channel, "ok_sub_spot_btc_usdt_depth");
        assert_eq!(symbol_from_depth_channel(&channel), Some("btc_usdt"));
        assert_eq!(symbol_from_depth_channel("ok_sub_spot_btc_usdt_trades"), None);
        assert_eq!(symbol_from_depth_channel("ping"), None);
    }

    #[test]
    fn test_subscribe_frame_serialises_to_venue_shape() {
        let frame = serde_json::to_string(&SubscribeFrame::depth("btc_usdt")).unwrap();
        assert_eq!(
            frame,
            r#"{"event":"addChannel","channel":"ok_sub_spot_btc_usdt_depth"}"#
        );
    }

    #[test]
    fn test_stream_envelope_deserialises_depth_diff() {
        let payload = r#"[{
            "channel": "ok_sub_spot_btc_usdt_depth",
            "data": {"asks": [["100.5", "1"]], "bids": [["99", "3"]], "timestamp": 1700000000000}
        }]"#;

        let envelopes: Vec<StreamEnvelope> = serde_json::from_str(payload).unwrap();
        assert_eq!(envelopes.len(), 1);

        let data = envelopes[0].data.as_ref().unwrap();
        assert_eq!(data.asks.len(), 1);
        assert_eq!(data.asks[0].0, "100.5".parse().unwrap());
        assert_eq!(data.bids[0].1, "3".parse().unwrap());
        assert_eq!(data.timestamp, Some(1_700_000_000_000));
    }

    #[test]
    fn test_depth_query_builds_rest_parameters() {
        let query = serde_urlencoded::to_string(DepthQuery {
            market: "btc_usdt",
            size: 200,
        })
        .unwrap();
        assert_eq!(query, "market=btc_usdt&size=200");
    }
}

use arbiter_instrument::numeric::FixedNumber;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::collections::{BTreeMap, HashMap};

/// Default streaming endpoint.
pub const WS_URL: &str = "wss://real.okex.com:10441/websocket";

/// Heartbeat frames dictated by the venue.
pub const PING_FRAME: &str = r#"{"event":"ping"}"#;

/// Command channels.
pub const CHANNEL_ORDER: &str = "ok_spot_order";
pub const CHANNEL_CANCEL_ORDER: &str = "ok_spot_cancel_order";
pub const CHANNEL_ORDER_INFO: &str = "ok_spot_orderinfo";
pub const CHANNEL_USER_INFO: &str = "ok_spot_userinfo";

/// Venue error code raised when cancelling an order that already filled or cancelled.
pub const ERROR_ALREADY_FINISHED: i64 = 1050;

/// Outbound signed command frame.
#[derive(Debug, Serialize)]
pub struct CommandFrame<'a> {
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<&'static str>,
    pub parameters: &'a BTreeMap<String, String>,
}

impl<'a> CommandFrame<'a> {
    /// `addChannel` command carrying signed parameters.
    pub fn command(channel: &'static str, parameters: &'a BTreeMap<String, String>) -> Self {
        Self {
            event: "addChannel",
            channel: Some(channel),
            parameters,
        }
    }

    /// `login` event carrying signed parameters.
    pub fn login(parameters: &'a BTreeMap<String, String>) -> Self {
        Self {
            event: "login",
            channel: None,
            parameters,
        }
    }
}

/// One element of the inbound reply array.
#[derive(Debug, Default, Deserialize)]
pub struct TradeEnvelope {
    pub channel: Option<String>,
    pub event: Option<String>,
    pub data: Option<TradeData>,
}

/// Reply payload; each channel populates its own subset.
#[derive(Debug, Default, Deserialize)]
pub struct TradeData {
    pub result: Option<bool>,
    pub error_code: Option<i64>,
    pub error: Option<serde_json::Value>,
    pub order_id: Option<WireId>,
    pub orders: Option<Vec<OrderInfoRow>>,
    pub info: Option<AccountInfo>,
}

impl TradeData {
    /// Whether the reply reports success: an explicit `result` wins, an `error_code` fails.
    pub fn is_success(&self) -> bool {
        match self.result {
            Some(result) => result && self.error_code.is_none(),
            None => false,
        }
    }
}

/// One order inside an order-info reply.
#[derive(Debug, Deserialize)]
pub struct OrderInfoRow {
    pub order_id: Option<WireId>,
    pub avg_price: Option<FixedNumber>,
    pub deal_amount: Option<FixedNumber>,
    pub status: Option<i64>,
}

/// Account information inside a userinfo reply.
#[derive(Debug, Deserialize)]
pub struct AccountInfo {
    pub funds: Option<Funds>,
}

#[derive(Debug, Deserialize)]
pub struct Funds {
    pub free: Option<HashMap<String, FixedNumber>>,
}

/// Venue identifier that arrives as either a JSON string or number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    pub fn as_smolstr(&self) -> SmolStr {
        match self {
            WireId::Text(text) => SmolStr::new(text),
            WireId::Number(number) => SmolStr::new(number.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_frame_serialises_to_venue_shape() {
        let mut parameters = BTreeMap::new();
        parameters.insert("api_key".to_string(), "key".to_string());
        parameters.insert("sign".to_string(), "ABCD".to_string());

        let frame = serde_json::to_string(&CommandFrame::command(CHANNEL_ORDER, &parameters))
            .unwrap();
        assert_eq!(
            frame,
            r#"{"event":"addChannel","channel":"ok_spot_order","parameters":{"api_key":"key","sign":"ABCD"}}"#
        );

        let login = serde_json::to_string(&CommandFrame::login(&parameters)).unwrap();
        assert_eq!(
            login,
            r#"{"event":"login","parameters":{"api_key":"key","sign":"ABCD"}}"#
        );
    }

    #[test]
    fn test_reply_success_semantics() {
        let success: TradeData =
            serde_json::from_str(r#"{"result": true, "order_id": "125433029"}"#).unwrap();
        assert!(success.is_success());
        assert_eq!(success.order_id.unwrap().as_smolstr(), "125433029");

        let failure: TradeData =
            serde_json::from_str(r#"{"result": false, "error_code": 10010}"#).unwrap();
        assert!(!failure.is_success());
        assert_eq!(failure.error_code, Some(10_010));

        let silent: TradeData = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!silent.is_success());
    }

    #[test]
    fn test_order_info_rows_deserialise() {
        let data: TradeData = serde_json::from_str(
            r#"{"orders": [
                {"order_id": 125433029, "avg_price": "100.5", "deal_amount": "0.25", "status": 1}
            ]}"#,
        )
        .unwrap();

        let rows = data.orders.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id.as_ref().unwrap().as_smolstr(), "125433029");
        assert_eq!(rows[0].status, Some(1));
        assert_eq!(rows[0].avg_price, Some("100.5".parse().unwrap()));
    }

    #[test]
    fn test_userinfo_funds_deserialise() {
        let data: TradeData = serde_json::from_str(
            r#"{"info": {"funds": {"free": {"btc": "1.25", "usdt": "1000"}}}}"#,
        )
        .unwrap();

        let free = data.info.unwrap().funds.unwrap().free.unwrap();
        assert_eq!(free.len(), 2);
        assert_eq!(free["btc"], "1.25".parse().unwrap());
    }
}

/// OKX spot dialect [`OkxTradeConnector`](okx::OkxTradeConnector).
pub mod okx;

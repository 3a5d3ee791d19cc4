/// OKX spot dialect [`OkxMarketConnector`](okx::OkxMarketConnector).
pub mod okx;

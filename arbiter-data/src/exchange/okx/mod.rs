use crate::{
    config::ConnectorConfig,
    connector::MarketConnector,
    error::DataError,
    event::{CandlestickEntry, OrderBookEntry, OrderBookList},
    kline::KlineInterval,
    observer::MarketObserver,
};
use arbiter_instrument::{
    Side, dictionary::ExchangeDictionary, instrument::InstrumentIndex,
    registry::InstrumentRegistry,
};
use arbiter_integration::{
    profile::ProfilingTag,
    protocol::{
        http::RestClient,
        websocket::{StreamHandler, WsSession},
    },
    timer::{Timer, TimerService},
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use message::{
    DepthPayload, DepthQuery, KlineQuery, KlineRow, PING_FRAME, PONG_FRAME, REST_URL,
    StreamEnvelope, SubscribeFrame, WS_URL, symbol_from_depth_channel,
};
use parking_lot::Mutex;
use smol_str::SmolStr;
use std::{
    fmt,
    future::Future,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

/// OKX spot wire dialect.
pub mod message;

/// Depth levels requested per REST snapshot pull.
const DEPTH_SIZE: u32 = 200;

/// Kline rows requested per REST pull.
const KLINE_SIZE: u32 = 200;

/// Per-request REST timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Milliseconds of stream silence before a ping is issued.
const DEFAULT_DATA_TIMEOUT_MS: u64 = 1_000;

/// Milliseconds without a pong before the ping is considered lost.
const DEFAULT_PING_TIMEOUT_MS: u64 = 2_500;

/// OKX spot streaming market-data connector.
///
/// Maintains one streaming depth subscription session with keep-alive, issues REST depth and
/// kline pulls, and delivers normalised entries to the upstream [`MarketObserver`].
pub struct OkxMarketConnector {
    weak: Weak<Self>,
    observer: Arc<dyn MarketObserver>,
    registry: Arc<InstrumentRegistry>,
    rest: RestClient,
    name: Mutex<SmolStr>,
    dictionary: Mutex<ExchangeDictionary>,
    subscriptions: Mutex<Vec<InstrumentIndex>>,
    session: Mutex<Option<WsSession>>,
    runtime: Mutex<Option<Handle>>,
    ping_timer: Mutex<Option<Timer>>,
    started: AtomicBool,
    /// Network receive timestamp of the most recent stream frame, 0 before any data.
    last_data_ns: AtomicU64,
    /// Send timestamp of the most recent ping; `ping_sent >= last_data` means a ping is
    /// outstanding.
    ping_sent_ns: AtomicU64,
    ws_url: Mutex<String>,
    rest_url: Mutex<String>,
    data_timeout_ms: AtomicU64,
    ping_timeout_ms: AtomicU64,
}

impl OkxMarketConnector {
    pub fn new(
        observer: Arc<dyn MarketObserver>,
        registry: Arc<InstrumentRegistry>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            observer,
            registry,
            rest: RestClient::new(),
            name: Mutex::new(SmolStr::new_static("okx")),
            dictionary: Mutex::new(ExchangeDictionary::new()),
            subscriptions: Mutex::new(Vec::new()),
            session: Mutex::new(None),
            runtime: Mutex::new(None),
            ping_timer: Mutex::new(None),
            started: AtomicBool::new(false),
            last_data_ns: AtomicU64::new(0),
            ping_sent_ns: AtomicU64::new(0),
            ws_url: Mutex::new(WS_URL.to_string()),
            rest_url: Mutex::new(REST_URL.to_string()),
            data_timeout_ms: AtomicU64::new(DEFAULT_DATA_TIMEOUT_MS),
            ping_timeout_ms: AtomicU64::new(DEFAULT_PING_TIMEOUT_MS),
        })
    }

    /// Flatten a depth payload into normalised entries for one instrument.
    fn payload_entries(
        instrument: InstrumentIndex,
        payload: &DepthPayload,
        timestamp_ms: i64,
    ) -> OrderBookList {
        let mut entries = Vec::with_capacity(payload.asks.len() + payload.bids.len());

        for level in &payload.asks {
            entries.push(OrderBookEntry::new(
                instrument,
                Side::Ask,
                level.0,
                level.1,
                timestamp_ms,
            ));
        }
        for level in &payload.bids {
            entries.push(OrderBookEntry::new(
                instrument,
                Side::Bid,
                level.0,
                level.1,
                timestamp_ms,
            ));
        }

        entries
    }

    /// A REST depth response is a full snapshot: invalidate the cached book before applying.
    fn on_depth_response(&self, instrument: InstrumentIndex, body: &str) {
        let payload = match serde_json::from_str::<DepthPayload>(body) {
            Ok(payload) => payload,
            Err(parse_error) => {
                self.observer.connector_error(DataError::Socket(
                    arbiter_integration::error::SocketError::Deserialise {
                        error: parse_error,
                        payload: body.to_string(),
                    },
                ));
                return;
            }
        };

        let tag = ProfilingTag::now();
        self.observer.invalidate_data(Some(instrument), tag);

        let timestamp = payload
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        self.observer
            .orderbook_entries_bulk(Self::payload_entries(instrument, &payload, timestamp), tag);
    }

    fn on_kline_response(&self, instrument: InstrumentIndex, interval_secs: u64, body: &str) {
        let rows = match serde_json::from_str::<Vec<KlineRow>>(body) {
            Ok(rows) => rows,
            Err(parse_error) => {
                self.observer.connector_error(DataError::Socket(
                    arbiter_integration::error::SocketError::Deserialise {
                        error: parse_error,
                        payload: body.to_string(),
                    },
                ));
                return;
            }
        };

        let tag = ProfilingTag::now();
        for row in rows {
            let Some(time) = DateTime::<Utc>::from_timestamp_millis(row.0) else {
                warn!(timestamp = row.0, "kline row carries an unrepresentable timestamp");
                continue;
            };

            self.observer.candlestick(
                CandlestickEntry::new(
                    instrument, time, interval_secs, row.1, row.2, row.3, row.4, row.5,
                ),
                tag,
            );
        }
    }

    fn send_ping(&self, now_ns: u64) {
        let session = self.session.lock();
        let Some(session) = session.as_ref() else {
            return;
        };

        if session.write_text(PING_FRAME.to_string()).is_ok() {
            self.ping_sent_ns.store(now_ns, Ordering::SeqCst);
            if let Some(timer) = self.ping_timer.lock().as_ref() {
                timer.start(Duration::from_millis(
                    self.ping_timeout_ms.load(Ordering::SeqCst),
                ));
            }
        }
    }

    fn on_ping_timeout(&self) {
        error!(connector = %self.name(), "ping timeout");
        self.observer.invalidate_data(None, ProfilingTag::now());
        self.observer.connector_error(DataError::PingTimeout);
    }

    /// Translate an instrument handle, logging and skipping unknown handles.
    fn exchange_symbol(&self, instrument: InstrumentIndex) -> Option<SmolStr> {
        let dictionary = self.dictionary.lock();
        match dictionary.instrument_to_exchange(instrument) {
            Some(symbol) => Some(SmolStr::new(symbol)),
            None => {
                error!(%instrument, "no mapping for instrument");
                None
            }
        }
    }

    fn spawn_request(&self, request: impl Future<Output = ()> + Send + 'static) {
        match self.runtime.lock().as_ref() {
            Some(runtime) => {
                runtime.spawn(request);
            }
            None => {
                warn!(connector = %self.name(), "request issued before start");
                self.observer.connector_error(DataError::NotStarted);
            }
        }
    }
}

#[async_trait]
impl MarketConnector for OkxMarketConnector {
    fn configure(&self, config: &str) -> Result<(), DataError> {
        let config = ConnectorConfig::parse(config)?;

        *self.dictionary.lock() = config.build_dictionary(&self.registry);
        if let Some(url) = config.ws_url {
            *self.ws_url.lock() = url;
        }
        if let Some(url) = config.rest_url {
            *self.rest_url.lock() = url;
        }
        if let Some(ms) = config.data_timeout {
            self.data_timeout_ms.store(ms, Ordering::SeqCst);
        }
        if let Some(ms) = config.ping_timeout {
            self.ping_timeout_ms.store(ms, Ordering::SeqCst);
        }

        Ok(())
    }

    async fn start(self: Arc<Self>) -> Result<(), DataError> {
        *self.runtime.lock() = Some(Handle::current());

        let weak = Weak::clone(&self.weak);
        *self.ping_timer.lock() = Some(TimerService::new().timer(move || {
            if let Some(connector) = weak.upgrade() {
                connector.on_ping_timeout();
            }
        }));

        let url = self.ws_url.lock().clone();
        let session = WsSession::connect(url, Arc::clone(&self) as Arc<dyn StreamHandler>)
            .await
            .map_err(DataError::Socket)?;
        *self.session.lock() = Some(session);
        self.started.store(true, Ordering::SeqCst);

        // Re-issue subscriptions queued before connect.
        let pending = std::mem::take(&mut *self.subscriptions.lock());
        self.subscribe(&pending);

        Ok(())
    }

    fn stop(&self) {
        if !self.started.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Some(timer) = self.ping_timer.lock().as_ref() {
            timer.stop();
        }
        if let Some(session) = self.session.lock().take() {
            session.close();
        }
    }

    fn subscribe(&self, instruments: &[InstrumentIndex]) {
        let mut subscriptions = self.subscriptions.lock();

        for instrument in instruments {
            let Some(symbol) = self.exchange_symbol(*instrument) else {
                continue;
            };

            if let Some(session) = self.session.lock().as_ref() {
                let frame = SubscribeFrame::depth(&symbol);
                match serde_json::to_string(&frame) {
                    Ok(frame) => {
                        if let Err(write_error) = session.write_text(frame) {
                            self.observer.connector_error(DataError::Socket(write_error));
                            continue;
                        }
                        self.last_data_ns
                            .store(arbiter_integration::profile::unix_time_ns(), Ordering::SeqCst);
                    }
                    Err(serialise_error) => {
                        self.observer
                            .connector_error(DataError::Socket(serialise_error.into()));
                        continue;
                    }
                }
            }

            subscriptions.push(*instrument);
        }
    }

    fn fetch_stack(&self, instrument: InstrumentIndex) {
        let Some(connector) = self.weak.upgrade() else {
            return;
        };
        let Some(symbol) = self.exchange_symbol(instrument) else {
            return;
        };

        self.spawn_request(async move {
            let query = DepthQuery {
                market: &symbol,
                size: DEPTH_SIZE,
            };
            let url = match serde_urlencoded::to_string(&query) {
                Ok(query) => format!("{}/depth?{query}", connector.rest_url.lock()),
                Err(encode_error) => {
                    connector
                        .observer
                        .connector_error(DataError::Socket(encode_error.into()));
                    return;
                }
            };

            match connector.rest.get_text(&url, REQUEST_TIMEOUT).await {
                Ok(body) => connector.on_depth_response(instrument, &body),
                Err(request_error) => connector
                    .observer
                    .connector_error(DataError::Socket(request_error)),
            }
        });
    }

    fn fetch_candlesticks(&self, instrument: InstrumentIndex, interval_secs: u64, since_ms: u64) {
        let bucket = match KlineInterval::from_seconds(interval_secs) {
            Ok(bucket) => bucket,
            Err(interval_error) => {
                warn!(%interval_error, "rejecting candlestick request");
                return;
            }
        };
        let Some(connector) = self.weak.upgrade() else {
            return;
        };
        let Some(symbol) = self.exchange_symbol(instrument) else {
            return;
        };

        self.spawn_request(async move {
            let query = KlineQuery {
                market: &symbol,
                interval: bucket.as_str(),
                size: KLINE_SIZE,
                since: since_ms,
            };
            let url = match serde_urlencoded::to_string(&query) {
                Ok(query) => format!("{}/kline?{query}", connector.rest_url.lock()),
                Err(encode_error) => {
                    connector
                        .observer
                        .connector_error(DataError::Socket(encode_error.into()));
                    return;
                }
            };

            match connector.rest.get_text(&url, REQUEST_TIMEOUT).await {
                Ok(body) => connector.on_kline_response(instrument, interval_secs, &body),
                Err(request_error) => connector
                    .observer
                    .connector_error(DataError::Socket(request_error)),
            }
        });
    }

    fn fetch_symbols(&self) {
        let tag = ProfilingTag::now();
        for symbol in self.registry.symbols() {
            self.observer.symbol_added(symbol, tag);
        }
    }

    fn fetch_instruments(&self) {
        let tag = ProfilingTag::now();
        for instrument in self.registry.instruments() {
            self.observer.instrument_added(instrument, tag);
        }
    }

    fn name(&self) -> SmolStr {
        self.name.lock().clone()
    }

    fn set_name(&self, name: &str) {
        *self.name.lock() = SmolStr::new(name);
    }
}

impl StreamHandler for OkxMarketConnector {
    fn on_data(&self, payload: Bytes, recv_time_ns: u64) {
        if payload.as_ref() == PONG_FRAME.as_bytes() {
            if let Some(timer) = self.ping_timer.lock().as_ref() {
                timer.stop();
            }
            self.last_data_ns.store(recv_time_ns, Ordering::SeqCst);
            return;
        }

        self.last_data_ns.store(recv_time_ns, Ordering::SeqCst);

        let envelopes = match serde_json::from_slice::<Vec<StreamEnvelope>>(&payload) {
            Ok(envelopes) => envelopes,
            Err(parse_error) => {
                debug!(%parse_error, "discarding non-depth stream payload");
                return;
            }
        };

        let tag = ProfilingTag::from_ns(recv_time_ns);
        let fallback_timestamp = (recv_time_ns / 1_000_000) as i64;

        for envelope in envelopes {
            let (Some(channel), Some(data)) = (envelope.channel, envelope.data) else {
                continue;
            };
            let Some(symbol) = symbol_from_depth_channel(&channel) else {
                continue;
            };
            let Some(instrument) = self.dictionary.lock().instrument_from_exchange(symbol) else {
                continue;
            };

            let timestamp = data.timestamp.unwrap_or(fallback_timestamp);
            self.observer
                .orderbook_entries_bulk(Self::payload_entries(instrument, &data, timestamp), tag);
        }
    }

    fn check_timers(&self, now_ns: u64) {
        if !self.started.load(Ordering::SeqCst) {
            return;
        }

        let last_data = self.last_data_ns.load(Ordering::SeqCst);
        // No pings before the first subscription, and none while one is outstanding.
        if last_data == 0 || self.ping_sent_ns.load(Ordering::SeqCst) >= last_data {
            return;
        }

        let data_timeout_ns = self.data_timeout_ms.load(Ordering::SeqCst) * 1_000_000;
        if now_ns.saturating_sub(last_data) > data_timeout_ns {
            self.send_ping(now_ns);
        }
    }

    fn on_close(&self) {
        info!(connector = %self.name(), "connection closing");
        let was_started = self.started.swap(false, Ordering::SeqCst);
        self.observer.invalidate_data(None, ProfilingTag::now());
        if was_started {
            self.observer.connector_error(DataError::RemoteClosed);
        }
    }
}

impl fmt::Debug for OkxMarketConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OkxMarketConnector")
            .field("name", &self.name())
            .field("started", &self.started.load(Ordering::SeqCst))
            .finish()
    }
}

use crate::{
    account::AccountLedger,
    connector::TradeConnector,
    constraints::{TradeConstraints, parse_limits_csv},
    error::ExecutionError,
    observer::AccountObserver,
    order::{OrderHandle, OrderState, OrderStatus},
};
use arbiter_data::config::{ConnectorConfig, DictionaryEntry};
use arbiter_instrument::{
    Side, asset::SymbolIndex, dictionary::ExchangeDictionary, instrument::InstrumentIndex,
    numeric::FixedNumber, registry::InstrumentRegistry,
};
use arbiter_integration::{
    profile::{ProfilingTag, unix_time_ns},
    protocol::{
        http::RestClient,
        websocket::{StreamHandler, WsSession},
    },
    signer::sign_request,
    timer::{Timer, TimerService},
};
use async_trait::async_trait;
use bytes::Bytes;
use message::{
    CHANNEL_CANCEL_ORDER, CHANNEL_ORDER, CHANNEL_ORDER_INFO, CHANNEL_USER_INFO, CommandFrame,
    ERROR_ALREADY_FINISHED, PING_FRAME, TradeData, TradeEnvelope, WS_URL,
};
use parking_lot::Mutex;
use smol_str::SmolStr;
use std::{
    collections::{BTreeMap, VecDeque},
    fmt,
    future::Future,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

/// OKX spot wire dialect.
pub mod message;

/// Per-request REST timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Milliseconds before an unacknowledged command triggers a response timeout.
const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 2_000;

/// Milliseconds between keep-alive pings.
const DEFAULT_PING_INTERVAL_MS: u64 = 30_000;

/// Milliseconds without a pong before the ping is considered lost.
const DEFAULT_PING_TIMEOUT_MS: u64 = 1_000;

/// Logical command channel with its own reply-correlation FIFO.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum CommandChannel {
    Place = 0,
    Cancel = 1,
    Info = 2,
}

/// OKX spot authenticated trade connector.
///
/// Commands (place, cancel, order-info, account-info) travel as signed frames over one
/// WebSocket session; replies correlate FIFO per command channel. Balance and reservation
/// bookkeeping lives in the embedded [`AccountLedger`].
pub struct OkxTradeConnector {
    weak: Weak<Self>,
    observer: Arc<dyn AccountObserver>,
    registry: Arc<InstrumentRegistry>,
    ledger: AccountLedger,
    rest: RestClient,
    name: Mutex<SmolStr>,
    dictionary: Mutex<ExchangeDictionary>,
    session: Mutex<Option<WsSession>>,
    runtime: Mutex<Option<Handle>>,
    started: AtomicBool,
    api_key: Mutex<String>,
    secret: Mutex<String>,
    limits_url: Mutex<Option<String>>,
    ws_url: Mutex<String>,
    /// Reply-correlation FIFOs, one per command channel.
    pending: Mutex<[VecDeque<OrderHandle>; 3]>,
    /// Send timestamps of unacknowledged frames, oldest first.
    send_timestamps: Mutex<VecDeque<u64>>,
    /// One-shot response-timeout latch; re-arms when the send queue drains.
    timeout_latched: AtomicBool,
    response_timeout_ms: AtomicU64,
    ping_timer: Mutex<Option<Timer>>,
    ping_interval_ms: AtomicU64,
    ping_timeout_ms: AtomicU64,
    last_ping_ns: AtomicU64,
}

impl OkxTradeConnector {
    pub fn new(
        observer: Arc<dyn AccountObserver>,
        registry: Arc<InstrumentRegistry>,
    ) -> Arc<Self> {
        let ledger = AccountLedger::new(&registry);
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            observer,
            registry,
            ledger,
            rest: RestClient::new(),
            name: Mutex::new(SmolStr::new_static("okx")),
            dictionary: Mutex::new(ExchangeDictionary::new()),
            session: Mutex::new(None),
            runtime: Mutex::new(None),
            started: AtomicBool::new(false),
            api_key: Mutex::new(String::new()),
            secret: Mutex::new(String::new()),
            limits_url: Mutex::new(None),
            ws_url: Mutex::new(WS_URL.to_string()),
            pending: Mutex::new([VecDeque::new(), VecDeque::new(), VecDeque::new()]),
            send_timestamps: Mutex::new(VecDeque::new()),
            timeout_latched: AtomicBool::new(false),
            response_timeout_ms: AtomicU64::new(DEFAULT_RESPONSE_TIMEOUT_MS),
            ping_timer: Mutex::new(None),
            ping_interval_ms: AtomicU64::new(DEFAULT_PING_INTERVAL_MS),
            ping_timeout_ms: AtomicU64::new(DEFAULT_PING_TIMEOUT_MS),
            last_ping_ns: AtomicU64::new(0),
        })
    }

    /// Account bookkeeping behind this connector.
    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

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

    /// Sign `extra` parameters together with the API key, injecting the `sign` field.
    fn signed_params(&self, extra: Vec<(&'static str, String)>) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("api_key".to_string(), self.api_key.lock().clone());
        for (key, value) in extra {
            params.insert(key.to_string(), value);
        }

        let signature = sign_request(&params, &self.secret.lock());
        params.insert("sign".to_string(), signature);
        params
    }

    /// Serialise and transmit a frame, recording its send timestamp.
    fn send_frame(&self, frame: &CommandFrame<'_>) -> bool {
        let payload = match serde_json::to_string(frame) {
            Ok(payload) => payload,
            Err(serialise_error) => {
                error!(%serialise_error, "failed to serialise command frame");
                return false;
            }
        };

        let session = self.session.lock();
        let Some(session) = session.as_ref() else {
            warn!(connector = %self.name(), "command issued without an established session");
            return false;
        };

        if session.write_text(payload).is_err() {
            return false;
        }

        self.send_timestamps.lock().push_back(unix_time_ns());
        true
    }

    /// Enqueue the correlated order, then transmit the signed command frame.
    ///
    /// The enqueue happens before the write so the reply can never race an empty FIFO; a
    /// failed write rolls the enqueue back.
    fn send_command(
        &self,
        channel: CommandChannel,
        wire_channel: &'static str,
        order: &OrderHandle,
        extra: Vec<(&'static str, String)>,
    ) -> bool {
        let params = self.signed_params(extra);
        let frame = CommandFrame::command(wire_channel, &params);

        let mut pending = self.pending.lock();
        pending[channel as usize].push_back(Arc::clone(order));
        if !self.send_frame(&frame) {
            pending[channel as usize].pop_back();
            return false;
        }

        true
    }

    /// Pop the correlated order for a reply; an empty FIFO is a desynchronisation.
    fn dequeue(&self, channel: CommandChannel) -> Option<OrderHandle> {
        let mut pending = self.pending.lock();
        let order = pending[channel as usize].pop_front();
        if order.is_none() {
            error!(?channel, "request desync: reply with no pending command");
        }
        order
    }

    /// Swap the new status in and forward the replaced one to the observer.
    fn update_order_status(&self, order: &OrderHandle, mut status: OrderStatus, tag: ProfilingTag) {
        let previous_state = order.status().state;
        if !previous_state.permits(status.state) && previous_state != status.state {
            warn!(
                ?previous_state,
                next = ?status.state,
                "order state transition outside the lifecycle machine"
            );
        }

        order.swap_status(&mut status);
        self.observer
            .order_status_changed(Arc::clone(order), status, tag);
    }

    /// Send the venue login event.
    pub fn login(&self) -> bool {
        let params = self.signed_params(Vec::new());
        self.send_frame(&CommandFrame::login(&params))
    }

    fn on_login(&self, data: Option<&TradeData>) {
        let failed = match data {
            Some(data) => !data.is_success() || data.error.is_some(),
            None => true,
        };

        if failed {
            self.observer.connector_error(ExecutionError::LoginFailed);
        } else {
            debug!(connector = %self.name(), "login acknowledged");
        }
    }

    fn on_order_placed(&self, data: Option<TradeData>, recv_time_ns: u64) {
        let Some(order) = self.dequeue(CommandChannel::Place) else {
            return;
        };
        let data = data.unwrap_or_default();
        let tag = ProfilingTag::from_ns(recv_time_ns);

        if !data.is_success() {
            if let Some(code) = data.error_code {
                error!(order = ?order, error_code = code, "order placement failed");
            }
            let mut status = order.status();
            status.state = OrderState::Failed;
            self.update_order_status(&order, status, tag);
            return;
        }

        let order_id = data
            .order_id
            .map(|id| id.as_smolstr())
            .unwrap_or_default();

        if order.execution() == crate::order::ExecutionType::Ioc {
            // Emulated IOC: record the placement silently and race a cancel against the fill.
            // The observer sees only the final Cancelled or Filled state.
            order.with_status(|status| {
                status.state = OrderState::Placed;
                status.order_id = order_id;
            });
            if !self.cancel_order(&order) {
                error!(order = ?order, "failed to issue the emulated IOC cancel");
            }
            return;
        }

        let mut status = order.status();
        status.state = OrderState::Placed;
        status.order_id = order_id;
        self.update_order_status(&order, status, tag);
    }

    fn on_order_cancelled(&self, data: Option<TradeData>, recv_time_ns: u64) {
        let Some(order) = self.dequeue(CommandChannel::Cancel) else {
            return;
        };
        let data = data.unwrap_or_default();
        let tag = ProfilingTag::from_ns(recv_time_ns);
        let mut status = order.status();

        if !data.is_success() {
            if data.error_code == Some(ERROR_ALREADY_FINISHED) {
                if status.state == OrderState::Cancelled {
                    // Tried to cancel a cancelled order; nothing changed.
                    return;
                }
                // Tried to cancel a filled order.
                status.state = OrderState::Filled;
            } else {
                status.state = OrderState::Unknown;
            }
            self.update_order_status(&order, status, tag);
            return;
        }

        status.state = OrderState::Cancelled;
        status.cancelled_ms = (recv_time_ns / 1_000_000) as i64;
        self.update_order_status(&order, status, tag);
    }

    fn on_order_info(&self, data: Option<TradeData>, recv_time_ns: u64) {
        let Some(rows) = data.and_then(|data| data.orders) else {
            return;
        };
        let tag = ProfilingTag::from_ns(recv_time_ns);

        for row in rows {
            let head = {
                let pending = self.pending.lock();
                pending[CommandChannel::Info as usize].front().cloned()
            };
            let Some(order) = head else {
                error!("order info desync: no order info requests pending");
                break;
            };

            let Some(state) = row.status.and_then(map_venue_status) else {
                warn!(status = ?row.status, "venue order status cannot be mapped");
                continue;
            };

            let row_id = row.order_id.map(|id| id.as_smolstr()).unwrap_or_default();
            let mut status = order.status();
            if status.order_id != row_id {
                warn!(
                    got = %row_id,
                    pending = %status.order_id,
                    "order info desync: response order id does not match the pending head"
                );
                continue;
            }

            // The head matched; consume it.
            self.pending.lock()[CommandChannel::Info as usize].pop_front();

            status.state = state;
            if let Some(price) = row.avg_price {
                status.filled_price = price;
            }
            if let Some(amount) = row.deal_amount {
                status.filled_amount = amount;
            }
            self.update_order_status(&order, status, tag);
        }
    }

    fn on_account_info(&self, data: Option<TradeData>, recv_time_ns: u64) {
        let Some(free) = data
            .and_then(|data| data.info)
            .and_then(|info| info.funds)
            .and_then(|funds| funds.free)
        else {
            return;
        };
        let tag = ProfilingTag::from_ns(recv_time_ns);

        let translations: Vec<(SymbolIndex, FixedNumber)> = {
            let dictionary = self.dictionary.lock();
            free.into_iter()
                .filter_map(|(name, value)| {
                    dictionary
                        .symbol_from_exchange(&name)
                        .map(|symbol| (symbol, value))
                })
                .collect()
        };

        for (symbol, value) in translations {
            self.ledger.set_available(symbol, &value);
            self.observer.balance_received(symbol, value, tag);
        }
    }

    fn send_ping(&self, now_ns: u64) {
        let session = self.session.lock();
        let Some(session) = session.as_ref() else {
            return;
        };

        if let Some(timer) = self.ping_timer.lock().as_ref() {
            timer.start(Duration::from_millis(
                self.ping_timeout_ms.load(Ordering::SeqCst),
            ));
        }
        if session.write_text(PING_FRAME.to_string()).is_ok() {
            self.last_ping_ns.store(now_ns, Ordering::SeqCst);
            self.send_timestamps.lock().push_back(now_ns);
        }
    }

    fn on_ping_timeout(&self) {
        error!(connector = %self.name(), "ping timeout");
        self.observer.connector_error(ExecutionError::PingTimeout);
    }

    fn spawn_request(&self, request: impl Future<Output = ()> + Send + 'static) {
        match self.runtime.lock().as_ref() {
            Some(runtime) => {
                runtime.spawn(request);
            }
            None => {
                warn!(connector = %self.name(), "request issued before start");
                self.observer.connector_error(ExecutionError::NotStarted);
            }
        }
    }

    /// Fetch the configured trade limits CSV and ingest its rows.
    fn fetch_limits(&self) {
        let Some(url) = self.limits_url.lock().clone() else {
            return;
        };
        let Some(connector) = self.weak.upgrade() else {
            return;
        };

        self.spawn_request(async move {
            match connector.rest.get_text(&url, REQUEST_TIMEOUT).await {
                Ok(body) => connector.ingest_limits(&body),
                Err(request_error) => connector
                    .observer
                    .connector_error(ExecutionError::Socket(request_error)),
            }
        });
    }

    fn ingest_limits(&self, body: &str) {
        let rows = parse_limits_csv(body);
        let dictionary = self.dictionary.lock();

        for row in rows {
            let Some(instrument) = dictionary.instrument_from_exchange(&row.instrument) else {
                continue;
            };

            let mut constraints = self.ledger.constraints(instrument);
            constraints.amount_min = row.amount_min;
            constraints.amount_quantum = row.amount_quantum;
            constraints.price_quantum = row.price_quantum;
            self.ledger.set_constraints(instrument, constraints);
        }
    }
}

/// Venue order status code → internal state.
fn map_venue_status(status: i64) -> Option<OrderState> {
    match status {
        -1 => Some(OrderState::Cancelled),
        0 => Some(OrderState::Placed),
        1 => Some(OrderState::PartialFilled),
        2 => Some(OrderState::Filled),
        4 => Some(OrderState::PartialCancelled),
        _ => None,
    }
}

#[async_trait]
impl TradeConnector for OkxTradeConnector {
    fn configure(&self, config: &str) -> Result<(), ExecutionError> {
        let config = ConnectorConfig::parse(config)
            .map_err(|parse_error| ExecutionError::Config(parse_error.to_string()))?;

        // Track balances and reservations for everything the dictionary names.
        for entry in config.dictionary.values() {
            match entry {
                DictionaryEntry::Instrument([base, quote]) => {
                    if let Some(instrument) = self.registry.find_instrument_by_name(base, quote) {
                        self.ledger.add_instrument(instrument);
                        let pair = self.registry.instrument(instrument);
                        self.ledger.add_symbol(pair.base);
                        self.ledger.add_symbol(pair.quote);
                    }
                }
                DictionaryEntry::Symbol(symbol) => {
                    if let Some(symbol) = self.registry.find_symbol(symbol) {
                        self.ledger.add_symbol(symbol);
                    }
                }
            }
        }

        *self.dictionary.lock() = config.build_dictionary(&self.registry);
        *self.limits_url.lock() = config.limits_url;
        if let Some(api_key) = config.api_key {
            *self.api_key.lock() = api_key;
        }
        if let Some(secret) = config.secret {
            *self.secret.lock() = secret;
        }
        if let Some(fee) = config.maker_fee {
            self.ledger.set_maker_fee(fee);
        }
        if let Some(fee) = config.taker_fee {
            self.ledger.set_taker_fee(fee);
        }
        if let Some(url) = config.ws_url {
            *self.ws_url.lock() = url;
        }
        if let Some(ms) = config.response_timeout {
            self.response_timeout_ms.store(ms, Ordering::SeqCst);
        }
        if let Some(ms) = config.ping_timeout {
            self.ping_timeout_ms.store(ms, Ordering::SeqCst);
        }

        Ok(())
    }

    async fn start(self: Arc<Self>) -> Result<(), ExecutionError> {
        *self.runtime.lock() = Some(Handle::current());

        let weak = Weak::clone(&self.weak);
        *self.ping_timer.lock() = Some(TimerService::new().timer(move || {
            if let Some(connector) = weak.upgrade() {
                connector.on_ping_timeout();
            }
        }));

        self.fetch_limits();

        let url = self.ws_url.lock().clone();
        let session = WsSession::connect(url, Arc::clone(&self) as Arc<dyn StreamHandler>)
            .await
            .map_err(ExecutionError::Socket)?;
        *self.session.lock() = Some(session);

        // Fresh connection: reset correlation bookkeeping.
        self.send_timestamps.lock().clear();
        self.timeout_latched.store(false, Ordering::SeqCst);
        self.started.store(true, Ordering::SeqCst);

        if !self.api_key.lock().is_empty() {
            self.login();
        }

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

    fn place_order(&self, order: &OrderHandle) -> bool {
        let Some(symbol) = self.exchange_symbol(order.instrument()) else {
            return false;
        };

        let order_type = match (order.execution(), order.side()) {
            (crate::order::ExecutionType::Market, Side::Bid) => "buy_market",
            (crate::order::ExecutionType::Market, Side::Ask) => "sell_market",
            (_, Side::Bid) => "buy",
            (_, Side::Ask) => "sell",
        };

        order.with_status(|status| {
            if status.state == OrderState::None {
                status.state = OrderState::Unknown;
            }
        });

        self.send_command(
            CommandChannel::Place,
            CHANNEL_ORDER,
            order,
            vec![
                ("symbol", symbol.to_string()),
                ("type", order_type.to_string()),
                ("price", order.price().to_string()),
                ("amount", order.amount().to_string()),
            ],
        )
    }

    fn cancel_order(&self, order: &OrderHandle) -> bool {
        let Some(symbol) = self.exchange_symbol(order.instrument()) else {
            return false;
        };

        let order_id = order.status().order_id;
        if order_id.is_empty() {
            return false;
        }

        self.send_command(
            CommandChannel::Cancel,
            CHANNEL_CANCEL_ORDER,
            order,
            vec![
                ("symbol", symbol.to_string()),
                ("order_id", order_id.to_string()),
            ],
        )
    }

    fn order_status(&self, order: &OrderHandle) -> bool {
        let Some(symbol) = self.exchange_symbol(order.instrument()) else {
            return false;
        };

        let order_id = order.status().order_id;
        if order_id.is_empty() {
            return false;
        }

        self.send_command(
            CommandChannel::Info,
            CHANNEL_ORDER_INFO,
            order,
            vec![
                ("symbol", symbol.to_string()),
                ("order_id", order_id.to_string()),
            ],
        )
    }

    fn orders_list(&self) -> bool {
        debug!(connector = %self.name(), "open order listing is not exposed by this dialect");
        true
    }

    fn fetch_balance(&self) -> bool {
        let params = self.signed_params(Vec::new());
        self.send_frame(&CommandFrame::command(CHANNEL_USER_INFO, &params))
    }

    fn balance(&self, symbol: SymbolIndex) -> f64 {
        self.ledger.balance(symbol)
    }

    fn reserve_balance(&self, symbol: SymbolIndex, quantity: f64) -> bool {
        self.ledger.reserve_balance(symbol, quantity)
    }

    fn unreserve_balance(&self, symbol: SymbolIndex, quantity: f64) -> bool {
        self.ledger.unreserve_balance(symbol, quantity)
    }

    fn reserve_item(
        &self,
        instrument: InstrumentIndex,
        side: Side,
        price: &FixedNumber,
        displayed_amount: &FixedNumber,
        quantity: &FixedNumber,
    ) -> bool {
        self.ledger
            .reserve_item(instrument, side, price, displayed_amount, quantity)
    }

    fn unreserve_item(
        &self,
        instrument: InstrumentIndex,
        side: Side,
        price: &FixedNumber,
        quantity: &FixedNumber,
    ) -> bool {
        self.ledger.unreserve_item(instrument, side, price, quantity)
    }

    fn item_reserve(&self, instrument: InstrumentIndex, side: Side, price: &FixedNumber) -> f64 {
        self.ledger.item_reserve(instrument, side, price)
    }

    fn maker_fee(&self) -> f64 {
        self.ledger.maker_fee()
    }

    fn set_maker_fee(&self, fee: f64) {
        self.ledger.set_maker_fee(fee);
    }

    fn taker_fee(&self) -> f64 {
        self.ledger.taker_fee()
    }

    fn set_taker_fee(&self, fee: f64) {
        self.ledger.set_taker_fee(fee);
    }

    fn constraints(&self, instrument: InstrumentIndex) -> TradeConstraints {
        self.ledger.constraints(instrument)
    }

    fn name(&self) -> SmolStr {
        self.name.lock().clone()
    }

    fn set_name(&self, name: &str) {
        *self.name.lock() = SmolStr::new(name);
    }
}

impl StreamHandler for OkxTradeConnector {
    fn on_data(&self, payload: Bytes, recv_time_ns: u64) {
        if payload.as_ref() == br#"{"event":"pong"}"# {
            if let Some(timer) = self.ping_timer.lock().as_ref() {
                timer.stop();
            }
        } else {
            match serde_json::from_slice::<Vec<TradeEnvelope>>(&payload) {
                Ok(envelopes) => {
                    for envelope in envelopes {
                        self.dispatch(envelope, recv_time_ns);
                    }
                }
                Err(parse_error) => {
                    debug!(%parse_error, "discarding unrecognised trade payload");
                }
            }
        }

        // One reply acknowledges one sent frame; the timeout latch re-arms on drain.
        let mut timestamps = self.send_timestamps.lock();
        timestamps.pop_front();
        if timestamps.is_empty() {
            self.timeout_latched.store(false, Ordering::SeqCst);
        }
    }

    fn check_timers(&self, now_ns: u64) {
        if !self.started.load(Ordering::SeqCst) {
            return;
        }

        let last_ping = self.last_ping_ns.load(Ordering::SeqCst);
        let ping_interval_ns = self.ping_interval_ms.load(Ordering::SeqCst) * 1_000_000;
        if now_ns.saturating_sub(last_ping) > ping_interval_ns {
            self.send_ping(now_ns);
        }

        if !self.timeout_latched.load(Ordering::SeqCst) {
            let oldest = self.send_timestamps.lock().front().copied();
            if let Some(oldest) = oldest {
                let response_timeout_ns =
                    self.response_timeout_ms.load(Ordering::SeqCst) * 1_000_000;
                if now_ns.saturating_sub(oldest) > response_timeout_ns {
                    self.timeout_latched.store(true, Ordering::SeqCst);
                    self.observer
                        .connector_error(ExecutionError::ResponseTimeout);
                }
            }
        }
    }

    fn on_close(&self) {
        let was_started = self.started.swap(false, Ordering::SeqCst);
        self.send_timestamps.lock().clear();
        self.timeout_latched.store(false, Ordering::SeqCst);

        if was_started {
            self.observer.connector_error(ExecutionError::RemoteClosed);
        }
    }
}

impl OkxTradeConnector {
    fn dispatch(&self, envelope: TradeEnvelope, recv_time_ns: u64) {
        if envelope.event.as_deref() == Some("pong") {
            if let Some(timer) = self.ping_timer.lock().as_ref() {
                timer.stop();
            }
            return;
        }

        if envelope.event.as_deref() == Some("login")
            || envelope.channel.as_deref() == Some("login")
        {
            self.on_login(envelope.data.as_ref());
            return;
        }

        match envelope.channel.as_deref() {
            Some(CHANNEL_ORDER_INFO) => self.on_order_info(envelope.data, recv_time_ns),
            Some(CHANNEL_ORDER) => self.on_order_placed(envelope.data, recv_time_ns),
            Some(CHANNEL_CANCEL_ORDER) => self.on_order_cancelled(envelope.data, recv_time_ns),
            Some(CHANNEL_USER_INFO) => self.on_account_info(envelope.data, recv_time_ns),
            other => debug!(channel = ?other, "unrouted trade message"),
        }
    }
}

impl fmt::Debug for OkxTradeConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OkxTradeConnector")
            .field("name", &self.name())
            .field("started", &self.started.load(Ordering::SeqCst))
            .finish()
    }
}

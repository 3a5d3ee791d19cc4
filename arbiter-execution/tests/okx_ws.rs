use arbiter_execution::{
    connector::TradeConnector,
    error::ExecutionError,
    exchange::okx::OkxTradeConnector,
    observer::AccountObserver,
    order::{ExecutionType, OrderHandle, OrderState, OrderStatus, TradeOrder},
};
use arbiter_instrument::{
    Side, asset::SymbolIndex, numeric::FixedNumber, registry::InstrumentRegistry,
};
use arbiter_integration::profile::ProfilingTag;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{WebSocketStream, accept_async, tungstenite::Message};

#[derive(Debug, Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

#[derive(Debug)]
enum Event {
    Status {
        state: OrderState,
        previous: OrderState,
        order_id: String,
    },
    Balance,
    Error(String),
}

impl AccountObserver for Recorder {
    fn order_status_changed(&self, order: OrderHandle, previous: OrderStatus, _: ProfilingTag) {
        let status = order.status();
        self.events.lock().push(Event::Status {
            state: status.state,
            previous: previous.state,
            order_id: status.order_id.to_string(),
        });
    }

    fn balance_received(&self, _: SymbolIndex, _: FixedNumber, _: ProfilingTag) {
        self.events.lock().push(Event::Balance);
    }

    fn connector_error(&self, error: ExecutionError) {
        self.events.lock().push(Event::Error(error.to_string()));
    }
}

fn fixed(input: &str) -> FixedNumber {
    input.parse().unwrap()
}

/// Read the next command frame, transparently answering keep-alive pings.
async fn next_command(ws: &mut WebSocketStream<TcpStream>) -> Value {
    loop {
        let message = ws
            .next()
            .await
            .expect("connection ended early")
            .expect("websocket error");
        let Message::Text(payload) = message else {
            continue;
        };

        let frame: Value = serde_json::from_str(&payload).unwrap();
        if frame["event"] == "ping" {
            ws.send(Message::text(r#"{"event":"pong"}"#)).await.unwrap();
            continue;
        }
        return frame;
    }
}

async fn reply(ws: &mut WebSocketStream<TcpStream>, channel: &str, data: Value) {
    let payload = json!([{ "channel": channel, "data": data }]).to_string();
    ws.send(Message::text(payload)).await.unwrap();
}

async fn wait_until(recorder: &Recorder, predicate: impl Fn(&[Event]) -> bool) {
    for _ in 0..300 {
        if predicate(&recorder.events.lock()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached, events: {:?}", &*recorder.events.lock());
}

async fn started_connector(
    addr: std::net::SocketAddr,
) -> (Arc<OkxTradeConnector>, Arc<Recorder>, arbiter_instrument::instrument::InstrumentIndex) {
    let registry = Arc::new(InstrumentRegistry::new());
    let instrument = registry.add_instrument_by_name("btc", "usdt");

    let observer = Arc::new(Recorder::default());
    let connector = OkxTradeConnector::new(Arc::clone(&observer) as _, registry);
    connector
        .configure(&format!(
            r#"{{
                "dictionary": {{"btc_usdt": ["btc", "usdt"]}},
                "api-key": "key",
                "secret": "shh",
                "ws-url": "ws://{addr}"
            }}"#
        ))
        .unwrap();

    Arc::clone(&connector).start().await.unwrap();
    (connector, observer, instrument)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn place_replies_correlate_in_issue_order() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let login = next_command(&mut ws).await;
        assert_eq!(login["event"], "login");
        assert!(login["parameters"]["sign"].is_string());
        reply(&mut ws, "login", json!({"result": true})).await;

        let place_a = next_command(&mut ws).await;
        assert_eq!(place_a["channel"], "ok_spot_order");
        // The outbound amount field carries the order amount, not the price.
        assert_eq!(place_a["parameters"]["amount"], "0.5");
        assert_eq!(place_a["parameters"]["price"], "100.25");
        assert_eq!(place_a["parameters"]["type"], "buy");
        assert!(place_a["parameters"].get("secret_key").is_none());

        let place_b = next_command(&mut ws).await;
        assert_eq!(place_b["parameters"]["amount"], "0.7");

        reply(&mut ws, "ok_spot_order", json!({"result": true, "order_id": "A"})).await;
        reply(&mut ws, "ok_spot_order", json!({"result": true, "order_id": "B"})).await;

        let _ = tokio::time::timeout(Duration::from_secs(2), ws.next()).await;
    });

    let (connector, observer, instrument) = started_connector(addr).await;
    let handle: Arc<dyn TradeConnector> = Arc::clone(&connector) as _;

    let order_a = TradeOrder::new(
        &handle,
        instrument,
        Side::Bid,
        ExecutionType::Limit,
        fixed("0.5"),
        fixed("100.25"),
    );
    let order_b = TradeOrder::new(
        &handle,
        instrument,
        Side::Bid,
        ExecutionType::Limit,
        fixed("0.7"),
        fixed("100.30"),
    );

    assert!(order_a.place());
    assert!(order_b.place());

    wait_until(&observer, |events| {
        events
            .iter()
            .filter(|event| matches!(event, Event::Status { .. }))
            .count()
            == 2
    })
    .await;

    let events = observer.events.lock();
    let placements: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::Status { .. }))
        .collect();
    assert!(
        matches!(placements[0], Event::Status { state: OrderState::Placed, order_id, .. } if order_id == "A")
    );
    assert!(
        matches!(placements[1], Event::Status { state: OrderState::Placed, order_id, .. } if order_id == "B")
    );
    drop(events);

    assert_eq!(order_a.status().order_id, "A");
    assert_eq!(order_b.status().order_id, "B");

    connector.stop();
    server.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ioc_cancel_rejected_as_already_filled_ends_filled() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let login = next_command(&mut ws).await;
        assert_eq!(login["event"], "login");
        reply(&mut ws, "login", json!({"result": true})).await;

        let place = next_command(&mut ws).await;
        assert_eq!(place["channel"], "ok_spot_order");
        reply(&mut ws, "ok_spot_order", json!({"result": true, "order_id": "X"})).await;

        // The emulated IOC races a cancel right behind the placement.
        let cancel = next_command(&mut ws).await;
        assert_eq!(cancel["channel"], "ok_spot_cancel_order");
        assert_eq!(cancel["parameters"]["order_id"], "X");
        reply(
            &mut ws,
            "ok_spot_cancel_order",
            json!({"result": false, "error_code": 1050}),
        )
        .await;

        let _ = tokio::time::timeout(Duration::from_secs(2), ws.next()).await;
    });

    let (connector, observer, instrument) = started_connector(addr).await;
    let handle: Arc<dyn TradeConnector> = Arc::clone(&connector) as _;

    let order = TradeOrder::new(
        &handle,
        instrument,
        Side::Bid,
        ExecutionType::Ioc,
        fixed("0.5"),
        fixed("100"),
    );
    assert!(order.place());

    wait_until(&observer, |events| {
        events
            .iter()
            .any(|event| matches!(event, Event::Status { .. }))
    })
    .await;

    let events = observer.events.lock();
    let statuses: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::Status { .. }))
        .collect();
    assert_eq!(statuses.len(), 1, "only the terminal state is observed");
    assert!(
        matches!(statuses[0], Event::Status { state: OrderState::Filled, previous: OrderState::Placed, order_id } if order_id == "X")
    );
    drop(events);

    let status = order.status();
    assert_eq!(status.state, OrderState::Filled);
    // The venue reply carried no fill details, so both stay zero.
    assert!(status.filled_amount.is_zero());
    assert!(status.filled_price.is_zero());

    connector.stop();
    server.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ioc_cancel_success_ends_cancelled() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        let login = next_command(&mut ws).await;
        assert_eq!(login["event"], "login");
        reply(&mut ws, "login", json!({"result": true})).await;

        let place = next_command(&mut ws).await;
        assert_eq!(place["channel"], "ok_spot_order");
        reply(&mut ws, "ok_spot_order", json!({"result": true, "order_id": "Y"})).await;

        let cancel = next_command(&mut ws).await;
        assert_eq!(cancel["parameters"]["order_id"], "Y");
        reply(&mut ws, "ok_spot_cancel_order", json!({"result": true})).await;

        let _ = tokio::time::timeout(Duration::from_secs(2), ws.next()).await;
    });

    let (connector, observer, instrument) = started_connector(addr).await;
    let handle: Arc<dyn TradeConnector> = Arc::clone(&connector) as _;

    let order = TradeOrder::new(
        &handle,
        instrument,
        Side::Ask,
        ExecutionType::Ioc,
        fixed("0.25"),
        fixed("101"),
    );
    assert!(order.place());

    wait_until(&observer, |events| {
        events
            .iter()
            .any(|event| matches!(event, Event::Status { .. }))
    })
    .await;

    assert_eq!(order.status().state, OrderState::Cancelled);
    let events = observer.events.lock();
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::Status { state: OrderState::Placed, .. })),
        "the observer never sees the intermediate Placed state"
    );
    drop(events);

    connector.stop();
    server.await.unwrap();
}

//! PUB → SUB over loopback TCP.
//!
//! A SUB socket only starts receiving once its subscription has reached the
//! publisher, so each test re-publishes until the first message arrives.

use std::time::Duration;

use telemetry_api::{now_secs, ErrorKind, TransportSink, WireUnit};
use transport_zmq::ZmqPubSink;
use zeromq::{Socket, SocketRecv, SubSocket, ZmqMessage};

const COUNTER0: &[u8] = br#"{"ticks":0,"data":{"cos":1.0,"sin":0.0,"floor":1.0,"ceil":1.0}}"#;

async fn publish_until_received(
    sink: &mut ZmqPubSink,
    sub: &mut SubSocket,
    unit: &WireUnit,
) -> ZmqMessage {
    for _ in 0..100 {
        sink.send(unit).await.expect("send");
        if let Ok(Ok(message)) = tokio::time::timeout(Duration::from_millis(50), sub.recv()).await {
            return message;
        }
    }
    panic!("no message received from {}", sink.endpoint());
}

fn parts(message: ZmqMessage) -> Vec<Vec<u8>> {
    message.into_vec().into_iter().map(|b| b.to_vec()).collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn topic_payload_timestamp_arrive_in_order() {
    let mut sink = ZmqPubSink::bind("tcp://127.0.0.1:0").await.unwrap();

    let mut sub = SubSocket::new();
    sub.connect(sink.endpoint()).await.unwrap();
    sub.subscribe("imu").await.unwrap();

    let sent_at = now_secs();
    let mut unit = WireUnit::new();
    unit.push(b"imu".to_vec());
    unit.push(COUNTER0.to_vec());
    unit.push(sent_at.to_string().into_bytes());

    let got = parts(publish_until_received(&mut sink, &mut sub, &unit).await);
    assert_eq!(got.len(), 3);
    assert_eq!(got[0], b"imu");
    let payload: serde_json::Value = serde_json::from_slice(&got[1]).unwrap();
    assert_eq!(payload["ticks"], 0);
    assert_eq!(payload["data"]["cos"].as_f64(), Some(1.0));
    let ts: f64 = std::str::from_utf8(&got[2]).unwrap().parse().unwrap();
    assert!((ts - sent_at).abs() < 1e-6);
}

#[tokio::test(flavor = "multi_thread")]
async fn single_part_unit_without_topic() {
    let mut sink = ZmqPubSink::bind("tcp://127.0.0.1:0").await.unwrap();

    let mut sub = SubSocket::new();
    sub.connect(sink.endpoint()).await.unwrap();
    sub.subscribe("").await.unwrap();

    let unit = WireUnit::single(COUNTER0.to_vec());
    let got = parts(publish_until_received(&mut sink, &mut sub, &unit).await);
    assert_eq!(got, vec![COUNTER0.to_vec()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn second_bind_on_same_port_fails_with_init() {
    let sink = ZmqPubSink::bind("tcp://127.0.0.1:0").await.unwrap();
    let err = ZmqPubSink::bind(sink.endpoint()).await.err().expect("port already bound");
    assert_eq!(err.kind(), ErrorKind::Init);
}

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use codec_json::JsonCodec;
use pipeline::{spawn_publisher, synthesizer_for, Cadence, EndpointConfig, FrameEncoder, Publisher};
use telemetry_api::TransportSink;
use transport_udp::UdpSink;
use transport_zmq::ZmqPubSink;

use crate::config::{UdpArgs, ZmqArgs};
use crate::error::GenError;

pub async fn run_udp(args: UdpArgs) -> Result<(), GenError> {
    let cfg = args.endpoint()?;
    tracing::info!(
        family = %cfg.family(),
        address = %cfg.address(),
        port = cfg.port(),
        "opening UDP publisher"
    );

    let sink = UdpSink::open(cfg.socket_addr()).await?;
    run(&cfg, Box::new(sink), Cadence::datagram()).await
}

pub async fn run_zmq(args: ZmqArgs) -> Result<(), GenError> {
    let cfg = args.endpoint();
    if cfg.timestamp_without_topic() {
        tracing::warn!("--timestamp without --topic: payload goes first, topic filtering will not work");
    }

    let sink = ZmqPubSink::bind_addr(cfg.socket_addr()).await?;
    tracing::info!(
        endpoint = %sink.endpoint(),
        topic = cfg.topic().unwrap_or("-"),
        timestamp = cfg.include_timestamp(),
        "opening ZeroMQ publisher"
    );
    run(&cfg, Box::new(sink), Cadence::pub_sub()).await
}

// ═══════════════════════════════════════════════════════════════
//  Shared loop: publisher task + Ctrl+C
// ═══════════════════════════════════════════════════════════════

async fn run(cfg: &EndpointConfig, sink: Box<dyn TransportSink>, cadence: Cadence) -> Result<(), GenError> {
    let token = CancellationToken::new();

    let publisher = Publisher::new(
        cfg.transport().to_string(),
        cadence,
        synthesizer_for(cfg.transport()),
        FrameEncoder::for_config(Arc::new(JsonCodec), cfg),
        sink,
    )?;
    let handle = spawn_publisher(publisher, token.clone());

    tracing::info!("publishing... (Ctrl+C to stop)");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down...");

    token.cancel();
    let stats = handle.await?;
    tracing::info!(ticks = stats.ticks, sent = stats.sent, failed = stats.failed, "done");
    Ok(())
}

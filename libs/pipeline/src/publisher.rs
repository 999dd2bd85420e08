use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use telemetry_api::{Tick, TransportSink};

use crate::cadence::Cadence;
use crate::endpoint::FrameEncoder;
use crate::synth::Synthesizer;
use crate::PipelineError;

/// Периодичность промежуточного отчёта (в тиках).
const REPORT_EVERY: u64 = 100;

/// Счётчики цикла публикации.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    pub ticks: u64,
    pub sent: u64,
    pub failed: u64,
}

// ═══════════════════════════════════════════════════════════════
//  Publisher: cadence → synthesize → encode → send
// ═══════════════════════════════════════════════════════════════

/// Единый конвейер для обоих транспортов.
///
/// Итерация синхронна: sleep → synthesize → encode → send. Ошибки
/// отправки и кодирования не прерывают цикл: unit/запись пропускается,
/// повторов нет.
pub struct Publisher {
    name: String,
    cadence: Cadence,
    synthesizer: Box<dyn Synthesizer>,
    encoder: FrameEncoder,
    sink: Box<dyn TransportSink>,
    stats: PublishStats,
}

impl Publisher {
    pub fn new(
        name: impl Into<String>,
        cadence: Cadence,
        synthesizer: Box<dyn Synthesizer>,
        encoder: FrameEncoder,
        sink: Box<dyn TransportSink>,
    ) -> Result<Self, PipelineError> {
        let framing = encoder.framing();
        if framing.max_parts() > sink.max_parts() {
            return Err(PipelineError::FramingMismatch {
                framing: framing.name(),
                parts: framing.max_parts(),
                sink: sink.describe(),
                max: sink.max_parts(),
            });
        }

        let name = name.into();
        tracing::info!(
            publisher = %name,
            synthesizer = synthesizer.name(),
            codec = encoder.codec_name(),
            framing = framing.name(),
            sink = %sink.describe(),
            step_ms = cadence.step().as_millis() as u64,
            "publisher ready"
        );

        Ok(Self {
            name,
            cadence,
            synthesizer,
            encoder,
            sink,
            stats: PublishStats::default(),
        })
    }

    pub fn stats(&self) -> PublishStats {
        self.stats
    }

    /// Крутить цикл до отмены токена. Возвращает итоговые счётчики.
    pub async fn run(mut self, token: CancellationToken) -> PublishStats {
        let start = tokio::time::Instant::now();

        while let Some(tick) = self.cadence.next_tick(&token).await {
            self.publish_tick(&tick).await;

            if self.stats.ticks % REPORT_EVERY == 0 {
                let elapsed = start.elapsed().as_secs_f64();
                tracing::info!(
                    publisher = %self.name,
                    ticks = self.stats.ticks,
                    sent = self.stats.sent,
                    failed = self.stats.failed,
                    rate = format_args!("{:.1}", self.stats.sent as f64 / elapsed),
                    "progress"
                );
            }
        }

        tracing::info!(
            publisher = %self.name,
            ticks = self.stats.ticks,
            sent = self.stats.sent,
            failed = self.stats.failed,
            elapsed_s = format_args!("{:.1}", start.elapsed().as_secs_f64()),
            "stopped"
        );
        self.stats
    }

    /// Один тик: все записи синтезатора по порядку, каждая: отдельный unit.
    pub async fn publish_tick(&mut self, tick: &Tick) {
        self.stats.ticks += 1;

        for record in self.synthesizer.synthesize(tick) {
            let unit = match self.encoder.encode(&record) {
                Ok(unit) => unit,
                Err(e) => {
                    tracing::warn!(publisher = %self.name, record = record.kind(), error = ?e, "encode error, skipping");
                    self.stats.failed += 1;
                    continue;
                }
            };

            tracing::debug!(
                publisher = %self.name,
                tick = tick.index,
                bytes = unit.byte_len(),
                "{}",
                self.encoder.framing().describe(&unit)
            );

            match self.sink.send(&unit).await {
                Ok(()) => self.stats.sent += 1,
                Err(e) if e.is_transient() => {
                    self.stats.failed += 1;
                    tracing::warn!(publisher = %self.name, tick = tick.index, error = ?e, "send error, dropping unit");
                }
                Err(e) => {
                    self.stats.failed += 1;
                    tracing::error!(publisher = %self.name, tick = tick.index, error = ?e, "sink error, dropping unit");
                }
            }
        }
    }
}

/// Запустить publisher отдельной задачей.
pub fn spawn_publisher(publisher: Publisher, token: CancellationToken) -> JoinHandle<PublishStats> {
    tokio::spawn(publisher.run(token))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::config::EndpointConfig;
    use crate::endpoint::Framing;
    use crate::synth::{CounterSynthesizer, WaveSynthesizer};
    use codec_json::JsonCodec;
    use telemetry_api::{PublishError, SendFuture, WireUnit};

    /// Sink, складывающий unit'ы в общий вектор. Отказывает каждой
    /// `fail_every`-й отправке (0: никогда).
    struct RecordingSink {
        units: Arc<Mutex<Vec<WireUnit>>>,
        max_parts: usize,
        fail_every: u64,
        calls: u64,
    }

    impl RecordingSink {
        fn new(max_parts: usize) -> (Self, Arc<Mutex<Vec<WireUnit>>>) {
            let units = Arc::new(Mutex::new(Vec::new()));
            (Self { units: units.clone(), max_parts, fail_every: 0, calls: 0 }, units)
        }
    }

    impl TransportSink for RecordingSink {
        fn send<'a>(&'a mut self, unit: &'a WireUnit) -> SendFuture<'a> {
            Box::pin(async move {
                self.calls += 1;
                if self.fail_every > 0 && self.calls % self.fail_every == 0 {
                    return Err(PublishError::io("network unreachable"));
                }
                self.units.lock().unwrap().push(unit.clone());
                Ok(())
            })
        }

        fn describe(&self) -> String {
            "recording".into()
        }

        fn max_parts(&self) -> usize {
            self.max_parts
        }
    }

    fn datagram_publisher(sink: RecordingSink) -> Publisher {
        Publisher::new(
            "udp",
            Cadence::datagram(),
            Box::new(WaveSynthesizer),
            FrameEncoder::new(Arc::new(JsonCodec), Framing::Datagram),
            Box::new(sink),
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn datagram_loop_sends_two_units_per_tick() {
        let (sink, units) = RecordingSink::new(1);
        let token = CancellationToken::new();
        let handle = spawn_publisher(datagram_publisher(sink), token.clone());

        tokio::time::sleep(Duration::from_millis(175)).await;
        token.cancel();
        let stats = handle.await.unwrap();

        assert_eq!(stats, PublishStats { ticks: 3, sent: 6, failed: 0 });
        let units = units.lock().unwrap();
        assert_eq!(units.len(), 6);

        let first: serde_json::Value = serde_json::from_slice(&units[0].parts()[0]).unwrap();
        assert_eq!(first["timestamp"].as_f64(), Some(0.05));
        assert!((first["test_data"]["cos"].as_f64().unwrap() - 0.05f64.cos()).abs() < 1e-12);
        assert!((first["test_data"]["sin"].as_f64().unwrap() - 0.05f64.sin()).abs() < 1e-12);

        // FixedSchema: одинаковые байты на каждом тике
        assert_eq!(units[1], units[3]);
        assert_eq!(units[3], units[5]);
        let fixed: serde_json::Value = serde_json::from_slice(&units[1].parts()[0]).unwrap();
        assert_eq!(fixed["1252"]["value"]["voltage"]["volt"].as_f64(), Some(24.852617263793945));
        assert!(fixed["1252"]["value"]["current"]["ampere"].is_null());
    }

    #[tokio::test(start_paused = true)]
    async fn send_errors_do_not_stop_the_loop() {
        let (mut sink, units) = RecordingSink::new(1);
        sink.fail_every = 2;
        let token = CancellationToken::new();
        let handle = spawn_publisher(datagram_publisher(sink), token.clone());

        tokio::time::sleep(Duration::from_millis(225)).await;
        token.cancel();
        let stats = handle.await.unwrap();

        assert_eq!(stats.ticks, 4);
        assert_eq!(stats.sent, 4);
        assert_eq!(stats.failed, 4);
        assert_eq!(units.lock().unwrap().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn pub_sub_units_follow_config() {
        let cfg = EndpointConfig::pub_sub(Some("imu".into()), true);
        let (sink, units) = RecordingSink::new(usize::MAX);
        let mut publisher = Publisher::new(
            "zmq",
            Cadence::pub_sub(),
            Box::new(CounterSynthesizer),
            FrameEncoder::for_config(Arc::new(JsonCodec), &cfg),
            Box::new(sink),
        )
        .unwrap();

        publisher.publish_tick(&Tick { index: 0, elapsed: 0.1 }).await;
        publisher.publish_tick(&Tick { index: 1, elapsed: 0.2 }).await;
        assert_eq!(publisher.stats(), PublishStats { ticks: 2, sent: 2, failed: 0 });

        let units = units.lock().unwrap();
        assert!(units.iter().all(|u| u.len() == 3 && u.parts()[0] == b"imu"));
        assert_eq!(
            units[0].parts()[1],
            br#"{"ticks":0,"data":{"cos":1.0,"sin":0.0,"floor":1.0,"ceil":1.0}}"#.to_vec()
        );
        let second: serde_json::Value = serde_json::from_slice(&units[1].parts()[1]).unwrap();
        assert_eq!(second["ticks"], 1);
        assert_eq!(second["data"]["floor"].as_f64(), Some(0.0));
        assert_eq!(second["data"]["ceil"].as_f64(), Some(1.0));
    }

    #[test]
    fn multipart_framing_rejected_by_single_part_sink() {
        let (sink, _) = RecordingSink::new(1);
        let err = Publisher::new(
            "bad",
            Cadence::pub_sub(),
            Box::new(CounterSynthesizer),
            FrameEncoder::new(
                Arc::new(JsonCodec),
                Framing::Multipart { topic: Some("t".into()), include_timestamp: false },
            ),
            Box::new(sink),
        )
        .err()
        .unwrap();
        assert!(matches!(err, PipelineError::FramingMismatch { parts: 2, max: 1, .. }));
    }
}

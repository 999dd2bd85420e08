use std::sync::Arc;

use telemetry_api::{now_secs, Codec, PublishError, SampleRecord, WireUnit};

use crate::config::{EndpointConfig, TransportKind};

// ═══════════════════════════════════════════════════════════════
//  Framing
// ═══════════════════════════════════════════════════════════════

/// Раскладка payload'а по частям WireUnit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Framing {
    /// Ровно одна часть: байты payload'а.
    Datagram,
    /// `[topic?, payload, timestamp?]`: порядок фиксирован.
    Multipart {
        topic: Option<String>,
        include_timestamp: bool,
    },
}

impl Framing {
    pub fn for_config(cfg: &EndpointConfig) -> Self {
        match cfg.transport() {
            TransportKind::Datagram => Framing::Datagram,
            TransportKind::PubSub => Framing::Multipart {
                topic: cfg.topic().map(str::to_string),
                include_timestamp: cfg.include_timestamp(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Framing::Datagram => "datagram",
            Framing::Multipart { .. } => "multipart",
        }
    }

    /// Максимальное число частей, которое производит framing.
    pub fn max_parts(&self) -> usize {
        match self {
            Framing::Datagram => 1,
            Framing::Multipart { topic, include_timestamp } => {
                1 + usize::from(topic.is_some()) + usize::from(*include_timestamp)
            }
        }
    }

    /// Собрать unit. `now`: wall-clock секунды для части с меткой времени,
    /// независимые от синтетического тика.
    pub fn frame(&self, payload: Vec<u8>, now: f64) -> WireUnit {
        match self {
            Framing::Datagram => WireUnit::single(payload),
            Framing::Multipart { topic, include_timestamp } => {
                let mut unit = WireUnit::new();
                if let Some(topic) = topic {
                    unit.push(topic.as_bytes().to_vec());
                }
                unit.push(payload);
                if *include_timestamp {
                    unit.push(now.to_string().into_bytes());
                }
                unit
            }
        }
    }

    /// Человекочитаемая форма unit'а: `[topic] - payload - timestamp: ts`.
    pub fn describe(&self, unit: &WireUnit) -> String {
        let parts = unit.parts();
        match self {
            Framing::Datagram => parts.first().map(|p| String::from_utf8_lossy(p).into_owned()).unwrap_or_default(),
            Framing::Multipart { topic, include_timestamp } => {
                let mut out = String::new();
                let mut idx = 0;
                if topic.is_some() {
                    if let Some(p) = parts.get(idx) {
                        out.push_str(&format!("[{}] - ", String::from_utf8_lossy(p)));
                    }
                    idx += 1;
                }
                if let Some(p) = parts.get(idx) {
                    out.push_str(&String::from_utf8_lossy(p));
                }
                idx += 1;
                if *include_timestamp {
                    if let Some(p) = parts.get(idx) {
                        out.push_str(&format!(" - timestamp: {}", String::from_utf8_lossy(p)));
                    }
                }
                out
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Frame Encoder
// ═══════════════════════════════════════════════════════════════

/// Codec + framing: SampleRecord → WireUnit.
pub struct FrameEncoder {
    codec: Arc<dyn Codec>,
    framing: Framing,
}

impl FrameEncoder {
    pub fn new(codec: Arc<dyn Codec>, framing: Framing) -> Self {
        Self { codec, framing }
    }

    pub fn for_config(codec: Arc<dyn Codec>, cfg: &EndpointConfig) -> Self {
        Self::new(codec, Framing::for_config(cfg))
    }

    pub fn framing(&self) -> &Framing {
        &self.framing
    }

    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }

    /// Закодировать с меткой текущего времени.
    pub fn encode(&self, record: &SampleRecord) -> Result<WireUnit, PublishError> {
        self.encode_at(record, now_secs())
    }

    /// Закодировать с явно заданным временем (секунды Unix).
    pub fn encode_at(&self, record: &SampleRecord, now: f64) -> Result<WireUnit, PublishError> {
        let payload = self.codec.encode(record)?;
        Ok(self.framing.frame(payload, now))
    }
}

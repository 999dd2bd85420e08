use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ════════════════════════════════════════════════════════════════
//  Tick
// ════════════════════════════════════════════════════════════════

/// Один шаг логических часов.
///
/// `index`: порядковый номер тика (с нуля, без пропусков),
/// `elapsed`: накопленная сумма шагов каденса в секундах.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub index: u64,
    pub elapsed: f64,
}

// ════════════════════════════════════════════════════════════════
//  Sample records
// ════════════════════════════════════════════════════════════════

/// Синтетическая запись телеметрии. Имена полей и вложенность
/// стабильны между тиками, меняются только значения.
///
/// Сериализуется без тега: JSON каждого варианта совпадает с формой,
/// которую ожидают потребители.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleRecord {
    Math(MathSample),
    FixedSchema(FixedSchemaSample),
    Counter(CounterSample),
}

impl SampleRecord {
    /// Короткое имя варианта (для логирования).
    pub fn kind(&self) -> &'static str {
        match self {
            SampleRecord::Math(_) => "math",
            SampleRecord::FixedSchema(_) => "fixed_schema",
            SampleRecord::Counter(_) => "counter",
        }
    }
}

/// `{"timestamp": t, "test_data": {"cos": .., "sin": ..}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MathSample {
    pub timestamp: f64,
    pub test_data: Trig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trig {
    pub cos: f64,
    pub sin: f64,
}

/// `{"ticks": n, "data": {"cos", "sin", "floor", "ceil"}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterSample {
    pub ticks: u64,
    pub data: CounterData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CounterData {
    pub cos: f64,
    pub sin: f64,
    pub floor: f64,
    pub ceil: f64,
}

/// Глубоко вложенная запись с `null`-листом. Значения не зависят от тика:
/// запись нужна только чтобы проверить парсер на стороне потребителя.
///
/// ```text
/// {"1252": {"timestamp": {"microsecond": 0},
///           "value": {"current": {"ampere": null},
///                     "voltage": {"volt": 24.852617263793945}}}}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchemaSample {
    pub channel: String,
    pub reading: ChannelReading,
}

pub const FIXED_SCHEMA_CHANNEL: &str = "1252";
pub const FIXED_SCHEMA_VOLT: f64 = 24.852617263793945;

impl Default for FixedSchemaSample {
    fn default() -> Self {
        Self {
            channel: FIXED_SCHEMA_CHANNEL.to_string(),
            reading: ChannelReading {
                timestamp: Microseconds { microsecond: 0 },
                value: PowerValue {
                    current: Current { ampere: None },
                    voltage: Voltage { volt: FIXED_SCHEMA_VOLT },
                },
            },
        }
    }
}

impl Serialize for FixedSchemaSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.channel, &self.reading)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReading {
    pub timestamp: Microseconds,
    pub value: PowerValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Microseconds {
    pub microsecond: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerValue {
    pub current: Current,
    pub voltage: Voltage,
}

/// `None` сериализуется как `null`, поле не пропускается.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Current {
    pub ampere: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Voltage {
    pub volt: f64,
}

// ════════════════════════════════════════════════════════════════
//  Wire unit
// ════════════════════════════════════════════════════════════════

/// Упорядоченный набор байтовых частей, уходящий в транспорт одной отправкой.
///
/// Для датаграмм: ровно одна часть. Для pub/sub: `[topic?, payload, timestamp?]`.
/// Порядок частей фиксируется при сборке и больше не меняется.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireUnit {
    parts: Vec<Vec<u8>>,
}

impl WireUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit из одной части (датаграмма).
    pub fn single(payload: Vec<u8>) -> Self {
        Self { parts: vec![payload] }
    }

    /// Добавить часть в конец.
    pub fn push(&mut self, part: Vec<u8>) {
        self.parts.push(part);
    }

    pub fn parts(&self) -> &[Vec<u8>] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<Vec<u8>> {
        self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Суммарный размер всех частей в байтах.
    pub fn byte_len(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }
}

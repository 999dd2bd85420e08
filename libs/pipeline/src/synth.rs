use telemetry_api::{
    CounterData, CounterSample, FixedSchemaSample, MathSample, SampleRecord, Tick, Trig,
};

use crate::config::TransportKind;

/// Синтезатор payload'а: чистая функция тика, без состояния и случайности.
pub trait Synthesizer: Send + Sync {
    fn synthesize(&self, tick: &Tick) -> Vec<SampleRecord>;

    /// Имя (для логирования).
    fn name(&self) -> &'static str;
}

/// Путь датаграмм: на каждый тик: Math по накопленному времени
/// и неизменная FixedSchema запись.
pub struct WaveSynthesizer;

impl Synthesizer for WaveSynthesizer {
    fn synthesize(&self, tick: &Tick) -> Vec<SampleRecord> {
        let t = tick.elapsed;
        vec![
            SampleRecord::Math(MathSample {
                timestamp: t,
                test_data: Trig { cos: t.cos(), sin: t.sin() },
            }),
            SampleRecord::FixedSchema(FixedSchemaSample::default()),
        ]
    }

    fn name(&self) -> &'static str {
        "wave"
    }
}

/// Путь pub/sub: один Counter на тик.
///
/// Аргумент тригонометрии: сам номер тика, а не секунды, поэтому
/// период колебаний измеряется в тиках.
pub struct CounterSynthesizer;

impl Synthesizer for CounterSynthesizer {
    fn synthesize(&self, tick: &Tick) -> Vec<SampleRecord> {
        let n = tick.index as f64;
        let cos = n.cos();
        vec![SampleRecord::Counter(CounterSample {
            ticks: tick.index,
            data: CounterData {
                cos,
                sin: n.sin(),
                floor: cos.floor(),
                ceil: cos.ceil(),
            },
        })]
    }

    fn name(&self) -> &'static str {
        "counter"
    }
}

/// Синтезатор по умолчанию для транспорта.
pub fn synthesizer_for(kind: TransportKind) -> Box<dyn Synthesizer> {
    match kind {
        TransportKind::Datagram => Box::new(WaveSynthesizer),
        TransportKind::PubSub => Box::new(CounterSynthesizer),
    }
}

use std::future::Future;
use std::pin::Pin;

mod error;
mod types;
mod util;

pub use error::{ErrorKind, PublishError};
pub use types::{
    ChannelReading, CounterData, CounterSample, Current, FixedSchemaSample, MathSample,
    Microseconds, PowerValue, SampleRecord, Tick, Trig, Voltage, WireUnit,
    FIXED_SCHEMA_CHANNEL, FIXED_SCHEMA_VOLT,
};
pub use util::now_secs;

// ════════════════════════════════════════════════════════════════
//  Codec
// ════════════════════════════════════════════════════════════════

/// Codec: сериализация SampleRecord в байты payload'а.
///
/// Отвечает ТОЛЬКО за формат данных. Топик, метка времени и деление
/// на части: ответственность framing'а в pipeline.
pub trait Codec: Send + Sync {
    /// Сериализовать запись.
    fn encode(&self, record: &SampleRecord) -> Result<Vec<u8>, PublishError>;

    /// Имя формата (для логирования).
    fn name(&self) -> &'static str;
}

// ════════════════════════════════════════════════════════════════
//  Transport Sink
// ════════════════════════════════════════════════════════════════

/// Future, возвращаемый `TransportSink::send`.
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + 'a>>;

/// Транспорт доставки WireUnit'ов.
///
/// Инициализация (resolve/bind) происходит в конструкторе реализации;
/// после неё sink находится в состоянии Ready и только отправляет.
/// Доставка fire-and-forget: ни подтверждений, ни повторов.
pub trait TransportSink: Send {
    /// Отправить один unit. Части уходят в заданном порядке.
    fn send<'a>(&'a mut self, unit: &'a WireUnit) -> SendFuture<'a>;

    /// Описание назначения (для логирования).
    fn describe(&self) -> String;

    /// Максимальное число частей в одном unit'е.
    fn max_parts(&self) -> usize {
        usize::MAX
    }
}

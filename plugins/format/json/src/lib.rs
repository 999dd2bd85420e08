use telemetry_api::{Codec, PublishError, SampleRecord};

/// Компактный JSON без пробелов. Порядок ключей: порядок полей в типах.
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, record: &SampleRecord) -> Result<Vec<u8>, PublishError> {
        Ok(serde_json::to_vec(record)?)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Текущее Unix-время в секундах с дробной частью.
///
/// Источник: наносекунды, масштабированные на 1e-9.
pub fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as f64
        * 1e-9
}

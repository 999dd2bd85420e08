use std::time::Duration;

use tokio_util::sync::CancellationToken;

use telemetry_api::Tick;

/// Шаг каденса датаграмм.
pub const DATAGRAM_STEP: Duration = Duration::from_millis(50);
/// Шаг каденса pub/sub.
pub const PUB_SUB_STEP: Duration = Duration::from_millis(100);

/// Логические часы с фиксированным шагом.
///
/// Каждая итерация: sleep(step) → следующий тик. Время обработки между
/// тиками не компенсируется, дрейф допустим. Тики идут строго по порядку
/// без пропусков; остановка только через `CancellationToken`.
pub struct Cadence {
    step: Duration,
    step_secs: f64,
    next_index: u64,
    elapsed: f64,
}

impl Cadence {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            step_secs: step.as_secs_f64(),
            next_index: 0,
            elapsed: 0.0,
        }
    }

    pub fn datagram() -> Self {
        Self::new(DATAGRAM_STEP)
    }

    pub fn pub_sub() -> Self {
        Self::new(PUB_SUB_STEP)
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Подождать один шаг и вернуть следующий тик.
    /// `None`: токен отменён, тик не выдаётся.
    pub async fn next_tick(&mut self, token: &CancellationToken) -> Option<Tick> {
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            _ = tokio::time::sleep(self.step) => Some(self.advance()),
        }
    }

    fn advance(&mut self) -> Tick {
        // накопление сложением, как у float-часов: 0.05, 0.1, 0.15000000000000002, ...
        self.elapsed += self.step_secs;
        let tick = Tick { index: self.next_index, elapsed: self.elapsed };
        self.next_index += 1;
        tick
    }
}

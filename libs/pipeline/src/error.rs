#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("framing '{framing}' produces up to {parts} parts, sink {sink} accepts {max}")]
    FramingMismatch { framing: &'static str, parts: usize, sink: String, max: usize },
}

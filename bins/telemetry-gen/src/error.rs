#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("{0}")]
    Endpoint(#[from] telemetry_api::PublishError),

    #[error("{0}")]
    Pipeline(#[from] pipeline::PipelineError),

    #[error("signal: {0}")]
    Signal(#[from] std::io::Error),

    #[error("publisher task: {0}")]
    Task(#[from] tokio::task::JoinError),
}

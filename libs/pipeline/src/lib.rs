pub mod cadence;
pub mod config;
pub mod error;
mod endpoint;
mod publisher;
pub mod synth;

pub use cadence::Cadence;
pub use config::{AddressFamily, EndpointConfig, TransportKind};
pub use endpoint::{FrameEncoder, Framing};
pub use error::PipelineError;
pub use publisher::{spawn_publisher, PublishStats, Publisher};
pub use synth::{synthesizer_for, CounterSynthesizer, Synthesizer, WaveSynthesizer};

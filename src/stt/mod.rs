//! Speech-to-Text engine modules

pub mod engine;
pub mod model;

pub use engine::{SttEngine, TranscriptionResult, TranscriptionSegment};
pub use model::resolve_model;

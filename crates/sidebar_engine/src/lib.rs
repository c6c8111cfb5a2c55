//! Sidebar engine: socket lifecycle, triggering calls and effect execution.
mod connection;
mod engine;
mod launcher;
mod registry;
mod settings;
mod types;

pub use connection::{ConnectionManager, ConnectionSettings};
pub use engine::EngineHandle;
pub use launcher::{HttpJobLauncher, JobLauncher};
pub use registry::ClientRegistry;
pub use settings::EngineSettings;
pub use types::{ChannelEventSink, EngineError, EngineEvent, EventSink, LaunchError};

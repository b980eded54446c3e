pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use app::pipelines::DrawPipeline;
pub use core::engine::{AssignmentEngine, AssignmentExhaustedError, DEFAULT_MAX_ATTEMPTS};
pub use core::events::{DrawEvent, DrawObserver, EventLog, NoopObserver, TracingObserver};
pub use core::runner::DrawRunner;
pub use domain::model::{Assignment, AssignmentRow, Participant, PriorAssignments};
pub use utils::error::{Result, SantaError};

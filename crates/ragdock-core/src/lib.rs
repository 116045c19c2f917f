//! RagDock Core — error taxonomy, configuration, workspace data model.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workspace;

pub use config::{LlmSettings, RagConfig, SearchSettings, ServiceMode, StorageSettings};
pub use error::{Error, Result};
pub use workspace::{IndexDocument, Workspace, WorkspaceFile, WorkspaceIdentifiers};

//! gbp-support-core: Action engine for support bundles
//!
//! Parses `*.gbp` action files and executes them into a compressed archive,
//! along with the configuration, host detection and error types they need.

pub mod action;
pub mod archive;
pub mod collector;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod loader;
pub mod options;

pub use action::{Action, Operation, ParsedLine};
pub use archive::BundleArchive;
pub use collector::{CollectionReport, RUN_LOG_NAME, SupportCollector};
pub use config::CollectorConfig;
pub use error::CoreError;
pub use executor::{ActionExecutor, ActionOutcome};
pub use host::HostFacts;
pub use loader::load_actions;
pub use options::ActionOptions;

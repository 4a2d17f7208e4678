pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use core::{etl::EtlEngine, pipeline::VocabularyPipeline};
pub use domain::model::{CanonicalRecord, ChangeDetection, LoadOutcome, RawRecord, RunOutcome};
pub use utils::error::{EtlError, Result};

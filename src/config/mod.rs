pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_list, validate_non_empty_string, validate_path,
};

#[cfg(feature = "cli")]
use crate::core::{source, ChangeDetection};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_OUTPUT: &str = "codefree/thousandChars_v1.json";
pub const DEFAULT_KEY: &str = "thousandChars_v1";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "thousandchars-etl")]
#[command(about = "Builds the thousand-character vocabulary JSON from a spreadsheet, CSV or prior export")]
pub struct CliConfig {
    /// Directory that source and output paths are relative to
    #[arg(long, default_value = ".")]
    pub root: String,

    /// Source candidates, highest priority first
    #[arg(long = "source", value_delimiter = ',', default_values_t = source::default_sources())]
    pub sources: Vec<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Dataset identifier written to the `key` field
    #[arg(long, default_value = DEFAULT_KEY)]
    pub key: String,

    /// `content` ignores `generatedAt` when comparing, `full` compares the literal text
    #[arg(long, default_value = "content")]
    pub change_detection: ChangeDetection,

    /// Load settings from a TOML file instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report what would be written without touching the output file
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn root(&self) -> &str {
        &self.root
    }

    fn source_candidates(&self) -> &[String] {
        &self.sources
    }

    fn output_file(&self) -> &str {
        &self.output
    }

    fn dataset_key(&self) -> &str {
        &self.key
    }

    fn change_detection(&self) -> ChangeDetection {
        self.change_detection
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self, "root", "source", "output", "key")
    }
}

/// Checks shared by every [`ConfigProvider`]; the field names are only used in error messages.
pub(crate) fn validate_settings<C: ConfigProvider + ?Sized>(
    config: &C,
    root_field: &str,
    sources_field: &str,
    output_field: &str,
    key_field: &str,
) -> Result<()> {
    validate_path(root_field, config.root())?;

    validate_non_empty_list(sources_field, config.source_candidates())?;
    for candidate in config.source_candidates() {
        validate_path(sources_field, candidate)?;
    }
    validate_file_extensions(
        sources_field,
        config.source_candidates(),
        &crate::core::source::SUPPORTED_EXTENSIONS,
    )?;

    validate_path(output_field, config.output_file())?;
    validate_file_extensions(output_field, &[config.output_file().to_string()], &["json"])?;

    validate_non_empty_string(key_field, config.dataset_key())?;
    Ok(())
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["thousandchars-etl"]);

        assert_eq!(config.root(), ".");
        assert_eq!(config.source_candidates(), source::default_sources().as_slice());
        assert_eq!(config.output_file(), "codefree/thousandChars_v1.json");
        assert_eq!(config.dataset_key(), "thousandChars_v1");
        assert_eq!(config.change_detection(), ChangeDetection::Content);
        assert!(!config.dry_run());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = CliConfig::parse_from([
            "thousandchars-etl",
            "--root",
            "/tmp/site",
            "--source",
            "data/a.csv,data/b.json",
            "--output",
            "public/vocab.json",
            "--key",
            "vocab_v2",
            "--change-detection",
            "full",
            "--dry-run",
        ]);

        assert_eq!(config.root(), "/tmp/site");
        assert_eq!(config.source_candidates(), ["data/a.csv", "data/b.json"]);
        assert_eq!(config.output_file(), "public/vocab.json");
        assert_eq!(config.dataset_key(), "vocab_v2");
        assert_eq!(config.change_detection(), ChangeDetection::Full);
        assert!(config.dry_run());
    }

    #[test]
    fn test_unknown_change_detection_mode_is_rejected() {
        let parsed = CliConfig::try_parse_from(["thousandchars-etl", "--change-detection", "fuzzy"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = CliConfig::parse_from(["thousandchars-etl"]);
        config.output = "codefree/out.csv".to_string();
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { .. })
        ));

        let mut config = CliConfig::parse_from(["thousandchars-etl"]);
        config.key = "  ".to_string();
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["thousandchars-etl", "--source", "data/list.txt"]);
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { ref field, .. }) if field == "source"
        ));

        let config = CliConfig::parse_from(["thousandchars-etl", "--source", "data/a.ODS,data/README"]);
        assert!(config.validate().is_err());

        let mut config = CliConfig::parse_from(["thousandchars-etl"]);
        config.sources.clear();
        assert!(matches!(
            config.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));
    }
}

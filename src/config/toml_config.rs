use crate::config::{validate_settings, DEFAULT_KEY, DEFAULT_OUTPUT};
use crate::core::{source, ChangeDetection, ConfigProvider};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Build settings loaded from a TOML file. Every section is optional.
///
/// ```toml
/// root = "${SITE_ROOT}"
///
/// [source]
/// candidates = ["codefree/1000ja.xlsx", "codefree/1000ja.csv"]
///
/// [output]
/// path = "codefree/thousandChars_v1.json"
/// key = "thousandChars_v1"
///
/// [change_detection]
/// mode = "content"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub change_detection: ChangeDetectionConfig,
    #[serde(skip)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "source::default_sources")]
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output")]
    pub path: String,
    #[serde(default = "default_key")]
    pub key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeDetectionConfig {
    #[serde(default)]
    pub mode: ChangeDetection,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            candidates: source::default_sources(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output(),
            key: default_key(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SITE_ROOT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl ConfigProvider for TomlConfig {
    fn root(&self) -> &str {
        &self.root
    }

    fn source_candidates(&self) -> &[String] {
        &self.source.candidates
    }

    fn output_file(&self) -> &str {
        &self.output.path
    }

    fn dataset_key(&self) -> &str {
        &self.output.key
    }

    fn change_detection(&self) -> ChangeDetection {
        self.change_detection.mode
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(
            self,
            "root",
            "source.candidates",
            "output.path",
            "output.key",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.root(), ".");
        assert_eq!(config.source_candidates(), source::default_sources().as_slice());
        assert_eq!(config.output_file(), "codefree/thousandChars_v1.json");
        assert_eq!(config.dataset_key(), "thousandChars_v1");
        assert_eq!(config.change_detection(), ChangeDetection::Content);
        assert!(!config.dry_run());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
root = "site"

[source]
candidates = ["data/1000ja.csv"]

[output]
path = "public/chars.json"
key = "thousandChars_v2"

[change_detection]
mode = "full"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap().with_dry_run(true);

        assert_eq!(config.root(), "site");
        assert_eq!(config.source_candidates(), ["data/1000ja.csv"]);
        assert_eq!(config.output_file(), "public/chars.json");
        assert_eq!(config.dataset_key(), "thousandChars_v2");
        assert_eq!(config.change_detection(), ChangeDetection::Full);
        assert!(config.dry_run());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = TomlConfig::from_toml_str("[output]\nkey = \"custom\"\n").unwrap();
        assert_eq!(config.output_file(), "codefree/thousandChars_v1.json");
        assert_eq!(config.dataset_key(), "custom");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("THOUSANDCHARS_TEST_ROOT", "/srv/site");

        let config = TomlConfig::from_toml_str("root = \"${THOUSANDCHARS_TEST_ROOT}\"\n").unwrap();
        assert_eq!(config.root(), "/srv/site");

        std::env::remove_var("THOUSANDCHARS_TEST_ROOT");
    }

    #[test]
    fn test_unset_env_var_is_left_alone() {
        let config =
            TomlConfig::from_toml_str("root = \"${THOUSANDCHARS_SURELY_UNSET_VAR}\"\n").unwrap();
        assert_eq!(config.root(), "${THOUSANDCHARS_SURELY_UNSET_VAR}");
    }

    #[test]
    fn test_invalid_values() {
        let err = TomlConfig::from_toml_str("[change_detection]\nmode = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));

        let config = TomlConfig::from_toml_str("[source]\ncandidates = []\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[output]\npath = \"out.txt\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            "[source]\ncandidates = [\"data/list.txt\", \"data/README\"]\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { ref field, .. }) if field == "source.candidates"
        ));

        let config = TomlConfig::from_toml_str(
            "[source]\ncandidates = [\"data/1000ja.xlsm\", \"data/1000ja.CSV\"]\n",
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nkey = \"from_file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.dataset_key(), "from_file");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
    }
}

use crate::config::{default_output_name, validate_provider};
use crate::core::engine::DEFAULT_MAX_ATTEMPTS;
use crate::core::ConfigProvider;
use crate::domain::model::ColumnNames;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub draw: DrawConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawConfig {
    pub name: Option<String>,
    pub max_attempts: Option<usize>,
    pub seed: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub participants: String,
    pub previous_results: Option<String>,
    pub columns: Option<ColumnsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
    pub name: Option<String>,
    pub email: Option<String>,
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub file: Option<String>,
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string()]
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換，[environment] 區段提供預設值
        let defaults = Self::environment_defaults(content);
        let processed_content = Self::substitute_env_vars(content, &defaults)?;

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 讀出 [environment] 區段的字串值；替換前的內容無法解析時視為沒有預設值
    fn environment_defaults(content: &str) -> HashMap<String, String> {
        let Ok(raw) = toml::from_str::<toml::Table>(content) else {
            return HashMap::new();
        };

        raw.get("environment")
            .and_then(|section| section.as_table())
            .map(|table| {
                table
                    .iter()
                    .filter_map(|(key, value)| {
                        value.as_str().map(|v| (key.clone(), v.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 替換 ${VAR}：先找真正的環境變數，再找 [environment] 預設值，都沒有就保留原樣
    fn substitute_env_vars(content: &str, defaults: &HashMap<String, String>) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SantaError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name)
                .ok()
                .or_else(|| defaults.get(var_name).cloned())
                .unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn draw_name(&self) -> &str {
        self.draw.name.as_deref().unwrap_or("Secret Santa")
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn log_file(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.file.as_deref())
    }
}

impl FromStr for TomlConfig {
    type Err = SantaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_toml_str(s)
    }
}

impl ConfigProvider for TomlConfig {
    fn participants_path(&self) -> &str {
        &self.input.participants
    }

    fn previous_results_path(&self) -> Option<&str> {
        self.input.previous_results.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_name(&self) -> String {
        self.output.filename.clone().unwrap_or_else(default_output_name)
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn max_attempts(&self) -> usize {
        self.draw.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    fn seed(&self) -> Option<u64> {
        self.draw.seed
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.draw.timeout_seconds
    }

    fn column_names(&self) -> ColumnNames {
        let mut columns = ColumnNames::default();
        if let Some(configured) = &self.input.columns {
            if let Some(name) = &configured.name {
                columns.giver_name = name.clone();
            }
            if let Some(email) = &configured.email {
                columns.giver_address = email.clone();
            }
            if let Some(receiver) = &configured.receiver {
                columns.receiver_name = receiver.clone();
            }
        }
        columns
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[draw]
name = "Office 2024"
max_attempts = 250
seed = 2024

[input]
participants = "Employee-List.xlsx"
previous_results = "Secret-Santa-Game-Result-2023.xlsx"

[output]
path = "./results"
formats = ["csv", "json"]
filename = "assignments-2024"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.draw_name(), "Office 2024");
        assert_eq!(config.max_attempts(), 250);
        assert_eq!(config.seed(), Some(2024));
        assert_eq!(
            config.previous_results_path(),
            Some("Secret-Santa-Game-Result-2023.xlsx")
        );
        assert_eq!(config.output_name(), "assignments-2024");
        assert_eq!(config.column_names(), ColumnNames::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_are_sparse() {
        let toml_content = r#"
[input]
participants = "roster.csv"

[output]
path = "./output"
"#;

        let config: TomlConfig = toml_content.parse().unwrap();

        assert_eq!(config.draw_name(), "Secret Santa");
        assert_eq!(config.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.output_formats(), &["csv"]);
        assert!(config.previous_results_path().is_none());
        assert!(!config.verbose());
    }

    #[test]
    fn test_custom_columns() {
        let toml_content = r#"
[input]
participants = "roster.csv"

[input.columns]
name = "Full Name"
receiver = "Buys For"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let columns = config.column_names();

        assert_eq!(columns.giver_name, "Full Name");
        assert_eq!(columns.giver_address, "Employee_EmailID");
        assert_eq!(columns.receiver_name, "Buys For");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SANTA_TEST_ROSTER", "team-roster.csv");

        let toml_content = r#"
[input]
participants = "${SANTA_TEST_ROSTER}"
previous_results = "${SANTA_TEST_UNSET_VARIABLE}"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.participants_path(), "team-roster.csv");
        assert_eq!(
            config.previous_results_path(),
            Some("${SANTA_TEST_UNSET_VARIABLE}")
        );

        std::env::remove_var("SANTA_TEST_ROSTER");
    }

    #[test]
    fn test_environment_section_supplies_defaults() {
        std::env::set_var("SANTA_TEST_OVERRIDDEN_ROSTER", "from-process.csv");

        let toml_content = r#"
[input]
participants = "${SANTA_TEST_OVERRIDDEN_ROSTER}"
previous_results = "${SANTA_TEST_DEFAULT_ONLY_DIR}/results-2023.xlsx"

[output]
path = "${SANTA_TEST_DEFAULT_ONLY_DIR}/out"

[environment]
SANTA_TEST_DEFAULT_ONLY_DIR = "./santa"
SANTA_TEST_OVERRIDDEN_ROSTER = "from-defaults.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.participants_path(), "from-process.csv");
        assert_eq!(
            config.previous_results_path(),
            Some("./santa/results-2023.xlsx")
        );
        assert_eq!(config.output_path(), "./santa/out");
        assert_eq!(
            config
                .environment
                .as_ref()
                .and_then(|env| env.get("SANTA_TEST_DEFAULT_ONLY_DIR"))
                .map(String::as_str),
            Some("./santa")
        );

        std::env::remove_var("SANTA_TEST_OVERRIDDEN_ROSTER");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[draw]
max_attempts = 0

[input]
participants = "roster.csv"

[output]
path = "./output"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[input]
participants = "roster.csv"

[output]
path = "./output"
formats = ["pdf"]
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_required_section() {
        let result = TomlConfig::from_toml_str("[draw]\nseed = 1\n");
        assert!(matches!(
            result,
            Err(SantaError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[draw]
name = "file-test"

[input]
participants = "roster.csv"

[output]
path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.draw_name(), "file-test");
    }
}

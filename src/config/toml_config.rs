use crate::core::count_up::{CountUpOptions, DEFAULT_DURATION_MS, DEFAULT_RESTART_EPSILON};
use crate::core::format::NumberFormat;
use crate::core::normalizer::DEFAULT_MAX_ITERATIONS;
use crate::core::CleanupSettings;
use crate::utils::error::{KitError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const VALID_OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub normalizer: NormalizerConfig,
    pub count_up: CountUpConfig,
    pub cleanup: CleanupConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub max_iterations: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountUpConfig {
    pub duration_ms: f64,
    pub enabled: bool,
    pub restart_epsilon: f64,
    pub frame_interval_ms: u64,
    pub format: NumberFormat,
}

impl Default for CountUpConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            enabled: true,
            restart_epsilon: DEFAULT_RESTART_EPSILON,
            frame_interval_ms: 16,
            format: NumberFormat::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    pub source: Option<String>,
    pub fields: Vec<String>,
    pub output_path: String,
    pub output_formats: Vec<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            source: None,
            fields: vec![
                "title".to_string(),
                "benefits".to_string(),
                "description".to_string(),
            ],
            output_path: "./output".to_string(),
            output_formats: vec!["csv".to_string(), "json".to_string()],
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，缺少的區段使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${CAMPAIGN_API})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| KitError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn count_up_options(&self) -> CountUpOptions {
        CountUpOptions {
            duration_ms: self.count_up.duration_ms,
            enabled: self.count_up.enabled,
            restart_epsilon: self.count_up.restart_epsilon,
        }
    }

    /// 執行清理工作前的額外檢查：必須提供來源
    pub fn validate_cleanup(&self) -> Result<()> {
        let source = validation::validate_required_field("cleanup.source", &self.cleanup.source)?;
        validation::validate_source("cleanup.source", source)?;
        validation::validate_path("cleanup.output_path", &self.cleanup.output_path)?;

        if self.cleanup.fields.is_empty() {
            return Err(KitError::ConfigValidationError {
                field: "cleanup.fields".to_string(),
                message: "At least one field must be cleaned".to_string(),
            });
        }
        if self.cleanup.output_formats.is_empty() {
            return Err(KitError::ConfigValidationError {
                field: "cleanup.output_formats".to_string(),
                message: "At least one output format is required".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range(
            "normalizer.max_iterations",
            self.normalizer.max_iterations,
            1,
            1000,
        )?;

        validation::validate_range("count_up.duration_ms", self.count_up.duration_ms, 0.0, 600_000.0)?;
        validation::validate_range(
            "count_up.restart_epsilon",
            self.count_up.restart_epsilon,
            0.0,
            f64::MAX,
        )?;
        validation::validate_range(
            "count_up.frame_interval_ms",
            self.count_up.frame_interval_ms,
            1,
            1000,
        )?;

        for field in &self.cleanup.fields {
            validation::validate_non_empty_string("cleanup.fields", field)?;
        }
        for format in &self.cleanup.output_formats {
            validation::validate_one_of("cleanup.output_formats", format, &VALID_OUTPUT_FORMATS)?;
        }
        Ok(())
    }
}

impl CleanupSettings for AppConfig {
    fn source(&self) -> &str {
        self.cleanup.source.as_deref().unwrap_or_default()
    }

    fn fields(&self) -> &[String] {
        &self.cleanup.fields
    }

    fn output_path(&self) -> &str {
        &self.cleanup.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.cleanup.output_formats
    }

    fn max_iterations(&self) -> usize {
        self.normalizer.max_iterations
    }
}

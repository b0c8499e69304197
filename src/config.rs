//! 配置加载
//!
//! 配置文件位于数据目录下的 `config.toml`，不存在时使用默认值。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::DEFAULT_LOW_STOCK_THRESHOLD;

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Csv,
    Memory,
}

impl Backend {
    /// 未配置路径时使用的默认文件名
    pub fn default_file_name(self) -> &'static str {
        match self {
            Backend::Sqlite => "estoque.db",
            Backend::Csv => "estoque.csv",
            Backend::Memory => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    pub path: Option<PathBuf>, // 为空时按后端取默认文件名
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub low_stock_threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "estoque.log".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub alerts: AlertConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从 TOML 文件加载配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.alerts.low_stock_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "alerts.low_stock_threshold 必须在 (0, 1] 之间，实际为 {threshold}"
            )));
        }
        if let Some(path) = &self.storage.path {
            if self.storage.backend != Backend::Memory && path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("storage.path 不能为空".to_string()));
            }
        }
        Ok(())
    }

    /// 存储路径，相对路径基于数据目录解析
    pub fn storage_path(&self, data_dir: &Path) -> PathBuf {
        let path = self
            .storage
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.storage.backend.default_file_name()));
        if path.is_absolute() {
            path
        } else {
            data_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.backend, Backend::Sqlite);
        assert_eq!(config.alerts.low_stock_threshold, 0.30);
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::from_toml(
            r#"
            [storage]
            backend = "csv"
            path = "estoque.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, Backend::Csv);
        assert_eq!(config.storage.path, Some(PathBuf::from("estoque.csv")));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let err = AppConfig::from_toml("[alerts]\nlow_stock_threshold = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let err = AppConfig::from_toml("[storage]\nbackend = \"postgres\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_storage_path_resolution() {
        let config = AppConfig::default();
        assert_eq!(
            config.storage_path(Path::new("/data/estoque")),
            PathBuf::from("/data/estoque/estoque.db")
        );

        let config = AppConfig::from_toml("[storage]\npath = \"/srv/estoque.db\"\n").unwrap();
        assert_eq!(
            config.storage_path(Path::new("/data/estoque")),
            PathBuf::from("/srv/estoque.db")
        );
    }

    #[test]
    fn test_csv_default_path_follows_backend() {
        let config = AppConfig::from_toml("[storage]\nbackend = \"csv\"\n").unwrap();
        assert_eq!(config.storage.path, None);
        assert_eq!(
            config.storage_path(Path::new("/data/estoque")),
            PathBuf::from("/data/estoque/estoque.csv")
        );
    }

    #[test]
    fn test_rejects_empty_path() {
        let err = AppConfig::from_toml("[storage]\npath = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}

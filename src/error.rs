//! 错误类型
//!
//! 存储层、账本层与配置层各自的错误枚举，以及程序入口处的汇总错误

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("商品 '{0}' 已存在")]
    Duplicate(String),

    #[error("商品 '{0}' 不存在")]
    NotFound(String),

    #[error("数据文件第 {line} 行损坏: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("存储中的商品 '{name}' 无效: {reason}")]
    InvalidRecord { name: String, reason: String },
}

/// 账本操作错误
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("输入无效: {0}")]
    Validation(String),

    #[error("商品 '{0}' 已存在")]
    Duplicate(String),

    #[error("商品 '{0}' 不存在")]
    NotFound(String),

    #[error("'{name}' 库存不足: 需要 {requested}，现有 {available}")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("存储失败: {0}")]
    Persistence(#[from] StoreError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无法读取配置 {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("配置格式错误: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("配置无效: {0}")]
    Invalid(String),
}

/// 程序入口错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("日志初始化失败: {0}")]
    Logging(String),
}

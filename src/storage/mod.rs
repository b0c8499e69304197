//! 持久化层
//!
//! `ProductStore` 是账本与具体存储之间的唯一接口。每个写操作在返回前必须已经持久化，
//! 账本只在存储成功之后才更新内存中的镜像。

pub mod csv;
pub mod memory;
pub mod sqlite;

use std::path::Path;

use tracing::info;

use crate::config::Backend;
use crate::error::StoreError;
use crate::models::Product;

pub use self::csv::CsvStore;
pub use self::memory::MemoryStore;
pub use self::sqlite::SqliteStore;

/// 商品存储接口
pub trait ProductStore {
    /// 读取全部商品
    fn load_all(&mut self) -> Result<Vec<Product>, StoreError>;

    /// 插入新商品，名称重复时返回 `StoreError::Duplicate`
    fn insert(&mut self, product: &Product) -> Result<(), StoreError>;

    /// 更新当前库存
    fn update(&mut self, name: &str, current: i64) -> Result<(), StoreError>;

    /// 删除商品
    fn delete(&mut self, name: &str) -> Result<(), StoreError>;
}

/// 按配置打开存储
pub fn open_store(backend: Backend, path: &Path) -> Result<Box<dyn ProductStore>, StoreError> {
    let store: Box<dyn ProductStore> = match backend {
        Backend::Sqlite => Box::new(SqliteStore::open(path)?),
        Backend::Csv => Box::new(CsvStore::open(path)?),
        Backend::Memory => Box::new(MemoryStore::new()),
    };
    info!(?backend, path = %path.display(), "存储已打开");
    Ok(store)
}

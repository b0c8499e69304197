//! 库存账本
//!
//! 账本持有全部商品记录，是唯一允许修改它们的组件。所有写操作先交给存储层持久化，
//! 存储成功后才更新内存镜像；任何失败都原样返回给调用方，不做重试。

use std::collections::BTreeMap;

use tracing::{error, info, warn};

use crate::error::{LedgerError, StoreError};
use crate::models::{DisplayRow, Product, StockOperation, normalize_name};
use crate::storage::ProductStore;

/// 库存账本
pub struct Ledger {
    store: Box<dyn ProductStore>,
    products: BTreeMap<String, Product>,
    low_stock_threshold: f64,
}

impl Ledger {
    /// 从存储加载全部商品，名称未规范化或数量越界的记录视为存储损坏
    pub fn load(
        mut store: Box<dyn ProductStore>,
        low_stock_threshold: f64,
    ) -> Result<Self, StoreError> {
        let mut products = BTreeMap::new();
        for product in store.load_all()? {
            check_record(&product)?;
            if products.contains_key(&product.name) {
                return Err(invalid(&product, "名称重复".to_string()));
            }
            products.insert(product.name.clone(), product);
        }
        info!(count = products.len(), "账本已加载");
        Ok(Self {
            store,
            products,
            low_stock_threshold,
        })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn low_stock_threshold(&self) -> f64 {
        self.low_stock_threshold
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.get(&normalize_name(name))
    }

    /// 新增商品，初始库存等于最大容量
    pub fn create(&mut self, name: &str, maximum: i64) -> Result<&Product, LedgerError> {
        let name = require_name(name)?;
        if maximum <= 0 {
            return Err(rejected(LedgerError::Validation(format!(
                "最大数量必须为正整数，实际为 {maximum}"
            ))));
        }
        if self.products.contains_key(&name) {
            return Err(rejected(LedgerError::Duplicate(name)));
        }

        let product = Product::new(name.clone(), maximum);
        self.store.insert(&product).map_err(persistence)?;
        info!(name = %product.name, maximum, "商品已新增");
        let product: &Product = self.products.entry(name).or_insert(product);
        Ok(product)
    }

    /// 入库，超过最大容量的部分直接截断
    pub fn restock(&mut self, name: &str, quantity: i64) -> Result<&Product, LedgerError> {
        let (name, product) = self.lookup(name, quantity)?;
        let current = product.restocked(quantity);
        self.commit_current(name, current)
    }

    /// 出库，库存不足时整体失败
    pub fn consume(&mut self, name: &str, quantity: i64) -> Result<&Product, LedgerError> {
        let (name, product) = self.lookup(name, quantity)?;
        let current = product.consumed(quantity).ok_or_else(|| {
            rejected(LedgerError::InsufficientStock {
                name: name.clone(),
                requested: quantity,
                available: product.current,
            })
        })?;
        self.commit_current(name, current)
    }

    pub fn apply(
        &mut self,
        name: &str,
        operation: StockOperation,
        quantity: i64,
    ) -> Result<&Product, LedgerError> {
        match operation {
            StockOperation::Restock => self.restock(name, quantity),
            StockOperation::Consume => self.consume(name, quantity),
        }
    }

    /// 删除商品
    pub fn delete(&mut self, name: &str) -> Result<Product, LedgerError> {
        let name = require_name(name)?;
        if !self.products.contains_key(&name) {
            return Err(rejected(LedgerError::NotFound(name)));
        }

        self.store.delete(&name).map_err(persistence)?;
        info!(name = %name, "商品已删除");
        self.products
            .remove(&name)
            .ok_or(LedgerError::NotFound(name))
    }

    /// 按名称升序列出商品，`filter` 为大小写不敏感的子串，空串匹配全部
    pub fn list(&self, filter: &str) -> Vec<DisplayRow> {
        let needle = filter.to_lowercase();
        self.products
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .map(|p| DisplayRow::from_product(p, self.low_stock_threshold))
            .collect()
    }

    /// 柱状图数据 (名称, 当前数量)，按名称排序
    pub fn chart_data(&self) -> Vec<(String, i64)> {
        self.products
            .values()
            .map(|p| (p.name.clone(), p.current))
            .collect()
    }

    fn lookup(&self, name: &str, quantity: i64) -> Result<(String, Product), LedgerError> {
        let name = require_name(name)?;
        if quantity <= 0 {
            return Err(rejected(LedgerError::Validation(format!(
                "数量必须为正整数，实际为 {quantity}"
            ))));
        }
        match self.products.get(&name) {
            Some(product) => Ok((name, product.clone())),
            None => Err(rejected(LedgerError::NotFound(name))),
        }
    }

    fn commit_current(&mut self, name: String, current: i64) -> Result<&Product, LedgerError> {
        self.store.update(&name, current).map_err(persistence)?;
        let product = self
            .products
            .get_mut(&name)
            .ok_or(LedgerError::NotFound(name))?;
        let previous = product.current;
        product.current = current;
        info!(name = %product.name, previous, current, maximum = product.maximum, "库存已更新");
        Ok(&*product)
    }
}

fn require_name(raw: &str) -> Result<String, LedgerError> {
    let name = normalize_name(raw);
    if name.is_empty() {
        return Err(rejected(LedgerError::Validation("商品名不能为空".to_string())));
    }
    if name.chars().any(char::is_control) {
        return Err(rejected(LedgerError::Validation(
            "商品名不能包含控制字符".to_string(),
        )));
    }
    Ok(name)
}

fn invalid(product: &Product, reason: String) -> StoreError {
    StoreError::InvalidRecord {
        name: product.name.clone(),
        reason,
    }
}

/// 校验从存储读出的记录满足与新建时相同的约束
fn check_record(product: &Product) -> Result<(), StoreError> {
    let normalized = normalize_name(&product.name);
    if normalized.is_empty() || product.name.chars().any(char::is_control) {
        return Err(invalid(product, "名称为空或包含控制字符".to_string()));
    }
    if normalized != product.name {
        return Err(invalid(
            product,
            format!("名称未规范化，应为 '{normalized}'"),
        ));
    }
    if product.maximum <= 0 || product.current < 0 || product.current > product.maximum {
        return Err(invalid(
            product,
            format!("数量越界: {}/{}", product.current, product.maximum),
        ));
    }
    Ok(())
}

fn rejected(err: LedgerError) -> LedgerError {
    warn!(error = %err, "操作被拒绝");
    err
}

fn persistence(err: StoreError) -> LedgerError {
    match err {
        StoreError::Duplicate(name) => rejected(LedgerError::Duplicate(name)),
        StoreError::NotFound(name) => rejected(LedgerError::NotFound(name)),
        other => {
            error!(error = %other, "存储写入失败");
            LedgerError::Persistence(other)
        }
    }
}

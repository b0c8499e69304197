use std::collections::BTreeMap;

use super::ProductStore;
use crate::error::StoreError;
use crate::models::Product;

/// 内存存储（不落盘），用于演示和测试
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: BTreeMap<String, Product>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for MemoryStore {
    fn load_all(&mut self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.values().cloned().collect())
    }

    fn insert(&mut self, product: &Product) -> Result<(), StoreError> {
        if self.products.contains_key(&product.name) {
            return Err(StoreError::Duplicate(product.name.clone()));
        }
        self.products.insert(product.name.clone(), product.clone());
        Ok(())
    }

    fn update(&mut self, name: &str, current: i64) -> Result<(), StoreError> {
        let product = self
            .products
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        product.current = current;
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        self.products
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}

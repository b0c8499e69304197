use std::path::Path;

use rusqlite::{Connection, ErrorCode, params};
use tracing::debug;

use super::ProductStore;
use crate::error::StoreError;
use crate::models::Product;

/// SQLite 存储，表结构沿用 `produtos`
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS produtos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nome TEXT UNIQUE NOT NULL,
                atual INTEGER NOT NULL,
                maximo INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl ProductStore for SqliteStore {
    fn load_all(&mut self) -> Result<Vec<Product>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT nome, atual, maximo FROM produtos ORDER BY nome")?;
        let rows = stmt.query_map([], |row| {
            Ok(Product {
                name: row.get(0)?,
                current: row.get(1)?,
                maximum: row.get(2)?,
            })
        })?;
        let products = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = products.len(), "已从 SQLite 读取商品");
        Ok(products)
    }

    fn insert(&mut self, product: &Product) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        match tx.execute(
            "INSERT INTO produtos (nome, atual, maximo) VALUES (?1, ?2, ?3)",
            params![product.name, product.current, product.maximum],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(StoreError::Duplicate(product.name.clone()));
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit()?;
        Ok(())
    }

    fn update(&mut self, name: &str, current: i64) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE produtos SET atual = ?1 WHERE nome = ?2",
            params![current, name],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }
        tx.commit()?;
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute("DELETE FROM produtos WHERE nome = ?1", params![name])?;
        if changed == 0 {
            return Err(StoreError::NotFound(name.to_string()));
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_load_sorted() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(&Product::new("Zinco".to_string(), 5)).unwrap();
        store.insert(&Product::new("Arruela".to_string(), 8)).unwrap();

        let names: Vec<String> = store
            .load_all()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Arruela", "Zinco"]);
    }

    #[test]
    fn test_duplicate_insert() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(&Product::new("A".to_string(), 10)).unwrap();
        let err = store.insert(&Product::new("A".to_string(), 5)).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(name) if name == "A"));

        let products = store.load_all().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].maximum, 10);
    }

    #[test]
    fn test_update_and_delete_missing() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(matches!(
            store.update("Ghost", 1),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete("Ghost"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque.db");

        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.insert(&Product::new("Widget".to_string(), 100)).unwrap();
            store.insert(&Product::new("Gadget".to_string(), 10)).unwrap();
            store.update("Widget", 20).unwrap();
            store.delete("Gadget").unwrap();
        }

        let mut store = SqliteStore::open(&path).unwrap();
        let products = store.load_all().unwrap();
        assert_eq!(
            products,
            vec![Product {
                name: "Widget".to_string(),
                current: 20,
                maximum: 100,
            }]
        );
    }
}

//! CSV 文件存储
//!
//! 文件内容整体镜像在内存中，每次写操作都重写整个文件（先写临时文件再重命名）。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ProductStore;
use crate::error::StoreError;
use crate::models::Product;

const HEADER: &str = "nome,quantidade_atual,quantidade_maxima";

/// CSV 存储
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
    products: Vec<Product>,
}

impl CsvStore {
    /// 打开 CSV 文件，文件不存在时视为空库存
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let products = if path.exists() {
            parse_document(&fs::read_to_string(path)?)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            products,
        })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.products.iter().position(|p| p.name == name)
    }

    /// 将内存镜像写回文件
    fn flush(&self, products: &[Product]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("csv.tmp");
        fs::write(&tmp, render_document(products))?;
        fs::rename(&tmp, &self.path)?;
        debug!(count = products.len(), path = %self.path.display(), "CSV 已写入");
        Ok(())
    }

    /// 先落盘，成功后再替换内存镜像
    fn commit(&mut self, products: Vec<Product>) -> Result<(), StoreError> {
        self.flush(&products)?;
        self.products = products;
        Ok(())
    }
}

impl ProductStore for CsvStore {
    fn load_all(&mut self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.clone())
    }

    fn insert(&mut self, product: &Product) -> Result<(), StoreError> {
        if self.position(&product.name).is_some() {
            return Err(StoreError::Duplicate(product.name.clone()));
        }
        let mut next = self.products.clone();
        next.push(product.clone());
        self.commit(next)
    }

    fn update(&mut self, name: &str, current: i64) -> Result<(), StoreError> {
        let idx = self
            .position(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let mut next = self.products.clone();
        next[idx].current = current;
        self.commit(next)
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let idx = self
            .position(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let mut next = self.products.clone();
        next.remove(idx);
        self.commit(next)
    }
}

fn render_document(products: &[Product]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for p in products {
        out.push_str(&format!("{},{},{}\n", quote_field(&p.name), p.current, p.maximum));
    }
    out
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn parse_document(content: &str) -> Result<Vec<Product>, StoreError> {
    let mut lines = content.lines().enumerate();

    match lines.next() {
        Some((_, header)) if header.trim() == HEADER => {}
        Some(_) => {
            return Err(StoreError::Corrupt {
                line: 1,
                reason: format!("表头应为 `{HEADER}`"),
            });
        }
        None => return Ok(Vec::new()),
    }

    let mut products: Vec<Product> = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let corrupt = |reason: String| StoreError::Corrupt {
            line: line_no,
            reason,
        };

        let fields = split_record(line).map_err(corrupt)?;
        let [name, current, maximum] = <[String; 3]>::try_from(fields)
            .map_err(|f| corrupt(format!("应有 3 列，实际 {} 列", f.len())))?;

        let current: i64 = current
            .trim()
            .parse()
            .map_err(|_| corrupt(format!("当前数量不是整数: {current}")))?;
        let maximum: i64 = maximum
            .trim()
            .parse()
            .map_err(|_| corrupt(format!("最大数量不是整数: {maximum}")))?;

        if name.is_empty() {
            return Err(corrupt("商品名为空".to_string()));
        }
        if maximum <= 0 || current < 0 || current > maximum {
            return Err(corrupt(format!("数量越界: {current}/{maximum}")));
        }
        if products.iter().any(|p| p.name == name) {
            return Err(corrupt(format!("商品重复: {name}")));
        }

        products.push(Product {
            name,
            current,
            maximum,
        });
    }
    Ok(products)
}

/// 拆分一行记录，支持双引号包裹及 `""` 转义
fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            ('"', false) if field.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            (c, _) => field.push(c),
        }
    }

    if in_quotes {
        return Err("引号未闭合".to_string());
    }
    fields.push(field);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(&dir.path().join("estoque.csv")).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque.csv");
        let mut store = CsvStore::open(&path).unwrap();
        store.insert(&Product::new("Widget".to_string(), 100)).unwrap();
        store.update("Widget", 20).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "nome,quantidade_atual,quantidade_maxima\nWidget,20,100\n");
    }

    #[test]
    fn test_reload_after_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estoque.csv");
        {
            let mut store = CsvStore::open(&path).unwrap();
            store.insert(&Product::new("Porca, m6".to_string(), 50)).unwrap();
            store.insert(&Product::new("Cabo \"usb\"".to_string(), 7)).unwrap();
            store.insert(&Product::new("Fita".to_string(), 3)).unwrap();
            store.delete("Fita").unwrap();
        }

        let mut store = CsvStore::open(&path).unwrap();
        let mut names: Vec<String> = store
            .load_all()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Cabo \"usb\"", "Porca, m6"]);
    }

    #[test]
    fn test_duplicate_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(&dir.path().join("estoque.csv")).unwrap();
        store.insert(&Product::new("A".to_string(), 10)).unwrap();
        assert!(matches!(
            store.insert(&Product::new("A".to_string(), 5)),
            Err(StoreError::Duplicate(_))
        ));
        assert!(matches!(store.update("B", 1), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("B"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_rejects_corrupt_rows() {
        let bad_header = "name,current,max\nA,1,2\n";
        assert!(matches!(
            parse_document(bad_header),
            Err(StoreError::Corrupt { line: 1, .. })
        ));

        let out_of_range = "nome,quantidade_atual,quantidade_maxima\nA,1,2\nB,9,5\n";
        assert!(matches!(
            parse_document(out_of_range),
            Err(StoreError::Corrupt { line: 3, .. })
        ));

        let not_a_number = "nome,quantidade_atual,quantidade_maxima\nA,x,2\n";
        assert!(matches!(
            parse_document(not_a_number),
            Err(StoreError::Corrupt { line: 2, .. })
        ));
    }

    #[test]
    fn test_split_record_quotes() {
        assert_eq!(
            split_record(r#""a,b",1,2"#).unwrap(),
            vec!["a,b".to_string(), "1".to_string(), "2".to_string()]
        );
        assert_eq!(
            split_record(r#""say ""hi""",0,1"#).unwrap(),
            vec!["say \"hi\"".to_string(), "0".to_string(), "1".to_string()]
        );
        assert!(split_record(r#""open,1,2"#).is_err());
    }
}

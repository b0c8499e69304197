/// 默认低库存阈值（当前 / 最大 < 30%）
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 0.30;

/// 库存商品
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub current: i64,
    pub maximum: i64, // 创建后不可修改
}

impl Product {
    /// 新建商品时当前库存等于最大容量
    pub fn new(name: String, maximum: i64) -> Self {
        Self {
            name,
            current: maximum,
            maximum,
        }
    }

    pub fn fill_ratio(&self) -> f64 {
        self.current as f64 / self.maximum as f64
    }

    pub fn is_low_stock(&self, threshold: f64) -> bool {
        self.fill_ratio() < threshold
    }

    /// 入库后的数量，超出部分直接截断
    pub fn restocked(&self, quantity: i64) -> i64 {
        self.current.saturating_add(quantity).min(self.maximum)
    }

    /// 出库后的数量，库存不足时返回 None
    pub fn consumed(&self, quantity: i64) -> Option<i64> {
        (quantity <= self.current).then(|| self.current - quantity)
    }
}

/// 库存变动操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOperation {
    Restock, // 入库
    Consume, // 出库
}

/// 列表显示行
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub name: String,
    pub current: i64,
    pub maximum: i64,
    pub low_stock: bool,
}

impl DisplayRow {
    pub fn from_product(product: &Product, threshold: f64) -> Self {
        Self {
            name: product.name.clone(),
            current: product.current,
            maximum: product.maximum,
            low_stock: product.is_low_stock(threshold),
        }
    }
}

/// 规范化商品名：去掉首尾空白，首字母大写，其余小写
pub fn normalize_name(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

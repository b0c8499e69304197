//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use chrono::{DateTime, Local};

use crate::ledger::Ledger;
use crate::models::{DisplayRow, StockOperation};

/// 应用状态
pub struct App {
    pub ledger: Ledger,
    pub rows: Vec<DisplayRow>, // 当前过滤条件下的列表
    pub selected_index: usize,
    pub search: String,
    pub mode: AppMode,
    pub input_buffer: String,
    pub input_field: InputField,
    pub temp_name: String, // 输入数量时暂存的商品名
    pub message: Option<StatusMessage>,
    pub show_chart: bool,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    AddingProduct,
    AdjustingStock(StockOperation),
    Searching,
    Confirm(ConfirmAction),
}

/// 确认操作类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    Delete(String),
}

/// 输入字段类型
#[derive(Debug, Clone, PartialEq)]
pub enum InputField {
    Name,
    Quantity,
}

/// 状态栏消息
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub at: DateTime<Local>,
}

impl StatusMessage {
    pub fn render(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.text)
    }
}

impl App {
    /// 创建新的应用实例
    pub fn new(ledger: Ledger) -> Self {
        let mut app = Self {
            ledger,
            rows: Vec::new(),
            selected_index: 0,
            search: String::new(),
            mode: AppMode::Normal,
            input_buffer: String::new(),
            input_field: InputField::Name,
            temp_name: String::new(),
            message: None,
            show_chart: false,
        };
        app.refresh_rows();
        app
    }

    /// 按当前搜索词刷新列表
    pub fn refresh_rows(&mut self) {
        self.rows = self.ledger.list(&self.search);

        // 确保选中索引有效
        if self.rows.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len() - 1;
        }
    }

    /// 获取当前选中的行
    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.rows.get(self.selected_index)
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            at: Local::now(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
            at: Local::now(),
        });
    }
}

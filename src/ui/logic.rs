//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑以及表单到账本操作的转换

use super::actions::Action;
use super::state::{App, AppMode, ConfirmAction, InputField};
use crate::models::{StockOperation, normalize_name};

/// 解析正整数输入
pub fn parse_positive(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok().filter(|n| *n > 0)
}

impl App {
    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveSelectionUp => self.move_up(),
            Action::MoveSelectionDown => self.move_down(),

            Action::StartAddProduct => self.start_add_product(),
            Action::StartAdjustStock(operation) => self.start_adjust_stock(operation),
            Action::StartDeleteProduct => self.start_delete_product(),
            Action::StartSearch => self.start_search(),
            Action::ClearSearch => self.clear_search(),
            Action::ToggleChart => self.toggle_chart(),

            Action::Cancel => self.cancel(),

            Action::Submit => match self.mode.clone() {
                AppMode::AddingProduct => match self.input_field {
                    InputField::Name => self.move_to_quantity_input(),
                    InputField::Quantity => self.confirm_add_product(),
                },
                AppMode::AdjustingStock(operation) => match self.input_field {
                    InputField::Name => self.move_to_quantity_input(),
                    InputField::Quantity => self.confirm_adjust_stock(operation),
                },
                AppMode::Searching => self.mode = AppMode::Normal,
                AppMode::Confirm(_) => self.execute_confirm(),
                AppMode::Normal => {}
            },

            Action::Input(c) => match self.mode {
                AppMode::Searching => {
                    self.input_buffer.push(c);
                    self.apply_search();
                }
                AppMode::AddingProduct | AppMode::AdjustingStock(_) => self.input_buffer.push(c),
                _ => {}
            },

            Action::DeleteChar => match self.mode {
                AppMode::Searching => {
                    self.input_buffer.pop();
                    self.apply_search();
                }
                AppMode::AddingProduct | AppMode::AdjustingStock(_) => {
                    self.input_buffer.pop();
                }
                _ => {}
            },
        }
        false
    }

    // ============ 导航相关 ============

    /// 向上移动选择
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// 向下移动选择
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.rows.len() {
            self.selected_index += 1;
        }
    }

    // ============ 表单相关 ============

    fn start_form(&mut self, mode: AppMode, name: String) {
        self.mode = mode;
        self.input_field = InputField::Name;
        self.input_buffer = name;
        self.temp_name.clear();
    }

    /// 开始添加商品
    pub fn start_add_product(&mut self) {
        self.start_form(AppMode::AddingProduct, String::new());
    }

    /// 开始入库/出库，商品名预填为当前选中项
    pub fn start_adjust_stock(&mut self, operation: StockOperation) {
        let name = self
            .selected_row()
            .map(|row| row.name.clone())
            .unwrap_or_default();
        self.start_form(AppMode::AdjustingStock(operation), name);
    }

    /// 名称输入完成，切换到数量输入
    pub fn move_to_quantity_input(&mut self) {
        let name = normalize_name(&self.input_buffer);
        if name.is_empty() {
            self.error("商品名不能为空");
            return;
        }
        self.temp_name = name;
        self.input_buffer.clear();
        self.input_field = InputField::Quantity;
    }

    /// 确认添加商品
    pub fn confirm_add_product(&mut self) {
        let Some(maximum) = parse_positive(&self.input_buffer) else {
            self.error("最大数量必须为正整数");
            return;
        };

        let name = self.temp_name.clone();
        let outcome = self
            .ledger
            .create(&name, maximum)
            .map(|p| format!("商品 '{}' 已添加 ({}/{})", p.name, p.current, p.maximum));
        self.finish_form(outcome);
    }

    /// 确认入库/出库
    pub fn confirm_adjust_stock(&mut self, operation: StockOperation) {
        let Some(quantity) = parse_positive(&self.input_buffer) else {
            self.error("数量必须为正整数");
            return;
        };

        let name = self.temp_name.clone();
        let outcome = self
            .ledger
            .apply(&name, operation, quantity)
            .map(|p| format!("'{}' 库存已更新: {}/{}", p.name, p.current, p.maximum));
        self.finish_form(outcome);
    }

    /// 账本操作结束后回到普通模式，错误同样只提示不中断
    fn finish_form<E: std::fmt::Display>(&mut self, outcome: Result<String, E>) {
        match outcome {
            Ok(text) => self.info(text),
            Err(e) => self.error(e.to_string()),
        }
        self.refresh_rows();
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
        self.temp_name.clear();
    }

    // ============ 搜索相关 ============

    /// 开始搜索
    pub fn start_search(&mut self) {
        self.mode = AppMode::Searching;
        self.input_buffer = self.search.clone();
    }

    fn apply_search(&mut self) {
        self.search = self.input_buffer.trim().to_string();
        self.selected_index = 0;
        self.refresh_rows();
    }

    /// 清除搜索
    pub fn clear_search(&mut self) {
        self.search.clear();
        self.input_buffer.clear();
        self.refresh_rows();
    }

    // ============ 图表 ============

    /// 切换柱状图视图
    pub fn toggle_chart(&mut self) {
        if self.show_chart {
            self.show_chart = false;
        } else if self.ledger.is_empty() {
            self.error("库存中没有商品，无法显示图表");
        } else {
            self.show_chart = true;
        }
    }

    // ============ 删除相关 ============

    /// 开始删除商品
    pub fn start_delete_product(&mut self) {
        if let Some(row) = self.selected_row() {
            let name = row.name.clone();
            self.mode = AppMode::Confirm(ConfirmAction::Delete(name));
        }
    }

    /// 执行确认操作
    pub fn execute_confirm(&mut self) {
        if let AppMode::Confirm(ConfirmAction::Delete(name)) = &self.mode {
            let name = name.clone();
            match self.ledger.delete(&name) {
                Ok(product) => self.info(format!("商品 '{}' 已删除", product.name)),
                Err(e) => self.error(e.to_string()),
            }
        }
        self.refresh_rows();
        self.mode = AppMode::Normal;
    }

    // ============ 通用操作 ============

    /// 取消当前操作
    pub fn cancel(&mut self) {
        if self.mode == AppMode::Searching {
            self.clear_search();
        }
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
        self.temp_name.clear();
        self.message = None;
    }
}

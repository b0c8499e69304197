//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{App, AppMode};
use crate::models::StockOperation;

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyCode) -> Option<Action> {
    match mode {
        AppMode::Normal => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveSelectionDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveSelectionUp),
            KeyCode::Char('a') => Some(Action::StartAddProduct),
            KeyCode::Char('+') => Some(Action::StartAdjustStock(StockOperation::Restock)),
            KeyCode::Char('-') => Some(Action::StartAdjustStock(StockOperation::Consume)),
            KeyCode::Char('d') => Some(Action::StartDeleteProduct),
            KeyCode::Char('/') => Some(Action::StartSearch),
            KeyCode::Char('c') => Some(Action::ClearSearch),
            KeyCode::Char('g') => Some(Action::ToggleChart),
            _ => None,
        },
        AppMode::AddingProduct | AppMode::AdjustingStock(_) | AppMode::Searching => match key {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::Confirm(_) => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Submit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

/// 处理按键事件，返回 true 表示退出
pub fn handle_key_event(app: &mut App, key: KeyCode) -> bool {
    match get_action(&app.mode, key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

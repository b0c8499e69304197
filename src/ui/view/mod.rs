//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{App, AppMode, ConfirmAction, InputField};
use crate::models::{DisplayRow, StockOperation};
use components::{render_dialog_framework, render_input_widget, render_stock_chart};
use layouts::centered_rect;

/// 列表行文本，低库存时附加警告标记
pub fn format_row(row: &DisplayRow) -> String {
    let alert = if row.low_stock { " ⚠️" } else { "" };
    format!("{} - {}/{}{}", row.name, row.current, row.maximum, alert)
}

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(10),   // 列表 / 图表
            Constraint::Length(5), // 详情
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    if app.show_chart {
        render_stock_chart(frame, chunks[1], &app.ledger.chart_data());
    } else {
        render_list(frame, app, chunks[1]);
    }
    render_details(frame, app, chunks[2]);
    render_help(frame, app, chunks[3]);

    // 渲染弹窗
    match &app.mode {
        AppMode::AddingProduct => render_add_dialog(frame, app),
        AppMode::AdjustingStock(operation) => render_adjust_dialog(frame, app, *operation),
        AppMode::Searching => render_search_dialog(frame, app),
        AppMode::Confirm(action) => render_confirm_dialog(frame, action),
        AppMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("📦 库存管理")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i == app.selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if row.low_stock {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };

            ListItem::new(Line::from(vec![Span::styled(format_row(row), style)]))
        })
        .collect();

    let title = if app.search.is_empty() {
        "📊 当前库存".to_string()
    } else {
        format!("📊 当前库存 (搜索: {})", app.search)
    };

    let list_widget = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list_widget, area, &mut state);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(row) = app.selected_row() {
        let percent = row.current as f64 / row.maximum as f64 * 100.0;
        format!(
            "商品: {}\n库存: {}/{} ({:.0}%){}",
            row.name,
            row.current,
            row.maximum,
            percent,
            if row.low_stock {
                format!(
                    "  低于 {:.0}% 警戒线",
                    app.ledger.low_stock_threshold() * 100.0
                )
            } else {
                String::new()
            }
        )
    } else if app.ledger.is_empty() {
        "暂无商品，按 'a' 添加第一个商品".to_string()
    } else {
        "没有匹配的商品，按 'c' 清除搜索".to_string()
    };

    let details = Paragraph::new(content)
        .block(Block::default().title("详情").borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    frame.render_widget(details, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match &app.mode {
        AppMode::Normal => {
            "[a] 添加  [+] 入库  [-] 出库  [d] 删除  [/] 搜索  [c] 清除搜索  [g] 图表  [j/k] 导航  [q] 退出"
        }
        AppMode::AddingProduct | AppMode::AdjustingStock(_) => match app.input_field {
            InputField::Name => "输入商品名后按 [Enter] 继续  [Esc] 取消",
            InputField::Quantity => "输入数量后按 [Enter] 完成  [Esc] 取消",
        },
        AppMode::Searching => "输入关键字实时过滤  [Enter] 完成  [Esc] 清除",
        AppMode::Confirm(_) => "[y] 确认  [n] 取消",
    };

    let (text, style) = match &app.message {
        Some(message) => (
            format!("{}  |  {}", help_text, message.render()),
            Style::default().fg(if message.is_error {
                Color::Red
            } else {
                Color::Gray
            }),
        ),
        None => (help_text.to_string(), Style::default().fg(Color::Gray)),
    };

    let help = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_two_step_form(frame: &mut Frame, app: &App, title: &str, quantity_label: &str) {
    let area = centered_rect(60, 40, frame.area());
    let inner = render_dialog_framework(frame, area, title);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    let is_name_active = app.input_field == InputField::Name;
    let name_val = if is_name_active {
        &app.input_buffer
    } else {
        &app.temp_name
    };
    render_input_widget(frame, chunks[0], "商品名", name_val, is_name_active, Color::Yellow);

    let is_quantity_active = app.input_field == InputField::Quantity;
    let quantity_val = if is_quantity_active {
        app.input_buffer.as_str()
    } else {
        ""
    };
    render_input_widget(
        frame,
        chunks[1],
        quantity_label,
        quantity_val,
        is_quantity_active,
        Color::Yellow,
    );

    let hint = match app.input_field {
        InputField::Name => "输入商品名后按 Enter 继续",
        InputField::Quantity => "输入正整数后按 Enter 完成",
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::Gray)),
        chunks[2],
    );
}

fn render_add_dialog(frame: &mut Frame, app: &App) {
    render_two_step_form(frame, app, "📦 添加新商品", "最大数量");
}

fn render_adjust_dialog(frame: &mut Frame, app: &App, operation: StockOperation) {
    let title = match operation {
        StockOperation::Restock => "🔄 入库",
        StockOperation::Consume => "🔄 出库",
    };
    render_two_step_form(frame, app, title, "数量");
}

fn render_search_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());
    let inner = render_dialog_framework(frame, area, "🔍 搜索商品");
    render_input_widget(frame, inner, "关键字", &app.input_buffer, true, Color::Yellow);
}

fn render_confirm_dialog(frame: &mut Frame, action: &ConfirmAction) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let message = match action {
        ConfirmAction::Delete(name) => format!("确认删除商品 '{}'？", name),
    };

    let dialog = Paragraph::new(format!("{}\n\n[y] 确认  [n] 取消", message))
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title("⚠️ 确认操作").borders(Borders::ALL));

    frame.render_widget(dialog, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_marks_low_stock() {
        let mut row = DisplayRow {
            name: "Widget".to_string(),
            current: 20,
            maximum: 100,
            low_stock: true,
        };
        assert_eq!(format_row(&row), "Widget - 20/100 ⚠️");

        row.current = 100;
        row.low_stock = false;
        assert_eq!(format_row(&row), "Widget - 100/100");
    }
}

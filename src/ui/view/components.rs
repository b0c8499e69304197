//! 通用 UI 组件
//!
//! 对话框、输入框、柱状图等通用组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{BarChart, Block, Borders, Clear, Paragraph, Wrap},
};

use super::layouts::bar_width;

const BAR_GAP: u16 = 1;

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 带有标题和样式的输入框
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_focused: bool,
    active_color: Color,
) {
    let style = if is_focused {
        Style::default()
            .fg(active_color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let input = Paragraph::new(value)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(input, area);
}

/// [组件] 当前库存柱状图，无数据时显示提示
pub fn render_stock_chart(frame: &mut Frame, area: Rect, data: &[(String, i64)]) {
    let block = Block::default().title("📈 当前库存").borders(Borders::ALL);

    if data.is_empty() {
        let empty = Paragraph::new("库存中没有商品可供显示")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<(&str, u64)> = data
        .iter()
        .map(|(name, current)| (name.as_str(), u64::try_from(*current).unwrap_or(0)))
        .collect();
    let inner_width = area.width.saturating_sub(2);

    let chart = BarChart::default()
        .block(block)
        .data(bars.as_slice())
        .bar_width(bar_width(inner_width, bars.len(), BAR_GAP))
        .bar_gap(BAR_GAP)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(chart, area);
}

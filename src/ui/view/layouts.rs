//! 布局工具

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 在区域中央按百分比切出一块矩形，用于弹窗
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// 柱宽：尽量铺满可用宽度，限制在 3..=12 之间
pub fn bar_width(available: u16, bars: usize, gap: u16) -> u16 {
    if bars == 0 {
        return 3;
    }
    let per_bar = available / bars.min(u16::MAX as usize) as u16;
    per_bar.saturating_sub(gap).clamp(3, 12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 10);
    }

    #[test]
    fn test_bar_width_bounds() {
        assert_eq!(bar_width(100, 0, 1), 3);
        assert_eq!(bar_width(100, 2, 1), 12);
        assert_eq!(bar_width(100, 10, 1), 9);
        assert_eq!(bar_width(20, 50, 1), 3);
    }
}

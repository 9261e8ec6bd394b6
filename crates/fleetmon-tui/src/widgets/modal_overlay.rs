//! Shared modal overlay helpers: placement, dimmed backdrop, and shadow

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Clear, Widget};

use crate::theme::palette;

/// Rect of `width_percent` x `height_percent` of `area`, centered, never
/// smaller than `min_width` x `min_height` (clamped to `area`)
pub fn centered_rect(
    width_percent: u16,
    height_percent: u16,
    min_width: u16,
    min_height: u16,
    area: Rect,
) -> Rect {
    let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent.min(100)) / 100) as u16;
    let w = scale(area.width, width_percent).max(min_width).min(area.width);
    let h = scale(area.height, height_percent)
        .max(min_height)
        .min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Dim everything in `area` and clear `modal` with a one-cell shadow to
/// its right and bottom, ready for the modal's own content
pub fn prepare(buf: &mut Buffer, area: Rect, modal: Rect) {
    let dim = Style::default()
        .fg(palette::TEXT_MUTED)
        .bg(palette::DEEPEST_BG);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(dim);
            }
        }
    }

    let shadow = Style::default().bg(palette::SHADOW);
    let right = modal.right();
    let bottom = modal.bottom();
    let edge = (modal.top() + 1..=bottom)
        .map(|y| (right, y))
        .chain((modal.left() + 1..=right).map(|x| (x, bottom)));
    for pos in edge {
        if let Some(cell) = buf.cell_mut(pos) {
            cell.set_char(' ');
            cell.set_style(shadow);
        }
    }

    Clear.render(modal, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_by_percent() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(60, 50, 10, 5, area), Rect::new(20, 10, 60, 20));
    }

    #[test]
    fn test_centered_rect_respects_minimum_and_area() {
        let area = Rect::new(0, 0, 40, 10);
        let r = centered_rect(10, 10, 30, 8, area);
        assert_eq!((r.width, r.height), (30, 8));

        let r = centered_rect(50, 50, 80, 20, area);
        assert_eq!(r, area);
    }

    #[test]
    fn test_prepare_draws_shadow_outside_modal() {
        let area = Rect::new(0, 0, 20, 10);
        let modal = Rect::new(5, 2, 10, 5);
        let mut buf = Buffer::empty(area);

        prepare(&mut buf, area, modal);

        assert_eq!(buf[(15, 4)].bg, palette::SHADOW);
        assert_eq!(buf[(8, 7)].bg, palette::SHADOW);
        assert_ne!(buf[(4, 1)].bg, palette::SHADOW);
    }
}

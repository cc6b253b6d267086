//! Modal prompt for a pending destructive action.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::confirm::PendingAction;
use crate::tui::app::centered_rect;
use crate::tui::theme;

/// What a key press means while the prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKey {
    Confirm,
    Cancel,
    /// Swallowed: the prompt is modal.
    Ignored,
}

pub fn read_key(code: KeyCode) -> DialogKey {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => DialogKey::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => DialogKey::Cancel,
        _ => DialogKey::Ignored,
    }
}

pub fn render<K>(frame: &mut Frame, area: Rect, pending: &PendingAction<K>) {
    let modal_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, modal_area);

    let block = theme::block_modal("Confirm", theme::ERROR);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {}", pending.message),
            Style::default().fg(theme::TEXT),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("y/Enter", Style::default().fg(theme::ERROR)),
            Span::raw(format!(" {}, ", pending.button_label)),
            Span::styled("n/Esc", Style::default().fg(theme::SUCCESS)),
            Span::raw(" cancel"),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

//! Table rendering for a [`ListView`]: sortable header, highlighted row,
//! page footer and error line.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::core::list_view::ListView;
use crate::tui::theme;

/// One table column bound to a backend sort field.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    /// Wire name sent as `sortBy`. `None` for unsortable columns.
    pub field: Option<&'static str>,
    pub width: Constraint,
}

impl Column {
    pub const fn sortable(header: &'static str, field: &'static str, width: Constraint) -> Self {
        Self {
            header,
            field: Some(field),
            width,
        }
    }

    pub const fn fixed(header: &'static str, width: Constraint) -> Self {
        Self {
            header,
            field: None,
            width,
        }
    }
}

/// Indices of the columns that can be sorted.
pub fn sortable_indices(columns: &[Column]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.field.map(|_| i))
        .collect()
}

/// Step the sort-column cursor to the next (or previous) sortable column.
pub fn step_cursor(columns: &[Column], cursor: usize, forward: bool) -> usize {
    let sortable = sortable_indices(columns);
    if sortable.is_empty() {
        return cursor;
    }
    let pos = sortable.iter().position(|&i| i == cursor).unwrap_or(0);
    let next = if forward {
        (pos + 1) % sortable.len()
    } else {
        (pos + sortable.len() - 1) % sortable.len()
    };
    sortable[next]
}

pub struct PagedTable<'a, T> {
    pub title: &'a str,
    pub view: &'a ListView<T>,
    pub columns: &'a [Column],
    /// Column the `s` key would sort by.
    pub sort_cursor: usize,
    pub hints: &'a [(&'a str, &'a str)],
}

impl<T: Clone> PagedTable<'_, T> {
    pub fn render<F>(&self, frame: &mut Frame, area: Rect, cells: F)
    where
        F: Fn(&T) -> Vec<Cell<'static>>,
    {
        let chunks = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        let title = if self.view.is_loading() {
            format!("{} (loading…)", self.title)
        } else {
            self.title.to_string()
        };
        let block = theme::block_focused(&title);

        let header = Row::new(self.header_cells()).height(1).bottom_margin(1);
        let rows = self.view.rows().iter().map(|row| Row::new(cells(row)));
        let widths: Vec<Constraint> = self.columns.iter().map(|c| c.width).collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::selected_row())
            .highlight_symbol("▸ ");

        let mut state = TableState::default();
        if !self.view.is_empty() {
            state.select(Some(self.view.selected()));
        }
        frame.render_stateful_widget(table, chunks[0], &mut state);

        frame.render_widget(Paragraph::new(self.status_line()), chunks[1]);
        frame.render_widget(Paragraph::new(self.hint_line()), chunks[2]);
    }

    fn header_cells(&self) -> Vec<Cell<'static>> {
        let sort = self.view.sort();
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let mut label = column.header.to_string();
                if column.field == Some(sort.column.as_str()) {
                    label.push(' ');
                    label.push_str(sort.direction.arrow());
                }
                let mut style = theme::heading();
                if i == self.sort_cursor {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                Cell::from(label).style(style)
            })
            .collect()
    }

    fn status_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(format!(" {}", self.view.page_label()), theme::muted())];
        if let Some(err) = self.view.error() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("✗ {err}"), theme::error_text()));
        }
        Line::from(spans)
    }

    fn hint_line(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        for (key, desc) in self.hints {
            spans.push(Span::styled(key.to_string(), theme::key_label()));
            spans.push(Span::styled(format!(":{desc} "), theme::key_hint()));
        }
        Line::from(spans)
    }
}

/// A cell showing `text` or a dim `N/A`.
pub fn text_cell(text: impl Into<String>) -> Cell<'static> {
    let text = text.into();
    if text == crate::core::format::NOT_AVAILABLE {
        Cell::from(text).style(theme::dim())
    } else {
        Cell::from(text).style(Style::default().fg(theme::TEXT))
    }
}

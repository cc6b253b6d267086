//! Collapsible left sidebar with grouped navigation.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::events::{AreaFocus, Focus, SidebarGroup};
use super::layout::SidebarVisibility;
use super::theme;

/// Sidebar navigation state.
#[derive(Debug, Default)]
pub struct SidebarState {
    /// Whether the user has toggled collapse (Ctrl+B).
    pub user_collapsed: bool,
    /// Currently highlighted item index (into Focus::ALL).
    pub selected: usize,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_collapse(&mut self) {
        self.user_collapsed = !self.user_collapsed;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Focus::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + Focus::ALL.len() - 1) % Focus::ALL.len();
    }

    pub fn selected_focus(&self) -> Focus {
        Focus::ALL[self.selected % Focus::ALL.len()]
    }

    /// Sync selection to match the active focus (e.g., after Tab navigation).
    pub fn sync_to_focus(&mut self, focus: Focus) {
        if let Some(idx) = Focus::ALL.iter().position(|&f| f == focus) {
            self.selected = idx;
        }
    }

    /// `logs_live` marks the Logs entry while its polling task runs.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        visibility: SidebarVisibility,
        current_focus: Focus,
        area_focus: AreaFocus,
        logs_live: bool,
    ) {
        let lines = match visibility {
            SidebarVisibility::Hidden => return,
            SidebarVisibility::Collapsed => self.collapsed_lines(area, current_focus),
            SidebarVisibility::Expanded => {
                self.expanded_lines(area, current_focus, area_focus, logs_live)
            }
        };

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }

    fn collapsed_lines(&self, area: Rect, current_focus: Focus) -> Vec<Line<'static>> {
        Focus::ALL
            .iter()
            .take(area.height as usize)
            .map(|&view| {
                let style = if view == current_focus {
                    theme::title()
                } else {
                    theme::muted()
                };
                Line::from(Span::styled(format!(" {}", view.icon()), style))
            })
            .collect()
    }

    fn expanded_lines(
        &self,
        area: Rect,
        current_focus: Focus,
        area_focus: AreaFocus,
        logs_live: bool,
    ) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let sidebar_focused = area_focus == AreaFocus::Sidebar;

        for group in SidebarGroup::ALL {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!(" {}", group.label()),
                theme::heading(),
            )));

            for &view in group.views() {
                let focus_idx = Focus::ALL.iter().position(|&f| f == view).unwrap_or(0);
                let is_current = view == current_focus;
                let is_selected = sidebar_focused && focus_idx == self.selected;

                let prefix = if is_selected { "▸ " } else { "  " };
                let style = match (is_selected, is_current) {
                    (_, true) => theme::title(),
                    (true, false) => Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                    (false, false) => theme::muted(),
                };

                let mut spans = vec![Span::styled(
                    format!("{prefix}{} {}", view.icon(), view.label()),
                    style,
                )];
                if view == Focus::Logs && logs_live {
                    spans.push(Span::styled(" ●", Style::default().fg(theme::SUCCESS)));
                }
                lines.push(Line::from(spans));
            }
        }

        lines.truncate(area.height as usize);
        lines
    }
}

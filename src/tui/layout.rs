//! Root layout: header strip, sidebar, main content and status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the expanded sidebar (group headers + labeled items).
pub const SIDEBAR_EXPANDED_WIDTH: u16 = 22;
/// Width of the collapsed sidebar (single-char icons).
pub const SIDEBAR_COLLAPSED_WIDTH: u16 = 3;
/// Auto-collapse sidebar below this terminal width.
pub const AUTO_COLLAPSE_THRESHOLD: u16 = 80;
/// Hide sidebar entirely below this terminal width.
pub const HIDE_SIDEBAR_THRESHOLD: u16 = 30;
/// Drop the header strip below this terminal height.
pub const HIDE_HEADER_THRESHOLD: u16 = 12;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Backend/connection strip (None on very short terminals).
    pub header: Option<Rect>,
    /// Sidebar area (None if hidden).
    pub sidebar: Option<Rect>,
    pub main: Rect,
    /// Bottom row.
    pub status: Rect,
}

/// Sidebar visibility derived from terminal width and user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarVisibility {
    Expanded,
    Collapsed,
    Hidden,
}

impl AppLayout {
    /// `user_collapsed`: the user toggled collapse with Ctrl+B.
    pub fn compute(area: Rect, user_collapsed: bool) -> (Self, SidebarVisibility) {
        let visibility = if area.width < HIDE_SIDEBAR_THRESHOLD {
            SidebarVisibility::Hidden
        } else if user_collapsed || area.width < AUTO_COLLAPSE_THRESHOLD {
            SidebarVisibility::Collapsed
        } else {
            SidebarVisibility::Expanded
        };

        let header_height = if area.height < HIDE_HEADER_THRESHOLD { 0 } else { 1 };
        let rows = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        let header = (header_height > 0).then_some(rows[0]);
        let content_area = rows[1];
        let status = rows[2];

        let sidebar_width = match visibility {
            SidebarVisibility::Hidden => 0,
            SidebarVisibility::Collapsed => SIDEBAR_COLLAPSED_WIDTH,
            SidebarVisibility::Expanded => SIDEBAR_EXPANDED_WIDTH,
        };

        let (sidebar, main) = if sidebar_width == 0 {
            (None, content_area)
        } else {
            let cols =
                Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(1)])
                    .split(content_area);
            (Some(cols[0]), cols[1])
        };

        (
            AppLayout {
                header,
                sidebar,
                main,
                status,
            },
            visibility,
        )
    }
}

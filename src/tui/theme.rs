//! Chart-room color theme for the Baleen console: ocean blue borders on a
//! night-navy background, with signal amber for emphasis.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::api::LogLevel;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Ocean blue: focused borders, active items.
pub const PRIMARY: Color = Color::Rgb(0x1E, 0x88, 0xE5);
/// Shallow-water blue: highlights, key labels.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x64, 0xB5, 0xF6);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Signal amber: titles, the selected row, calls to action.
pub const ACCENT: Color = Color::Rgb(0xFF, 0xB3, 0x00);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Night navy: base background.
pub const BG_BASE: Color = Color::Rgb(0x0B, 0x16, 0x22);
/// Surface: sidebar and selected rows.
pub const BG_SURFACE: Color = Color::Rgb(0x13, 0x23, 0x36);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE3, 0xEA, 0xF2);
pub const TEXT_MUTED: Color = Color::Rgb(0x8A, 0x99, 0xA8);
pub const TEXT_DIM: Color = Color::Rgb(0x4E, 0x5D, 0x6C);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x26, 0xC6, 0xDA);

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Table header cells.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted table row.
pub fn selected_row() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_SURFACE)
        .add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key label inside hint bars and the help modal.
pub fn key_label() -> Style {
    Style::default()
        .fg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn error_text() -> Style {
    Style::default().fg(ERROR)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Badge shown while the log tail is live.
pub fn live_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(SUCCESS)
        .add_modifier(Modifier::BOLD)
}

/// Badge shown while the log tail is paused.
pub fn paused_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(WARNING)
        .add_modifier(Modifier::BOLD)
}

pub fn level_color(level: &LogLevel) -> Color {
    match level {
        LogLevel::Error => ERROR,
        LogLevel::Warn => WARNING,
        LogLevel::Info => INFO,
        LogLevel::Debug => PRIMARY_LIGHT,
        LogLevel::Trace | LogLevel::Other(_) => TEXT_MUTED,
    }
}

pub fn level_style(level: &LogLevel) -> Style {
    Style::default()
        .fg(level_color(level))
        .add_modifier(Modifier::BOLD)
}

/// Active/expired subscription badge.
pub fn subscription_status(active: bool) -> Style {
    let color = if active { SUCCESS } else { ERROR };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}

/// Bordered block for modal dialogs, tinted by purpose.
pub fn block_modal(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

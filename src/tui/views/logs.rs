//! Backend log tail. Polls `/api/logs` while the view is focused and not
//! paused; follow mode keeps the newest line in view.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::{LogEntry, Result};
use crate::core::confirm::ConfirmGate;
use crate::core::format::truncate_logger;
use crate::core::polling::{LogFeed, PollingTask};
use crate::core::preferences::LogPreferences;
use crate::tui::events::NotificationLevel;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::confirm_dialog::{self, DialogKey};

const PAGE_SCROLL: usize = 10;

enum LogDataEvent {
    LogsLoaded(Result<Vec<LogEntry>>),
    Cleared(Result<()>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    ClearLogs,
}

pub struct LogViewState {
    feed: LogFeed,
    polling: PollingTask,
    gate: ConfirmGate<LogAction>,
    /// Lines between the bottom of the viewport and the newest entry.
    offset_from_bottom: usize,
    /// Whether the view currently has focus.
    active: bool,
    loading: bool,
    error: Option<String>,

    data_tx: mpsc::UnboundedSender<LogDataEvent>,
    data_rx: mpsc::UnboundedReceiver<LogDataEvent>,
}

impl LogViewState {
    pub fn new(preferences: LogPreferences) -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            feed: LogFeed::new(preferences.filter, preferences.follow),
            polling: PollingTask::new(),
            gate: ConfirmGate::new(),
            offset_from_bottom: 0,
            active: false,
            loading: false,
            error: None,
            data_tx,
            data_rx,
        }
    }

    pub fn feed(&self) -> &LogFeed {
        &self.feed
    }

    pub fn gate(&self) -> &ConfirmGate<LogAction> {
        &self.gate
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while the background poll is running.
    pub fn is_live(&self) -> bool {
        self.polling.is_running()
    }

    // ── Lifecycle ──────────────────────────────────────────────────────────

    /// Called when the view gains focus.
    pub fn enter(&mut self, services: &Services) {
        self.active = true;
        if self.feed.is_paused() {
            self.refresh(services);
        } else {
            self.start_polling(services);
        }
    }

    /// Called when the view loses focus.
    pub fn leave(&mut self) {
        self.active = false;
        self.stop_polling();
    }

    pub fn start_polling(&mut self, services: &Services) {
        let api = services.api.clone();
        let tx = self.data_tx.clone();
        let limit = services.settings.log_limit;
        log::debug!(
            "Log polling started every {:?}",
            services.settings.poll_interval
        );
        self.loading = true;
        self.polling.start(services.settings.poll_interval, move || {
            let api = api.clone();
            let tx = tx.clone();
            async move {
                let _ = tx.send(LogDataEvent::LogsLoaded(api.logs(limit).await));
            }
        });
    }

    pub fn stop_polling(&mut self) {
        if self.polling.is_running() {
            log::debug!("Log polling stopped");
        }
        self.polling.stop();
    }

    /// One fetch, independent of the poll.
    pub fn refresh(&mut self, services: &Services) {
        self.loading = true;
        let api = services.api.clone();
        let tx = self.data_tx.clone();
        let limit = services.settings.log_limit;
        tokio::spawn(async move {
            let _ = tx.send(LogDataEvent::LogsLoaded(api.logs(limit).await));
        });
    }

    pub fn poll(&mut self, services: &Services) {
        while let Ok(event) = self.data_rx.try_recv() {
            match event {
                LogDataEvent::LogsLoaded(Ok(entries)) => {
                    self.loading = false;
                    self.error = None;
                    let before = self.feed.filtered().len();
                    self.feed.replace(entries);
                    if before > 0 && !self.feed.is_following() {
                        // Keep the viewport anchored on the same lines.
                        let grown = self.feed.filtered().len().saturating_sub(before);
                        self.offset_from_bottom += grown;
                    }
                }
                LogDataEvent::LogsLoaded(Err(e)) => {
                    self.loading = false;
                    log::debug!("Log fetch failed: {e}");
                    self.error = Some(e.describe("logs"));
                }
                LogDataEvent::Cleared(Ok(())) => {
                    self.gate.finish();
                    self.feed.clear();
                    self.offset_from_bottom = 0;
                    services.notify("Backend logs cleared", NotificationLevel::Success);
                }
                LogDataEvent::Cleared(Err(e)) => {
                    self.gate.finish();
                    log::warn!("Clearing logs failed: {e}");
                    services.notify(
                        format!("Failed to clear logs: {}", e.describe("logs")),
                        NotificationLevel::Error,
                    );
                    self.refresh(services);
                }
            }
        }

        if self.feed.take_scroll_signal() {
            self.offset_from_bottom = 0;
        }
        self.clamp_offset();
    }

    fn clamp_offset(&mut self) {
        let max = self.feed.filtered().len().saturating_sub(1);
        self.offset_from_bottom = self.offset_from_bottom.min(max);
    }

    // ── Actions ────────────────────────────────────────────────────────────

    fn toggle_pause(&mut self, services: &Services) {
        let paused = !self.feed.is_paused();
        self.feed.set_paused(paused);
        if paused {
            self.stop_polling();
        } else if self.active {
            self.start_polling(services);
        }
    }

    fn cycle_filter(&mut self, services: &Services) {
        self.feed.cycle_filter();
        self.offset_from_bottom = 0;
        if let Err(e) = LogPreferences::save_filter(&*services.preferences, self.feed.filter()) {
            log::warn!("Could not save log filter: {e}");
        }
    }

    fn toggle_follow(&mut self, services: &Services) {
        let follow = !self.feed.is_following();
        self.feed.set_follow(follow);
        if self.feed.take_scroll_signal() {
            self.offset_from_bottom = 0;
        }
        if let Err(e) = LogPreferences::save_follow(&*services.preferences, follow) {
            log::warn!("Could not save follow setting: {e}");
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_add(lines);
        self.clamp_offset();
    }

    fn scroll_down(&mut self, lines: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_sub(lines);
    }

    // ── Input handling ─────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        if self.gate.is_open() {
            match confirm_dialog::read_key(*code) {
                DialogKey::Confirm => {
                    if let Some(LogAction::ClearLogs) = self.gate.confirm() {
                        let api = services.api.clone();
                        let tx = self.data_tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(LogDataEvent::Cleared(api.clear_logs().await));
                        });
                    }
                }
                DialogKey::Cancel => self.gate.cancel(),
                DialogKey::Ignored => {}
            }
            return true;
        }

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char(' ')) => {
                self.toggle_pause(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('f')) => {
                self.cycle_filter(services);
                true
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('F')) => {
                self.toggle_follow(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.refresh(services);
                true
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('D')) => {
                self.gate.request(
                    LogAction::ClearLogs,
                    "Clear the backend's in-memory log buffer?",
                    "Clear Logs",
                );
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.scroll_up(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.scroll_down(1);
                true
            }
            (_, KeyCode::PageUp) => {
                self.scroll_up(PAGE_SCROLL);
                true
            }
            (_, KeyCode::PageDown) => {
                self.scroll_down(PAGE_SCROLL);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                self.offset_from_bottom = usize::MAX;
                self.clamp_offset();
                true
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('G')) | (_, KeyCode::End) => {
                self.offset_from_bottom = 0;
                true
            }
            _ => false,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        frame.render_widget(Paragraph::new(self.status_bar()), chunks[0]);

        let block = theme::block_focused("Backend Logs");
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        let lines: Vec<Line<'static>> = if self.feed.filtered().is_empty() {
            let text = if self.loading {
                "  Loading logs…"
            } else if self.feed.filter().is_some() {
                "  No log entries at this level"
            } else {
                "  No log entries"
            };
            vec![Line::from(Span::styled(text, theme::muted()))]
        } else {
            let (start, end) =
                visible_window(self.feed.filtered().len(), inner.height as usize, self.offset_from_bottom);
            self.feed.filtered()[start..end].iter().map(log_line).collect()
        };
        frame.render_widget(Paragraph::new(lines), inner);

        frame.render_widget(Paragraph::new(hint_line()), chunks[2]);

        if let Some(pending) = self.gate.pending() {
            confirm_dialog::render(frame, area, pending);
        }
    }

    fn status_bar(&self) -> Line<'static> {
        let badge = if self.feed.is_paused() {
            Span::styled(" PAUSED ", theme::paused_badge())
        } else {
            Span::styled(" LIVE ", theme::live_badge())
        };
        let filter = match self.feed.filter() {
            Some(level) => Span::styled(level.to_string(), theme::level_style(level)),
            None => Span::styled("ALL", Style::default().fg(theme::TEXT)),
        };
        let follow = if self.feed.is_following() { "on" } else { "off" };

        let mut spans = vec![
            badge,
            Span::raw("  "),
            Span::styled("Level: ", theme::muted()),
            filter,
            Span::raw("  "),
            Span::styled("Follow: ", theme::muted()),
            Span::styled(follow.to_string(), Style::default().fg(theme::TEXT)),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} of {} entries",
                    self.feed.filtered().len(),
                    self.feed.entries().len()
                ),
                theme::muted(),
            ),
        ];
        if let Some(err) = &self.error {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("✗ {err}"), theme::error_text()));
        }
        Line::from(spans)
    }
}

/// Slice bounds of the lines to draw for a viewport of `height` rows that
/// sits `offset` lines above the newest entry.
fn visible_window(total: usize, height: usize, offset: usize) -> (usize, usize) {
    let end = total.saturating_sub(offset);
    let start = end.saturating_sub(height);
    (start, end)
}

fn log_line(entry: &LogEntry) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("{} ", entry.timestamp), theme::dim()),
        Span::styled(format!("{:<5} ", entry.level), theme::level_style(&entry.level)),
        Span::styled(format!("{} ", truncate_logger(&entry.logger)), Style::default().fg(theme::INFO)),
        Span::styled(entry.message.clone(), Style::default().fg(theme::TEXT)),
    ];
    if !entry.thread.is_empty() {
        spans.push(Span::styled(format!(" [{}]", entry.thread), theme::dim()));
    }
    Line::from(spans)
}

fn hint_line() -> Line<'static> {
    let hints = [
        ("Space", "pause"),
        ("f", "level"),
        ("F", "follow"),
        ("r", "refresh"),
        ("D", "clear"),
        ("j/k", "scroll"),
        ("g/G", "top/bottom"),
    ];
    let mut spans = vec![Span::raw(" ")];
    for (key, desc) in hints {
        spans.push(Span::styled(key, theme::key_label()));
        spans.push(Span::styled(format!(":{desc} "), theme::key_hint()));
    }
    Line::from(spans)
}

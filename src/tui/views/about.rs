//! System information: backend version, database connection, Niord endpoint
//! and record counts, with an on-demand database connection test.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::{
    AboutInfo, ApiError, DatabaseInfo, DatabaseTestResult, NiordConfig, Result,
};
use crate::core::format::or_na;
use crate::tui::services::Services;
use crate::tui::theme;

const TEST_FAILED: &str = "Connection test failed";

enum AboutDataEvent {
    About(Result<AboutInfo>),
    Database(Result<DatabaseInfo>),
    Niord(Result<NiordConfig>),
    DatasetCount(Result<u64>),
    LogCount(Result<u64>),
    DatabaseTest(Result<DatabaseTestResult>),
}

/// Outcome of the last database connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub success: bool,
    pub message: String,
}

impl TestOutcome {
    fn from_result(result: Result<DatabaseTestResult>) -> Self {
        match result {
            Ok(r) if r.success => Self {
                success: true,
                message: if r.message.is_empty() {
                    "Database connection successful".to_string()
                } else {
                    r.message
                },
            },
            Ok(r) => Self {
                success: false,
                message: if r.message.is_empty() {
                    TEST_FAILED.to_string()
                } else {
                    r.message
                },
            },
            Err(ApiError::Status { message, .. }) if !message.trim().is_empty() => Self {
                success: false,
                message,
            },
            Err(_) => Self {
                success: false,
                message: TEST_FAILED.to_string(),
            },
        }
    }
}

pub struct AboutViewState {
    about: Option<AboutInfo>,
    database: Option<DatabaseInfo>,
    niord: Option<NiordConfig>,
    dataset_count: Option<u64>,
    log_count: Option<u64>,
    error: Option<String>,
    /// Information requests still outstanding.
    pending: usize,
    testing: bool,
    test_outcome: Option<TestOutcome>,

    data_tx: mpsc::UnboundedSender<AboutDataEvent>,
    data_rx: mpsc::UnboundedReceiver<AboutDataEvent>,
}

impl Default for AboutViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl AboutViewState {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            about: None,
            database: None,
            niord: None,
            dataset_count: None,
            log_count: None,
            error: None,
            pending: 0,
            testing: false,
            test_outcome: None,
            data_tx,
            data_rx,
        }
    }

    pub fn about(&self) -> Option<&AboutInfo> {
        self.about.as_ref()
    }

    pub fn database(&self) -> Option<&DatabaseInfo> {
        self.database.as_ref()
    }

    pub fn test_outcome(&self) -> Option<&TestOutcome> {
        self.test_outcome.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// Fire every information request at once.
    pub fn load(&mut self, services: &Services) {
        let tx = self.data_tx.clone();
        self.error = None;
        self.pending = 5;
        let api = services.api.clone();
        tokio::spawn(async move {
            let (about, database, niord, datasets, logs) = tokio::join!(
                api.about(),
                api.database_info(),
                api.niord_config(),
                api.dataset_count(),
                api.log_count(),
            );
            let _ = tx.send(AboutDataEvent::About(about));
            let _ = tx.send(AboutDataEvent::Database(database));
            let _ = tx.send(AboutDataEvent::Niord(niord));
            let _ = tx.send(AboutDataEvent::DatasetCount(datasets));
            let _ = tx.send(AboutDataEvent::LogCount(logs));
        });
    }

    pub fn test_database(&mut self, services: &Services) {
        if self.testing {
            return;
        }
        let tx = self.data_tx.clone();
        self.testing = true;
        self.test_outcome = None;
        let api = services.api.clone();
        tokio::spawn(async move {
            let _ = tx.send(AboutDataEvent::DatabaseTest(api.test_database().await));
        });
    }

    pub fn poll(&mut self, services: &Services) {
        while let Ok(event) = self.data_rx.try_recv() {
            self.apply(event, services);
        }
    }

    fn apply(&mut self, event: AboutDataEvent, services: &Services) {
        match event {
            AboutDataEvent::About(result) => {
                self.settle();
                match result {
                    Ok(mut about) => {
                        if about.backend_url.trim().is_empty() {
                            about.backend_url = services.api.base_url().to_string();
                        }
                        self.about = Some(about);
                    }
                    Err(e) => {
                        log::warn!("About fetch failed: {e}");
                        self.error = Some(e.describe("system information"));
                    }
                }
            }
            AboutDataEvent::Database(result) => {
                self.settle();
                match result {
                    Ok(info) => self.database = Some(info),
                    Err(e) => log::warn!("Database info fetch failed: {e}"),
                }
            }
            AboutDataEvent::Niord(result) => {
                self.settle();
                match result {
                    Ok(config) => self.niord = Some(config),
                    Err(e) => log::debug!("Niord config unavailable: {e}"),
                }
            }
            AboutDataEvent::DatasetCount(result) => {
                self.settle();
                self.dataset_count = result.ok();
            }
            AboutDataEvent::LogCount(result) => {
                self.settle();
                self.log_count = result.ok();
            }
            AboutDataEvent::DatabaseTest(result) => {
                self.testing = false;
                let outcome = TestOutcome::from_result(result);
                log::info!(
                    "Database connection test {}: {}",
                    if outcome.success { "passed" } else { "failed" },
                    outcome.message
                );
                self.test_outcome = Some(outcome);
            }
        }
    }

    fn settle(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

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

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('t')) => {
                self.test_database(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                true
            }
            _ => false,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Min(6), Constraint::Length(1)]).split(area);
        let columns =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[0]);

        let title = if self.is_loading() { "About (loading…)" } else { "About" };
        let block = theme::block_focused(title);
        frame.render_widget(
            Paragraph::new(self.console_lines())
                .block(block)
                .wrap(Wrap { trim: false }),
            columns[0],
        );

        let block = theme::block_default("Database");
        frame.render_widget(
            Paragraph::new(self.database_lines())
                .block(block)
                .wrap(Wrap { trim: false }),
            columns[1],
        );

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled("t", theme::key_label()),
                Span::styled(":test database ", theme::key_hint()),
                Span::styled("r", theme::key_label()),
                Span::styled(":refresh ", theme::key_hint()),
            ])),
            rows[1],
        );
    }

    fn console_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::raw(""),
            section("BALEEN CONSOLE"),
            field("Console", crate::VERSION.to_string()),
        ];

        if let Some(about) = &self.about {
            lines.push(field("Backend", or_na(Some(about.version.as_str())).to_string()));
            lines.push(field("Backend URL", about.backend_url.clone()));
        }
        lines.push(field("Datasets", count_label(self.dataset_count)));
        lines.push(field("Log entries", count_label(self.log_count)));

        lines.push(Line::raw(""));
        lines.push(section("NIORD"));
        let endpoint = self
            .niord
            .as_ref()
            .and_then(|n| n.endpoint.as_deref())
            .filter(|e| !e.trim().is_empty());
        match endpoint {
            Some(endpoint) => lines.push(field("Endpoint", endpoint.to_string())),
            None => lines.push(Line::from(Span::styled("  Not configured", theme::muted()))),
        }

        if let Some(err) = &self.error {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(format!("  ✗ {err}"), theme::error_text())));
        }
        lines
    }

    fn database_lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Line::raw("")];
        match &self.database {
            Some(db) => {
                lines.push(field("Product", or_na(db.database_product_name.as_deref()).to_string()));
                lines.push(field("Version", or_na(db.database_product_version.as_deref()).to_string()));
                lines.push(field("URL", or_na(db.url.as_deref()).to_string()));
                lines.push(field("User", or_na(db.username.as_deref()).to_string()));
                lines.push(field("Driver", or_na(db.driver_class_name.as_deref()).to_string()));
                lines.push(field("Status", or_na(db.connection_status.as_deref()).to_string()));
            }
            None => lines.push(Line::from(Span::styled(
                "  Database information unavailable",
                theme::muted(),
            ))),
        }

        lines.push(Line::raw(""));
        if self.testing {
            lines.push(Line::from(Span::styled("  Testing connection…", theme::muted())));
        } else if let Some(outcome) = &self.test_outcome {
            let (mark, color) = if outcome.success {
                ("✓", theme::SUCCESS)
            } else {
                ("✗", theme::ERROR)
            };
            lines.push(Line::from(Span::styled(
                format!("  {mark} {}", outcome.message),
                Style::default().fg(color),
            )));
        }
        lines
    }
}

fn section(label: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {label}"),
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<12}"), theme::muted()),
        Span::styled(value, Style::default().fg(theme::TEXT)),
    ])
}

fn count_label(count: Option<u64>) -> String {
    count.map(|c| c.to_string()).unwrap_or_else(|| "N/A".to_string())
}

//! S-124 dataset browser: server-paged table with sorting, a detail overlay
//! with attribute and raw GML tabs, and the clear / reload-from-Niord actions.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, Paragraph, Tabs, Wrap},
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::{
    Dataset, DatasetDetail, NiordStatus, Page, PageRequest, ReloadResult, Result, SortDirection,
    SortSpec,
};
use crate::core::confirm::ConfirmGate;
use crate::core::detail::{DetailTab, DetailView};
use crate::core::format::{format_timestamp, or_na, truncate};
use crate::core::list_view::{DatasetSource, ListView, PageSource};
use crate::tui::app::centered_rect;
use crate::tui::events::NotificationLevel;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::confirm_dialog::{self, DialogKey};
use crate::tui::widgets::paged_table::{step_cursor, text_cell, Column, PagedTable};

const DEFAULT_SORT_COLUMN: &str = "createdAt";

const COLUMNS: [Column; 8] = [
    Column::sortable("ID", "id", Constraint::Length(7)),
    Column::sortable("MRN", "mrn", Constraint::Min(20)),
    Column::sortable("UUID", "uuid", Constraint::Length(12)),
    Column::sortable("Version", "dataProductVersion", Constraint::Length(9)),
    Column::sortable("Valid From", "validFrom", Constraint::Length(20)),
    Column::sortable("Valid To", "validTo", Constraint::Length(20)),
    Column::sortable("Created", "createdAt", Constraint::Length(20)),
    Column::fixed("Refs", Constraint::Length(5)),
];

const HINTS: [(&str, &str); 8] = [
    ("j/k", "select"),
    ("n/p", "page"),
    ("s/S", "sort/flip"),
    ("Enter", "details"),
    ("r", "refresh"),
    ("D", "clear all"),
    ("R", "reload Niord"),
    ("?", "help"),
];

// ── Internal async data events ─────────────────────────────────────────────

enum DatasetDataEvent {
    PageLoaded(Result<Page<Dataset>>),
    DetailLoaded(i64, Result<DatasetDetail>),
    NiordStatus(Result<NiordStatus>),
    Cleared(Result<()>),
    Reloaded(Result<ReloadResult>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetAction {
    ClearAll,
    ReloadFromNiord,
}

// ── State ──────────────────────────────────────────────────────────────────

pub struct DatasetViewState {
    list: ListView<Dataset>,
    detail: DetailView<DatasetDetail>,
    gate: ConfirmGate<DatasetAction>,
    niord_configured: bool,

    data_tx: mpsc::UnboundedSender<DatasetDataEvent>,
    data_rx: mpsc::UnboundedReceiver<DatasetDataEvent>,
}

impl DatasetViewState {
    pub fn new(page_size: u32) -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            list: ListView::new(
                "datasets",
                page_size,
                SortSpec::new(DEFAULT_SORT_COLUMN, SortDirection::Desc),
            ),
            detail: DetailView::new(),
            gate: ConfirmGate::new(),
            niord_configured: false,
            data_tx,
            data_rx,
        }
    }

    pub fn list(&self) -> &ListView<Dataset> {
        &self.list
    }

    pub fn detail(&self) -> &DetailView<DatasetDetail> {
        &self.detail
    }

    pub fn gate(&self) -> &ConfirmGate<DatasetAction> {
        &self.gate
    }

    pub fn niord_configured(&self) -> bool {
        self.niord_configured
    }

    /// Re-fetch the current page and the Niord status.
    pub fn load(&mut self, services: &Services) {
        self.fetch(self.list.refresh(), services);

        let api = services.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(DatasetDataEvent::NiordStatus(api.niord_status().await));
        });
    }

    fn fetch(&mut self, request: PageRequest, services: &Services) {
        self.list = self.list.begin_load(request.clone());
        let source = DatasetSource::new(services.api.clone());
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_page(&request).await;
            let _ = tx.send(DatasetDataEvent::PageLoaded(result));
        });
    }

    fn open_detail(&mut self, services: &Services) {
        let Some(id) = self.list.selected_row().map(|d| d.id) else {
            return;
        };
        self.detail.open(id);
        let api = services.api.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(DatasetDataEvent::DetailLoaded(id, api.dataset_details(id).await));
        });
    }

    pub fn poll(&mut self, services: &Services) {
        while let Ok(event) = self.data_rx.try_recv() {
            match event {
                DatasetDataEvent::PageLoaded(Ok(page)) => {
                    self.list = self.list.apply_page(page);
                }
                DatasetDataEvent::PageLoaded(Err(e)) => {
                    log::warn!("Dataset page fetch failed: {e}");
                    self.list = self.list.apply_error(&e);
                }
                DatasetDataEvent::DetailLoaded(id, Ok(detail)) => {
                    self.detail.apply(id, detail);
                }
                DatasetDataEvent::DetailLoaded(id, Err(e)) => {
                    log::warn!("Dataset {id} details fetch failed: {e}");
                    self.detail.apply_error(id, e.describe("dataset details"));
                }
                DatasetDataEvent::NiordStatus(Ok(status)) => {
                    self.niord_configured = status.configured;
                }
                DatasetDataEvent::NiordStatus(Err(e)) => {
                    log::debug!("Niord status unavailable: {e}");
                    self.niord_configured = false;
                }
                DatasetDataEvent::Cleared(result) => {
                    self.gate.finish();
                    match result {
                        Ok(()) => {
                            services.notify("All datasets cleared", NotificationLevel::Success);
                            self.fetch(self.list.request().with_page(0), services);
                        }
                        Err(e) => {
                            log::warn!("Clearing datasets failed: {e}");
                            services.notify(
                                format!("Failed to clear datasets: {e}"),
                                NotificationLevel::Error,
                            );
                            self.fetch(self.list.refresh(), services);
                        }
                    }
                }
                DatasetDataEvent::Reloaded(result) => {
                    self.gate.finish();
                    match result {
                        Ok(reload) if reload.success => {
                            services.notify(
                                format!("Reloaded {} datasets from Niord", reload.datasets_loaded),
                                NotificationLevel::Success,
                            );
                            self.fetch(self.list.request().with_page(0), services);
                        }
                        Ok(reload) => {
                            self.list = self
                                .list
                                .with_error(format!("Reload from Niord failed: {}", reload.message));
                        }
                        Err(e) => {
                            // The backend may have deleted datasets before the call failed.
                            log::warn!("Reload from Niord failed: {e}");
                            services.notify(
                                format!("Reload from Niord failed: {e}"),
                                NotificationLevel::Error,
                            );
                            self.list = self.list.with_error(format!("Reload from Niord failed: {e}"));
                            self.fetch(self.list.refresh(), services);
                        }
                    }
                }
            }
        }
    }

    // ── Actions ────────────────────────────────────────────────────────────

    fn request_clear(&mut self) {
        self.gate.request(
            DatasetAction::ClearAll,
            "Delete ALL S-124 datasets? This cannot be undone.",
            "Clear All",
        );
    }

    fn request_reload(&mut self, services: &Services) {
        if !self.niord_configured {
            services.notify("Niord is not configured on the backend", NotificationLevel::Warning);
            return;
        }
        self.gate.request(
            DatasetAction::ReloadFromNiord,
            "Delete all datasets and reload them from Niord?",
            "Reload",
        );
    }

    fn run(&mut self, action: DatasetAction, services: &Services) {
        let api = services.api.clone();
        let tx = self.data_tx.clone();
        match action {
            DatasetAction::ClearAll => {
                tokio::spawn(async move {
                    let _ = tx.send(DatasetDataEvent::Cleared(api.clear_datasets().await));
                });
            }
            DatasetAction::ReloadFromNiord => {
                tokio::spawn(async move {
                    let _ = tx.send(DatasetDataEvent::Reloaded(api.reload_from_niord().await));
                });
            }
        }
    }

    fn sort_column_index(&self) -> usize {
        let column = self.list.sort().column.as_str();
        COLUMNS
            .iter()
            .position(|c| c.field == Some(column))
            .unwrap_or(0)
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
                    if let Some(action) = self.gate.confirm() {
                        self.run(action, services);
                    }
                }
                DialogKey::Cancel => self.gate.cancel(),
                DialogKey::Ignored => {}
            }
            return true;
        }

        if self.detail.is_open() {
            match *code {
                KeyCode::Esc | KeyCode::Char('q') => self.detail.close(),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                    self.detail.toggle_tab()
                }
                KeyCode::Char('j') | KeyCode::Down => self.detail.scroll_down(1),
                KeyCode::Char('k') | KeyCode::Up => self.detail.scroll_up(1),
                KeyCode::PageDown => self.detail.scroll_down(10),
                KeyCode::PageUp => self.detail.scroll_up(10),
                _ => {}
            }
            return true;
        }

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.list = self.list.select_next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.list = self.list.select_prev();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('n') | KeyCode::Right) => {
                if let Some(request) = self.list.next_page() {
                    self.fetch(request, services);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('p') | KeyCode::Left) => {
                if let Some(request) = self.list.previous_page() {
                    self.fetch(request, services);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('s')) => {
                let next = step_cursor(&COLUMNS, self.sort_column_index(), true);
                if let Some(field) = COLUMNS[next].field {
                    self.fetch(self.list.sort_by(field), services);
                }
                true
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('S')) => {
                let column = self.list.sort().column.clone();
                self.fetch(self.list.sort_by(&column), services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.open_detail(services);
                true
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('D')) => {
                self.request_clear();
                true
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('R')) => {
                self.request_reload(services);
                true
            }
            _ => false,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.niord_configured {
            "S-124 Datasets · Niord configured"
        } else {
            "S-124 Datasets"
        };
        PagedTable {
            title,
            view: &self.list,
            columns: &COLUMNS,
            sort_cursor: self.sort_column_index(),
            hints: &HINTS,
        }
        .render(frame, area, dataset_cells);

        if self.detail.is_open() {
            self.render_detail(frame, area);
        }

        if let Some(pending) = self.gate.pending() {
            confirm_dialog::render(frame, area, pending);
        }
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(80, 80, area);
        frame.render_widget(Clear, modal);

        let title = match self.detail.target() {
            Some(id) => format!("Dataset {id}"),
            None => "Dataset".to_string(),
        };
        let block = theme::block_modal(&title, theme::PRIMARY_LIGHT);
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        let tabs = Tabs::new(DetailTab::ALL.iter().map(|t| t.title()))
            .select(self.detail.tab().index())
            .style(theme::muted())
            .highlight_style(theme::title());
        frame.render_widget(tabs, chunks[0]);

        let body: Vec<Line<'static>> = if self.detail.is_loading() {
            vec![Line::from(Span::styled("  Loading…", theme::muted()))]
        } else if let Some(err) = self.detail.error() {
            vec![Line::from(Span::styled(format!("  ✗ {err}"), theme::error_text()))]
        } else if let Some(record) = self.detail.record() {
            match self.detail.tab() {
                DetailTab::Attributes => attribute_lines(record),
                DetailTab::Raw => raw_lines(record),
            }
        } else {
            Vec::new()
        };

        frame.render_widget(
            Paragraph::new(body)
                .wrap(Wrap { trim: false })
                .scroll((self.detail.scroll(), 0)),
            chunks[1],
        );

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Tab", theme::key_label()),
                Span::styled(":switch tab ", theme::key_hint()),
                Span::styled("j/k", theme::key_label()),
                Span::styled(":scroll ", theme::key_hint()),
                Span::styled("Esc", theme::key_label()),
                Span::styled(":close", theme::key_hint()),
            ])),
            chunks[2],
        );
    }
}

// ── Free helpers ───────────────────────────────────────────────────────────

fn dataset_cells(dataset: &Dataset) -> Vec<Cell<'static>> {
    let uuid = match dataset.uuid.as_deref() {
        Some(uuid) if !uuid.is_empty() => truncate(uuid, 11),
        _ => or_na(None).to_string(),
    };
    vec![
        Cell::from(dataset.id.to_string()),
        text_cell(or_na(dataset.mrn.as_deref())),
        text_cell(uuid),
        text_cell(or_na(dataset.data_product_version.as_deref())),
        text_cell(format_timestamp(dataset.valid_from)),
        text_cell(format_timestamp(dataset.valid_to)),
        text_cell(format_timestamp(dataset.created_at)),
        Cell::from(dataset.referenced_dataset_ids.len().to_string())
            .style(Style::default().fg(theme::INFO)),
    ]
}

fn attribute_lines(detail: &DatasetDetail) -> Vec<Line<'static>> {
    let d = &detail.dataset;
    let references = if d.referenced_dataset_ids.is_empty() {
        "none".to_string()
    } else {
        d.referenced_dataset_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let rows: Vec<(&str, String)> = vec![
        ("ID", d.id.to_string()),
        ("MRN", or_na(d.mrn.as_deref()).to_string()),
        ("UUID", or_na(d.uuid.as_deref()).to_string()),
        ("Version", or_na(d.data_product_version.as_deref()).to_string()),
        ("Valid From", format_timestamp(d.valid_from)),
        ("Valid To", format_timestamp(d.valid_to)),
        ("Created", format_timestamp(d.created_at)),
        ("References", references),
    ];

    let mut lines = vec![Line::raw("")];
    for (label, value) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {label:<12}"), theme::muted()),
            Span::styled(value, Style::default().fg(theme::TEXT)),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "  GEOMETRY",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::raw(format!(
        "  {}",
        or_na(d.geometry_wkt.as_deref())
    ))));
    lines
}

fn raw_lines(detail: &DatasetDetail) -> Vec<Line<'static>> {
    match detail.gml.as_deref() {
        Some(gml) if !gml.trim().is_empty() => {
            gml.lines().map(|l| Line::raw(l.to_string())).collect()
        }
        _ => vec![Line::from(Span::styled(
            "  No GML document stored for this dataset",
            theme::muted(),
        ))],
    }
}

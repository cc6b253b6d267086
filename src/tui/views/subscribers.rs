//! SECOM subscribers. The backend returns the whole list at once; sorting
//! and paging are done locally by `SubscriberSource`.

use chrono::Utc;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Rect},
    widgets::Cell,
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::{Page, PageRequest, Result, SortDirection, SortSpec, Subscriber};
use crate::core::confirm::ConfirmGate;
use crate::core::format::{format_timestamp, or_na};
use crate::core::list_view::{ListView, PageSource, SubscriberSource};
use crate::tui::events::NotificationLevel;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::confirm_dialog::{self, DialogKey};
use crate::tui::widgets::paged_table::{step_cursor, text_cell, Column, PagedTable};

pub const CLEAR_FAILED: &str = "Failed to clear subscribers. Please try again.";

const COLUMNS: [Column; 8] = [
    Column::sortable("Node MRN", "nodeMrn", Constraint::Min(24)),
    Column::sortable("Product", "dataProductType", Constraint::Length(10)),
    Column::sortable("Version", "productVersion", Constraint::Length(9)),
    Column::sortable("Container", "containerType", Constraint::Length(10)),
    Column::sortable("UN/LOCODE", "unlocode", Constraint::Length(10)),
    Column::sortable("Start", "subscriptionStart", Constraint::Length(20)),
    Column::sortable("End", "subscriptionEnd", Constraint::Length(20)),
    Column::fixed("Status", Constraint::Length(8)),
];

const HINTS: [(&str, &str); 6] = [
    ("j/k", "select"),
    ("n/p", "page"),
    ("s/S", "sort/flip"),
    ("r", "refresh"),
    ("D", "clear all"),
    ("?", "help"),
];

enum SubscriberDataEvent {
    PageLoaded(Result<Page<Subscriber>>),
    Cleared(Result<()>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberAction {
    ClearAll,
}

pub struct SubscriberViewState {
    list: ListView<Subscriber>,
    gate: ConfirmGate<SubscriberAction>,
    data_tx: mpsc::UnboundedSender<SubscriberDataEvent>,
    data_rx: mpsc::UnboundedReceiver<SubscriberDataEvent>,
}

impl SubscriberViewState {
    pub fn new(page_size: u32) -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            list: ListView::new(
                "subscribers",
                page_size,
                SortSpec::new("subscriptionStart", SortDirection::Desc),
            ),
            gate: ConfirmGate::new(),
            data_tx,
            data_rx,
        }
    }

    pub fn list(&self) -> &ListView<Subscriber> {
        &self.list
    }

    pub fn gate(&self) -> &ConfirmGate<SubscriberAction> {
        &self.gate
    }

    pub fn load(&mut self, services: &Services) {
        self.fetch(self.list.refresh(), services);
    }

    fn fetch(&mut self, request: PageRequest, services: &Services) {
        self.list = self.list.begin_load(request.clone());
        let source = SubscriberSource::new(services.api.clone());
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(SubscriberDataEvent::PageLoaded(source.fetch_page(&request).await));
        });
    }

    pub fn poll(&mut self, services: &Services) {
        while let Ok(event) = self.data_rx.try_recv() {
            match event {
                SubscriberDataEvent::PageLoaded(Ok(page)) => {
                    self.list = self.list.apply_page(page);
                }
                SubscriberDataEvent::PageLoaded(Err(e)) => {
                    log::warn!("Subscriber fetch failed: {e}");
                    self.list = self.list.apply_error(&e);
                }
                SubscriberDataEvent::Cleared(Ok(())) => {
                    self.gate.finish();
                    self.list = self.list.cleared();
                    services.notify("All subscribers cleared", NotificationLevel::Success);
                }
                SubscriberDataEvent::Cleared(Err(e)) => {
                    self.gate.finish();
                    log::warn!("Clearing subscribers failed: {e}");
                    services.notify(CLEAR_FAILED, NotificationLevel::Error);
                    // Some rows may have been deleted before the failure.
                    self.list = self.list.with_error(CLEAR_FAILED);
                    self.fetch(self.list.refresh(), services);
                }
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
                    if let Some(SubscriberAction::ClearAll) = self.gate.confirm() {
                        let api = services.api.clone();
                        let tx = self.data_tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(SubscriberDataEvent::Cleared(api.clear_subscribers().await));
                        });
                    }
                }
                DialogKey::Cancel => self.gate.cancel(),
                DialogKey::Ignored => {}
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
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('D')) => {
                self.gate.request(
                    SubscriberAction::ClearAll,
                    "Remove ALL subscribers? They will stop receiving updates.",
                    "Clear All",
                );
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let now = Utc::now();
        PagedTable {
            title: "Subscribers",
            view: &self.list,
            columns: &COLUMNS,
            sort_cursor: self.sort_column_index(),
            hints: &HINTS,
        }
        .render(frame, area, |s| subscriber_cells(s, now));

        if let Some(pending) = self.gate.pending() {
            confirm_dialog::render(frame, area, pending);
        }
    }
}

fn subscriber_cells(s: &Subscriber, now: chrono::DateTime<Utc>) -> Vec<Cell<'static>> {
    let active = s.is_active(now);
    vec![
        text_cell(or_na(s.node_mrn.as_deref())),
        text_cell(or_na(s.data_product_type.as_deref())),
        text_cell(or_na(s.product_version.as_deref())),
        text_cell(or_na(s.container_type.as_deref())),
        text_cell(or_na(s.unlocode.as_deref())),
        text_cell(format_timestamp(s.subscription_start)),
        text_cell(format_timestamp(s.subscription_end)),
        Cell::from(if active { "Active" } else { "Expired" })
            .style(theme::subscription_status(active)),
    ]
}

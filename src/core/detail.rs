//! Detail overlay state for a single record fetched by id.

/// Tabs of the detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    /// Structured attribute table.
    #[default]
    Attributes,
    /// Raw document text.
    Raw,
}

impl DetailTab {
    pub const ALL: [DetailTab; 2] = [DetailTab::Attributes, DetailTab::Raw];

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Attributes => "Attributes",
            DetailTab::Raw => "Raw GML",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DetailTab::Attributes => DetailTab::Raw,
            DetailTab::Raw => DetailTab::Attributes,
        }
    }

    pub fn index(self) -> usize {
        match self {
            DetailTab::Attributes => 0,
            DetailTab::Raw => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailView<T> {
    target: Option<i64>,
    record: Option<T>,
    tab: DetailTab,
    loading: bool,
    error: Option<String>,
    scroll: u16,
}

impl<T> Default for DetailView<T> {
    fn default() -> Self {
        Self {
            target: None,
            record: None,
            tab: DetailTab::Attributes,
            loading: false,
            error: None,
            scroll: 0,
        }
    }
}

impl<T> DetailView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the overlay for `id` and mark its fetch in flight. Always starts
    /// on the attributes tab.
    pub fn open(&mut self, id: i64) {
        *self = Self {
            target: Some(id),
            loading: true,
            ..Self::default()
        };
    }

    /// Store a fetched record. Ignored unless it belongs to the open target.
    pub fn apply(&mut self, id: i64, record: T) -> bool {
        if self.target != Some(id) {
            return false;
        }
        self.record = Some(record);
        self.loading = false;
        self.error = None;
        true
    }

    pub fn apply_error(&mut self, id: i64, message: impl Into<String>) -> bool {
        if self.target != Some(id) {
            return false;
        }
        self.loading = false;
        self.error = Some(message.into());
        true
    }

    /// Hide the overlay and drop the record.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn toggle_tab(&mut self) {
        self.tab = self.tab.toggled();
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<i64> {
        self.target
    }

    pub fn record(&self) -> Option<&T> {
        self.record.as_ref()
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }
}

//! Paged, sortable list state shared by the dataset and subscriber tables.
//!
//! `ListView<T>` is a value: every transition returns the next state instead
//! of mutating in place. Navigation methods (`sort_by`, `next_page`, ...) only
//! compute the `PageRequest` to fetch; the caller spawns the fetch, marks the
//! state with `begin_load`, and folds the outcome back in with `apply_page`
//! or `apply_error`. Responses are applied in arrival order, so a slow reply
//! to an older request can overwrite a newer one.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::api::{
    ApiError, BaleenApi, Dataset, Page, PageRequest, Result, SortDirection, SortSpec, Subscriber,
};

/// Anything that can serve one page of `T`.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>>;
}

/// Server-paged S-124 datasets.
pub struct DatasetSource {
    api: Arc<dyn BaleenApi>,
}

impl DatasetSource {
    pub fn new(api: Arc<dyn BaleenApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource<Dataset> for DatasetSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Dataset>> {
        self.api.datasets(request).await
    }
}

/// Subscribers are served as one flat list; sorting and paging happen here.
pub struct SubscriberSource {
    api: Arc<dyn BaleenApi>,
}

impl SubscriberSource {
    pub fn new(api: Arc<dyn BaleenApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource<Subscriber> for SubscriberSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Subscriber>> {
        let mut all = self.api.subscribers().await?;
        sort_subscribers(&mut all, &request.sort);
        Ok(Page::slice(all, request))
    }
}

fn sort_subscribers(items: &mut [Subscriber], sort: &SortSpec) {
    items.sort_by(|a, b| {
        let ord = a.compare_by(b, &sort.column);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

// ── State ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ListView<T> {
    /// Resource name used in error messages ("datasets", "subscribers").
    resource: &'static str,
    request: PageRequest,
    rows: Vec<T>,
    total_elements: u64,
    total_pages: u32,
    selected: usize,
    loading: bool,
    error: Option<String>,
}

impl<T: Clone> ListView<T> {
    pub fn new(resource: &'static str, page_size: u32, sort: SortSpec) -> Self {
        Self {
            resource,
            request: PageRequest::new(0, page_size.max(1), sort),
            rows: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            selected: 0,
            loading: false,
            error: None,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn current_page(&self) -> u32 {
        self.request.page
    }

    pub fn sort(&self) -> &SortSpec {
        &self.request.sort
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // ── Navigation: compute the next request ───────────────────────────────

    /// Select a sort column. The same column flips direction; a new column
    /// starts with its default direction. Always returns to the first page.
    pub fn sort_by(&self, column: &str) -> PageRequest {
        let sort = if self.request.sort.column == column {
            self.request.sort.toggled()
        } else {
            SortSpec::default_for(column)
        };
        PageRequest::new(0, self.request.size, sort)
    }

    /// `None` on the last page (or when there are no pages).
    pub fn next_page(&self) -> Option<PageRequest> {
        let next = self.request.page + 1;
        (next < self.total_pages).then(|| self.request.with_page(next))
    }

    /// `None` on the first page.
    pub fn previous_page(&self) -> Option<PageRequest> {
        self.request
            .page
            .checked_sub(1)
            .map(|prev| self.request.with_page(prev))
    }

    /// Jump to a zero-based page. `None` when out of range.
    pub fn go_to_page(&self, page: u32) -> Option<PageRequest> {
        (page < self.total_pages).then(|| self.request.with_page(page))
    }

    /// Re-fetch the current page.
    pub fn refresh(&self) -> PageRequest {
        self.request.clone()
    }

    // ── Transitions ────────────────────────────────────────────────────────

    /// Record `request` as current and mark a fetch in flight.
    pub fn begin_load(&self, request: PageRequest) -> Self {
        Self {
            request,
            loading: true,
            ..self.clone()
        }
    }

    /// Replace the whole row set with a freshly fetched page.
    pub fn apply_page(&self, page: Page<T>) -> Self {
        let selected = if page.content.is_empty() {
            0
        } else {
            self.selected.min(page.content.len() - 1)
        };
        Self {
            request: self.request.with_page(page.number),
            rows: page.content,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            selected,
            loading: false,
            error: None,
            ..self.clone()
        }
    }

    /// Record a failed fetch. Previously displayed rows are kept.
    pub fn apply_error(&self, err: &ApiError) -> Self {
        self.with_error(err.describe(self.resource))
    }

    /// Record a failure with an explicit message.
    pub fn with_error(&self, message: impl Into<String>) -> Self {
        Self {
            loading: false,
            error: Some(message.into()),
            ..self.clone()
        }
    }

    /// Empty the table after a successful clear-all, without re-fetching.
    pub fn cleared(&self) -> Self {
        Self {
            request: self.request.with_page(0),
            rows: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            selected: 0,
            loading: false,
            error: None,
            ..self.clone()
        }
    }

    pub fn select_next(&self) -> Self {
        let selected = if self.rows.is_empty() {
            0
        } else {
            (self.selected + 1).min(self.rows.len() - 1)
        };
        Self {
            selected,
            ..self.clone()
        }
    }

    pub fn select_prev(&self) -> Self {
        Self {
            selected: self.selected.saturating_sub(1),
            ..self.clone()
        }
    }

    /// "Page 2 of 3 (45 total)".
    pub fn page_label(&self) -> String {
        if self.total_pages == 0 {
            return format!("No {}", self.resource);
        }
        format!(
            "Page {} of {} ({} total)",
            self.request.page + 1,
            self.total_pages,
            self.total_elements
        )
    }
}

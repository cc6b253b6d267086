//! Live log tail: a cancellable repeating fetch plus the buffer it feeds.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::api::{LogEntry, LogLevel};

/// Default period between log fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

// ── Repeating task ─────────────────────────────────────────────────────────

/// A background task that runs `tick` immediately and then once per period
/// until stopped. Dropping the handle stops the task.
#[derive(Default)]
pub struct PollingTask {
    handle: Option<JoinHandle<()>>,
}

impl PollingTask {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Start (or restart) the task. Must be called inside a tokio runtime.
    pub fn start<F, Fut>(&mut self, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick().await;
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Buffer ─────────────────────────────────────────────────────────────────

/// Latest log snapshot with level filtering and follow-mode bookkeeping.
#[derive(Debug, Clone)]
pub struct LogFeed {
    buffer: Vec<LogEntry>,
    filtered: Vec<LogEntry>,
    /// `None` shows every level.
    filter: Option<LogLevel>,
    follow: bool,
    paused: bool,
    scroll_to_bottom: bool,
}

impl Default for LogFeed {
    fn default() -> Self {
        Self::new(None, true)
    }
}

impl LogFeed {
    pub fn new(filter: Option<LogLevel>, follow: bool) -> Self {
        Self {
            buffer: Vec::new(),
            filtered: Vec::new(),
            filter,
            follow,
            paused: false,
            scroll_to_bottom: false,
        }
    }

    /// Swap in a new snapshot. Returns `true` when this replace raised the
    /// scroll-to-bottom signal (buffer grew while following).
    pub fn replace(&mut self, entries: Vec<LogEntry>) -> bool {
        let previous_len = self.buffer.len();
        self.buffer = entries;
        self.apply_filter();

        let grew = self.buffer.len() > previous_len;
        if grew && self.follow {
            self.scroll_to_bottom = true;
        }
        grew && self.follow
    }

    /// Consume the pending scroll signal.
    pub fn take_scroll_signal(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.filtered.clear();
    }

    pub fn set_filter(&mut self, filter: Option<LogLevel>) {
        self.filter = filter;
        self.apply_filter();
    }

    /// All → ERROR → WARN → INFO → DEBUG → TRACE → All.
    pub fn cycle_filter(&mut self) {
        let next = match &self.filter {
            None => Some(LogLevel::STANDARD[0].clone()),
            Some(current) => LogLevel::STANDARD
                .iter()
                .position(|l| l == current)
                .and_then(|i| LogLevel::STANDARD.get(i + 1))
                .cloned(),
        };
        self.set_filter(next);
    }

    /// Enabling follow jumps to the newest entry right away.
    pub fn set_follow(&mut self, follow: bool) {
        self.follow = follow;
        if follow {
            self.scroll_to_bottom = true;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn apply_filter(&mut self) {
        self.filtered = filter_entries(&self.buffer, self.filter.as_ref());
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.buffer
    }

    pub fn filtered(&self) -> &[LogEntry] {
        &self.filtered
    }

    pub fn filter(&self) -> Option<&LogLevel> {
        self.filter.as_ref()
    }

    /// Filter label as persisted: empty for all levels.
    pub fn filter_key(&self) -> &str {
        self.filter.as_ref().map(LogLevel::as_str).unwrap_or("")
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Keep only entries at exactly `level`; `None` keeps everything.
pub fn filter_entries(entries: &[LogEntry], level: Option<&LogLevel>) -> Vec<LogEntry> {
    match level {
        Some(level) => entries.iter().filter(|e| &e.level == level).cloned().collect(),
        None => entries.to_vec(),
    }
}

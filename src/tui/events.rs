/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick: drains view channels and ages notifications.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusDatasets,
    FocusSubscribers,
    FocusLogs,
    FocusAbout,
    TabNext,
    TabPrev,
    ToggleSidebar,

    // Modals
    ShowHelp,
    CloseHelp,

    Quit,
}

/// Whether the sidebar or the main content receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaFocus {
    Sidebar,
    #[default]
    Main,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Datasets,
    Subscribers,
    Logs,
    About,
}

impl Focus {
    pub const ALL: [Focus; 4] = [Focus::Datasets, Focus::Subscribers, Focus::Logs, Focus::About];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Datasets => "S-124 Datasets",
            Focus::Subscribers => "Subscribers",
            Focus::Logs => "Logs",
            Focus::About => "About",
        }
    }

    /// Single-width glyph for the collapsed sidebar.
    pub fn icon(self) -> &'static str {
        match self {
            Focus::Datasets => "≋",
            Focus::Subscribers => "⚓",
            Focus::Logs => "☰",
            Focus::About => "ℹ",
        }
    }

    pub fn group(self) -> SidebarGroup {
        match self {
            Focus::Datasets | Focus::Subscribers => SidebarGroup::Data,
            Focus::Logs | Focus::About => SidebarGroup::System,
        }
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::Datasets => Action::FocusDatasets,
            Focus::Subscribers => Action::FocusSubscribers,
            Focus::Logs => Action::FocusLogs,
            Focus::About => Action::FocusAbout,
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Sidebar sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarGroup {
    Data,
    System,
}

impl SidebarGroup {
    pub const ALL: [SidebarGroup; 2] = [SidebarGroup::Data, SidebarGroup::System];

    pub fn label(self) -> &'static str {
        match self {
            SidebarGroup::Data => "DATA",
            SidebarGroup::System => "SYSTEM",
        }
    }

    pub fn views(self) -> &'static [Focus] {
        match self {
            SidebarGroup::Data => &[Focus::Datasets, Focus::Subscribers],
            SidebarGroup::System => &[Focus::Logs, Focus::About],
        }
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

//! Enumerations for TUI state management.

/// Which screen the application is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    ProjectList,
    Schedule,
    Help,
}

/// How the status line message should be styled.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MessageLevel {
    Info,
    Warning,
}

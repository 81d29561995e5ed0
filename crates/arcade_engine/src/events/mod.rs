//! Window and input events delivered to loading screens and scenes

use crate::input::KeyCode;

/// Application events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Window close requested (close button, Alt+F4, ...)
    CloseRequested,

    /// Key was pressed
    KeyPressed(KeyCode),

    /// Key was released
    KeyReleased(KeyCode),

    /// Window gained (`true`) or lost (`false`) focus
    FocusChanged(bool),
}

impl AppEvent {
    /// True for a close request
    pub fn is_close_request(&self) -> bool {
        matches!(self, Self::CloseRequested)
    }
}

/// True if any of `events` asks the application to close
pub fn close_requested(events: &[AppEvent]) -> bool {
    events.iter().any(AppEvent::is_close_request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_detection() {
        let events = [AppEvent::KeyPressed(KeyCode::Space), AppEvent::FocusChanged(false)];
        assert!(!close_requested(&events));

        let events = [AppEvent::KeyPressed(KeyCode::M), AppEvent::CloseRequested];
        assert!(close_requested(&events));
        assert!(!close_requested(&[]));
    }
}

//! Background music playback modes and state

/// How many times a music track plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicLoop {
    /// Repeat until explicitly stopped
    #[default]
    Forever,
    /// Play once, then repeat `n` more times
    Repeat(u32),
}

impl MusicLoop {
    /// Total number of passes, `None` for endless playback
    pub fn passes(self) -> Option<u32> {
        match self {
            Self::Forever => None,
            Self::Repeat(n) => Some(n.saturating_add(1)),
        }
    }
}

/// Music playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    /// No music is loaded or it was stopped
    Stopped,
    /// Music is playing
    Playing,
    /// Music is paused and can be resumed
    Paused,
}

impl MusicState {
    /// State after a pause request
    pub fn paused(self) -> Self {
        match self {
            Self::Playing => Self::Paused,
            other => other,
        }
    }

    /// State after an unpause request
    pub fn resumed(self) -> Self {
        match self {
            Self::Paused => Self::Playing,
            other => other,
        }
    }
}

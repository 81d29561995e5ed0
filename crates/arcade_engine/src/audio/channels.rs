//! Mixing channel pool
//!
//! A fixed set of playback slots. Effects are routed to the first idle
//! channel so several sounds can overlap; when every channel is busy the
//! caller falls back to the clip's own default channel.

use crate::audio::backend::ChannelId;

/// A playback slot that can report whether it is still producing sound
pub trait MixChannel {
    /// True while a sound is queued or playing on this channel
    fn is_busy(&self) -> bool;
}

/// Fixed-capacity pool of mixing channels
pub struct ChannelPool<C> {
    channels: Vec<C>,
}

impl<C: MixChannel> ChannelPool<C> {
    /// Create a pool from already opened channels
    pub fn new(channels: Vec<C>) -> Self {
        Self { channels }
    }

    /// Find the first idle channel
    pub fn find_free(&self) -> Option<ChannelId> {
        self.channels
            .iter()
            .position(|channel| !channel.is_busy())
            .map(ChannelId)
    }

    /// Access a channel by id
    pub fn get(&self, id: ChannelId) -> Option<&C> {
        self.channels.get(id.0)
    }

    /// Total number of channels
    pub fn capacity(&self) -> usize {
        self.channels.len()
    }

    /// Iterate over all channels
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.channels.iter()
    }

    /// Drop every channel
    pub fn clear(&mut self) {
        self.channels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeChannel {
        busy: Cell<bool>,
    }

    impl FakeChannel {
        fn idle() -> Self {
            Self { busy: Cell::new(false) }
        }

        fn busy() -> Self {
            Self { busy: Cell::new(true) }
        }
    }

    impl MixChannel for FakeChannel {
        fn is_busy(&self) -> bool {
            self.busy.get()
        }
    }

    #[test]
    fn test_pool_creation() {
        let pool = ChannelPool::new(vec![FakeChannel::idle(), FakeChannel::idle()]);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.find_free(), Some(ChannelId(0)));
    }

    #[test]
    fn test_first_idle_channel_wins() {
        let pool = ChannelPool::new(vec![
            FakeChannel::busy(),
            FakeChannel::idle(),
            FakeChannel::idle(),
        ]);
        assert_eq!(pool.find_free(), Some(ChannelId(1)));
        assert_eq!(pool.iter().filter(|channel| channel.is_busy()).count(), 1);
    }

    #[test]
    fn test_full_pool_has_no_free_channel() {
        let pool = ChannelPool::new(vec![FakeChannel::busy(), FakeChannel::busy()]);
        assert_eq!(pool.find_free(), None);
    }

    #[test]
    fn test_channel_frees_up_when_sound_ends() {
        let pool = ChannelPool::new(vec![FakeChannel::busy(), FakeChannel::busy()]);
        assert_eq!(pool.find_free(), None);

        pool.get(ChannelId(0)).unwrap().busy.set(false);
        assert_eq!(pool.find_free(), Some(ChannelId(0)));
    }

    #[test]
    fn test_empty_pool() {
        let mut pool = ChannelPool::new(vec![FakeChannel::idle()]);
        pool.clear();
        assert_eq!(pool.capacity(), 0);
        assert_eq!(pool.find_free(), None);
        assert!(pool.get(ChannelId(0)).is_none());
    }
}

use std::time::Duration;

/// Current playback state of the embedded player.
///
/// Mutated exclusively by widget events arriving through the bridge or by
/// user commands validated through the bridge. Position never exceeds
/// duration; readiness only ever flips false to true for a live instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// List position of the current track (None until one is known)
    pub current_index: Option<usize>,
    /// Whether the player is currently playing
    pub is_playing: bool,
    /// Current playback position, clamped to `duration`
    pub position: Duration,
    /// Total duration of the current track
    pub duration: Duration,
    /// Whether the widget control channel is established
    pub is_ready: bool,
}

impl PlaybackState {
    /// Clamp a candidate position into the valid range for this state
    #[must_use]
    pub fn clamp_position(&self, position: Duration) -> Duration {
        position.min(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = PlaybackState::default();
        assert_eq!(state.current_index, None);
        assert!(!state.is_playing);
        assert!(!state.is_ready);
        assert_eq!(state.position, Duration::ZERO);
        assert_eq!(state.duration, Duration::ZERO);
    }

    #[test]
    fn test_clamp_position() {
        let state = PlaybackState {
            duration: Duration::from_millis(60_000),
            ..Default::default()
        };
        assert_eq!(
            state.clamp_position(Duration::from_millis(75_000)),
            Duration::from_millis(60_000)
        );
        assert_eq!(
            state.clamp_position(Duration::from_millis(30_000)),
            Duration::from_millis(30_000)
        );
    }

    #[test]
    fn test_clamp_position_zero_duration() {
        let state = PlaybackState::default();
        assert_eq!(state.clamp_position(Duration::from_secs(5)), Duration::ZERO);
    }
}

use std::fmt;

/// Poll loop state.
///
/// `Idle` until the season calendar has loaded once, then `Polling` or
/// `LivePolling` depending on whether the latest cycle saw a live game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PollState {
    #[default]
    Idle,
    Polling,
    LivePolling,
}

impl PollState {
    /// State after a cycle that did or did not find a live game
    pub fn after_cycle(has_live_games: bool) -> Self {
        if has_live_games {
            PollState::LivePolling
        } else {
            PollState::Polling
        }
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PollState::Idle => "IDLE",
            PollState::Polling => "POLLING",
            PollState::LivePolling => "LIVE_POLLING",
        };
        f.write_str(label)
    }
}

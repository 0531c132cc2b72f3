/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    /// Waiting for any input; entered on every reset
    #[default]
    Paused,
    Running,
    /// Frozen until a restart
    GameOver,
}

/// Score for the current game, the best score this session, and the baseline
/// used to judge progress between escalation checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scoreboard {
    score: u32,
    high_score: u32,
    baseline: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Count one food. Returns true if this set a new high score.
    pub fn record_food(&mut self) -> bool {
        self.score += 1;
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Whether the score rose since the previous check. Moves the baseline up
    /// when it did.
    pub fn take_progress(&mut self) -> bool {
        if self.score > self.baseline {
            self.baseline = self.score;
            true
        } else {
            false
        }
    }

    /// Start a new game. The high score survives.
    pub fn reset(&mut self) {
        self.score = 0;
        self.baseline = 0;
    }
}

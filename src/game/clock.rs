/// Logic timers, driven by caller-supplied monotonic milliseconds rather than
/// by rendering frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    move_period_ms: u64,
    min_move_period_ms: u64,
    last_move_ms: u64,
    last_speed_check_ms: u64,
}

impl GameClock {
    pub fn new(initial_move_period_ms: u64, min_move_period_ms: u64) -> Self {
        Self {
            move_period_ms: initial_move_period_ms.max(min_move_period_ms),
            min_move_period_ms,
            last_move_ms: 0,
            last_speed_check_ms: 0,
        }
    }

    pub fn move_period_ms(&self) -> u64 {
        self.move_period_ms
    }

    /// Anchor both timers at `now_ms`
    pub fn start(&mut self, now_ms: u64) {
        self.last_move_ms = now_ms;
        self.last_speed_check_ms = now_ms;
    }

    /// True once strictly more than one move period has passed since the last move
    pub fn move_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_move_ms) > self.move_period_ms
    }

    pub fn record_move(&mut self, now_ms: u64) {
        self.last_move_ms = now_ms;
    }

    /// True once strictly more than `period_ms` has passed since the last check
    pub fn escalation_due(&self, now_ms: u64, period_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_speed_check_ms) > period_ms
    }

    /// Restart the escalation interval at `now_ms`
    pub fn restart_escalation(&mut self, now_ms: u64) {
        self.last_speed_check_ms = now_ms;
    }

    /// Shorten the move period by `decrement_ms`, never below the minimum
    pub fn speed_up(&mut self, decrement_ms: u64) {
        self.move_period_ms = self
            .move_period_ms
            .saturating_sub(decrement_ms)
            .max(self.min_move_period_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_due_is_strict() {
        let mut clock = GameClock::new(150, 10);
        clock.start(1_000);
        assert!(!clock.move_due(1_150));
        assert!(clock.move_due(1_151));

        clock.record_move(1_151);
        assert!(!clock.move_due(1_200));
    }

    #[test]
    fn test_time_going_backwards_is_not_due() {
        let mut clock = GameClock::new(150, 10);
        clock.start(5_000);
        assert!(!clock.move_due(10));
        assert!(!clock.escalation_due(10, 30_000));
    }

    #[test]
    fn test_escalation_timer() {
        let mut clock = GameClock::new(150, 10);
        clock.start(0);
        assert!(!clock.escalation_due(30_000, 30_000));
        assert!(clock.escalation_due(30_001, 30_000));

        clock.restart_escalation(30_001);
        assert!(!clock.escalation_due(40_000, 30_000));
    }

    #[test]
    fn test_speed_floor() {
        let mut clock = GameClock::new(150, 10);
        for _ in 0..100 {
            clock.speed_up(5);
            assert!(clock.move_period_ms() >= 10);
        }
        assert_eq!(clock.move_period_ms(), 10);

        clock.speed_up(u64::MAX);
        assert_eq!(clock.move_period_ms(), 10);
    }

    #[test]
    fn test_speed_up_steps() {
        let mut clock = GameClock::new(150, 10);
        clock.speed_up(1);
        assert_eq!(clock.move_period_ms(), 149);
        clock.speed_up(5);
        assert_eq!(clock.move_period_ms(), 144);
    }
}

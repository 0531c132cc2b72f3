use super::{
    clock::GameClock,
    config::{ConfigError, GameConfig},
    direction::Direction,
    food,
    grid::{Cell, Grid},
    snake::{Cells, SnakeBody},
    state::{GameStatus, Scoreboard},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info};

/// What a call to [`GameEngine::tick`] changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The snake took a step (including a step onto food)
    pub moved: bool,
    /// The snake ate food this tick
    pub ate_food: bool,
    /// No score progress over an escalation period: sped up and grew
    pub escalated: bool,
    /// The snake ran into itself
    pub collided: bool,
}

impl TickOutcome {
    /// Whether anything visible changed
    pub fn changed(&self) -> bool {
        self.moved || self.escalated || self.collided
    }
}

/// Owns the whole game and is the only thing that mutates it
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    rng: StdRng,
    snake: SnakeBody,
    food: Cell,
    status: GameStatus,
    scoreboard: Scoreboard,
    clock: GameClock,
    requested: Direction,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same as [`GameEngine::new`], with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = config.grid();
        let center = grid.center();

        let mut engine = Self {
            grid,
            rng,
            snake: SnakeBody::new(grid, center),
            food: center,
            status: GameStatus::Paused,
            scoreboard: Scoreboard::new(),
            clock: GameClock::new(config.initial_move_period_ms, config.min_move_period_ms),
            requested: Direction::default(),
            config,
        };
        engine.reset();
        Ok(engine)
    }

    /// Advance the game to `now_ms`. `requested` is the player's direction
    /// input since the previous call, if any.
    pub fn tick(&mut self, now_ms: u64, requested: Option<Direction>) -> TickOutcome {
        match self.status {
            GameStatus::Paused => {
                if let Some(direction) = requested {
                    self.requested = direction;
                    self.resume(now_ms);
                }
                return TickOutcome::default();
            }
            GameStatus::GameOver => return TickOutcome::default(),
            GameStatus::Running => {}
        }

        if let Some(direction) = requested {
            self.requested = direction;
        }

        let mut outcome = TickOutcome::default();

        if self.clock.move_due(now_ms) {
            self.clock.record_move(now_ms);
            self.step(now_ms, &mut outcome);
            if self.status == GameStatus::GameOver {
                return outcome;
            }
        }

        if self.clock.escalation_due(now_ms, self.config.escalation_period_ms) {
            self.clock.restart_escalation(now_ms);
            if !self.scoreboard.take_progress() {
                self.clock.speed_up(self.config.stall_speedup_ms);
                self.snake.grow_tail();
                outcome.escalated = true;
                info!(
                    score = self.scoreboard.score(),
                    length = self.snake.len(),
                    move_period_ms = self.clock.move_period_ms(),
                    "no progress, escalating"
                );
            }
        }

        outcome
    }

    /// The "any key" signal: leave PAUSED and start the clocks at `now_ms`
    pub fn resume(&mut self, now_ms: u64) {
        if self.status == GameStatus::Paused {
            self.clock.start(now_ms);
            self.status = GameStatus::Running;
        }
    }

    /// Start over: new snake and food, score and speed reset, back to PAUSED.
    /// The session high score is kept.
    pub fn request_restart(&mut self) {
        debug!(high_score = self.scoreboard.high_score(), "restarting");
        self.reset();
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    pub fn high_score(&self) -> u32 {
        self.scoreboard.high_score()
    }

    /// Body cells, tail first
    pub fn snake_cells(&self) -> Cells<'_> {
        self.snake.cells()
    }

    pub fn snake(&self) -> &SnakeBody {
        &self.snake
    }

    pub fn food_cell(&self) -> Cell {
        self.food
    }

    pub fn move_period_ms(&self) -> u64 {
        self.clock.move_period_ms()
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// One movement step
    fn step(&mut self, now_ms: u64, outcome: &mut TickOutcome) {
        let (next, direction) = self.snake.next_head_cell(self.requested);

        // Checked against the body before the move, tail included
        if self.snake.occupies(next) {
            self.status = GameStatus::GameOver;
            outcome.collided = true;
            info!(
                score = self.scoreboard.score(),
                high_score = self.scoreboard.high_score(),
                "game over"
            );
            return;
        }

        self.snake.turn(direction);
        outcome.moved = true;

        if next == self.food {
            self.eat(next, now_ms);
            outcome.ate_food = true;
        } else {
            self.snake.slide(next);
        }
    }

    fn eat(&mut self, cell: Cell, now_ms: u64) {
        self.snake.advance_head(cell);
        self.clock.speed_up(self.config.food_speedup_ms);
        if self.scoreboard.record_food() {
            info!(high_score = self.scoreboard.high_score(), "new high score");
        }
        self.clock.restart_escalation(now_ms);

        match food::place(&self.grid, &self.snake, &mut self.rng) {
            Some(next) => {
                self.food = next;
                debug!(
                    score = self.scoreboard.score(),
                    food_x = next.x,
                    food_y = next.y,
                    "food eaten"
                );
            }
            None => {
                error!(length = self.snake.len(), "no free cell left for food");
                self.status = GameStatus::GameOver;
            }
        }
    }

    fn reset(&mut self) {
        self.snake.reset(self.grid.center());
        self.scoreboard.reset();
        self.clock = GameClock::new(
            self.config.initial_move_period_ms,
            self.config.min_move_period_ms,
        );
        self.requested = Direction::default();
        self.status = GameStatus::Paused;
        self.food = match food::place(&self.grid, &self.snake, &mut self.rng) {
            Some(cell) => cell,
            // A validated grid has at least two cells
            None => unreachable!("no room for food next to a new snake"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: u64 = 151;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 42).unwrap()
    }

    fn cells(engine: &GameEngine) -> Vec<Cell> {
        engine.snake_cells().collect()
    }

    /// A body whose tail-to-head chain is exactly `body`
    fn snake_from(grid: Grid, body: &[Cell], direction: Direction) -> SnakeBody {
        let mut snake = SnakeBody::new(grid, body[0]);
        for &cell in &body[1..] {
            snake.advance_head(cell);
        }
        snake.turn(direction);
        snake
    }

    #[test]
    fn test_reset() {
        let engine = engine();

        assert_eq!(engine.status(), GameStatus::Paused);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.high_score(), 0);
        assert_eq!(cells(&engine), vec![Cell::new(16, 12)]);
        assert_ne!(engine.food_cell(), Cell::new(16, 12));
        assert!(engine.grid().contains(engine.food_cell()));
        assert_eq!(engine.move_period_ms(), 150);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(GameEngine::new(GameConfig::new(0, 0)).is_err());
    }

    #[test]
    fn test_paused_game_does_not_advance() {
        let mut engine = engine();
        let outcome = engine.tick(1_000_000, None);

        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(engine.status(), GameStatus::Paused);
        assert_eq!(cells(&engine), vec![Cell::new(16, 12)]);
    }

    #[test]
    fn test_direction_input_resumes_without_moving() {
        let mut engine = engine();
        engine.food = Cell::new(0, 0);

        let outcome = engine.tick(5_000, Some(Direction::Right));
        assert!(!outcome.moved);
        assert_eq!(engine.status(), GameStatus::Running);

        // Paused time does not count toward the next move
        assert!(!engine.tick(5_100, None).moved);
        assert!(engine.tick(5_000 + STEP, None).moved);
        assert_eq!(engine.snake().head(), Cell::new(17, 12));
    }

    #[test]
    fn test_moves_only_after_move_period() {
        let mut engine = engine();
        engine.food = Cell::new(0, 0);
        engine.resume(0);

        assert!(!engine.tick(150, None).moved);
        assert!(engine.tick(151, None).moved);
        assert_eq!(engine.snake().head(), Cell::new(16, 11));
        assert!(!engine.tick(300, None).moved);
    }

    #[test]
    fn test_eating_food() {
        let mut engine = engine();
        engine.food = Cell::new(16, 9);
        engine.resume(0);

        let mut now = 0;
        let mut last = TickOutcome::default();
        for _ in 0..3 {
            now += STEP;
            last = engine.tick(now, None);
        }

        assert!(last.ate_food);
        assert_eq!(engine.snake().len(), 2);
        assert_eq!(engine.snake().head(), Cell::new(16, 9));
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.high_score(), 1);
        assert_eq!(engine.move_period_ms(), 149);
        assert!(!engine.snake().occupies(engine.food_cell()));
    }

    #[test]
    fn test_wraps_around_right_edge() {
        let mut engine = engine();
        engine.food = Cell::new(0, 0);
        engine.resume(0);

        let mut now = STEP;
        engine.tick(now, Some(Direction::Right));
        let mut wraps = 0;
        let mut previous_x = engine.snake().head().x;
        for _ in 1..40 {
            now += STEP;
            engine.tick(now, None);
            let x = engine.snake().head().x;
            if x < previous_x {
                wraps += 1;
            }
            previous_x = x;
        }

        assert_eq!(wraps, 1);
        assert_eq!(engine.snake().head(), Cell::new((16 + 40) % 32, 12));
        assert_eq!(engine.snake().len(), 1);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut engine = engine();
        engine.food = Cell::new(0, 0);
        engine.resume(0);

        engine.tick(STEP, Some(Direction::Right));
        engine.tick(2 * STEP, Some(Direction::Left));

        assert_eq!(engine.snake().direction(), Direction::Right);
        assert_eq!(engine.snake().head(), Cell::new(18, 12));
    }

    #[test]
    fn test_stagnation_escalates() {
        let mut engine = engine();
        engine.food = Cell::new(0, 0);
        engine.resume(0);

        let outcome = engine.tick(30_001, None);
        assert!(outcome.moved);
        assert!(outcome.escalated);
        assert_eq!(engine.snake().len(), 2);
        assert_eq!(engine.move_period_ms(), 145);
        assert_eq!(engine.score(), 0);

        let outcome = engine.tick(60_002, None);
        assert!(outcome.escalated);
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.move_period_ms(), 140);
    }

    #[test]
    fn test_progress_skips_escalation() {
        let mut engine = engine();
        engine.food = Cell::new(16, 11);
        engine.resume(0);

        assert!(engine.tick(STEP, None).ate_food);
        engine.food = Cell::new(0, 0);

        // First check after eating sees progress
        let outcome = engine.tick(STEP + 30_001, None);
        assert!(!outcome.escalated);
        assert_eq!(engine.snake().len(), 2);
        assert_eq!(engine.move_period_ms(), 149);

        // The next one does not
        let outcome = engine.tick(STEP + 60_002, None);
        assert!(outcome.escalated);
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.move_period_ms(), 144);
        assert_eq!(engine.score(), 1);
    }

    #[test]
    fn test_speed_never_drops_below_minimum() {
        let config = GameConfig {
            initial_move_period_ms: 12,
            escalation_period_ms: 1_000,
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 5).unwrap();
        engine.food = Cell::new(0, 0);
        engine.resume(0);

        for i in 1..=4 {
            assert!(engine.tick(i * 1_001, None).escalated);
        }
        assert_eq!(engine.move_period_ms(), 10);
        assert_eq!(engine.snake().len(), 5);
    }

    #[test]
    fn test_self_collision_freezes_game() {
        let mut engine = engine();
        let grid = engine.grid();
        engine.snake = snake_from(
            grid,
            &[
                Cell::new(4, 5),
                Cell::new(5, 5),
                Cell::new(6, 5),
                Cell::new(6, 4),
                Cell::new(5, 4),
            ],
            Direction::Left,
        );
        engine.food = Cell::new(20, 20);
        engine.resume(0);

        let outcome = engine.tick(STEP, Some(Direction::Down));
        assert!(outcome.collided);
        assert!(!outcome.moved);
        assert_eq!(engine.status(), GameStatus::GameOver);

        let body = cells(&engine);
        let period = engine.move_period_ms();
        for now in [2 * STEP, 40_000, 100_000] {
            assert_eq!(engine.tick(now, Some(Direction::Up)), TickOutcome::default());
        }
        assert_eq!(cells(&engine), body);
        assert_eq!(engine.move_period_ms(), period);
        assert_eq!(engine.status(), GameStatus::GameOver);

        engine.request_restart();
        assert_eq!(engine.status(), GameStatus::Paused);
        assert_eq!(cells(&engine), vec![Cell::new(16, 12)]);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_running_into_tail_is_fatal() {
        let mut engine = engine();
        let grid = engine.grid();
        engine.snake = snake_from(
            grid,
            &[
                Cell::new(5, 5),
                Cell::new(6, 5),
                Cell::new(6, 4),
                Cell::new(5, 4),
            ],
            Direction::Left,
        );
        engine.food = Cell::new(20, 20);
        engine.resume(0);

        engine.tick(STEP, Some(Direction::Down));
        assert_eq!(engine.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_collision_takes_precedence_over_food() {
        let mut engine = engine();
        let grid = engine.grid();
        engine.snake = snake_from(
            grid,
            &[
                Cell::new(4, 5),
                Cell::new(5, 5),
                Cell::new(6, 5),
                Cell::new(6, 4),
                Cell::new(5, 4),
            ],
            Direction::Left,
        );
        engine.food = Cell::new(5, 5);
        engine.resume(0);

        let outcome = engine.tick(STEP, Some(Direction::Down));
        assert!(outcome.collided);
        assert!(!outcome.ate_food);
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.snake().len(), 5);
    }

    #[test]
    fn test_high_score_survives_restart() {
        let mut engine = engine();
        engine.food = Cell::new(16, 11);
        engine.resume(0);
        engine.tick(STEP, Some(Direction::Right));
        engine.request_restart();
        // Right was requested, so food straight up was not eaten
        assert_eq!(engine.high_score(), 0);

        engine.food = Cell::new(16, 11);
        engine.resume(0);
        engine.tick(STEP, None);
        assert_eq!(engine.score(), 1);

        engine.request_restart();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.high_score(), 1);
        assert_eq!(engine.move_period_ms(), 150);
    }

    #[test]
    fn test_restart_forgets_requested_direction() {
        let mut engine = engine();
        engine.food = Cell::new(0, 0);
        engine.resume(0);
        engine.tick(STEP, Some(Direction::Right));
        engine.request_restart();

        engine.food = Cell::new(0, 0);
        engine.resume(0);
        engine.tick(STEP, None);
        assert_eq!(engine.snake().head(), Cell::new(16, 11));
    }

    #[test]
    fn test_full_grid_ends_game() {
        let mut engine = GameEngine::with_seed(GameConfig::new(2, 1), 9).unwrap();
        assert_eq!(engine.food_cell(), Cell::new(0, 0));
        engine.resume(0);

        let outcome = engine.tick(STEP, Some(Direction::Left));
        assert!(outcome.ate_food);
        assert_eq!(engine.snake().len(), 2);
        assert_eq!(engine.status(), GameStatus::GameOver);
    }
}

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::game::{Direction, GameEngine, GameStatus};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

/// Host loop for a person at the keyboard: feeds key presses and wall-clock
/// time into the engine and redraws when something changed.
pub struct HumanMode {
    engine: GameEngine,
    renderer: Renderer,
    input_handler: InputHandler,
    started: Instant,
    should_quit: bool,
    needs_redraw: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            started: Instant::now(),
            should_quit: false,
            needs_redraw: true,
            pending_direction: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(high_score = self.engine.high_score(), "session ended");
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The engine keeps its own move timing; this only bounds input latency
        let frame_interval = Duration::from_millis(16);
        let mut frame_timer = interval(frame_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Frame: advance the game, draw if anything changed
                _ = frame_timer.tick() => {
                    self.update_game();
                    if self.needs_redraw {
                        self.needs_redraw = false;
                        terminal.draw(|frame| {
                            self.renderer.render(frame, &self.engine);
                        }).context("Failed to draw frame")?;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return;
                }
                let action = self.input_handler.handle_key_event(key);
                self.apply(action);
            }
            Event::Resize(_, _) => self.needs_redraw = true,
            _ => {}
        }
    }

    fn apply(&mut self, action: KeyAction) {
        if action == KeyAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.engine.status() {
            GameStatus::Paused => {
                if let KeyAction::Steer(direction) = action {
                    self.pending_direction = Some(direction);
                }
                self.engine.resume(self.now_ms());
            }
            GameStatus::Running => {
                if let KeyAction::Steer(direction) = action {
                    self.pending_direction = Some(direction);
                }
            }
            GameStatus::GameOver => {
                if action == KeyAction::Restart {
                    self.engine.request_restart();
                    self.pending_direction = None;
                }
            }
        }
        self.needs_redraw = true;
    }

    fn update_game(&mut self) {
        let now = self.now_ms();
        let requested = self.pending_direction.take();
        let outcome = self.engine.tick(now, requested);
        if outcome.changed() {
            self.needs_redraw = true;
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    fn mode() -> HumanMode {
        HumanMode::new(GameEngine::with_seed(GameConfig::default(), 11).unwrap())
    }

    #[test]
    fn test_any_key_starts_game() {
        let mut mode = mode();
        mode.apply(KeyAction::Other);
        assert_eq!(mode.engine.status(), GameStatus::Running);
    }

    #[test]
    fn test_steer_is_queued_for_next_tick() {
        let mut mode = mode();
        mode.apply(KeyAction::Steer(Direction::Left));
        assert_eq!(mode.pending_direction, Some(Direction::Left));

        mode.update_game();
        assert_eq!(mode.pending_direction, None);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut mode = mode();
        mode.apply(KeyAction::Other);
        mode.apply(KeyAction::Restart);
        assert_eq!(mode.engine.status(), GameStatus::Running);
    }

    #[test]
    fn test_quit() {
        let mut mode = mode();
        mode.apply(KeyAction::Quit);
        assert!(mode.should_quit);
        assert_eq!(mode.engine.status(), GameStatus::Paused);
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, GameEngine, GameStatus};

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, engine: &GameEngine) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Score
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        frame.render_widget(self.render_score(engine), chunks[0]);
        frame.render_widget(self.render_grid(engine), chunks[1]);
        frame.render_widget(self.render_status(engine), chunks[2]);
    }

    fn render_grid(&self, engine: &GameEngine) -> Paragraph<'_> {
        let grid = engine.grid();
        let head = engine.snake().head();
        let food = engine.food_cell();
        let dead = engine.status() == GameStatus::GameOver;

        let mut occupied = vec![false; grid.cell_count()];
        for cell in engine.snake_cells() {
            occupied[cell.y as usize * grid.width() as usize + cell.x as usize] = true;
        }

        let body_color = if dead { Color::Red } else { Color::Green };

        let lines: Vec<Line> = (0..grid.height())
            .map(|y| {
                let spans: Vec<Span> = (0..grid.width())
                    .map(|x| {
                        let cell = Cell::new(x, y);
                        if cell == head {
                            Span::styled(
                                "■ ",
                                Style::default()
                                    .fg(body_color)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else if occupied[y as usize * grid.width() as usize + x as usize] {
                            Span::styled("□ ", Style::default().fg(body_color))
                        } else if cell == food {
                            Span::styled(
                                "O ",
                                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::styled(". ", Style::default().fg(Color::DarkGray))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_score(&self, engine: &GameEngine) -> Paragraph<'_> {
        let text = Line::from(vec![
            Span::styled("SCORE: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                engine.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(", "),
            Span::styled("HIGHEST: ", Style::default().fg(Color::Yellow)),
            Span::styled(engine.high_score().to_string(), Style::default().fg(Color::White)),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_status(&self, engine: &GameEngine) -> Paragraph<'_> {
        let text = match engine.status() {
            GameStatus::Paused => Line::from(Span::styled(
                "Press any key to start",
                Style::default().fg(Color::Cyan),
            )),
            GameStatus::Running => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" / "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" / "),
                Span::styled("IJKL", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
            GameStatus::GameOver => Line::from(vec![
                Span::styled(
                    "GAME OVER",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  Press "),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" to restart or "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(engine: &GameEngine) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, engine))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_score_and_pause_hint() {
        let engine = GameEngine::with_seed(GameConfig::default(), 1).unwrap();
        let text = screen_text(&engine);

        assert!(text.contains("SCORE: 0, HIGHEST: 0"));
        assert!(text.contains("Press any key to start"));
        assert!(text.contains("■"));
    }
}

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

/// Everything one frame needs, per route
pub enum Screen<'a> {
    Loading,
    Login {
        user_input: &'a str,
        notice: Option<&'a str>,
    },
    Home {
        state: &'a GameState,
        metrics: &'a GameMetrics,
        notice: Option<&'a str>,
    },
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, screen: &Screen<'_>) {
        match screen {
            Screen::Loading => self.render_loading(frame),
            Screen::Login { user_input, notice } => self.render_login(frame, user_input, *notice),
            Screen::Home {
                state,
                metrics,
                notice,
            } => self.render_home(frame, state, metrics, *notice),
        }
    }

    fn render_loading(&self, frame: &mut Frame) {
        let area = centered(frame.area(), 30, 3);
        let spinner = Paragraph::new("Checking session...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(spinner, area);
    }

    fn render_login(&self, frame: &mut Frame, user_input: &str, notice: Option<&str>) {
        let area = centered(frame.area(), 44, 9);
        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("User id: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{user_input}_"),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to sign in | Esc to quit",
                Style::default().fg(Color::Gray),
            )),
        ];
        if let Some(notice) = notice {
            text.push(Line::from(Span::styled(notice, Style::default().fg(Color::Red))));
        }

        let login = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Sign in "),
        );
        frame.render_widget(login, area);
    }

    fn render_home(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        notice: Option<&str>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Playfield
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_header(state, metrics), chunks[0]);

        // Two grid rows per terminal row, plus the border
        let board_width = clamp_cells(state.bounds.width()).saturating_add(2);
        let board_height = clamp_cells(state.bounds.height().div_ceil(2)).saturating_add(2);
        let board_area = centered(chunks[1], board_width, board_height);
        frame.render_widget(self.render_grid(state), board_area);

        frame.render_widget(self.render_controls(state), chunks[2]);

        if state.is_game_over() {
            let overlay = centered(frame.area(), 46, 10);
            frame.render_widget(Clear, overlay);
            frame.render_widget(self.render_game_over(state, notice), overlay);
        }
    }

    fn render_header(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
        ];
        if state.is_paused() {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let bounds = state.bounds;
        let mut lines = Vec::with_capacity(bounds.height().div_ceil(2));

        let mut y = bounds.y_min;
        while y <= bounds.y_max {
            let spans: Vec<Span> = (bounds.x_min..=bounds.x_max)
                .map(|x| {
                    let top = cell_color(state, Position::new(x, y));
                    let bottom = if y < bounds.y_max {
                        cell_color(state, Position::new(x, y + 1))
                    } else {
                        Color::Reset
                    };
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            lines.push(Line::from(spans));
            y += 2;
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_game_over(&self, state: &GameState, notice: Option<&str>) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Name: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}_", state.player_name),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::styled(" save score | ", Style::default().fg(Color::Gray)),
                Span::styled("Tab", Style::default().fg(Color::Green)),
                Span::styled(" play again | ", Style::default().fg(Color::Gray)),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]),
        ];
        if let Some(notice) = notice {
            text.push(Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Cyan),
            )));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, state: &GameState) -> Paragraph<'_> {
        let text = if state.is_game_over() {
            Line::from(vec![
                Span::styled("type", Style::default().fg(Color::Cyan)),
                Span::raw(" your name | "),
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::raw(" save score | "),
                Span::styled("Tab", Style::default().fg(Color::Green)),
                Span::raw(" play again | "),
                Span::styled("Esc", Style::default().fg(Color::Red)),
                Span::raw(" quit"),
            ])
        } else {
            Line::from(vec![
                Span::styled("drag", Style::default().fg(Color::Cyan)),
                Span::raw(", "),
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to steer | "),
                Span::styled("P", Style::default().fg(Color::Magenta)),
                Span::raw(" pause | "),
                Span::styled("R", Style::default().fg(Color::Green)),
                Span::raw(" restart | "),
                Span::styled("L", Style::default().fg(Color::Yellow)),
                Span::raw(" sign out | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" quit"),
            ])
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_color(state: &GameState, pos: Position) -> Color {
    if pos == state.snake.head() {
        Color::Cyan
    } else if state.snake.occupies(pos) {
        Color::Green
    } else if pos == state.food {
        Color::Red
    } else {
        Color::Black
    }
}

fn clamp_cells(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

/// Rect of at most `width` x `height`, centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEvent, KeyEventKind,
        MouseEvent,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::auth::{AuthGate, IdentityService, Route, UserId};
use crate::game::{Action, GameConfig, GameEngine, GameState, Phase, TickOutcome, display_name};
use crate::input::{InputHandler, KeyAction, PanTracker, TextKey, edit_line};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, Screen};
use crate::store::{SaveOutcome, ScoreRecorder, ScoreStore};

const MAX_NAME_CHARS: usize = 24;
const MAX_USER_ID_CHARS: usize = 64;

/// Interactive front end: auth gate, game screen and score saving on one task
pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    pan: PanTracker,
    identity: Arc<IdentityService>,
    gate: AuthGate,
    route: Route,
    recorder: ScoreRecorder,
    save_outcomes: mpsc::UnboundedReceiver<SaveOutcome>,
    login_input: String,
    notice: Option<String>,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(
        engine: GameEngine,
        identity: Arc<IdentityService>,
        store: Arc<dyn ScoreStore>,
    ) -> Self {
        let state = engine.new_session();
        let gate = AuthGate::new(identity.subscribe());
        let route = gate.route();
        let (recorder, save_outcomes) = ScoreRecorder::new(store, identity.subscribe());

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            pan: PanTracker::new(),
            identity,
            gate,
            route,
            recorder,
            save_outcomes,
            login_input: String::new(),
            notice: None,
            should_quit: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Keeps firing while paused; those ticks are no-ops.
        let mut tick_timer = interval(self.config().tick_interval());

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.on_tick();
                }

                route = self.gate.changed(), if self.gate.is_open() => {
                    if let Some(route) = route {
                        self.on_route(route);
                    }
                }

                Some(outcome) = self.save_outcomes.recv() => {
                    self.on_save_outcome(outcome);
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.screen());
                    }).context("Failed to draw frame")?;
                }

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

    fn screen(&self) -> Screen<'_> {
        match self.route {
            Route::Loading => Screen::Loading,
            Route::Login => Screen::Login {
                user_input: &self.login_input,
                notice: self.notice.as_deref(),
            },
            Route::Home => Screen::Home {
                state: &self.state,
                metrics: &self.metrics,
                notice: self.notice.as_deref(),
            },
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.route {
            Route::Loading => {
                if self.input_handler.handle_key_event(key) == KeyAction::Quit {
                    self.should_quit = true;
                }
            }
            Route::Login => {
                let text_key = self.input_handler.handle_text_key(key);
                self.on_login_key(text_key);
            }
            Route::Home if self.state.is_game_over() => {
                let text_key = self.input_handler.handle_text_key(key);
                self.on_game_over_key(text_key);
            }
            Route::Home => match self.input_handler.handle_key_event(key) {
                KeyAction::GameAction(action) => self.apply_action(action),
                KeyAction::SignOut => self.identity.sign_out(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            },
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.route != Route::Home {
            return;
        }
        if let Some(pan) = self.pan.handle(mouse) {
            self.apply_action(Action::Swipe {
                dx: pan.dx,
                dy: pan.dy,
            });
        }
    }

    fn on_login_key(&mut self, key: TextKey) {
        match key {
            TextKey::Submit => match UserId::new(self.login_input.as_str()) {
                Ok(user) => {
                    self.login_input.clear();
                    self.notice = None;
                    self.identity.sign_in(user);
                }
                Err(e) => self.notice = Some(e.to_string()),
            },
            TextKey::Quit => self.should_quit = true,
            other => {
                edit_line(&mut self.login_input, other, MAX_USER_ID_CHARS);
            }
        }
    }

    fn on_game_over_key(&mut self, key: TextKey) {
        match key {
            TextKey::Submit => {
                self.recorder
                    .save_detached(self.state.score, &self.state.player_name);
            }
            TextKey::Next => self.apply_action(Action::Reload),
            TextKey::Quit => self.should_quit = true,
            other => {
                edit_line(&mut self.state.player_name, other, MAX_NAME_CHARS);
            }
        }
    }

    fn apply_action(&mut self, action: Action) {
        let before = self.state.phase;
        self.engine.apply(&mut self.state, action);

        match (before, self.state.phase) {
            (Phase::Running, Phase::Paused) => self.metrics.on_pause(),
            (Phase::Paused, Phase::Running) => self.metrics.on_resume(),
            _ => {}
        }
        if action == Action::Reload {
            self.start_session();
        }
    }

    fn on_tick(&mut self) {
        if self.route != Route::Home {
            return;
        }

        if self.engine.tick(&mut self.state) == TickOutcome::GameOver {
            tracing::info!(
                score = self.state.score,
                length = self.state.snake.len(),
                moves = self.state.moves,
                "game over"
            );
            self.metrics.on_game_over(self.state.score);
            self.recorder
                .save_detached(self.state.score, &self.state.player_name);
        }
    }

    fn on_route(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        tracing::debug!(from = ?self.route, to = ?route, "route changed");

        // The game screen is mounted fresh every time Home is entered.
        if route == Route::Home {
            self.state = self.engine.new_session();
            self.start_session();
        }
        self.route = route;
        self.notice = None;
    }

    fn on_save_outcome(&mut self, outcome: SaveOutcome) {
        // Failures are logged by the recorder and stay off screen.
        if let SaveOutcome::Saved { user_name, .. } = outcome {
            self.notice = Some(format!(
                "Score saved. Thanks for playing, {}!",
                display_name(&user_name)
            ));
        }
    }

    fn start_session(&mut self) {
        self.metrics.on_game_start();
        self.notice = None;
        self.pan = PanTracker::new();
        match self.gate.user() {
            Some(user) => tracing::info!(user = %user, "session started"),
            None => tracing::info!("session started"),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthState;
    use crate::game::{Direction, Position};
    use crate::store::MemoryStore;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn signed_in() -> (PlayMode, Arc<MemoryStore>) {
        let identity = Arc::new(IdentityService::new());
        identity.sign_in(UserId::new("uid-1").unwrap());
        let store = Arc::new(MemoryStore::new());
        let engine = GameEngine::with_seed(GameConfig::default(), 11);
        let mode = PlayMode::new(engine, identity, store.clone());
        (mode, store)
    }

    async fn settle(mode: &mut PlayMode) {
        if let Some(outcome) = mode.save_outcomes.recv().await {
            mode.on_save_outcome(outcome);
        }
    }

    #[test]
    fn test_starts_on_loading_route() {
        let identity = Arc::new(IdentityService::new());
        let engine = GameEngine::with_seed(GameConfig::default(), 0);
        let mut mode = PlayMode::new(engine, identity, Arc::new(MemoryStore::new()));

        assert_eq!(mode.route, Route::Loading);
        let head = mode.state.snake.head();
        mode.on_tick();
        assert_eq!(mode.state.snake.head(), head);
    }

    #[test]
    fn test_login_flow() {
        let identity = Arc::new(IdentityService::new());
        identity.resolve_initial(None);
        let engine = GameEngine::with_seed(GameConfig::default(), 0);
        let mut mode = PlayMode::new(engine, identity.clone(), Arc::new(MemoryStore::new()));
        assert_eq!(mode.route, Route::Login);

        mode.handle_event(press(KeyCode::Enter));
        assert!(mode.notice.is_some());

        for c in "uid-7".chars() {
            mode.handle_event(press(KeyCode::Char(c)));
        }
        mode.handle_event(press(KeyCode::Enter));

        assert_eq!(
            identity.current(),
            AuthState::Authenticated(UserId::new("uid-7").unwrap())
        );
        mode.on_route(Route::Home);
        assert_eq!(mode.route, Route::Home);
        assert!(mode.notice.is_none());
    }

    #[test]
    fn test_keys_steer_and_pause() {
        let (mut mode, _store) = signed_in();

        mode.handle_event(press(KeyCode::Down));
        assert_eq!(mode.state.snake.direction, Direction::Down);

        mode.handle_event(press(KeyCode::Char('p')));
        assert!(mode.state.is_paused());
        mode.on_tick();
        assert_eq!(mode.state.snake.head(), Position::new(5, 5));

        mode.handle_event(press(KeyCode::Char('p')));
        mode.on_tick();
        assert_eq!(mode.state.snake.head(), Position::new(5, 6));
    }

    #[test]
    fn test_drag_steers() {
        let (mut mode, _store) = signed_in();

        mode.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 20, 10));
        mode.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 11));

        assert_eq!(mode.state.snake.direction, Direction::Left);
    }

    #[tokio::test]
    async fn test_game_over_saves_once() {
        let (mut mode, store) = signed_in();
        mode.state.snake.body = vec![Position::new(40, 5)];

        mode.on_tick();
        assert!(mode.state.is_game_over());
        assert_eq!(mode.metrics.games_played, 1);

        // Further ticks do not save again.
        mode.on_tick();
        settle(&mut mode).await;

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0.user_id, "uid-1");
        assert_eq!(records[0].1.user_name, "");
        assert_eq!(
            mode.notice.as_deref(),
            Some("Score saved. Thanks for playing, Player!")
        );
    }

    #[tokio::test]
    async fn test_manual_save_with_name() {
        let (mut mode, store) = signed_in();
        mode.state.phase = Phase::GameOver;
        mode.state.score = 40;

        for c in "Ana".chars() {
            mode.handle_event(press(KeyCode::Char(c)));
        }
        mode.handle_event(press(KeyCode::Enter));
        settle(&mut mode).await;

        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].1.user_name, "Ana");
        assert_eq!(records[0].1.score, 40);
        assert_eq!(
            mode.notice.as_deref(),
            Some("Score saved. Thanks for playing, Ana!")
        );
    }

    #[test]
    fn test_tab_reloads_after_game_over() {
        let (mut mode, _store) = signed_in();
        mode.state.phase = Phase::GameOver;
        mode.state.score = 90;
        mode.notice = Some("old".to_string());

        mode.handle_event(press(KeyCode::Tab));

        assert!(mode.state.is_running());
        assert_eq!(mode.state.score, 0);
        assert!(mode.notice.is_none());
    }

    #[test]
    fn test_sign_out_returns_to_login() {
        let (mut mode, _store) = signed_in();
        assert_eq!(mode.route, Route::Home);

        mode.handle_event(press(KeyCode::Char('l')));
        assert_eq!(mode.identity.current(), AuthState::Unauthenticated);
        assert_eq!(mode.gate.route(), Route::Login);

        mode.on_route(mode.gate.route());
        assert_eq!(mode.route, Route::Login);

        // Ticks stop once the game screen is gone.
        let head = mode.state.snake.head();
        mode.on_tick();
        assert_eq!(mode.state.snake.head(), head);
    }

    #[test]
    fn test_quit_from_game_over() {
        let (mut mode, _store) = signed_in();
        mode.state.phase = Phase::GameOver;

        mode.handle_event(press(KeyCode::Char('q')));
        assert!(!mode.should_quit);
        assert_eq!(mode.state.player_name, "q");

        mode.handle_event(press(KeyCode::Esc));
        assert!(mode.should_quit);
    }
}

use std::io::{Stderr, stderr};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::time::interval;

use crate::game::{GameConfig, GameEngine, GameState, Movement};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive terminal session
///
/// Owns every live component of a game: the engine, the current state, the
/// movement queue, the renderer and the session metrics. Input events are
/// dispatched from one long-lived handler to whatever game is active, and a
/// single tick timer drives the engine, so there is never more than one
/// pending tick.
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    movement: Movement,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(config)?;
        let state = engine.idle_state();

        Ok(Self {
            engine,
            state,
            movement: Movement::new(),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
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

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Tick cadence follows the active difficulty; the timer is rebuilt
        // whenever a game starts.
        let mut tick_timer = interval(self.engine.frame_time());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            let mut new_frame_time: Option<Duration> = None;

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        new_frame_time = self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.state.playing {
                        self.advance_tick();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let difficulty = self.engine.selected_difficulty();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics, difficulty);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if let Some(frame_time) = new_frame_time {
                tick_timer = interval(frame_time);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Returns the new tick interval when a game was started
    fn handle_event(&mut self, event: Event) -> Option<Duration> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return None;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => {
                    if self.state.playing {
                        self.movement.queue_turn(direction);
                    }
                }
                KeyAction::Start => {
                    if !self.state.playing {
                        self.start_game();
                        return Some(self.engine.frame_time());
                    }
                }
                KeyAction::SelectDifficulty(difficulty) => {
                    self.engine.set_difficulty(difficulty);
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        None
    }

    fn advance_tick(&mut self) {
        let direction = self.movement.advance();
        let result = self.engine.step(&mut self.state, direction);

        if result.terminated {
            self.metrics.on_game_over(self.state.score.value());
        }
    }

    fn start_game(&mut self) {
        self.state = self.engine.start_game();
        self.movement.reset();
        self.metrics.on_game_start();
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

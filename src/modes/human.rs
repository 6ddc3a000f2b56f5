use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::{info, warn};

use crate::feedback::{Cue, CuePlayer};
use crate::game::{GameConfig, GridMotionEngine, Outcome, Phase};
use crate::input::{Command, InputHandler};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::render::Renderer;

/// Render at 30 FPS (33ms per frame)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive play in the terminal.
///
/// Owns the engine and drives it: ticks come from a timer whose period follows
/// the engine's level, input is queued on the engine and only applied by the
/// next tick.
pub struct HumanMode {
    engine: GridMotionEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    cue_player: CuePlayer<Stderr>,
    high_scores: HighScoreStore,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, high_scores: HighScoreStore, muted: bool) -> Self {
        Self {
            engine: GridMotionEngine::new(config),
            metrics: GameMetrics::new(high_scores.best()),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            cue_player: CuePlayer::new(stderr(), muted),
            high_scores,
            should_quit: false,
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

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_period = self.engine.tick_interval();
        let mut tick_timer = paced_timer(tick_period);

        let mut render_timer = interval(RENDER_INTERVAL);
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

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

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            &self.engine,
                            &self.metrics,
                            self.cue_player.is_muted(),
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // Level changes and resets alter the pace; re-arm the timer when they do
            let period = self.engine.tick_interval();
            if period != tick_period {
                tick_period = period;
                tick_timer = tick_timer_after(tick_period);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let command = self.input_handler.handle_key_event(key);
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Move(direction) => match self.engine.phase() {
                Phase::Paused => {}
                Phase::NotStarted => {
                    self.engine.set_direction(direction);
                    self.start_round();
                }
                _ => {
                    self.engine.set_direction(direction);
                }
            },
            Command::Start => self.start_round(),
            Command::TogglePause => {
                if self.engine.toggle_pause() {
                    self.play_cue(Cue::Pause);
                }
            }
            Command::Reset => self.reset_game(),
            Command::ToggleMute => {
                let muted = self.cue_player.toggle_mute();
                info!(muted, "sound toggled");
            }
            Command::Quit => self.should_quit = true,
            Command::None => {}
        }
    }

    fn update_game(&mut self) {
        let previous_level = self.engine.level();
        let outcome = self.engine.tick();

        match outcome {
            Outcome::Ate { .. } => self.metrics.on_food(),
            Outcome::Won { .. } | Outcome::Collided(_) => self.finish_round(),
            Outcome::Moved | Outcome::Idle => {}
        }

        self.play_cue(Cue::for_outcome(outcome, previous_level));
    }

    /// A missing or broken bell never interrupts play
    fn play_cue(&mut self, cue: Cue) {
        if let Err(err) = self.cue_player.play(cue) {
            warn!(%err, ?cue, "failed to play cue");
        }
    }

    fn start_round(&mut self) {
        if self.engine.start() {
            self.metrics.on_round_start();
        }
    }

    fn finish_round(&mut self) {
        let score = self.engine.score();
        self.metrics.on_round_over(score);
        info!(
            score,
            level = self.engine.level(),
            length = self.engine.snake().len(),
            "round over"
        );

        if let Err(err) = self.high_scores.record(score) {
            warn!(%err, path = %self.high_scores.path().display(), "failed to save best score");
        }
    }

    fn reset_game(&mut self) {
        self.engine.reset();
        self.metrics.on_reset();
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

fn paced_timer(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Like [`paced_timer`] but without the immediate first tick
fn tick_timer_after(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

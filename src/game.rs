//! Game loop orchestrator
//!
//! Owns the session and its collaborators. Each frame: poll input, run as
//! many fixed ticks as the elapsed time calls for, hand the drained events
//! to audio and persistence, then present a frame.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::audio::{AudioManager, AudioSink};
use crate::consts::{MAX_SUBSTEPS, SIM_DT, TICK_RATE};
use crate::highscores::HighScoreStore;
use crate::platform::{InputSnapshot, InputSource};
use crate::renderer::{Frame, Renderer};
use crate::settings::{Settings, SettingsError};
use crate::sim::{GameEvent, GameState, LevelError, tick};

/// Longest frame the accumulator accepts; anything slower is dropped
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub struct Game<I, R, A, S>
where
    I: InputSource,
    R: Renderer,
    A: AudioSink,
    S: HighScoreStore,
{
    state: GameState,
    input: I,
    renderer: R,
    audio: AudioManager<A>,
    store: S,
    accumulator: f32,
    /// Input carried until a tick consumes it
    pending: InputSnapshot,
}

impl<I, R, A, S> Game<I, R, A, S>
where
    I: InputSource,
    R: Renderer,
    A: AudioSink,
    S: HighScoreStore,
{
    pub fn new(
        settings: Settings,
        input: I,
        renderer: R,
        sink: A,
        mut store: S,
    ) -> Result<Self, GameError> {
        settings.validate()?;

        let mut audio = AudioManager::new(sink);
        audio.set_master_volume(settings.volume);
        audio.set_muted(!settings.sound);

        let high_score = store.load();
        let state = GameState::new(settings, high_score)?;
        log::info!(
            "Game ready: {} levels, high score {}",
            state.level_count(),
            high_score
        );

        Ok(Self {
            state,
            input,
            renderer,
            audio,
            store,
            accumulator: 0.0,
            pending: InputSnapshot::default(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run exactly one simulation tick and dispatch its events
    pub fn step(&mut self, input: &InputSnapshot) -> Result<(), GameError> {
        tick(&mut self.state, &input.tick_input())?;
        for event in self.state.drain_events() {
            self.dispatch(&event);
        }
        Ok(())
    }

    fn dispatch(&mut self, event: &GameEvent) {
        self.audio.handle(event);

        match event {
            GameEvent::NewHighScore(score) => {
                if let Err(e) = self.store.save(*score) {
                    log::warn!("High score {} not saved: {}", score, e);
                }
            }
            GameEvent::GameOver { score } => log::info!("Game over with {} points", score),
            GameEvent::Won { score } => log::info!("All levels cleared with {} points", score),
            GameEvent::BrickBroken { color, points } => {
                log::debug!("Broke {:?} brick for {} points", color, points);
            }
            _ => {}
        }
    }

    /// Process one frame covering `dt` seconds of wall time.
    ///
    /// Returns false once quit was requested.
    pub fn advance(&mut self, dt: f32) -> Result<bool, GameError> {
        let snapshot = self.input.poll()?;
        if snapshot.quit {
            log::info!("Quit requested");
            return Ok(false);
        }
        if snapshot.pointer_x.is_some() {
            self.pending.pointer_x = snapshot.pointer_x;
        }
        self.pending.primary |= snapshot.primary;

        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.pending.clone();
            self.step(&input)?;
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending.primary = false;
        }

        self.renderer.present(&Frame::capture(&self.state))?;
        Ok(true)
    }

    /// Run at the fixed tick rate until quit
    pub fn run(&mut self) -> Result<(), GameError> {
        let frame = Duration::from_secs(1) / TICK_RATE;
        let mut last = Instant::now();

        loop {
            let frame_start = Instant::now();
            let dt = frame_start.duration_since(last).as_secs_f32();
            last = frame_start;

            if !self.advance(dt)? {
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame {
                thread::sleep(frame - elapsed);
            }
        }

        log::info!(
            "Session ended on level {} with score {} (high score {})",
            self.state.level,
            self.state.score,
            self.state.high_score
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Tone;
    use crate::highscores::{MemoryStore, PersistenceError};
    use crate::renderer::Overlay;
    use crate::sim::GamePhase;
    use glam::Vec2;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedInput(VecDeque<InputSnapshot>);

    impl ScriptedInput {
        fn push(&mut self, primary: bool, quit: bool) {
            self.0.push_back(InputSnapshot {
                pointer_x: None,
                primary,
                quit,
            });
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) -> io::Result<InputSnapshot> {
            Ok(self.0.pop_front().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct FrameLog {
        frames: u32,
        overlay: Option<Overlay>,
    }

    impl Renderer for FrameLog {
        fn present(&mut self, frame: &Frame<'_>) -> io::Result<()> {
            self.frames += 1;
            self.overlay = frame.overlay;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Tones(Vec<Tone>);

    impl AudioSink for Tones {
        fn play(&mut self, tone: Tone) {
            self.0.push(tone);
        }
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&mut self) -> u64 {
            0
        }

        fn save(&mut self, _high_score: u64) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io {
                path: "stats.json".into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    type TestGame<S> = Game<ScriptedInput, FrameLog, Tones, S>;

    fn game(store: MemoryStore) -> TestGame<MemoryStore> {
        Game::new(
            Settings::default(),
            ScriptedInput::default(),
            FrameLog::default(),
            Tones::default(),
            store,
        )
        .unwrap()
    }

    fn press() -> InputSnapshot {
        InputSnapshot {
            primary: true,
            ..Default::default()
        }
    }

    fn lose_ball<S: HighScoreStore>(game: &mut TestGame<S>) {
        let state = game.state_mut();
        state.set_phase(GamePhase::Running);
        state.ball.pos = Vec2::new(400.0, 700.0);
        state.ball.vel = Vec2::new(0.0, 5.0);
    }

    #[test]
    fn test_new_loads_high_score() {
        let game = game(MemoryStore::with_score(321));
        assert_eq!(game.state().high_score, 321);
        assert_eq!(game.state().phase, GamePhase::StartScreen);
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let settings = Settings {
            ball_radius: 0.0,
            ..Settings::default()
        };
        let result = Game::new(
            settings,
            ScriptedInput::default(),
            FrameLog::default(),
            Tones::default(),
            MemoryStore::default(),
        );
        assert!(matches!(result, Err(GameError::Settings(_))));
    }

    #[test]
    fn test_wall_bounce_plays_tone() {
        let mut game = game(MemoryStore::default());
        game.step(&press()).unwrap();
        game.step(&press()).unwrap();

        let state = game.state_mut();
        state.ball.pos = Vec2::new(12.0, 300.0);
        state.ball.vel = Vec2::new(-5.0, 0.0);
        game.step(&InputSnapshot::default()).unwrap();

        assert_eq!(game.audio().sink().0.len(), 1);
        assert_eq!(game.audio().sink().0[0].frequency_hz, 293.66);
        assert!(game.state().ball.vel.x > 0.0);
        assert!(game.state().events.is_empty());
    }

    #[test]
    fn test_muted_by_settings() {
        let settings = Settings {
            sound: false,
            ..Settings::default()
        };
        let game = Game::new(
            settings,
            ScriptedInput::default(),
            FrameLog::default(),
            Tones::default(),
            MemoryStore::default(),
        )
        .unwrap();
        assert!(game.audio().is_muted());
    }

    #[test]
    fn test_volume_from_settings() {
        let settings = Settings {
            volume: 0.5,
            ..Settings::default()
        };
        let mut game = Game::new(
            settings,
            ScriptedInput::default(),
            FrameLog::default(),
            Tones::default(),
            MemoryStore::default(),
        )
        .unwrap();
        game.step(&press()).unwrap();
        game.step(&press()).unwrap();

        let state = game.state_mut();
        state.ball.pos = Vec2::new(12.0, 300.0);
        state.ball.vel = Vec2::new(-5.0, 0.0);
        game.step(&InputSnapshot::default()).unwrap();

        let tones = &game.audio().sink().0;
        assert_eq!(tones.len(), 1);
        assert!((tones[0].volume - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_high_score_saved_once() {
        let mut game = game(MemoryStore::with_score(100));
        game.state_mut().score = 120;
        lose_ball(&mut game);

        for _ in 0..5 {
            game.step(&InputSnapshot::default()).unwrap();
        }
        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.store().high_score, 120);
        assert_eq!(game.store().writes, 1);
    }

    #[test]
    fn test_lower_score_is_not_saved() {
        let mut game = game(MemoryStore::with_score(100));
        game.state_mut().score = 40;
        lose_ball(&mut game);
        game.step(&InputSnapshot::default()).unwrap();

        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.store().writes, 0);
    }

    #[test]
    fn test_save_failure_keeps_playing() {
        let mut game = Game::new(
            Settings::default(),
            ScriptedInput::default(),
            FrameLog::default(),
            Tones::default(),
            BrokenStore,
        )
        .unwrap();
        game.state_mut().score = 10;
        lose_ball(&mut game);

        game.step(&InputSnapshot::default()).unwrap();
        assert_eq!(game.state().high_score, 10);

        game.step(&press()).unwrap();
        assert_eq!(game.state().phase, GamePhase::StartScreen);
    }

    #[test]
    fn test_one_shot_input_consumed_by_first_tick() {
        let mut game = game(MemoryStore::default());
        game.input.push(true, false);

        // Three ticks' worth of time, one click
        assert!(game.advance(SIM_DT * 3.0).unwrap());
        assert_eq!(game.state().phase, GamePhase::LevelLoad);
        assert_eq!(game.renderer().frames, 1);
        assert_eq!(
            game.renderer().overlay,
            Some(Overlay::LevelReady { level: 1 })
        );
    }

    #[test]
    fn test_click_waits_for_a_tick() {
        let mut game = game(MemoryStore::default());
        game.input.push(true, false);

        assert!(game.advance(0.0).unwrap());
        assert_eq!(game.state().phase, GamePhase::StartScreen);
        assert_eq!(game.state().time_ticks, 0);

        assert!(game.advance(SIM_DT).unwrap());
        assert_eq!(game.state().phase, GamePhase::LevelLoad);
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut game = game(MemoryStore::default());
        game.advance(5.0).unwrap();
        assert!(game.state().time_ticks <= u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_quit_stops_without_rendering() {
        let mut game = game(MemoryStore::default());
        game.input.push(false, true);
        assert!(!game.advance(SIM_DT).unwrap());
        assert_eq!(game.renderer().frames, 0);
    }
}

//! Screens around a run: main menu, options, cheats, play and game over
//!
//! The session owns the persisted options and high score and hands a fresh
//! `Run` to the play screen. Deaths are recorded to the high score file,
//! quitting a run is not.

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::EndReason;
use crate::input::FrameInput;
use crate::persistence::{HighScore, Options, Storage, MAX_VOLUME};
use crate::run::{Run, RunSummary};

/// Main menu entries
pub const MAIN_MENU: [&str; 3] = ["Start", "Options", "Quit"];
/// Options menu entries
pub const OPTIONS_MENU: [&str; 4] = ["Music", "Volume", "Cheats", "Back"];
/// Cheats menu entries
pub const CHEATS_MENU: [&str; 3] = ["Unlimited Health", "EXP Multiplier", "Back"];
/// Selectable XP multipliers
pub const EXP_STEPS: [f32; 7] = [0.25, 0.5, 1.0, 1.5, 2.0, 3.0, 5.0];
/// Volume change per confirm
pub const VOLUME_STEP: u32 = 10;

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Title menu
    MainMenu,
    /// Music and volume
    Options,
    /// Cheat toggles
    Cheats,
    /// A run is in progress
    Playing,
    /// Results of the last run
    GameOver,
}

/// Top-level state
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    storage: Storage,
    options: Options,
    high_score: HighScore,
    screen: Screen,
    selected: usize,
    run: Option<Run>,
    next_seed: u64,
    last_summary: Option<RunSummary>,
    running: bool,
}

impl Session {
    /// Load options and high score from `storage` and show the main menu
    pub fn new(config: GameConfig, storage: Storage, seed: u64) -> Self {
        let options = storage.load_options();
        let high_score = storage.load_high_score();
        log::debug!(
            "Session ready (best {} kills / {:.0}s, music {})",
            high_score.high_score,
            high_score.best_time,
            if options.music_enabled { "on" } else { "off" }
        );
        Self {
            config,
            storage,
            options,
            high_score,
            screen: Screen::MainMenu,
            selected: 0,
            run: None,
            next_seed: seed,
            last_summary: None,
            running: true,
        }
    }

    /// Current screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Highlighted menu entry
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Entries of the current menu; empty outside menus
    pub fn menu_items(&self) -> &'static [&'static str] {
        match self.screen {
            Screen::MainMenu => &MAIN_MENU,
            Screen::Options => &OPTIONS_MENU,
            Screen::Cheats => &CHEATS_MENU,
            Screen::Playing | Screen::GameOver => &[],
        }
    }

    /// Persisted options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Best results so far
    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    /// Tunables for the next run, cheats included
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run in progress, if any
    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    /// Mutable run access
    pub fn run_mut(&mut self) -> Option<&mut Run> {
        self.run.as_mut()
    }

    /// Summary of the most recent finished run
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    /// False once the player chose Quit on the main menu
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one frame of whichever screen is showing
    pub fn update(&mut self, dt: f32, input: &FrameInput) -> GameResult<()> {
        if !self.running {
            return Ok(());
        }

        match self.screen {
            Screen::MainMenu => {
                self.navigate(input.nav);
                if input.quit {
                    self.running = false;
                } else if input.confirm {
                    match self.selected {
                        0 => self.start_run()?,
                        1 => self.show(Screen::Options),
                        _ => self.running = false,
                    }
                }
            }
            Screen::Options => {
                self.navigate(input.nav);
                if input.pause {
                    self.show(Screen::MainMenu);
                } else if input.confirm {
                    match self.selected {
                        0 => {
                            self.options.music_enabled = !self.options.music_enabled;
                            self.save_options();
                        }
                        1 => {
                            let next = self.options.volume + VOLUME_STEP;
                            self.options.volume = if next > MAX_VOLUME { 0 } else { next };
                            self.save_options();
                        }
                        2 => self.show(Screen::Cheats),
                        _ => self.show(Screen::MainMenu),
                    }
                }
            }
            Screen::Cheats => {
                self.navigate(input.nav);
                if input.pause {
                    self.show(Screen::Options);
                } else if input.confirm {
                    let cheats = &mut self.config.cheats;
                    match self.selected {
                        0 => cheats.unlimited_health = !cheats.unlimited_health,
                        1 => {
                            let current = EXP_STEPS
                                .iter()
                                .position(|step| (*step - cheats.exp_multiplier).abs() < f32::EPSILON)
                                .unwrap_or(2);
                            cheats.exp_multiplier = EXP_STEPS[(current + 1) % EXP_STEPS.len()];
                        }
                        _ => self.show(Screen::Options),
                    }
                }
            }
            Screen::Playing => self.update_run(dt, input),
            Screen::GameOver => {
                if input.confirm {
                    self.start_run()?;
                } else if input.pause || input.quit {
                    self.show(Screen::MainMenu);
                }
            }
        }
        Ok(())
    }

    /// Begin a new run with the next seed
    pub fn start_run(&mut self) -> GameResult<()> {
        let run = Run::new(self.config.clone(), self.next_seed)?;
        self.next_seed = self.next_seed.wrapping_add(1);
        self.run = Some(run);
        self.show(Screen::Playing);
        Ok(())
    }

    fn update_run(&mut self, dt: f32, input: &FrameInput) {
        let Some(run) = self.run.as_mut() else {
            self.show(Screen::MainMenu);
            return;
        };
        run.step(dt, input);
        if !run.is_over() {
            return;
        }

        let summary = run.summary();
        self.run = None;
        match summary.reason {
            Some(EndReason::Died) => {
                match self.storage.record_run(summary.kills, summary.survival_time) {
                    Ok(score) => self.high_score = score,
                    Err(err) => {
                        log::warn!("Could not save high score: {}", err);
                        self.high_score.record(summary.kills, summary.survival_time);
                    }
                }
                self.show(Screen::GameOver);
            }
            _ => self.show(Screen::MainMenu),
        }
        self.last_summary = Some(summary);
    }

    fn show(&mut self, screen: Screen) {
        self.screen = screen;
        self.selected = 0;
    }

    fn navigate(&mut self, delta: i32) {
        let len = self.menu_items().len();
        if len == 0 || delta == 0 {
            return;
        }
        self.selected = (self.selected as i64 + i64::from(delta)).rem_euclid(len as i64) as usize;
    }

    fn save_options(&self) {
        if let Err(err) = self.storage.save_options(&self.options) {
            log::warn!("Could not save options: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnemyKind;
    use crate::enemy::Enemy;
    use survivor_engine::foundation::math::Vec2;
    use tempfile::TempDir;

    const DT: f32 = 1.0 / 60.0;

    fn confirm() -> FrameInput {
        FrameInput {
            confirm: true,
            ..FrameInput::default()
        }
    }

    fn down() -> FrameInput {
        FrameInput {
            nav: 1,
            ..FrameInput::default()
        }
    }

    fn session(dir: &TempDir) -> Session {
        Session::new(GameConfig::default(), Storage::new(dir.path()), 1)
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.update(DT, &FrameInput { nav: -1, ..FrameInput::default() }).unwrap();
        assert_eq!(s.selected(), 2);
        s.update(DT, &confirm()).unwrap();
        assert!(!s.is_running());
    }

    #[test]
    fn test_options_persist() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.update(DT, &down()).unwrap();
        s.update(DT, &confirm()).unwrap();
        assert_eq!(s.screen(), Screen::Options);

        // Toggle music off, then bump volume from 100 around to 0
        s.update(DT, &confirm()).unwrap();
        s.update(DT, &down()).unwrap();
        s.update(DT, &confirm()).unwrap();

        let reloaded = Storage::new(dir.path()).load_options();
        assert!(!reloaded.music_enabled);
        assert_eq!(reloaded.volume, 0);

        s.update(DT, &FrameInput { pause: true, ..FrameInput::default() }).unwrap();
        assert_eq!(s.screen(), Screen::MainMenu);
    }

    #[test]
    fn test_cheats_apply_to_next_run() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.update(DT, &down()).unwrap();
        s.update(DT, &confirm()).unwrap();
        s.update(DT, &down()).unwrap();
        s.update(DT, &down()).unwrap();
        s.update(DT, &confirm()).unwrap();
        assert_eq!(s.screen(), Screen::Cheats);

        s.update(DT, &confirm()).unwrap();
        s.update(DT, &down()).unwrap();
        s.update(DT, &confirm()).unwrap();
        assert!(s.config().cheats.unlimited_health);
        assert_eq!(s.config().cheats.exp_multiplier, 1.5);
    }

    #[test]
    fn test_quit_run_records_nothing() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.update(DT, &confirm()).unwrap();
        assert_eq!(s.screen(), Screen::Playing);
        for _ in 0..30 {
            s.update(DT, &FrameInput::default()).unwrap();
        }
        s.update(DT, &FrameInput { quit: true, ..FrameInput::default() }).unwrap();
        assert_eq!(s.screen(), Screen::MainMenu);
        assert!(!Storage::new(dir.path()).high_score_path().exists());
        assert_eq!(s.last_summary().and_then(|r| r.reason), Some(EndReason::Quit));
    }

    #[test]
    fn test_death_records_high_score() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        s.update(DT, &confirm()).unwrap();
        for _ in 0..10 {
            s.update(DT, &FrameInput::default()).unwrap();
        }

        let run = s.run_mut().unwrap();
        let world = run.world_mut();
        world.player.hp = 1.0;
        let at = world.player.position + Vec2::new(5.0, 0.0);
        world.spawn_enemy(Enemy::spawn(EnemyKind::Boss, at, 1.0));
        s.update(DT, &FrameInput::default()).unwrap();

        assert_eq!(s.screen(), Screen::GameOver);
        assert!(s.high_score().best_time > 0.0);
        let stored = Storage::new(dir.path()).load_high_score();
        assert_eq!(&stored, s.high_score());

        // Restart straight into a new run
        s.update(DT, &confirm()).unwrap();
        assert_eq!(s.screen(), Screen::Playing);
        assert_eq!(s.run().map(Run::seed), Some(2));
    }
}

//! High score and options files
//!
//! Both files are small JSON documents in the data directory. Anything
//! missing or malformed loads as defaults so a bad file never blocks play.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use survivor_engine::config::Config;

use crate::error::GameResult;

/// High score file name
pub const HIGH_SCORE_FILE: &str = "highscore.json";
/// Options file name
pub const OPTIONS_FILE: &str = "options.json";
/// Loudest volume setting
pub const MAX_VOLUME: u32 = 100;

/// Best results across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScore {
    /// Most kills in one run
    pub high_score: u32,
    /// Longest survival in seconds
    pub best_time: f32,
}

impl Config for HighScore {}

impl HighScore {
    /// Merge a run's result; each field only ever improves
    ///
    /// Returns true if anything changed.
    pub fn record(&mut self, kills: u32, survival_time: f32) -> bool {
        let improved = kills > self.high_score || survival_time > self.best_time;
        self.high_score = self.high_score.max(kills);
        self.best_time = self.best_time.max(survival_time);
        improved
    }
}

/// Player-facing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Background music on or off
    pub music_enabled: bool,
    /// Volume in percent, 0..=100
    pub volume: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            music_enabled: true,
            volume: MAX_VOLUME,
        }
    }
}

impl Config for Options {}

impl Options {
    /// Set the volume, clamping to 0..=100
    pub fn set_volume(&mut self, volume: i64) {
        self.volume = volume.clamp(0, i64::from(MAX_VOLUME)) as u32;
    }

    /// Volume as a 0..=1 gain, zero while music is off
    pub fn gain(&self) -> f32 {
        if self.music_enabled {
            self.volume.min(MAX_VOLUME) as f32 / MAX_VOLUME as f32
        } else {
            0.0
        }
    }

    fn clamped(mut self) -> Self {
        self.volume = self.volume.min(MAX_VOLUME);
        self
    }
}

/// Location of the persisted files
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Files live directly in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the high score file
    pub fn high_score_path(&self) -> PathBuf {
        self.dir.join(HIGH_SCORE_FILE)
    }

    /// Path of the options file
    pub fn options_path(&self) -> PathBuf {
        self.dir.join(OPTIONS_FILE)
    }

    /// Stored high score, or zeros
    pub fn load_high_score(&self) -> HighScore {
        HighScore::load_or_default(self.high_score_path())
    }

    /// Overwrite the high score file
    pub fn save_high_score(&self, score: &HighScore) -> GameResult<()> {
        score.save_to_file(self.high_score_path())?;
        Ok(())
    }

    /// Merge a finished run into the stored high score
    ///
    /// The file is only rewritten when the result improves it. Returns the
    /// merged score.
    pub fn record_run(&self, kills: u32, survival_time: f32) -> GameResult<HighScore> {
        let mut score = self.load_high_score();
        if score.record(kills, survival_time) {
            log::info!(
                "New best: {} kills, {:.1}s survived",
                score.high_score,
                score.best_time
            );
            self.save_high_score(&score)?;
        }
        Ok(score)
    }

    /// Stored options, or defaults; volume is clamped
    pub fn load_options(&self) -> Options {
        Options::load_or_default(self.options_path()).clamped()
    }

    /// Overwrite the options file
    pub fn save_options(&self, options: &Options) -> GameResult<()> {
        options.clamped().save_to_file(self.options_path())?;
        Ok(())
    }
}

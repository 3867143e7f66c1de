//! Demo configuration.
//!
//! Settings for the headless demo driver, loaded from an INI file. Defaults
//! are safe to run with; keys missing from the file keep their default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! ticks = 120
//! delta = 0.016
//!
//! [animation]
//! frame_width = 16
//! frame_height = 16
//! durations = 4,4,8,4
//! backwards = false
//! hold_last = false
//!
//! [output]
//! path = frame.png
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default safe values for startup
const DEFAULT_TICKS: u32 = 120;
const DEFAULT_DELTA: f32 = 1.0 / 60.0;
const DEFAULT_FRAME_WIDTH: u32 = 16;
const DEFAULT_FRAME_HEIGHT: u32 = 16;
const DEFAULT_DURATIONS: [u32; 4] = [4, 4, 8, 4];
const DEFAULT_OUTPUT_PATH: &str = "./frame.png";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Number of update steps to run.
    pub ticks: u32,
    /// Seconds passed to every update.
    pub delta: f32,
    /// Width of a single animation frame in pixels.
    pub frame_width: u32,
    pub frame_height: u32,
    /// Ticks per frame.
    pub frame_durations: Vec<u32>,
    pub backwards: bool,
    /// Pause on the last frame instead of looping.
    pub hold_last: bool,
    /// Where the composed frame is written.
    pub output_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            ticks: DEFAULT_TICKS,
            delta: DEFAULT_DELTA,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            frame_durations: DEFAULT_DURATIONS.to_vec(),
            backwards: false,
            hold_last: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Present but malformed
    /// values are reported as [`ConfigError::Invalid`].
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(ConfigError::Load)?;

        // [simulation] section
        if let Some(ticks) = uint(&config, "simulation", "ticks")? {
            self.ticks = ticks;
        }
        if let Some(delta) = config
            .getfloat("simulation", "delta")
            .map_err(|value| invalid("simulation", "delta", value))?
        {
            self.delta = delta as f32;
        }

        // [animation] section
        if let Some(width) = uint(&config, "animation", "frame_width")? {
            self.frame_width = width;
        }
        if let Some(height) = uint(&config, "animation", "frame_height")? {
            self.frame_height = height;
        }
        if let Some(durations) = config.get("animation", "durations") {
            self.frame_durations = parse_durations(&durations)
                .ok_or_else(|| invalid("animation", "durations", durations))?;
        }
        if let Some(backwards) = boolean(&config, "animation", "backwards")? {
            self.backwards = backwards;
        }
        if let Some(hold_last) = boolean(&config, "animation", "hold_last")? {
            self.hold_last = hold_last;
        }

        // [output] section
        if let Some(path) = config.get("output", "path") {
            self.output_path = PathBuf::from(path);
        }

        info!(
            "Loaded config: {} ticks of {}s, {}x{} frames, durations={:?}, backwards={}, hold_last={}",
            self.ticks,
            self.delta,
            self.frame_width,
            self.frame_height,
            self.frame_durations,
            self.backwards,
            self.hold_last
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [simulation] section
        config.set("simulation", "ticks", Some(self.ticks.to_string()));
        config.set("simulation", "delta", Some(self.delta.to_string()));

        // [animation] section
        config.set("animation", "frame_width", Some(self.frame_width.to_string()));
        config.set("animation", "frame_height", Some(self.frame_height.to_string()));
        config.set("animation", "durations", Some(join_durations(&self.frame_durations)));
        config.set("animation", "backwards", Some(self.backwards.to_string()));
        config.set("animation", "hold_last", Some(self.hold_last.to_string()));

        // [output] section
        config.set(
            "output",
            "path",
            Some(self.output_path.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| ConfigError::Save(e.to_string()))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

fn invalid(section: &'static str, key: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid {
        section,
        key,
        value,
    }
}

fn uint(config: &Ini, section: &'static str, key: &'static str) -> Result<Option<u32>, ConfigError> {
    match config.getuint(section, key) {
        Ok(Some(value)) => u32::try_from(value)
            .map(Some)
            .map_err(|_| invalid(section, key, value.to_string())),
        Ok(None) => Ok(None),
        Err(e) => Err(invalid(section, key, e)),
    }
}

fn boolean(
    config: &Ini,
    section: &'static str,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    config
        .getbool(section, key)
        .map_err(|e| invalid(section, key, e))
}

/// Parse `"4, 4,8"` into tick counts. Empty entries are rejected.
pub fn parse_durations(text: &str) -> Option<Vec<u32>> {
    text.split(',')
        .map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

fn join_durations(durations: &[u32]) -> String {
    durations
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_ini(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let (_dir, path) = write_ini("[simulation]\nticks = 30\n");
        let mut config = GameConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.ticks, 30);
        assert_eq!(config.frame_durations, vec![4, 4, 8, 4]);
        assert_eq!(config.frame_width, 16);
    }

    #[test]
    fn loads_every_section() {
        let (_dir, path) = write_ini(
            "[simulation]\nticks = 10\ndelta = 0.5\n\
             [animation]\nframe_width = 8\nframe_height = 6\ndurations = 1, 2,3\n\
             backwards = true\nhold_last = true\n\
             [output]\npath = out/shot.png\n",
        );
        let mut config = GameConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.delta, 0.5);
        assert_eq!((config.frame_width, config.frame_height), (8, 6));
        assert_eq!(config.frame_durations, vec![1, 2, 3]);
        assert!(config.backwards && config.hold_last);
        assert_eq!(config.output_path, PathBuf::from("out/shot.png"));
    }

    #[test]
    fn malformed_values_are_reported() {
        let (_dir, path) = write_ini("[animation]\ndurations = 4,,x\n");
        let mut config = GameConfig::with_path(&path);
        assert!(matches!(
            config.load_from_file(),
            Err(ConfigError::Invalid {
                section: "animation",
                key: "durations",
                ..
            })
        ));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let mut config = GameConfig::with_path("/definitely/not/here.ini");
        assert!(matches!(config.load_from_file(), Err(ConfigError::Load(_))));
        assert_eq!(config, GameConfig::with_path("/definitely/not/here.ini"));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut saved = GameConfig::with_path(dir.path().join("config.ini"));
        saved.ticks = 7;
        saved.frame_durations = vec![2, 9];
        saved.hold_last = true;
        saved.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(saved.config_path());
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.ticks, 7);
        assert_eq!(loaded.frame_durations, vec![2, 9]);
        assert!(loaded.hold_last);
    }

    #[test]
    fn parse_durations_rejects_garbage() {
        assert_eq!(parse_durations(" 3 ,4"), Some(vec![3, 4]));
        assert_eq!(parse_durations("3,-1"), None);
        assert_eq!(parse_durations(""), None);
    }
}

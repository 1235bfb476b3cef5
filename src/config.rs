/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::scores::Leaderboard;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid_w: i32,
    pub grid_h: i32,
    pub step_ms: u64,
    pub deadzone: f32,
    pub pad: PadConfig,
    pub save_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct PadConfig {
    pub start: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    input: TomlInput,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_grid_w")]
    width: i32,
    #[serde(default = "default_grid_h")]
    height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_step_ms")]
    step_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlInput {
    #[serde(default = "default_deadzone")]
    deadzone: f32,
    #[serde(default = "default_start")]
    start: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    /// Leaderboard file; empty means the per-user default location.
    #[serde(default)]
    save_path: String,
}

// ── Defaults ──

fn default_grid_w() -> i32 { 32 }
fn default_grid_h() -> i32 { 18 }
fn default_step_ms() -> u64 { 150 }
fn default_deadzone() -> f32 { 0.5 }
fn default_start() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            width: default_grid_w(),
            height: default_grid_h(),
        }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { step_ms: default_step_ms() }
    }
}

impl Default for TomlInput {
    fn default() -> Self {
        TomlInput {
            deadzone: default_deadzone(),
            start: default_start(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { save_path: String::new() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let mut grid_w = toml_cfg.grid.width;
        let mut grid_h = toml_cfg.grid.height;
        if grid_w < 8 || grid_h < 8 {
            log::warn!(
                "config: grid {}x{} too small, using {}x{}",
                grid_w, grid_h, default_grid_w(), default_grid_h()
            );
            grid_w = default_grid_w();
            grid_h = default_grid_h();
        }

        let mut step_ms = toml_cfg.speed.step_ms;
        if step_ms < 30 || step_ms > 1000 {
            log::warn!("config: step_ms {} out of range, using {}", step_ms, default_step_ms());
            step_ms = default_step_ms();
        }

        let mut deadzone = toml_cfg.input.deadzone;
        if !(0.05..=0.95).contains(&deadzone) {
            log::warn!("config: deadzone {} out of range, using {}", deadzone, default_deadzone());
            deadzone = default_deadzone();
        }

        let save_path = if toml_cfg.general.save_path.is_empty() {
            Leaderboard::default_path()
        } else {
            PathBuf::from(&toml_cfg.general.save_path)
        };

        GameConfig {
            grid_w,
            grid_h,
            step_ms,
            deadzone,
            pad: PadConfig {
                start: toml_cfg.input.start,
                cancel: toml_cfg.input.cancel,
            },
            save_path,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = GameConfig::from_toml(toml::from_str("").unwrap());
        assert_eq!(cfg.grid_w, 32);
        assert_eq!(cfg.grid_h, 18);
        assert_eq!(cfg.step_ms, 150);
        assert_eq!(cfg.deadzone, 0.5);
        assert_eq!(cfg.pad.start, vec!["Start".to_string()]);
    }

    #[test]
    fn partial_sections_keep_per_key_defaults() {
        let text = "[speed]\nstep_ms = 100\n\n[input]\ndeadzone = 0.3\n";
        let cfg = GameConfig::from_toml(toml::from_str(text).unwrap());
        assert_eq!(cfg.step_ms, 100);
        assert_eq!(cfg.deadzone, 0.3);
        assert_eq!(cfg.grid_w, 32);
        assert_eq!(cfg.pad.cancel, vec!["Select".to_string()]);
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let text = "[grid]\nwidth = 2\nheight = 3\n\n[speed]\nstep_ms = 5\n\n[input]\ndeadzone = 1.5\n";
        let cfg = GameConfig::from_toml(toml::from_str(text).unwrap());
        assert_eq!(cfg.grid_w, 32);
        assert_eq!(cfg.grid_h, 18);
        assert_eq!(cfg.step_ms, 150);
        assert_eq!(cfg.deadzone, 0.5);
    }

    #[test]
    fn explicit_save_path_overrides_default() {
        let text = "[general]\nsave_path = \"/tmp/scores.toml\"\n";
        let cfg = GameConfig::from_toml(toml::from_str(text).unwrap());
        assert_eq!(cfg.save_path, PathBuf::from("/tmp/scores.toml"));
    }
}

//! Configuration management for the Coevo CLI.

use anyhow::{Context, Result};
use coevo::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "coevo.toml";

/// Project configuration, read from `coevo.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub task: TaskConfig,
    #[serde(default)]
    pub arms: ArmsConfig,
}

/// Start and goal joint configurations per arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default = "default_first_task")]
    pub first: TaskEntry,
    #[serde(default = "default_second_task")]
    pub second: TaskEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub start: [f64; 2],
    pub goal: [f64; 2],
}

/// Planar two-link arm geometry per arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmsConfig {
    #[serde(default = "default_first_arm")]
    pub first: ArmEntry,
    #[serde(default = "default_second_arm")]
    pub second: ArmEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmEntry {
    pub base: [f64; 2],
    pub links: [f64; 2],
}

// Default value functions
fn default_first_task() -> TaskEntry {
    TaskEntry { start: [FRAC_PI_2, 0.0], goal: [-FRAC_PI_2, 0.0] }
}
fn default_second_task() -> TaskEntry {
    TaskEntry { start: [FRAC_PI_2, 0.0], goal: [std::f64::consts::PI, 0.0] }
}
fn default_first_arm() -> ArmEntry {
    ArmEntry { base: [0.0, 0.0], links: [1.0, 0.8] }
}
fn default_second_arm() -> ArmEntry {
    ArmEntry { base: [2.0, 0.0], links: [1.0, 0.8] }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            first: default_first_task(),
            second: default_second_task(),
        }
    }
}

impl Default for ArmsConfig {
    fn default() -> Self {
        Self {
            first: default_first_arm(),
            second: default_second_arm(),
        }
    }
}

impl TaskConfig {
    /// Tasks indexed by `RobotId::index()`.
    pub fn tasks(&self) -> [Task; 2] {
        [self.first, self.second].map(|t| Task::new(t.start.into(), t.goal.into()))
    }
}

impl Config {
    /// Load config from `explicit`, or from coevo.toml in the current or
    /// parent directories. Returns the file used, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir().ok().and_then(|dir| find_config_file(&dir)),
        };
        match path {
            Some(path) => Ok((Self::read(&path)?, Some(path))),
            None => Ok((Config::default(), None)),
        }
    }

    /// Parse a config file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Find coevo.toml in `start` or its parent directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[evolution]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
[evolution]
n_gen = 25
selection = "roulette"

[arms.second]
base = [3.0, 0.5]
links = [1.2, 1.0]
"#,
        )
        .unwrap();
        assert_eq!(parsed.evolution.n_gen, 25);
        assert_eq!(parsed.evolution.selection, SelectionScheme::Roulette);
        assert_eq!(parsed.evolution.n_pop, 30);
        assert_eq!(parsed.arms.second.base, [3.0, 0.5]);
        assert_eq!(parsed.arms.first, default_first_arm());
        assert_eq!(parsed.task, TaskConfig::default());
    }

    #[test]
    fn config_found_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        Config::default().save(&dir.path().join(CONFIG_FILE)).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
        assert_eq!(Config::read(&found).unwrap(), Config::default());
    }

    #[test]
    fn tasks_follow_robot_order() {
        let tasks = TaskConfig::default().tasks();
        assert_eq!(tasks[RobotId::Second.index()].goal, Point2::new(std::f64::consts::PI, 0.0));
    }
}

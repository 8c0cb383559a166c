//! Configuration file support for Repwise.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/repwise/config.toml`.

use crate::nutrition::{
    NutritionGoals, CARBS_GOAL_G, DEFAULT_CALORIE_GOAL, FATS_GOAL_G, PROTEIN_GOAL_G,
};
use crate::steps::DEFAULT_DISTANCE_GOAL_KM;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub goals: GoalsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Daily goal configuration; unset fields fall back to the engine's
/// built-in targets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_calories")]
    pub calories: f64,

    #[serde(default = "default_protein")]
    pub protein: f64,

    #[serde(default = "default_carbs")]
    pub carbs: f64,

    #[serde(default = "default_fats")]
    pub fats: f64,

    #[serde(default = "default_distance_km")]
    pub distance_km: f64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            calories: default_calories(),
            protein: default_protein(),
            carbs: default_carbs(),
            fats: default_fats(),
            distance_km: default_distance_km(),
        }
    }
}

impl GoalsConfig {
    /// Nutrition goals view, optionally overridden by a derived calorie
    /// goal from the user's profile.
    pub fn nutrition(&self, calorie_override: Option<f64>) -> NutritionGoals {
        NutritionGoals {
            calories: calorie_override.unwrap_or(self.calories),
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("repwise")
}

fn default_calories() -> f64 {
    DEFAULT_CALORIE_GOAL
}

fn default_protein() -> f64 {
    PROTEIN_GOAL_G
}

fn default_carbs() -> f64 {
    CARBS_GOAL_G
}

fn default_fats() -> f64 {
    FATS_GOAL_G
}

fn default_distance_km() -> f64 {
    DEFAULT_DISTANCE_GOAL_KM
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("repwise").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.goals.calories, 2000.0);
        assert_eq!(config.goals.protein, 150.0);
        assert_eq!(config.goals.carbs, 250.0);
        assert_eq!(config.goals.fats, 65.0);
        assert_eq!(config.goals.distance_km, 5.0);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[goals]
calories = 2600
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.goals.calories, 2600.0);
        assert_eq!(config.goals.protein, 150.0); // default
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.goals.distance_km = 8.5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.goals.distance_km, 8.5);
    }

    #[test]
    fn test_nutrition_goal_override() {
        let goals = GoalsConfig::default();
        assert_eq!(goals.nutrition(None).calories, 2000.0);
        assert_eq!(goals.nutrition(Some(2982.0)).calories, 2982.0);
        assert_eq!(goals.nutrition(Some(2982.0)).protein, 150.0);
    }
}
